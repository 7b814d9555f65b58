/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{fs, path::{Path,PathBuf}, sync::Arc};
use anyhow::Result;
use clap::Parser;
use tokio::{io::{AsyncBufReadExt,BufReader}, sync::{mpsc,watch}};
use tracing::{info,warn};
use tracing_subscriber::EnvFilter;

use odin_adsbx::{
    adsbx::AdsbxConnector,
    config::{AdsbxConfig, load_config},
    live_connector::LiveAdsbxConnector,
    table::{SortDirection, TableColumn, TableRow, filter_rows, sort_rows},
    tracker::{AdsbxTracker, TickOutput},
};

/// poll an ADS-B aggregator region, keep per-flight traces and print/write the results on each tick.
/// Enter a region label on stdin to switch regions while running
#[derive(Parser,Debug)]
#[command(about="ADS-B aggregator position and trace monitor")]
struct Args {
    /// pathname of RON config (built-in region registry if not set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// label of region to start with (default region of config if not set)
    #[arg(long)]
    region: Option<String>,

    /// list known regions and exit
    #[arg(long)]
    list_regions: bool,

    /// stop after this number of ticks
    #[arg(long)]
    ticks: Option<usize>,

    /// directory to write map.geojson and table.json to after each tick
    #[arg(long)]
    output: Option<PathBuf>,

    /// table column to sort by
    #[arg(long, default_value="nic")]
    sort: TableColumn,

    /// sort in descending order
    #[arg(long)]
    desc: bool,

    /// only show flights containing this text
    #[arg(long)]
    filter: Option<String>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config( path)?,
        None => AdsbxConfig::default()
    };

    if args.list_regions {
        for label in config.region_labels() { println!("{label}"); }
        return Ok(())
    }

    if let Some(region) = &args.region {
        config.default_region = region.clone();
    }

    if let Some(dir) = &args.output {
        fs::create_dir_all( dir)?;
    }

    let connector = LiveAdsbxConnector::new( &config)?;
    let tracker = AdsbxTracker::new( config, connector)?;
    monitor( tracker, &args).await
}

async fn monitor<C> (tracker: AdsbxTracker<C>, args: &Args)->Result<()> where C: AdsbxConnector + 'static {
    info!("monitoring region '{}' every {:?}", tracker.region().label, tracker.config().update_interval);

    let (region_tx, region_rx) = mpsc::channel::<String>(4);
    let (output_tx, mut output_rx) = watch::channel( tracker.initial_output());
    let tracker_task = tokio::spawn( tracker.run( region_rx, output_tx));

    let stdin_tx = region_tx.clone();
    tokio::spawn( async move {
        let mut lines = BufReader::new( tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let label = line.trim();
            if !label.is_empty() && stdin_tx.send( label.to_string()).await.is_err() {
                break
            }
        }
    });

    let mut n_ticks = 0;
    while output_rx.changed().await.is_ok() {
        let output: Arc<TickOutput> = output_rx.borrow_and_update().clone();
        if let Err(e) = show_output( &output, args) {
            warn!("failed to render tick output: {}", e);
        }

        n_ticks += 1;
        if args.ticks.is_some_and( |max_ticks| n_ticks >= max_ticks) {
            break
        }
    }

    drop( output_rx);
    drop( region_tx);
    tracker_task.abort(); // the stdin reader might still hold a region sender
    Ok(())
}

fn show_output (output: &TickOutput, args: &Args)->Result<()> {
    let mut rows = output.rows.clone();
    if let Some(pattern) = &args.filter {
        filter_rows( &mut rows, pattern);
    }
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
    sort_rows( &mut rows, args.sort, direction);

    println!("------------------ {} {} {:?}", output.region, output.date.format("%Y-%m-%d %H:%M:%S"), output.status);
    println!("{:<10} {:>4} {:>10} {:>11} {:>8} {:>7} {:>4}", "flight", "nic", "lat", "lon", "alt_geom", "gs", "sil");
    for row in &rows {
        print_row( row);
    }
    println!("{} rows, {} markers, {} trace segments", rows.len(), output.map.markers.len(), output.map.traces.len());

    if let Some(dir) = &args.output {
        write_output( output, &rows, dir)?;
    }
    Ok(())
}

fn print_row (row: &TableRow) {
    println!("{:<10} {:>4} {:>10} {:>11} {:>8} {:>7} {:>4}",
             row.flight, cell( row.nic, 0), cell( row.lat, 5), cell( row.lon, 5), cell( row.alt_geom, 0), cell( row.gs, 1), cell( row.sil, 0));
}

fn cell (v: Option<f64>, precision: usize)->String {
    v.map( |v| format!("{v:.precision$}")).unwrap_or_default()
}

fn write_output (output: &TickOutput, rows: &[TableRow], dir: &Path)->Result<()> {
    fs::write( dir.join("map.geojson"), output.map.to_geojson_string()?)?;
    fs::write( dir.join("table.json"), serde_json::to_string_pretty( rows)?)?;
    Ok(())
}
