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

//! the per-tick pipeline: fetch -> extract -> absorb -> traces/markers/rows -> [`TickOutput`].
//! The tracker owns the [`HistoryStore`], hence there is only one writer and ticks are processed
//! strictly one after the other

use std::sync::Arc;
use chrono::{DateTime,Utc};
use serde::Serialize;
use tokio::{sync::{mpsc,watch}, time::{self,MissedTickBehavior}};
use tracing::{debug,info,warn};

use crate::{
    HistoryStore, TickId,
    adsbx::{AdsbxConnector, RawBatch, extract_all},
    config::{AdsbxConfig, Region},
    errors::{OdinAdsbxError, Result},
    map::{MapView, Marker},
    table::{TableRow, project},
    trace::build_traces,
};

#[derive(Debug,Clone,Copy,Default,PartialEq,Serialize)]
pub struct TickStats {
    pub records: usize,  // raw records in batch
    pub accepted: usize, // valid observations
    pub rejected: usize,
    pub flights: usize,  // flights in history
    pub segments: usize, // trace segments
    pub dropped: usize,  // stale flights purged in this tick
}

#[derive(Debug,Clone,PartialEq,Serialize)]
pub enum TickStatus {
    Pending,       // nothing fetched yet
    Fresh,
    Stale(String), // last fetch failed, content is from the previous successful tick
}

/// everything the presentation layer gets per tick
#[derive(Debug,Clone,Serialize)]
pub struct TickOutput {
    pub tick: Option<TickId>,
    pub date: DateTime<Utc>,
    pub region: String,
    pub map: MapView,
    pub rows: Vec<TableRow>,
    pub stats: TickStats,
    pub status: TickStatus,
}

impl TickOutput {
    pub fn empty (region: &Region, zoom: u8, status: TickStatus)->Self {
        TickOutput {
            tick: None,
            date: Utc::now(),
            region: region.label.clone(),
            map: MapView::new( region.center, zoom),
            rows: Vec::new(),
            stats: TickStats::default(),
            status
        }
    }

    pub fn is_fresh (&self)->bool { self.status == TickStatus::Fresh }
    pub fn is_stale (&self)->bool { matches!( self.status, TickStatus::Stale(_)) }
}

pub struct AdsbxTracker<C> where C: AdsbxConnector {
    config: Arc<AdsbxConfig>,
    connector: C,
    region: Region,
    store: HistoryStore,
    last_output: Option<Arc<TickOutput>>, // last fresh output
}

impl<C> AdsbxTracker<C> where C: AdsbxConnector {
    pub fn new (config: AdsbxConfig, connector: C)->Result<Self> {
        config.validate()?;

        let region = config.region( &config.default_region).cloned()
            .ok_or_else( || OdinAdsbxError::UnknownRegionError( config.default_region.clone()))?;
        let store = HistoryStore::from_config( &config);

        Ok( AdsbxTracker { config: Arc::new(config), connector, region, store, last_output: None } )
    }

    pub fn config (&self)->&AdsbxConfig { &self.config }
    pub fn region (&self)->&Region { &self.region }
    pub fn store (&self)->&HistoryStore { &self.store }
    pub fn last_output (&self)->Option<&Arc<TickOutput>> { self.last_output.as_ref() }

    /// what to show before the first tick completed
    pub fn initial_output (&self)->Arc<TickOutput> {
        Arc::new( TickOutput::empty( &self.region, self.config.zoom, TickStatus::Pending))
    }

    /// returns true if this actually changed the region
    pub fn select_region (&mut self, label: &str)->Result<bool> {
        let region = self.config.region( label).cloned()
            .ok_or_else( || OdinAdsbxError::UnknownRegionError( label.to_string()))?;

        if region == self.region {
            return Ok(false)
        }

        info!("switching region '{}' -> '{}'", self.region.label, region.label);
        if self.config.clear_on_region_change {
            self.store.clear();
        }
        self.last_output = None;
        self.region = region;
        Ok(true)
    }

    /// the synchronous part of a tick. The batch is absorbed as a whole before anything is derived from
    /// the history, i.e. outputs never reflect a partially updated store
    pub fn process_batch (&mut self, batch: &RawBatch)->Result<Arc<TickOutput>> {
        let (observations, rejected) = extract_all( batch);

        let tick = self.store.next_tick();
        self.store.absorb( &observations, tick)?;

        let history = self.store.snapshot();
        let traces = build_traces( history);
        let markers: Vec<Marker> = observations.iter().map( Marker::from_observation).collect();
        let rows = project( batch);

        let stats = TickStats {
            records: batch.len(),
            accepted: observations.len(),
            rejected,
            flights: history.len(),
            segments: traces.len(),
            dropped: self.store.dropped_list().len(),
        };
        info!("tick {} '{}': {} records, {} accepted, {} rejected, {} flights, {} segments, {} dropped",
              tick, self.region.label, stats.records, stats.accepted, stats.rejected, stats.flights, stats.segments, stats.dropped);

        let output = Arc::new( TickOutput {
            tick: Some(tick),
            date: Utc::now(),
            region: self.region.label.clone(),
            map: MapView { center: self.region.center, zoom: self.config.zoom, markers, traces },
            rows,
            stats,
            status: TickStatus::Fresh
        });
        self.last_output = Some( output.clone());

        Ok(output)
    }

    /// fetch and process one batch. This never fails - if anything goes wrong we keep the store as it was
    /// and return the previous output marked as stale
    pub async fn tick (&mut self)->Arc<TickOutput> {
        let result = match self.connector.fetch( &self.region).await {
            Ok(batch) => self.process_batch( &batch),
            Err(e) => Err(e)
        };

        match result {
            Ok(output) => output,
            Err(e) => {
                warn!("tick failed for region '{}': {}", self.region.label, e);
                self.stale_output( e.to_string())
            }
        }
    }

    fn stale_output (&self, reason: String)->Arc<TickOutput> {
        let output = if let Some(last) = &self.last_output {
            let mut output = last.as_ref().clone();
            output.status = TickStatus::Stale(reason);
            output
        } else {
            TickOutput::empty( &self.region, self.config.zoom, TickStatus::Stale(reason))
        };
        Arc::new(output)
    }

    /// the timer loop. Ticks are awaited inside of the loop so there is never more than one in flight, region
    /// changes are applied between ticks and trigger an immediate tick.
    /// Terminates if the region channel is closed or all output receivers are gone
    pub async fn run (mut self, mut region_rx: mpsc::Receiver<String>, output_tx: watch::Sender<Arc<TickOutput>>) {
        let mut interval = time::interval( self.config.update_interval);
        interval.set_missed_tick_behavior( MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let output = self.tick().await;
                    if output_tx.send( output).is_err() {
                        debug!("no output receivers left, terminating tracker");
                        break
                    }
                }
                cmd = region_rx.recv() => {
                    match cmd {
                        Some(label) => match self.select_region( &label) {
                            Ok(true) => interval.reset_immediately(),
                            Ok(false) => debug!("region '{}' already selected", label),
                            Err(e) => warn!("ignoring region selection: {}", e)
                        }
                        None => {
                            debug!("region channel closed, terminating tracker");
                            break
                        }
                    }
                }
            }
        }
    }
}
