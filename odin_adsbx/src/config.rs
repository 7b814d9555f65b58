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

use std::{collections::HashSet, fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};

use crate::{DEFAULT_MAX_HISTORY, MIN_HISTORY, adsbx::Position, map::DEFAULT_ZOOM, errors::{OdinAdsbxError,Result}};

/// a selectable region: the aggregator endpoint to poll and where to center the map
#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct Region {
    pub label: String,
    pub url: String,
    pub center: Position,
}

impl Region {
    pub fn new (label: &str, url: &str, latitude: f64, longitude: f64)->Self {
        Region { label: label.to_string(), url: url.to_string(), center: Position::new( latitude, longitude) }
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
#[serde(default)]
pub struct AdsbxConfig {
    pub regions: Vec<Region>,         // the region registry
    pub default_region: String,       // label of the region we start with
    pub update_interval: Duration,    // poll interval
    pub request_timeout: Duration,    // for each poll request
    pub max_history: usize,           // max number of positions per flight
    pub drop_after_ticks: Option<u64>, // purge flights not seen for more ticks than this (None: keep forever)
    pub zoom: u8,                     // initial map zoom level
    pub clear_on_region_change: bool,
}

impl Default for AdsbxConfig {
    fn default()->Self {
        AdsbxConfig {
            regions: default_regions(),
            default_region: "Finnmark (adsb.one)".to_string(),
            update_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(20),
            max_history: DEFAULT_MAX_HISTORY,
            drop_after_ticks: None,
            zoom: DEFAULT_ZOOM,
            clear_on_region_change: true,
        }
    }
}

impl AdsbxConfig {
    pub fn region (&self, label: &str)->Option<&Region> {
        self.regions.iter().find( |r| r.label == label)
    }

    pub fn region_labels (&self)->impl Iterator<Item=&str> {
        self.regions.iter().map( |r| r.label.as_str())
    }

    pub fn validate (&self)->Result<()> {
        if self.regions.is_empty() {
            return Err( config_error("no regions defined"))
        }

        let mut labels: HashSet<&str> = HashSet::with_capacity( self.regions.len());
        for r in &self.regions {
            if !labels.insert( r.label.as_str()) {
                return Err( config_error( format!("duplicated region label '{}'", r.label)))
            }
        }

        if self.region( &self.default_region).is_none() {
            return Err( config_error( format!("default region '{}' not in registry", self.default_region)))
        }
        if self.max_history < MIN_HISTORY {
            return Err( config_error( format!("max_history {} too small to build traces", self.max_history)))
        }
        if self.update_interval.is_zero() {
            return Err( config_error("zero update_interval"))
        }

        Ok(())
    }
}

fn config_error (msg: impl ToString)->OdinAdsbxError {
    OdinAdsbxError::ConfigError( msg.to_string())
}

/// the regions we know about if there is no config file
pub fn default_regions ()->Vec<Region> {
    vec![
        Region::new( "Finnmark (adsb.one)",    "https://api.adsb.one/v2/point/69.724193/19.039474/250", 69.724193, 19.039474),
        Region::new( "Finnmark (adsb.lol)",    "https://api.adsb.lol/v2/lat/69.724193/lon/19.039474/dist/250", 69.724193, 19.039474),
        Region::new( "Baltic Sea (adsb.one)",  "https://api.adsb.one/v2/point/55.546281/18.039474/150", 55.546281, 18.039474),
        Region::new( "Baltic Sea (adsb.lol)",  "https://api.adsb.lol/v2/lat/55.546281/lon/18.039474/dist/150", 55.546281, 18.039474),
        Region::new( "Ankara (adsb.one)",      "https://api.adsb.one/v2/point/39.912781/32.788112/250", 39.912781, 32.788112),
        Region::new( "Ankara (adsb.lol)",      "https://api.adsb.lol/v2/lat/39.912781/lon/32.788112/dist/250", 39.912781, 32.788112),
    ]
}

pub fn parse_config (ron: &str)->Result<AdsbxConfig> {
    let config: AdsbxConfig = ron::from_str( ron)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config (path: impl AsRef<Path>)->Result<AdsbxConfig> {
    let data = fs::read( path.as_ref())?;
    let config: AdsbxConfig = ron::de::from_bytes( data.as_slice())?;
    config.validate()?;
    Ok(config)
}
