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

//! the untyped boundary to ADS-B aggregator endpoints that serve the ADSBx v2 JSON format
//! (`{"ac":[..], "now":.., "total":..}`, e.g. api.adsb.one or api.adsb.lol). This is the only
//! place that touches raw JSON records - everything downstream works on [`Observation`]s

use std::{fmt, sync::Arc};
use serde::{Serialize,Deserialize};
use serde_json::Value;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug,warn};
use uom::si::{f64::{Length,Velocity}, length::foot, velocity::knot};

use crate::config::Region;
use crate::errors::{parse_error,Result};

/// one aircraft entry of the upstream "ac" array, as we got it
pub type RawRecord = serde_json::Map<String,Value>;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct Position { pub latitude: f64, pub longitude: f64 }

impl Position {
    pub fn new (latitude: f64, longitude: f64)->Self { Position{latitude,longitude} }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "({:.5},{:.5})", self.latitude, self.longitude)
    }
}

/// the records of one poll, in upstream order
#[derive(Debug,Clone,Default)]
pub struct RawBatch {
    pub records: Vec<RawRecord>,
    pub now: Option<f64>,   // server time in epoch millis (if reported)
    pub total: Option<u64>, // number of aircraft the server reported
}

impl RawBatch {
    pub fn from_records (records: Vec<RawRecord>)->Self {
        RawBatch { records, now: None, total: None }
    }

    /// note this never fails - a payload without an "ac" array is just an empty batch
    pub fn from_value (value: Value)->Self {
        let Value::Object(mut obj) = value else {
            warn!("payload is not a JSON object, treating as empty batch");
            return RawBatch::default()
        };

        let now = obj.get("now").and_then( coerce_f64);
        let total = obj.get("total").and_then( Value::as_u64);

        match obj.remove("ac") {
            Some(Value::Array(entries)) => {
                let n_entries = entries.len();
                let records: Vec<RawRecord> = entries.into_iter().filter_map( |e| {
                    if let Value::Object(rec) = e { Some(rec) } else { None }
                }).collect();

                if records.len() < n_entries {
                    debug!("skipped {} non-object entries in \"ac\" array", n_entries - records.len());
                }
                RawBatch { records, now, total }
            }
            _ => {
                warn!("payload has no \"ac\" array, treating as empty batch");
                RawBatch { records: Vec::new(), now, total }
            }
        }
    }

    pub fn len (&self)->usize { self.records.len() }
    pub fn is_empty (&self)->bool { self.records.is_empty() }
}

/// parse a response body. Only bytes that are not JSON at all are an error (the tick failed),
/// everything else degrades to a (possibly empty) batch
pub fn parse_batch (bytes: &[u8])->Result<RawBatch> {
    let value: Value = serde_json::from_slice( bytes).map_err( |e| parse_error!("invalid JSON payload: {e}"))?;
    Ok( RawBatch::from_value( value) )
}

/// lenient numeric coercion: JSON numbers and numeric strings, nothing else. Non-finite values
/// are treated as missing
pub fn coerce_f64 (v: &Value)->Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None
    };
    x.filter( |x| x.is_finite())
}

#[async_trait]
pub trait AdsbxConnector: Send {
    /// retrieve the current batch for the given region. Errors mean the whole tick failed
    async fn fetch (&mut self, region: &Region)->Result<RawBatch>;
}

/* #region observation extraction ****************************************************************************/

/// a validated aircraft position report. Altitude and speed are only used for display
#[derive(Debug,Clone,PartialEq)]
pub struct Observation {
    pub flight: Arc<String>, // trimmed, never empty
    pub position: Position,
    pub nic: i64,
    pub altitude: Option<Length>,     // geometric altitude
    pub groundspeed: Option<Velocity>,
    pub sil: Option<f64>,
}

impl Observation {
    pub fn new (flight: &str, latitude: f64, longitude: f64, nic: i64)->Self {
        Observation {
            flight: Arc::new( flight.to_string()),
            position: Position::new( latitude, longitude),
            nic,
            altitude: None,
            groundspeed: None,
            sil: None
        }
    }

    pub fn altitude_ft (&self)->Option<f64> { self.altitude.map( |alt| alt.get::<foot>()) }
    pub fn groundspeed_kn (&self)->Option<f64> { self.groundspeed.map( |gs| gs.get::<knot>()) }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "Observation( flight: \"{}\", pos: {}, nic: {}", self.flight, self.position, self.nic)?;
        if let Some(alt) = self.altitude_ft() { write!( f, ", alt: {:.0}", alt)?; }
        if let Some(gs) = self.groundspeed_kn() { write!( f, ", gs: {:.1}", gs)?; }
        if let Some(sil) = self.sil { write!( f, ", sil: {}", sil)?; }
        write!( f, ")")
    }
}

/// why a raw record did not make it into an [`Observation`]
#[derive(Error,Debug,Clone,PartialEq)]
pub enum Rejected {
    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("field {0} is not numeric")]
    NotNumeric(&'static str),

    #[error("field {0} is not integral")]
    NotIntegral(&'static str),

    #[error("flight is not text")]
    FlightNotText,

    #[error("empty flight")]
    EmptyFlight,
}

/// the single validation gate between raw records and observations. Requires "lat", "lon", "nic"
/// and a non-blank "flight", optional "alt_geom" (ft), "gs" (kn) and "sil" fields are coerced if
/// possible and otherwise left out
pub fn extract (rec: &RawRecord)->std::result::Result<Observation,Rejected> {
    let lat = required( rec, "lat")?;
    let lon = required( rec, "lon")?;
    let nic = required( rec, "nic")?;
    let flight = required( rec, "flight")?;

    let flight = flight.as_str().ok_or( Rejected::FlightNotText)?.trim();
    if flight.is_empty() { return Err( Rejected::EmptyFlight) }

    let latitude = coerce_f64( lat).ok_or( Rejected::NotNumeric("lat"))?;
    let longitude = coerce_f64( lon).ok_or( Rejected::NotNumeric("lon"))?;

    let nic = coerce_f64( nic).ok_or( Rejected::NotNumeric("nic"))?;
    if nic.fract() != 0.0 { return Err( Rejected::NotIntegral("nic")) }

    Ok( Observation {
        flight: Arc::new( flight.to_string()),
        position: Position::new( latitude, longitude),
        nic: nic as i64,
        altitude: optional( rec, "alt_geom").map( |alt| Length::new::<foot>(alt)),
        groundspeed: optional( rec, "gs").map( |gs| Velocity::new::<knot>(gs)),
        sil: optional( rec, "sil"),
    })
}

/// extract all valid observations (in arrival order) and return them together with the number of
/// rejected records
pub fn extract_all (batch: &RawBatch)->(Vec<Observation>,usize) {
    let mut observations = Vec::with_capacity( batch.len());
    let mut n_rejected = 0;

    for rec in &batch.records {
        match extract( rec) {
            Ok(obs) => observations.push( obs),
            Err(reason) => {
                n_rejected += 1;
                debug!("rejected record {}: {}", record_id( rec), reason);
            }
        }
    }

    (observations, n_rejected)
}

// null counts as missing, same as an absent key
fn required<'a> (rec: &'a RawRecord, key: &'static str)->std::result::Result<&'a Value,Rejected> {
    match rec.get( key) {
        None | Some(Value::Null) => Err( Rejected::MissingField(key)),
        Some(v) => Ok(v)
    }
}

fn optional (rec: &RawRecord, key: &str)->Option<f64> {
    rec.get( key).and_then( coerce_f64)
}

fn record_id (rec: &RawRecord)->&str {
    rec.get("hex").and_then( Value::as_str).unwrap_or("?")
}

/* #endregion observation extraction */
