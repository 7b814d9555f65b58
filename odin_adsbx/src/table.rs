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

//! flat display rows for the latest poll. This works on the raw batch (not the history) and is
//! more lenient than observation extraction: only the flight is required, all other fields are
//! kept as (optional) numbers

use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};
use serde::Serialize;
use serde_json::Value;

use crate::adsbx::{RawBatch, RawRecord, coerce_f64};

/// textual stand-ins for "no callsign" we see in upstream data
pub const FLIGHT_PLACEHOLDERS: [&str;4] = ["nan", "NaN", "None", "null"];

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct TableRow {
    pub flight: String,
    pub nic: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt_geom: Option<f64>,
    pub gs: Option<f64>,
    pub sil: Option<f64>,

    #[serde(flatten)]
    pub other: BTreeMap<String,Option<f64>>, // all remaining upstream fields
}

impl TableRow {
    pub fn new (flight: impl ToString)->Self {
        TableRow { flight: flight.to_string(), nic: None, lat: None, lon: None, alt_geom: None, gs: None, sil: None, other: BTreeMap::new() }
    }

    /// numeric value of a column (None for the flight column)
    pub fn value (&self, column: TableColumn)->Option<f64> {
        match column {
            TableColumn::Flight => None,
            TableColumn::Nic => self.nic,
            TableColumn::Lat => self.lat,
            TableColumn::Lon => self.lon,
            TableColumn::AltGeom => self.alt_geom,
            TableColumn::Gs => self.gs,
            TableColumn::Sil => self.sil,
        }
    }
}

/// one row per record with a usable flight, in batch order
pub fn project (batch: &RawBatch)->Vec<TableRow> {
    batch.records.iter().filter_map( project_record).collect()
}

pub fn project_record (rec: &RawRecord)->Option<TableRow> {
    let flight = flight_text( rec.get("flight")?)?;
    let mut row = TableRow::new( flight);

    for (key,value) in rec {
        let x = coerce_f64( value);
        match key.as_str() {
            "flight" => {}
            "nic" => row.nic = x,
            "lat" => row.lat = x,
            "lon" => row.lon = x,
            "alt_geom" => row.alt_geom = x,
            "gs" => row.gs = x,
            "sil" => row.sil = x,
            _ => { row.other.insert( key.clone(), x); }
        }
    }

    Some(row)
}

fn flight_text (v: &Value)->Option<String> {
    let flight = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None
    };

    if flight.is_empty() || FLIGHT_PLACEHOLDERS.contains( &flight.as_str()) { None } else { Some(flight) }
}

/* #region sorting and filtering *****************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TableColumn { Flight, Nic, Lat, Lon, AltGeom, Gs, Sil }

impl TableColumn {
    pub const ALL: [TableColumn;7] = [
        TableColumn::Flight, TableColumn::Nic, TableColumn::Lat, TableColumn::Lon, TableColumn::AltGeom, TableColumn::Gs, TableColumn::Sil
    ];

    pub fn name (&self)->&'static str {
        match self {
            TableColumn::Flight => "flight",
            TableColumn::Nic => "nic",
            TableColumn::Lat => "lat",
            TableColumn::Lon => "lon",
            TableColumn::AltGeom => "alt_geom",
            TableColumn::Gs => "gs",
            TableColumn::Sil => "sil",
        }
    }
}

impl fmt::Display for TableColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.name())
    }
}

impl FromStr for TableColumn {
    type Err = String;

    fn from_str (s: &str)->Result<Self,Self::Err> {
        TableColumn::ALL.iter()
            .find( |c| c.name() == s)
            .copied()
            .ok_or_else( || format!("unknown column '{s}' (expected one of flight,nic,lat,lon,alt_geom,gs,sil)"))
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum SortDirection { Asc, Desc }

/// stable sort. Missing values always go last, independent of direction
pub fn sort_rows (rows: &mut [TableRow], column: TableColumn, direction: SortDirection) {
    let directed = |ord: Ordering| if direction == SortDirection::Desc { ord.reverse() } else { ord };

    rows.sort_by( |a,b| {
        if column == TableColumn::Flight {
            directed( a.flight.cmp( &b.flight))
        } else {
            match (a.value(column), b.value(column)) {
                (Some(x),Some(y)) => directed( x.total_cmp( &y)),
                (Some(_),None) => Ordering::Less,
                (None,Some(_)) => Ordering::Greater,
                (None,None) => Ordering::Equal
            }
        }
    });
}

/// keep rows whose flight contains the pattern (case insensitive). An empty pattern keeps everything
pub fn filter_rows (rows: &mut Vec<TableRow>, flight_pattern: &str) {
    let pattern = flight_pattern.trim().to_lowercase();
    if !pattern.is_empty() {
        rows.retain( |row| row.flight.to_lowercase().contains( &pattern));
    }
}

/* #endregion sorting and filtering */
