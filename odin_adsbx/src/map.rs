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

//! what we hand over to the map renderer: markers for the current positions and trace segments
//! for the accumulated history. [`MapView::to_geojson`] turns this into a GeoJSON feature collection
//! that can be consumed by Leaflet/Cesium style clients

use std::sync::Arc;
use serde::Serialize;
use serde_json::json;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value as GeoJsonValue};

use crate::{adsbx::{Observation,Position}, nic::{ColorBand,color_for}, trace::TraceSegment, errors::Result};

pub const DEFAULT_ZOOM: u8 = 6;

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct Marker {
    pub flight: Arc<String>,
    pub position: Position,
    pub band: ColorBand,
    pub popup: String,
    pub tooltip: String,
}

impl Marker {
    pub fn from_observation (obs: &Observation)->Self {
        let popup = format!("NIC: {}, FLIGHT: {}, Altitude(ft): {}, Speed(kn): {}",
                            obs.nic, obs.flight, fmt_opt( obs.altitude_ft(), 0), fmt_opt( obs.groundspeed_kn(), 1));

        Marker {
            flight: obs.flight.clone(),
            position: obs.position,
            band: color_for( Some(obs.nic)),
            popup,
            tooltip: obs.flight.to_string(),
        }
    }
}

fn fmt_opt (v: Option<f64>, precision: usize)->String {
    match v {
        Some(v) => format!("{v:.precision$}"),
        None => "None".to_string()
    }
}

#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub traces: Vec<TraceSegment>,
}

impl MapView {
    pub fn new (center: Position, zoom: u8)->Self {
        MapView { center, zoom, markers: Vec::new(), traces: Vec::new() }
    }

    /// traces come first so that markers are drawn on top of them
    pub fn to_geojson (&self)->FeatureCollection {
        let mut features = Vec::with_capacity( self.traces.len() + self.markers.len());
        features.extend( self.traces.iter().map( trace_feature));
        features.extend( self.markers.iter().map( marker_feature));

        let mut foreign_members = JsonObject::new();
        foreign_members.insert( "center".to_string(), json!([self.center.longitude, self.center.latitude]));
        foreign_members.insert( "zoom".to_string(), json!(self.zoom));

        FeatureCollection { bbox: None, features, foreign_members: Some(foreign_members) }
    }

    pub fn to_geojson_string (&self)->Result<String> {
        Ok( serde_json::to_string( &self.to_geojson())? )
    }
}

// note that GeoJSON positions are [lon,lat]
fn point (p: &Position)->Vec<f64> { vec![p.longitude, p.latitude] }

fn band_properties (flight: &str, band: ColorBand)->JsonObject {
    let mut props = JsonObject::new();
    props.insert( "flight".to_string(), json!(flight));
    props.insert( "band".to_string(), json!(band.name()));
    props.insert( "color".to_string(), json!(band.css_color()));
    props
}

fn marker_feature (m: &Marker)->Feature {
    let mut props = band_properties( m.flight.as_str(), m.band);
    props.insert( "kind".to_string(), json!("marker"));
    props.insert( "popup".to_string(), json!(m.popup));
    props.insert( "tooltip".to_string(), json!(m.tooltip));

    Feature {
        bbox: None,
        geometry: Some( Geometry::new( GeoJsonValue::Point( point( &m.position)))),
        id: None,
        properties: Some(props),
        foreign_members: None
    }
}

fn trace_feature (t: &TraceSegment)->Feature {
    let mut props = band_properties( t.flight.as_str(), t.band);
    props.insert( "kind".to_string(), json!("trace"));

    Feature {
        bbox: None,
        geometry: Some( Geometry::new( GeoJsonValue::LineString( vec![ point( &t.start), point( &t.end)]))),
        id: None,
        properties: Some(props),
        foreign_members: None
    }
}
