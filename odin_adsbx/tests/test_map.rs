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

#![allow(unused)]

/// tests for map markers and GeoJSON output
/// run with "cargo test --test test_map -- --nocapture"

use serde_json::{json, Value};
use odin_adsbx::{
    HistoryStore, TickId,
    adsbx::{Observation, Position, extract},
    map::{DEFAULT_ZOOM, MapView, Marker},
    nic::ColorBand,
    trace::build_traces,
};

#[test]
fn test_marker_popup () {
    let rec = json!({"flight":"RYR4TZ  ", "lat":69.5, "lon":18.8, "nic":8, "alt_geom":37825, "gs":452.34});
    let obs = extract( rec.as_object().unwrap()).unwrap();
    let m = Marker::from_observation( &obs);
    println!("{m:?}");

    assert_eq!( "RYR4TZ", m.tooltip);
    assert_eq!( ColorBand::Low, m.band);
    assert_eq!( "NIC: 8, FLIGHT: RYR4TZ, Altitude(ft): 37825, Speed(kn): 452.3", m.popup);

    let m = Marker::from_observation( &Observation::new( "SAS4423", 69.6, 18.9, 0));
    assert_eq!( ColorBand::Unknown, m.band);
    assert_eq!( "NIC: 0, FLIGHT: SAS4423, Altitude(ft): None, Speed(kn): None", m.popup);
}

#[test]
fn test_geojson () {
    let mut store = HistoryStore::new( 60);
    store.absorb( &[Observation::new( "AB1", 60.0, 20.0, 5)], TickId::new(1)).unwrap();
    let obs = [Observation::new( "AB1", 60.1, 20.1, 7)];
    store.absorb( &obs, TickId::new(2)).unwrap();

    let view = MapView {
        center: Position::new( 69.724193, 19.039474),
        zoom: DEFAULT_ZOOM,
        markers: obs.iter().map( Marker::from_observation).collect(),
        traces: build_traces( store.snapshot())
    };

    let s = view.to_geojson_string().unwrap();
    println!("{s}");
    let v: Value = serde_json::from_str( &s).unwrap();

    assert_eq!( json!("FeatureCollection"), v["type"]);
    assert_eq!( json!([19.039474, 69.724193]), v["center"]);
    assert_eq!( json!(6), v["zoom"]);

    let features = v["features"].as_array().unwrap();
    assert_eq!( 2, features.len());

    let trace = &features[0]; // traces are drawn first
    assert_eq!( json!("LineString"), trace["geometry"]["type"]);
    assert_eq!( json!([[20.0, 60.0], [20.1, 60.1]]), trace["geometry"]["coordinates"]);
    assert_eq!( json!("orange"), trace["properties"]["color"]);
    assert_eq!( json!("trace"), trace["properties"]["kind"]);

    let marker = &features[1];
    assert_eq!( json!("Point"), marker["geometry"]["type"]);
    assert_eq!( json!([20.1, 60.1]), marker["geometry"]["coordinates"]);
    assert_eq!( json!("green"), marker["properties"]["color"]);
    assert_eq!( json!("AB1"), marker["properties"]["tooltip"]);
}
