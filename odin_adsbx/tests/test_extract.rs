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

/// tests for raw payload parsing and observation extraction
/// run with "cargo test --test test_extract -- --nocapture"

use std::fs;
use serde_json::{json, Value};
use odin_adsbx::adsbx::{RawRecord, RawBatch, Rejected, coerce_f64, extract, extract_all, parse_batch};

fn record (v: Value)->RawRecord {
    match v {
        Value::Object(map) => map,
        _ => panic!("not a JSON object: {v}")
    }
}

#[test]
fn test_extract_valid () {
    let rec = record( json!({"hex":"4ca7b5", "flight":"RYR4TZ  ", "lat":69.5, "lon":18.8, "nic":8, "alt_geom":37825, "gs":452.3, "sil":3}));
    let obs = extract( &rec).unwrap();
    println!("{obs}");

    assert_eq!( "RYR4TZ", obs.flight.as_str()); // trimmed
    assert_eq!( 69.5, obs.position.latitude);
    assert_eq!( 18.8, obs.position.longitude);
    assert_eq!( 8, obs.nic);
    assert!( (obs.altitude_ft().unwrap() - 37825.0).abs() < 1e-6);
    assert!( (obs.groundspeed_kn().unwrap() - 452.3).abs() < 1e-6);
    assert_eq!( Some(3.0), obs.sil);
}

#[test]
fn test_extract_missing_fields () {
    let full = json!({"flight":"AB123", "lat":60.0, "lon":20.0, "nic":5});

    for key in ["lat", "lon", "nic", "flight"] {
        let mut rec = record( full.clone());
        rec.remove( key);
        assert_eq!( Err(Rejected::MissingField(key)), extract( &rec), "missing {key}");

        let mut rec = record( full.clone());
        rec.insert( key.to_string(), Value::Null);
        assert_eq!( Err(Rejected::MissingField(key)), extract( &rec), "null {key}");
    }
}

#[test]
fn test_extract_flight () {
    for flight in ["", "   ", "\t"] {
        let rec = record( json!({"flight":flight, "lat":60.0, "lon":20.0, "nic":5}));
        assert_eq!( Err(Rejected::EmptyFlight), extract( &rec));
    }

    let rec = record( json!({"flight":42, "lat":60.0, "lon":20.0, "nic":5}));
    assert_eq!( Err(Rejected::FlightNotText), extract( &rec));
}

#[test]
fn test_extract_coercion () {
    // numeric strings are fine
    let rec = record( json!({"flight":"AB1", "lat":"60.25", "lon":" 20.5 ", "nic":"7"}));
    let obs = extract( &rec).unwrap();
    assert_eq!( 60.25, obs.position.latitude);
    assert_eq!( 20.5, obs.position.longitude);
    assert_eq!( 7, obs.nic);

    // required fields that do not coerce reject the record
    let rec = record( json!({"flight":"AB1", "lat":"north", "lon":20.0, "nic":7}));
    assert_eq!( Err(Rejected::NotNumeric("lat")), extract( &rec));
    let rec = record( json!({"flight":"AB1", "lat":60.0, "lon":[20.0], "nic":7}));
    assert_eq!( Err(Rejected::NotNumeric("lon")), extract( &rec));
    let rec = record( json!({"flight":"AB1", "lat":60.0, "lon":20.0, "nic":true}));
    assert_eq!( Err(Rejected::NotNumeric("nic")), extract( &rec));
    let rec = record( json!({"flight":"AB1", "lat":60.0, "lon":20.0, "nic":7.5}));
    assert_eq!( Err(Rejected::NotIntegral("nic")), extract( &rec));

    // integral floats are accepted as NIC
    let rec = record( json!({"flight":"AB1", "lat":60.0, "lon":20.0, "nic":7.0}));
    assert_eq!( 7, extract( &rec).unwrap().nic);

    // optional fields that do not coerce are just dropped
    let rec = record( json!({"flight":"AB1", "lat":60.0, "lon":20.0, "nic":7, "alt_geom":"ground", "gs":null, "sil":"x"}));
    let obs = extract( &rec).unwrap();
    assert!( obs.altitude.is_none());
    assert!( obs.groundspeed.is_none());
    assert!( obs.sil.is_none());
}

#[test]
fn test_coerce_f64 () {
    assert_eq!( Some(1.5), coerce_f64( &json!(1.5)));
    assert_eq!( Some(-3.0), coerce_f64( &json!(-3)));
    assert_eq!( Some(42.0), coerce_f64( &json!(" 42 ")));
    assert_eq!( None, coerce_f64( &json!("nan")));
    assert_eq!( None, coerce_f64( &json!("inf")));
    assert_eq!( None, coerce_f64( &json!("ground")));
    assert_eq!( None, coerce_f64( &json!(true)));
    assert_eq!( None, coerce_f64( &json!(null)));
    assert_eq!( None, coerce_f64( &json!([])));
}

#[test]
fn test_parse_payloads () {
    // not JSON at all -> failed tick
    assert!( parse_batch( b"<html>502 Bad Gateway</html>").is_err());

    // JSON without "ac" array -> empty batch
    let batch = parse_batch( br#"{"msg":"No error","now":1716812345123}"#).unwrap();
    assert!( batch.is_empty());
    assert_eq!( Some(1716812345123.0), batch.now);

    let batch = parse_batch( br#"{"ac":"none"}"#).unwrap();
    assert!( batch.is_empty());

    let batch = parse_batch( b"[1,2,3]").unwrap();
    assert!( batch.is_empty());

    // non-object entries are skipped
    let batch = parse_batch( br#"{"ac":[{"flight":"AB1"}, 42, null, {"flight":"CD2"}], "total":4}"#).unwrap();
    assert_eq!( 2, batch.len());
    assert_eq!( Some(4), batch.total);
}

#[test]
fn test_extract_sample () {
    let bytes = fs::read("resources/adsb_one_sample.json").unwrap();
    let batch = parse_batch( &bytes).unwrap();
    assert_eq!( 5, batch.len());

    let (observations, n_rejected) = extract_all( &batch);
    for obs in &observations { println!("{obs}"); }

    let flights: Vec<&str> = observations.iter().map( |o| o.flight.as_str()).collect();
    assert_eq!( vec!["RYR4TZ", "SAS4423", "NOZ58P"], flights); // batch order
    assert_eq!( 2, n_rejected); // empty flight and missing position
}
