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

/// tests for trace reconstruction from the position history
/// run with "cargo test --test test_trace -- --nocapture"

use odin_adsbx::{
    HistoryStore, TickId,
    adsbx::{Observation, Position},
    nic::ColorBand,
    trace::{build_traces, flight_traces}
};

#[test]
fn test_two_tick_trace () {
    let mut store = HistoryStore::new( 60);
    store.absorb( &[Observation::new( "AB1", 60.0, 20.0, 5)], TickId::new(1)).unwrap();
    assert!( build_traces( store.snapshot()).is_empty()); // single position, no segment yet

    store.absorb( &[Observation::new( "AB1", 60.1, 20.1, 7)], TickId::new(2)).unwrap();
    let traces = build_traces( store.snapshot());
    println!("{traces:?}");

    assert_eq!( 1, traces.len());
    let seg = &traces[0];
    assert_eq!( "AB1", seg.flight.as_str());
    assert_eq!( Position::new(60.0, 20.0), seg.start);
    assert_eq!( Position::new(60.1, 20.1), seg.end);
    assert_eq!( ColorBand::Medium, seg.band); // color of the earlier position (nic 5), not of nic 7
}

#[test]
fn test_segment_counts () {
    let capacity = 60;
    let mut store = HistoryStore::new( capacity);

    for t in 1..=100u64 {
        let mut batch = vec![ Observation::new( "FULL", t as f64 * 0.01, 20.0, 9) ];
        if t == 1 { batch.push( Observation::new( "ONCE", 50.0, 10.0, 9)); }
        if t <= 3 { batch.push( Observation::new( "THREE", 40.0, t as f64, 3)); }
        store.absorb( &batch, TickId::new(t)).unwrap();
    }

    let history = store.snapshot();
    assert_eq!( capacity - 1, flight_traces( history.get("FULL").unwrap()).count());
    assert_eq!( 0, flight_traces( history.get("ONCE").unwrap()).count());
    assert_eq!( 2, flight_traces( history.get("THREE").unwrap()).count());

    let traces = build_traces( history);
    assert_eq!( capacity - 1 + 2, traces.len());
    assert!( build_traces( &HistoryStore::new(capacity).snapshot()).is_empty());
}

#[test]
fn test_segments_are_chronological () {
    let mut store = HistoryStore::new( 60);
    for t in 1..=5u64 {
        let nic = t as i64 * 2; // 2,4,6,8,10
        store.absorb( &[Observation::new( "AB1", t as f64, 0.0, nic)], TickId::new(t)).unwrap();
    }

    let segs: Vec<_> = flight_traces( store.snapshot().get("AB1").unwrap()).collect();
    assert_eq!( 4, segs.len());
    for (i,seg) in segs.iter().enumerate() {
        assert_eq!( (i+1) as f64, seg.start.latitude);
        assert_eq!( (i+2) as f64, seg.end.latitude);
        assert_eq!( seg.start, if i > 0 { segs[i-1].end } else { seg.start }); // connected
    }

    let bands: Vec<ColorBand> = segs.iter().map( |s| s.band).collect();
    assert_eq!( vec![ColorBand::Darkest, ColorBand::High, ColorBand::Medium, ColorBand::Low], bands);
}
