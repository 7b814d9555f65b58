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

use std::sync::Arc;
use itertools::Itertools;
use serde::Serialize;

use crate::{FlightHistory, FlightTrack, adsbx::Position, nic::ColorBand};

/// a rendered line between two consecutive positions of the same flight.
/// The band is the one of the earlier position, i.e. a segment shows the integrity of the report it starts from
#[derive(Debug,Clone,PartialEq,Serialize)]
pub struct TraceSegment {
    pub flight: Arc<String>,
    pub start: Position,
    pub end: Position,
    pub band: ColorBand,
}

/// segments of one track in chronological order. Tracks with less than two positions have none
pub fn flight_traces (track: &FlightTrack)->impl Iterator<Item=TraceSegment> + '_ {
    track.positions.iter().tuple_windows().map( move |(p0,p1)| {
        TraceSegment { flight: track.flight.clone(), start: p0.position, end: p1.position, band: p0.band }
    })
}

/// recomputed from scratch on each tick - there is no segment state kept between ticks.
/// Order across flights is unspecified
pub fn build_traces (history: &FlightHistory)->Vec<TraceSegment> {
    let n_segments: usize = history.iter().map( |track| track.len().saturating_sub(1)).sum();
    let mut traces = Vec::with_capacity( n_segments);

    for track in history.iter() {
        traces.extend( flight_traces( track));
    }
    traces
}
