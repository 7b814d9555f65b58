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

//! position history and trace reconstruction for aircraft reported by ADS-B aggregator
//! endpoints. Each poll ("tick") is absorbed into a bounded per-flight [`HistoryStore`],
//! from which we derive [`trace::TraceSegment`]s, map [`map::Marker`]s and table rows

use std::{collections::{HashMap,VecDeque}, fmt, sync::Arc};
use serde::{Serialize,Deserialize};

pub mod errors;
use errors::{OdinAdsbxError,Result};

pub mod nic;
use nic::{ColorBand,color_for};

pub mod adsbx;
use adsbx::{Observation,Position};

pub mod config;
use config::AdsbxConfig;

pub mod trace;
pub mod table;
pub mod map;

pub mod live_connector;
pub mod scripted;
pub mod tracker;

/// one hour worth of positions at the default 60 sec poll interval
pub const DEFAULT_MAX_HISTORY: usize = 60;

/// the smallest history that can still produce a trace segment
pub const MIN_HISTORY: usize = 2;

/// sequence number of an absorbed poll
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize)]
pub struct TickId(u64);

impl TickId {
    pub const FIRST: TickId = TickId(1);

    pub fn new (n: u64)->Self { TickId(n) }
    pub fn value (&self)->u64 { self.0 }
    pub fn next (&self)->TickId { TickId(self.0 + 1) }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "#{}", self.0)
    }
}

/// the only per-position data we keep across ticks
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ColoredObservation {
    pub position: Position,
    pub band: ColorBand,
}

/// bounded position history of a single flight, oldest first
#[derive(Debug,Clone,PartialEq)]
pub struct FlightTrack {
    pub flight: Arc<String>, // shared with segments and markers so that we can clone without heap allocation
    pub positions: VecDeque<ColoredObservation>,
    pub last_tick: TickId,   // the last tick in which we got a position for this flight
}

impl FlightTrack {
    fn new (flight: Arc<String>, capacity: usize, tick: TickId)->Self {
        FlightTrack { flight, positions: VecDeque::with_capacity(capacity), last_tick: tick }
    }

    pub fn len (&self)->usize { self.positions.len() }
    pub fn is_empty (&self)->bool { self.positions.is_empty() }

    pub fn last_position (&self)->Option<&ColoredObservation> { self.positions.back() }

    // VecDeque::capacity() is only a lower bound so we can't use it as the ringbuffer size
    fn push_position (&mut self, obs: ColoredObservation, capacity: usize, tick: TickId) {
        while self.positions.len() >= capacity {
            self.positions.pop_front();
        }
        self.positions.push_back( obs);
        self.last_tick = tick;
    }
}

impl fmt::Display for FlightTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "FlightTrack( flight: \"{}\", n_pos: {}", self.flight, self.positions.len())?;
        if let Some(p) = self.last_position() { write!( f, ", pos: {}, band: {}", p.position, p.band)?; }
        write!( f, ", last_tick: {})", self.last_tick)
    }
}

/// flight id -> track. Keys are duplicated in the track so that lookup works on &str without allocation
#[derive(Debug,Clone,PartialEq,Default)]
pub struct FlightHistory {
    tracks: HashMap<String,FlightTrack>
}

impl FlightHistory {
    pub fn len (&self)->usize { self.tracks.len() }
    pub fn is_empty (&self)->bool { self.tracks.is_empty() }

    pub fn get (&self, flight: &str)->Option<&FlightTrack> { self.tracks.get( flight) }

    pub fn iter (&self)->impl Iterator<Item=&FlightTrack> { self.tracks.values() }

    pub fn flights (&self)->impl Iterator<Item=&str> { self.tracks.keys().map( |k| k.as_str()) }
}

/// the owner of the (process lifetime) flight history. All mutation goes through [`HistoryStore::absorb`],
/// which takes `&mut self` - this is the single-writer guarantee readers rely on.
///
/// Flights that are not reported anymore keep their track unless a `drop_after` tick count is set,
/// in which case they get purged once they have not been seen for more than that many ticks
#[derive(Debug,Clone)]
pub struct HistoryStore {
    capacity: usize,
    drop_after: Option<u64>,
    history: FlightHistory,
    last_tick: Option<TickId>,
    dropped_list: Vec<Arc<String>>, // flights removed by the last absorb
}

impl HistoryStore {
    pub fn new (capacity: usize)->Self {
        HistoryStore::with_drop_after( capacity, None)
    }

    /// note that capacities below [`MIN_HISTORY`] are raised to it, a store that never produces
    /// traces is of no use (configs with such a `max_history` are rejected by validation)
    pub fn with_drop_after (capacity: usize, drop_after: Option<u64>)->Self {
        HistoryStore {
            capacity: capacity.max( MIN_HISTORY),
            drop_after,
            history: FlightHistory::default(),
            last_tick: None,
            dropped_list: Vec::new(),
        }
    }

    pub fn from_config (config: &AdsbxConfig)->Self {
        HistoryStore::with_drop_after( config.max_history, config.drop_after_ticks)
    }

    pub fn capacity (&self)->usize { self.capacity }
    pub fn drop_after (&self)->Option<u64> { self.drop_after }
    pub fn last_tick (&self)->Option<TickId> { self.last_tick }

    pub fn next_tick (&self)->TickId {
        self.last_tick.map( |t| t.next()).unwrap_or( TickId::FIRST)
    }

    /// read-only view of the current history
    pub fn snapshot (&self)->&FlightHistory { &self.history }

    pub fn dropped_list (&self)->&[Arc<String>] { self.dropped_list.as_slice() }

    /// add all observations of one tick. Every observation is appended, i.e. several reports for the same
    /// flight within one batch all end up in the history (in batch order). The tick has to be newer than the
    /// last absorbed one - if it is not we return an error and leave the store untouched.
    /// Returns the number of appended positions
    pub fn absorb (&mut self, observations: &[Observation], tick: TickId)->Result<usize> {
        if let Some(last_tick) = self.last_tick && tick <= last_tick {
            return Err( OdinAdsbxError::TickOrderError( format!("tick {tick} is not after {last_tick}")))
        }

        let capacity = self.capacity;
        for obs in observations {
            let co = ColoredObservation { position: obs.position, band: color_for( Some(obs.nic)) };

            if let Some(track) = self.history.tracks.get_mut( obs.flight.as_str()) {
                track.push_position( co, capacity, tick);
            } else {
                let mut track = FlightTrack::new( obs.flight.clone(), capacity, tick);
                track.push_position( co, capacity, tick);
                self.history.tracks.insert( obs.flight.to_string(), track);
            }
        }

        self.last_tick = Some(tick);
        self.remove_stale( tick);

        Ok( observations.len() )
    }

    /// drop all flights (e.g. when switching to another region). The tick sequence is kept
    pub fn clear (&mut self) {
        self.history.tracks.clear();
        self.dropped_list.clear();
    }

    fn remove_stale (&mut self, tick: TickId) {
        self.dropped_list.clear();

        if let Some(max_age) = self.drop_after {
            let dropped_list = &mut self.dropped_list;
            self.history.tracks.retain( |_,track| {
                // last_tick <= tick, hence no underflow. Adding max_age instead could overflow
                let is_stale = tick.value() - track.last_tick.value() > max_age;
                if is_stale { dropped_list.push( track.flight.clone()) }
                !is_stale
            });
        }
    }
}
