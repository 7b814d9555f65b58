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

//! classification of ADS-B navigation integrity category (NIC) values into color bands

use std::fmt;
use serde::{Serialize,Deserialize};

/// severity band derived from a NIC value. Bands are ordered from the least trustworthy
/// position (Darkest) to the most trustworthy one (Nominal), Unknown comes last
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize)]
#[serde(rename_all="snake_case")]
pub enum ColorBand {
    Darkest,
    High,
    Medium,
    Low,
    Nominal,
    Unknown
}

impl ColorBand {
    pub const ALL: [ColorBand;6] = [
        ColorBand::Darkest, ColorBand::High, ColorBand::Medium, ColorBand::Low, ColorBand::Nominal, ColorBand::Unknown
    ];

    /// the marker/polyline color used by the map renderer
    pub fn css_color (&self)->&'static str {
        match self {
            ColorBand::Darkest => "darkred",
            ColorBand::High    => "red",
            ColorBand::Medium  => "orange",
            ColorBand::Low     => "green",
            ColorBand::Nominal => "darkgreen",
            ColorBand::Unknown => "black",
        }
    }

    pub fn severity_rank (&self)->u8 { *self as u8 }

    pub fn name (&self)->&'static str {
        match self {
            ColorBand::Darkest => "darkest",
            ColorBand::High    => "high",
            ColorBand::Medium  => "medium",
            ColorBand::Low     => "low",
            ColorBand::Nominal => "nominal",
            ColorBand::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColorBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{}", self.name())
    }
}

/// total mapping from (optional) NIC to color band. Values outside of 1..=11 (including
/// missing ones) are not an error, they just end up in the Unknown band
pub fn color_for (nic: Option<i64>)->ColorBand {
    match nic {
        Some(1..=2)   => ColorBand::Darkest,
        Some(3..=4)   => ColorBand::High,
        Some(5..=6)   => ColorBand::Medium,
        Some(7..=9)   => ColorBand::Low,
        Some(10..=11) => ColorBand::Nominal,
        _ => ColorBand::Unknown
    }
}
