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

//! in-memory connector that hands out a scripted sequence of responses, one per tick. This is how we
//! drive the tracker without network access, including fetch failures

use std::collections::VecDeque;
use async_trait::async_trait;

use crate::{
    adsbx::{AdsbxConnector, RawBatch, parse_batch},
    config::Region,
    errors::{op_failed, Result}
};

/// the body the aggregator would have sent, or the reason why the fetch failed
#[derive(Debug,Clone)]
pub enum ScriptedResponse {
    Payload(Vec<u8>),
    Failure(String),
}

#[derive(Debug,Default)]
pub struct ScriptedConnector {
    responses: VecDeque<ScriptedResponse>,
    n_fetched: usize,
}

impl ScriptedConnector {
    pub fn new (responses: impl IntoIterator<Item=ScriptedResponse>)->Self {
        ScriptedConnector { responses: responses.into_iter().collect(), n_fetched: 0 }
    }

    pub fn push_payload (&mut self, payload: impl Into<Vec<u8>>) {
        self.responses.push_back( ScriptedResponse::Payload( payload.into()));
    }

    pub fn push_failure (&mut self, reason: &str) {
        self.responses.push_back( ScriptedResponse::Failure( reason.to_string()));
    }

    pub fn remaining (&self)->usize { self.responses.len() }

    /// number of fetch calls so far, including failed ones
    pub fn n_fetched (&self)->usize { self.n_fetched }
}

#[async_trait]
impl AdsbxConnector for ScriptedConnector {
    async fn fetch (&mut self, region: &Region)->Result<RawBatch> {
        self.n_fetched += 1;
        match self.responses.pop_front() {
            Some(ScriptedResponse::Payload(bytes)) => parse_batch( &bytes),
            Some(ScriptedResponse::Failure(reason)) => Err( op_failed!("fetch for {} failed: {}", region.label, reason)),
            None => Err( op_failed!("no response scripted for {}", region.label))
        }
    }
}
