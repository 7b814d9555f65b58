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

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{
    adsbx::{AdsbxConnector, RawBatch, parse_batch},
    config::{AdsbxConfig, Region},
    errors::{OdinAdsbxError, Result}
};

/// http connector that does a single GET of the region URL per tick
pub struct LiveAdsbxConnector {
    client: Client
}

impl LiveAdsbxConnector {
    pub fn new (config: &AdsbxConfig)->Result<Self> {
        let client = Client::builder()
            .timeout( config.request_timeout)
            .user_agent( concat!("odin_adsbx/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok( LiveAdsbxConnector { client } )
    }
}

#[async_trait]
impl AdsbxConnector for LiveAdsbxConnector {
    async fn fetch (&mut self, region: &Region)->Result<RawBatch> {
        debug!("GET {}", region.url);
        let response = self.client.get( region.url.as_str()).send().await?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes().await?;
                parse_batch( &bytes)
            }
            other => {
                Err( OdinAdsbxError::HttpStatusError( format!("{other} from {}", region.url)))
            }
        }
    }
}
