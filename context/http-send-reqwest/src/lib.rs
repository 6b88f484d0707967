// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Reqwest based `HttpSend` for cactus-sign.
//!
//! ## Example
//!
//! ```no_run
//! use cactus_sign_core::{Context, TransportConfig};
//! use cactus_sign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn example() -> cactus_sign_core::Result<()> {
//! let config = TransportConfig {
//!     timeout: Duration::from_secs(10),
//!     ..Default::default()
//! };
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::from_config(&config)?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use cactus_sign_core::{Error, HttpSend, Result, TransportConfig};
use http_body_util::BodyExt;
use log::warn;
use reqwest::{Client, Request};

/// `HttpSend` implementation on top of a shared `reqwest::Client`.
///
/// The client owns the connection pool, clones of this struct share it.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new ReqwestHttpSend from transport config.
    ///
    /// Proxies are picked up from `http_proxy` and `https_proxy`.
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        if config.insecure_skip_verify {
            warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(config.default_headers.clone())
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req).map_err(classify)?;
        let resp: http::Response<_> = self.client.execute(req).await.map_err(classify)?.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(classify)?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

/// Errors from building the request can't be fixed by retrying, everything
/// else (connect, timeout, reset while reading body) can.
fn classify(err: reqwest::Error) -> Error {
    if err.is_builder() {
        Error::request_invalid("failed to build http request").with_source(err)
    } else {
        Error::transient_transport(format!("failed to send http request: {err}")).with_source(err)
    }
}
