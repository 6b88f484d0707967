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

//! Signer and client for the cactus custody api.
//!
//! Requests are authenticated with an ECDSA P-256 signature over a canonical
//! string built from the method, body hash, date, api key, nonce and uri.
//!
//! ## Example
//!
//! ```no_run
//! use cactus_sign_core::{Context, RetryPolicy, Signer};
//! use cactus_sign_custody::{CheckAddressRequest, Client, EnvCredentialProvider, RequestSigner};
//!
//! # async fn example(ctx: Context) -> cactus_sign_core::Result<()> {
//! let signer = Signer::from_provider(ctx, EnvCredentialProvider::new(), RequestSigner::new()).await?;
//! let client = Client::new(signer, RetryPolicy::default());
//!
//! let resp = client
//!     .check_address(&CheckAddressRequest {
//!         addresses: vec!["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi".to_string()],
//!         coin_name: "USDT_SOL".to_string(),
//!     })
//!     .await?;
//! println!("valid addresses: {:?}", resp.data);
//! # Ok(())
//! # }
//! ```

pub mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod sign_request;
pub use sign_request::{build_authorization, format_uri, sign_content, CanonicalRequest, RequestSigner};

mod model;
pub use model::*;

mod client;
pub use client::Client;
