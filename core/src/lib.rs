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

//! Core components for signing and sending Cactus custody API requests.
//!
//! This crate provides the foundational types and traits for the cactus-sign workspace.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending, and environment access
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and request signing (`SignRequest`)
//! - **Signer**: Holds an already loaded credential and signs requests with it
//! - **Transport**: Sends a signed request with bounded retries, exponential backoff and cancellation
//!
//! ## Example
//!
//! ```no_run
//! use bytes::Bytes;
//! use cactus_sign_core::{Context, Result, RetryPolicy, Transport};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(ctx: Context) -> Result<()> {
//! let transport = Transport::new(ctx, RetryPolicy::default());
//!
//! let req = http::Request::builder()
//!     .method("GET")
//!     .uri("https://ipconfig.io")
//!     .body(Bytes::new())?;
//!
//! let resp = transport.send(req, &CancellationToken::new()).await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, FileRead, HttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::SigningRequest;
mod signer;
pub use signer::Signer;
mod transport;
pub use transport::{RetryPolicy, Transport, TransportConfig};
