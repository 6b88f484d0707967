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

//! Sign and send cactus custody api requests.
//!
//! This crate bundles [`cactus_sign_core`] with the custody service and a
//! ready to use context.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> cactus_sign::Result<()> {
//! // Reads CACTUS_API_KEY, CACTUS_ACCESS_KEY_ID and CACTUS_KEY_FILE.
//! let client = cactus_sign::custody::default_client().await?;
//! println!("calling from {}", client.public_ip().await?);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use cactus_sign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_context, default_context_with};

#[cfg(feature = "custody")]
pub mod custody;
