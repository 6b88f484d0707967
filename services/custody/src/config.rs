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

use crate::constants::*;
use cactus_sign_core::utils::Redact;
use cactus_sign_core::Context;
use std::fmt::{Debug, Formatter};

/// Config carries all the configuration for the cactus custody api.
#[derive(Clone, Default)]
pub struct Config {
    /// Base url of the custody api, defaults to `https://api.mycactus.dev`.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CACTUS_ENDPOINT`]
    pub endpoint: Option<String>,
    /// API key issued by cactus custody, sent as `x-api-key`.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CACTUS_API_KEY`]
    pub api_key: Option<String>,
    /// Access key id bound to the uploaded public key.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CACTUS_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// Path to the PEM encoded P-256 private key.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CACTUS_KEY_FILE`]
    pub key_file: Option<String>,
    /// Passphrase of an encrypted PKCS#8 key file.
    ///
    /// - this field if it's `is_some`
    /// - env value: [`CACTUS_KEY_PASSPHRASE`]
    pub key_passphrase: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("api_key", &Redact::from(&self.api_key))
            .field("access_key_id", &self.access_key_id)
            .field("key_file", &self.key_file)
            .field("key_passphrase", &Redact::from(&self.key_passphrase))
            .finish()
    }
}

impl Config {
    /// Load config from env, values already set are kept.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if self.endpoint.is_none() {
            self.endpoint = envs.get(CACTUS_ENDPOINT).cloned();
        }
        if self.api_key.is_none() {
            self.api_key = envs.get(CACTUS_API_KEY).cloned();
        }
        if self.access_key_id.is_none() {
            self.access_key_id = envs.get(CACTUS_ACCESS_KEY_ID).cloned();
        }
        if self.key_file.is_none() {
            self.key_file = envs.get(CACTUS_KEY_FILE).cloned();
        }
        if self.key_passphrase.is_none() {
            self.key_passphrase = envs.get(CACTUS_KEY_PASSPHRASE).cloned();
        }

        self
    }

    /// Get the endpoint without trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }
}
