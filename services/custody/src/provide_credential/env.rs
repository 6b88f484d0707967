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

use crate::provide_credential::FileCredentialProvider;
use crate::{Config, Credential};
use async_trait::async_trait;
use cactus_sign_core::{Context, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads the credential described by environment variables.
///
/// This provider looks for the following environment variables:
/// - `CACTUS_API_KEY`: The api key issued by cactus custody
/// - `CACTUS_ACCESS_KEY_ID`: The access key id bound to the public key
/// - `CACTUS_KEY_FILE`: Path to the PEM encoded private key
/// - `CACTUS_KEY_PASSPHRASE`: Passphrase of an encrypted key (optional)
///
/// Values already set in the given [`Config`] take precedence.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider {
    config: Config,
}

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use values of this config before looking at env.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.clone().from_env(ctx);

        let (Some(api_key), Some(access_key_id), Some(key_file)) =
            (&config.api_key, &config.access_key_id, &config.key_file)
        else {
            debug!("api key, access key id or key file is not set, skip loading");
            return Ok(None);
        };

        let mut provider = FileCredentialProvider::new(api_key, access_key_id, key_file);
        if let Some(passphrase) = &config.key_passphrase {
            provider = provider.with_passphrase(passphrase);
        }
        provider.provide_credential(ctx).await
    }
}
