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

//! Cactus custody api support with convenience APIs.

pub use cactus_sign_custody::*;

#[cfg(feature = "default-context")]
use crate::{default_context_with, Result, TransportConfig};

/// Create a client configured from the process env.
///
/// This function creates a client with:
/// - Default context (tokio file reader, reqwest http client, OS env)
/// - Endpoint from `CACTUS_ENDPOINT`, `https://api.mycactus.dev` if unset
/// - Key loaded by [`EnvCredentialProvider`]
/// - Default [`TransportConfig`]: 30s per attempt, 3 retries, 60s per call
///
/// Fails with `KeyLoad` if the credential can't be loaded.
#[cfg(feature = "default-context")]
pub async fn default_client() -> Result<Client> {
    default_client_with(Config::default(), &TransportConfig::default()).await
}

/// Create a client from config and transport config, unset config values
/// are read from env.
#[cfg(feature = "default-context")]
pub async fn default_client_with(config: Config, transport: &TransportConfig) -> Result<Client> {
    let ctx = default_context_with(transport)?;
    Client::from_config(ctx, config, transport).await
}

#[cfg(all(test, feature = "default-context"))]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_default_client_with_missing_key_file() {
        let err = default_client_with(
            Config {
                api_key: Some("api-key".to_string()),
                access_key_id: Some("ak".to_string()),
                key_file: Some("/not/exist/key.pem".to_string()),
                ..Default::default()
            },
            &TransportConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyLoad);
    }
}
