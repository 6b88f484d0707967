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

use std::env;

use anyhow::Result;
use cactus_sign_core::{Context, OsEnv, TransportConfig};
use cactus_sign_custody::{CheckAddressRequest, Client, Config};
use cactus_sign_file_read_tokio::TokioFileRead;
use cactus_sign_http_send_reqwest::ReqwestHttpSend;
use log::{info, warn};

async fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("CACTUS_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let transport = TransportConfig::default();
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(
            ReqwestHttpSend::from_config(&transport).expect("http client must be built"),
        )
        .with_env(OsEnv);

    let client = Client::from_config(ctx, Config::default(), &transport)
        .await
        .expect("CACTUS_API_KEY, CACTUS_ACCESS_KEY_ID and CACTUS_KEY_FILE must be set");
    Some(client)
}

#[tokio::test]
async fn test_public_ip() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("CACTUS_TEST is not set, skipped");
        return Ok(());
    };

    let ip = client.public_ip().await?;
    info!("public ip: {ip}");
    assert!(!ip.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_check_address() -> Result<()> {
    let Some(client) = init_client().await else {
        warn!("CACTUS_TEST is not set, skipped");
        return Ok(());
    };

    let address = env::var("CACTUS_TEST_ADDRESS")
        .unwrap_or_else(|_| "3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi".to_string());
    let coin_name = env::var("CACTUS_TEST_COIN").unwrap_or_else(|_| "USDT_SOL".to_string());

    let resp = client
        .check_address(&CheckAddressRequest {
            addresses: vec![address],
            coin_name,
        })
        .await?;
    // A rejected signature comes back as a non zero code.
    assert!(resp.is_success(), "check address failed: {resp:?}");
    Ok(())
}
