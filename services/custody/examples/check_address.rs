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

use anyhow::Result;
use cactus_sign_core::{Context, OsEnv, TransportConfig};
use cactus_sign_custody::{CheckAddressRequest, Client, Config};
use cactus_sign_file_read_tokio::TokioFileRead;
use cactus_sign_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let transport = TransportConfig::default();
    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::from_config(&transport)?)
        .with_env(OsEnv);

    // CACTUS_API_KEY, CACTUS_ACCESS_KEY_ID and CACTUS_KEY_FILE must be set.
    let client = match Client::from_config(ctx, Config::default(), &transport).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build client: {e}");
            return Ok(());
        }
    };

    // Only whitelisted ips are accepted by the custody api.
    println!("public ip: {}", client.public_ip().await?);

    let resp = client
        .check_address(&CheckAddressRequest {
            addresses: vec!["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi".to_string()],
            coin_name: "USDT_SOL".to_string(),
        })
        .await?;
    if resp.is_success() {
        println!("valid addresses: {:?}", resp.data.unwrap_or_default());
    } else {
        println!("check failed: {} {}", resp.code, resp.message);
    }

    Ok(())
}
