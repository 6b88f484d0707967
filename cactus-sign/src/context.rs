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

use cactus_sign_core::{Context, OsEnv, Result, TransportConfig};
use cactus_sign_file_read_tokio::TokioFileRead;
use cactus_sign_http_send_reqwest::ReqwestHttpSend;

/// Create a context with tokio fs, reqwest and the process env, using the
/// default [`TransportConfig`].
pub fn default_context() -> Result<Context> {
    default_context_with(&TransportConfig::default())
}

/// Create a default context whose http client follows `config`.
pub fn default_context_with(config: &TransportConfig) -> Result<Context> {
    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::from_config(config)?)
        .with_env(OsEnv))
}
