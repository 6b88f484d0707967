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

use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::Arc;

/// Signer is the main struct used to sign the request.
///
/// The credential is loaded before the signer exists and never changes
/// afterwards, so a signer is cheap to clone and safe to share.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    credential: K,
    builder: Arc<dyn SignRequest<Credential = K>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer with an already loaded credential.
    pub fn new(
        ctx: Context,
        credential: K,
        builder: impl SignRequest<Credential = K>,
    ) -> Result<Self> {
        if !credential.is_valid() {
            return Err(Error::key_load(format!(
                "credential {credential:?} is not valid for signing"
            )));
        }

        Ok(Self {
            ctx,
            credential,
            builder: Arc::new(builder),
        })
    }

    /// Create a new signer by loading the credential from provider.
    pub async fn from_provider(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Result<Self> {
        let credential = provider
            .provide_credential(&ctx)
            .await
            .map_err(|e| match e.kind() {
                crate::ErrorKind::KeyLoad => e,
                _ => Error::key_load("failed to load signing credential").with_source(e),
            })?
            .ok_or_else(|| Error::key_load(format!("no credential found by {provider:?}")))?;

        Self::new(ctx, credential, builder)
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Get the credential used by this signer.
    pub fn credential(&self) -> &K {
        &self.credential
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        self.builder
            .sign_request(&self.ctx, req, body, &self.credential)
            .await
    }
}
