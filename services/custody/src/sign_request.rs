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

use std::fmt::{Debug, Display, Formatter};

use async_trait::async_trait;
use cactus_sign_core::hash::{base64_encode, base64_sha256, sha256};
use cactus_sign_core::time::{format_http_date, now, DateTime};
use cactus_sign_core::utils::Redact;
use cactus_sign_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use http::request::Parts;
use http::{HeaderValue, Method, Uri};
use log::debug;
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::ecdsa::{Signature, SigningKey};
use uuid::Uuid;

use crate::constants::*;
use crate::Credential;

/// RequestSigner that implements the cactus custody `api` authorization.
///
/// Every call generates a fresh date and nonce, builds the canonical string,
/// signs it with ECDSA P-256 over SHA-256 and writes all the headers the
/// custody api checks:
///
/// - `x-api-key`, `x-api-nonce`, `Date`
/// - `Accept` and `Content-Type`, both `application/json`
/// - `Content-SHA256` for `POST`, `PUT` and `PATCH`
/// - `Authorization: api {access_key_id}:{signature}`
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new request signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the nonce.
    ///
    /// # Note
    ///
    /// A nonce must never be reused against the real api.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_nonce(mut self, nonce: &str) -> Self {
        self.nonce = Some(nonce.to_string());
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        cred: &Self::Credential,
    ) -> Result<()> {
        let date = format_http_date(self.time.unwrap_or_else(now));
        let nonce = self
            .nonce
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut signed_req = SigningRequest::build(req)?;
        let creq = CanonicalRequest::build(&signed_req, &date, &nonce, &cred.api_key, body)?;
        debug!("calculated canonical request: {creq:?}");

        let signature = sign_content(&cred.signing_key, &creq.to_string())?;

        let mut api_key = HeaderValue::from_str(&cred.api_key)?;
        api_key.set_sensitive(true);
        signed_req
            .headers
            .insert(HeaderName::from_static(X_API_KEY), api_key);
        signed_req.header_insert(HeaderName::from_static(X_API_NONCE), &nonce)?;
        signed_req.header_insert(ACCEPT, APPLICATION_JSON)?;
        signed_req.header_insert(DATE, &date)?;
        signed_req.header_insert(CONTENT_TYPE, APPLICATION_JSON)?;
        if let Some(content_hash) = &creq.content_hash {
            signed_req.header_insert(HeaderName::from_static(CONTENT_SHA256), content_hash)?;
        }

        let mut authorization =
            HeaderValue::from_str(&build_authorization(&cred.access_key_id, &signature))?;
        authorization.set_sensitive(true);
        signed_req.headers.insert(AUTHORIZATION, authorization);

        signed_req.apply(req)
    }
}

/// CanonicalRequest is the string the custody api expects to be signed.
///
/// ```text
/// POST
/// application/json
/// xDqrtH/Wcn55WUVQmfa557ivHLQlKgLXpLqRWJiYrfk=
/// application/json
/// Tue, 03 Mar 2020 12:26:57 GMT
/// x-api-key:X5SGmgTAoYaVw1t7oD2p82pHgf0eNNVw3wxYGgM2
/// x-api-nonce:36dbe33e-d529-455c-b063-8eef0f5f59e3
/// /custody/v1/api/addresses/type/check
/// ```
///
/// The third line is empty for methods without a hashed body.
#[derive(Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// HTTP method.
    pub method: Method,
    /// Always `application/json`.
    pub content_type: String,
    /// `base64(sha256(body))` for `POST`, `PUT` and `PATCH`.
    pub content_hash: Option<String>,
    /// Date in http date format.
    pub date: String,
    /// API key.
    pub api_key: String,
    /// Single use nonce.
    pub nonce: String,
    /// Uri formatted by [`format_uri`].
    pub formatted_uri: String,
}

impl CanonicalRequest {
    /// Build the canonical request for a signing request.
    pub fn build(
        req: &SigningRequest,
        date: &str,
        nonce: &str,
        api_key: &str,
        body: &[u8],
    ) -> Result<Self> {
        Ok(Self {
            method: req.method.clone(),
            content_type: APPLICATION_JSON.to_string(),
            content_hash: hashes_body(&req.method).then(|| base64_sha256(body)),
            date: date.to_string(),
            api_key: api_key.to_string(),
            nonce: nonce.to_string(),
            formatted_uri: format_signing_uri(req)?,
        })
    }
}

impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalRequest")
            .field("method", &self.method)
            .field("content_hash", &self.content_hash)
            .field("date", &self.date)
            .field("api_key", &Redact::from(&self.api_key))
            .field("nonce", &self.nonce)
            .field("formatted_uri", &self.formatted_uri)
            .finish()
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.content_type)?;
        writeln!(f, "{}", self.content_hash.as_deref().unwrap_or_default())?;
        writeln!(f, "{}", self.content_type)?;
        writeln!(f, "{}", self.date)?;
        writeln!(f, "{X_API_KEY}:{}", self.api_key)?;
        writeln!(f, "{X_API_NONCE}:{}", self.nonce)?;
        write!(f, "{}", self.formatted_uri)
    }
}

/// Only these methods carry a body hash.
fn hashes_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Format uri into the form used in the canonical string.
///
/// The path is percent decoded, query values are grouped by name with names
/// sorted bytewise:
///
/// ```shell
/// /custody/v1/api/wallets?hide_no_coin_wallet=false&coin_names=BTC,LTC
/// => /custody/v1/api/wallets?{coin_names=[BTC,LTC], hide_no_coin_wallet=[false]}
/// ```
///
/// Uri without query parameters, a bare `?` included, is formatted as its path.
pub fn format_uri(uri: &str) -> Result<String> {
    let uri: Uri = uri
        .parse()
        .map_err(|e| Error::request_invalid(format!("invalid uri: {uri:?}")).with_source(e))?;

    let mut parts = http::Request::new(()).into_parts().0;
    parts.uri = uri;
    format_signing_uri(&SigningRequest::build(&mut parts)?)
}

fn format_signing_uri(req: &SigningRequest) -> Result<String> {
    let path = req.path_percent_decoded()?;

    let params = req.query_grouped();
    if params.is_empty() {
        return Ok(path);
    }

    let params = params
        .iter()
        .map(|(name, values)| format!("{name}=[{}]", values.join(",")))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("{path}?{{{params}}}"))
}

/// Sign content with ECDSA P-256 over its SHA-256 digest.
///
/// Returns the DER encoded signature in standard base64.
pub fn sign_content(key: &SigningKey, content: &str) -> Result<String> {
    let digest = sha256(content.as_bytes());
    let signature: Signature = key
        .sign_prehash(&digest)
        .map_err(|e| Error::signing_failed(format!("failed to sign content: {e}")))?;

    Ok(base64_encode(signature.to_der().as_bytes()))
}

/// Build the `Authorization` header value: `api {access_key_id}:{signature}`.
pub fn build_authorization(access_key_id: &str, signature: &str) -> String {
    format!("{AUTHORIZATION_SCHEME} {access_key_id}:{signature}")
}
