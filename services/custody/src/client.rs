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

use bytes::Bytes;
use cactus_sign_core::{
    Context, Error, Result, RetryPolicy, Signer, Transport, TransportConfig,
};
use http::{Method, Response, StatusCode, Uri};
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::constants::*;
use crate::model::*;
use crate::{Config, Credential, EnvCredentialProvider, RequestSigner};

/// Client dispatches authenticated requests to the cactus custody api.
///
/// Every call is signed exactly once and then handed to [`Transport`], which
/// replays the very same request on retry. Clones share the credential,
/// the http client and the cancellation token.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    echo_endpoint: String,
    signer: Signer<Credential>,
    transport: Transport,
    cancel: CancellationToken,
}

impl Client {
    /// Create a new client sending through the context of `signer`.
    pub fn new(signer: Signer<Credential>, policy: RetryPolicy) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            echo_endpoint: DEFAULT_ECHO_ENDPOINT.to_string(),
            transport: Transport::new(signer.context().clone(), policy),
            signer,
            cancel: CancellationToken::new(),
        }
    }

    /// Build a client from config, loading the key as described by
    /// [`EnvCredentialProvider`].
    pub async fn from_config(
        ctx: Context,
        config: Config,
        transport: &TransportConfig,
    ) -> Result<Self> {
        let config = config.from_env(&ctx);
        let endpoint = config.endpoint().to_string();

        let provider = EnvCredentialProvider::new().with_config(config);
        let signer = Signer::from_provider(ctx, provider, RequestSigner::new()).await?;

        Ok(Self::new(signer, transport.retry_policy()).with_endpoint(&endpoint))
    }

    /// Set the base url of the custody api.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Set the url used by [`Client::public_ip`].
    pub fn with_echo_endpoint(mut self, endpoint: &str) -> Self {
        self.echo_endpoint = endpoint.to_string();
        self
    }

    /// Set the token that cancels every call made by the endpoint methods.
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Get the base url of the custody api.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the cancellation token used by the endpoint methods.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sign and send a request.
    ///
    /// `uri` is relative to the endpoint, for example
    /// `/custody/v1/api/wallets?coin_names=BTC`, and is signed as given. Any
    /// status is returned with its raw body, only transport failures and 5xx
    /// responses that outlive the retry policy are errors.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> Result<Response<Bytes>> {
        let mut parts = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())?
            .into_parts()
            .0;
        if parts.uri.scheme().is_some() {
            return Err(Error::request_invalid(format!(
                "uri {uri} must be relative to the endpoint"
            )));
        }

        self.signer.sign(&mut parts, &body).await?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|v| v.as_str())
            .unwrap_or("/");
        parts.uri = format!("{}{path_and_query}", self.endpoint).parse::<Uri>()?;
        debug!("sending {} {}", parts.method, parts.uri);

        self.transport
            .send(http::Request::from_parts(parts, body), cancel)
            .await
    }

    /// Check whether addresses are valid for a coin.
    pub async fn check_address(
        &self,
        req: &CheckAddressRequest,
    ) -> Result<ApiResponse<Vec<String>>> {
        self.post("/custody/v1/api/addresses/type/check", req).await
    }

    /// Create a withdrawal order under business line `b_id`.
    pub async fn create_order(
        &self,
        b_id: &str,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreateOrderData>> {
        let uri = format!(
            "/custody/v1/api/projects/{}/order/create",
            utf8_percent_encode(b_id, &PATH_SEGMENT_ENCODE_SET)
        );
        self.post(&uri, req).await
    }

    /// Query transaction details of a wallet.
    pub async fn tx_details(&self, query: &TxDetailsQuery) -> Result<ApiResponse<Page<TxDetail>>> {
        let uri = format!(
            "{}/tx-details{}",
            wallet_path(&query.b_id, &query.wallet_code),
            query_string(query)?
        );
        self.get(&uri).await
    }

    /// Query transaction summaries of a wallet.
    pub async fn tx_summaries(
        &self,
        query: &TxSummaryQuery,
    ) -> Result<ApiResponse<Page<TxSummary>>> {
        let uri = format!(
            "{}/tx-summaries{}",
            wallet_path(&query.b_id, &query.wallet_code),
            query_string(query)?
        );
        self.get(&uri).await
    }

    /// List addresses of a wallet.
    pub async fn addresses(&self, query: &AddressesQuery) -> Result<ApiResponse<Page<AddressInfo>>> {
        let uri = format!(
            "{}/addresses{}",
            wallet_path(&query.b_id, &query.wallet_code),
            query_string(query)?
        );
        self.get(&uri).await
    }

    /// Get the public ip of this host as seen by the echo endpoint.
    ///
    /// Only whitelisted ips may call the custody api. The request is not
    /// signed but still goes through the retrying transport.
    pub async fn public_ip(&self) -> Result<String> {
        let req = http::Request::builder()
            .method(Method::GET)
            .uri(&self.echo_endpoint)
            .body(Bytes::new())?;

        let resp = self.transport.send(req, &self.cancel).await?;
        if resp.status() != StatusCode::OK {
            return Err(Error::unexpected(format!(
                "unexpected status code: {}",
                resp.status()
            )));
        }

        let ip = String::from_utf8(resp.into_body().to_vec())?;
        Ok(ip.trim().to_string())
    }

    async fn get<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let resp = self.send(Method::GET, uri, Bytes::new(), &self.cancel).await?;
        decode(resp)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, uri: &str, body: &B) -> Result<T> {
        let body = serde_json::to_vec(body).map_err(|e| {
            Error::request_invalid("failed to serialize request body").with_source(e)
        })?;
        let resp = self
            .send(Method::POST, uri, Bytes::from(body), &self.cancel)
            .await?;
        decode(resp)
    }
}

fn wallet_path(b_id: &str, wallet_code: &str) -> String {
    format!(
        "/custody/v1/api/projects/{}/wallets/{}",
        utf8_percent_encode(b_id, &PATH_SEGMENT_ENCODE_SET),
        utf8_percent_encode(wallet_code, &PATH_SEGMENT_ENCODE_SET)
    )
}

fn query_string<T: Serialize>(query: &T) -> Result<String> {
    let qs = serde_urlencoded::to_string(query)
        .map_err(|e| Error::request_invalid("failed to serialize query").with_source(e))?;
    if qs.is_empty() {
        Ok(qs)
    } else {
        Ok(format!("?{qs}"))
    }
}

fn decode<T: DeserializeOwned>(resp: Response<Bytes>) -> Result<T> {
    serde_json::from_slice(resp.body()).map_err(|e| {
        Error::unexpected(format!(
            "failed to decode response with status {}",
            resp.status()
        ))
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cactus_sign_core::hash::{base64_decode, base64_sha256, sha256};
    use cactus_sign_core::{ErrorKind, HttpSend};
    use http::header::{AUTHORIZATION, DATE};
    use p256::ecdsa::signature::hazmat::PrehashVerifier;
    use p256::ecdsa::{Signature, SigningKey};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, MutexGuard};

    const ENDPOINT: &str = "https://custody.test";

    #[derive(Debug, Clone)]
    enum Reply {
        Status(u16, &'static str),
        Transient,
    }

    /// HttpSend that records requests and plays replies in order, `200 {}`
    /// once the script is over.
    #[derive(Debug, Clone, Default)]
    struct MockHttpSend {
        requests: Arc<Mutex<Vec<http::Request<Bytes>>>>,
        replies: Arc<Mutex<VecDeque<Reply>>>,
    }

    impl MockHttpSend {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                requests: Arc::default(),
                replies: Arc::new(Mutex::new(replies.into())),
            }
        }

        fn requests(&self) -> MutexGuard<'_, Vec<http::Request<Bytes>>> {
            self.requests.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.requests.lock().unwrap().push(req);

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Reply::Status(200, "{}"));
            match reply {
                Reply::Status(status, body) => Ok(http::Response::builder()
                    .status(status)
                    .body(Bytes::from_static(body.as_bytes()))?),
                Reply::Transient => Err(Error::transient_transport("connection reset")),
            }
        }
    }

    fn credential() -> Credential {
        Credential::new(
            "X5SGmgTAoYaVw1t7oD2p82pHgf0eNNVw3wxYGgM2",
            "ak-1",
            SigningKey::from_slice(&[0x11; 32]).expect("scalar must be valid"),
        )
    }

    fn client(replies: Vec<Reply>) -> (Client, MockHttpSend) {
        let _ = env_logger::builder().is_test(true).try_init();

        let http = MockHttpSend::new(replies);
        let ctx = Context::new().with_http_send(http.clone());
        let signer =
            Signer::new(ctx, credential(), RequestSigner::new()).expect("credential must be valid");
        let client = Client::new(signer, RetryPolicy::default())
            .with_endpoint(&format!("{ENDPOINT}/"))
            .with_echo_endpoint("https://echo.test");
        (client, http)
    }

    fn header<'a>(req: &'a http::Request<Bytes>, name: &str) -> &'a str {
        req.headers()
            .get(name)
            .unwrap_or_else(|| panic!("header {name} must be set"))
            .to_str()
            .expect("header must be ascii")
    }

    /// Rebuild the canonical string from what went on the wire and check the
    /// signature in `Authorization` against it.
    fn assert_signed(req: &http::Request<Bytes>, formatted_uri: &str) {
        let content_hash = req
            .headers()
            .get(CONTENT_SHA256)
            .map(|v| v.to_str().expect("header must be ascii"))
            .unwrap_or_default();
        let content = format!(
            "{}\napplication/json\n{content_hash}\napplication/json\n{}\nx-api-key:{}\nx-api-nonce:{}\n{formatted_uri}",
            req.method(),
            header(req, DATE.as_str()),
            header(req, X_API_KEY),
            header(req, X_API_NONCE),
        );

        let signature = header(req, AUTHORIZATION.as_str())
            .strip_prefix("api ak-1:")
            .expect("authorization must carry access key id");
        let signature = Signature::from_der(&base64_decode(signature).expect("must be base64"))
            .expect("signature must be DER");
        credential()
            .verifying_key()
            .verify_prehash(&sha256(content.as_bytes()), &signature)
            .expect("signature must verify");
    }

    #[tokio::test]
    async fn test_check_address() -> Result<()> {
        let (client, http) = client(vec![Reply::Status(
            200,
            r#"{"code":0,"message":"","successful":true,"data":["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi"]}"#,
        )]);

        let resp = client
            .check_address(&CheckAddressRequest {
                addresses: vec!["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi".to_string()],
                coin_name: "USDT_SOL".to_string(),
            })
            .await?;
        assert!(resp.is_success());
        assert_eq!(resp.data.map(|v| v.len()), Some(1));

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "https://custody.test/custody/v1/api/addresses/type/check"
        );
        assert_eq!(
            req.body().as_ref(),
            br#"{"addresses":["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi"],"coin_name":"USDT_SOL"}"#
        );
        assert_eq!(
            header(req, CONTENT_SHA256),
            "xDqrtH/Wcn55WUVQmfa557ivHLQlKgLXpLqRWJiYrfk="
        );
        assert_eq!(header(req, "accept"), "application/json");
        assert_eq!(header(req, "content-type"), "application/json");
        assert_signed(req, "/custody/v1/api/addresses/type/check");
        Ok(())
    }

    #[tokio::test]
    async fn test_send_post_with_empty_body() -> Result<()> {
        let (client, http) = client(vec![]);

        let resp = client
            .send(
                Method::POST,
                "/custody/v1/api/projects/b1/order/create",
                Bytes::new(),
                client.cancellation_token(),
            )
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);

        let requests = http.requests();
        let req = &requests[0];
        assert_eq!(header(req, CONTENT_SHA256), base64_sha256(b""));
        assert_eq!(
            header(req, CONTENT_SHA256),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
        assert_signed(req, "/custody/v1/api/projects/b1/order/create");
        Ok(())
    }

    #[tokio::test]
    async fn test_tx_details_query() -> Result<()> {
        let (client, http) = client(vec![Reply::Status(
            200,
            r#"{"code":0,"data":{"total":0,"offset":0,"limit":10,"list":[]}}"#,
        )]);

        let resp = client
            .tx_details(&TxDetailsQuery {
                b_id: "b1".to_string(),
                wallet_code: "w 1".to_string(),
                coin_name: Some("ETH".to_string()),
                tx_types: vec!["WITHDRAW".to_string(), "DEPOSIT".to_string()],
                limit: Some(10),
                ..Default::default()
            })
            .await?;
        assert_eq!(resp.data.map(|v| v.limit), Some(10));

        let requests = http.requests();
        let req = &requests[0];
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://custody.test/custody/v1/api/projects/b1/wallets/w%201/tx-details?coin_name=ETH&tx_types=WITHDRAW%2CDEPOSIT&limit=10"
        );
        assert!(req.headers().get(CONTENT_SHA256).is_none());
        assert!(req.body().is_empty());
        assert_signed(
            req,
            "/custody/v1/api/projects/b1/wallets/w 1/tx-details?{coin_name=[ETH], limit=[10], tx_types=[WITHDRAW,DEPOSIT]}",
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_tx_summaries_and_addresses() -> Result<()> {
        let (client, http) = client(vec![]);

        client
            .tx_summaries(&TxSummaryQuery {
                b_id: "b1".to_string(),
                wallet_code: "w1".to_string(),
                coin_name: "ETH".to_string(),
                ..Default::default()
            })
            .await?;
        client
            .addresses(&AddressesQuery {
                b_id: "b1".to_string(),
                wallet_code: "w1".to_string(),
                coin_name: "ETH".to_string(),
                sort_by_balance: Some("DESC".to_string()),
                ..Default::default()
            })
            .await?;

        let uris = http
            .requests()
            .iter()
            .map(|req| req.uri().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            uris,
            vec![
                "https://custody.test/custody/v1/api/projects/b1/wallets/w1/tx-summaries?coin_name=ETH",
                "https://custody.test/custody/v1/api/projects/b1/wallets/w1/addresses?coin_name=ETH&sort_by_balance=DESC",
            ]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_reuse_nonce_and_date() -> Result<()> {
        let (client, http) = client(vec![
            Reply::Status(500, "oops"),
            Reply::Transient,
            Reply::Status(200, r#"{"code":0,"data":{"order_no":"o-1"}}"#),
        ]);

        let resp = client
            .create_order("b1", &CreateOrderRequest::default())
            .await?;
        assert_eq!(resp.data.map(|v| v.order_no), Some("o-1".to_string()));

        let requests = http.requests();
        assert_eq!(requests.len(), 3);
        for req in &requests[1..] {
            assert_eq!(req.uri(), requests[0].uri());
            assert_eq!(req.body(), requests[0].body());
            assert_eq!(req.headers(), requests[0].headers());
        }
        assert_signed(&requests[2], "/custody/v1/api/projects/b1/order/create");
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausted() {
        let (client, http) = client(vec![Reply::Status(503, ""); 10]);

        let err = client
            .check_address(&CheckAddressRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RetryExhausted);
        assert_eq!(http.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_client_error_is_returned() -> Result<()> {
        let (client, http) = client(vec![Reply::Status(
            401,
            r#"{"code":401,"message":"invalid signature","successful":false}"#,
        )]);

        let resp = client
            .check_address(&CheckAddressRequest::default())
            .await?;
        assert!(!resp.is_success());
        assert_eq!(resp.message, "invalid signature");
        assert_eq!(http.requests().len(), 1);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_decode_failure() {
        let (client, _) = client(vec![Reply::Status(502, "<html>"), Reply::Status(200, "<html>")]);

        let err = client
            .check_address(&CheckAddressRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.message().contains("200"));
    }

    #[tokio::test]
    async fn test_cancelled_before_send() {
        let (client, http) = client(vec![]);
        let cancel = CancellationToken::new();
        let client = client.with_cancellation_token(cancel.clone());

        cancel.cancel();
        let err = client
            .check_address(&CheckAddressRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(http.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_backoff() {
        let (client, http) = client(vec![Reply::Status(500, ""); 10]);
        let cancel = CancellationToken::new();
        let client = client.with_cancellation_token(cancel.clone());

        let handle = tokio::spawn(async move {
            client
                .check_address(&CheckAddressRequest::default())
                .await
        });
        // First wait is at least 250ms.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        cancel.cancel();

        let err = handle.await.expect("task must not panic").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(http.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_uri() {
        let (client, http) = client(vec![]);
        let cancel = CancellationToken::new();

        for uri in ["/custody/v1/api/a%zz", "https://other.test/custody", "not a uri"] {
            let err = client
                .send(Method::GET, uri, Bytes::new(), &cancel)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RequestInvalid, "{uri}");
        }
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_public_ip() -> Result<()> {
        let (client, http) = client(vec![Reply::Status(200, "203.0.113.7\n")]);

        assert_eq!(client.public_ip().await?, "203.0.113.7");

        let requests = http.requests();
        let req = &requests[0];
        assert_eq!(req.uri().to_string(), "https://echo.test/");
        assert!(req.headers().get(AUTHORIZATION).is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_from_config_requires_credential() {
        let err = Client::from_config(
            Context::new(),
            Config::default(),
            &TransportConfig::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyLoad);
    }
}
