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

//! Resilient transport: bounded retries with exponential backoff.

use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBuilder};
use bytes::Bytes;
use http::HeaderMap;
use log::{debug, warn};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Context, Error, Result};

/// Transport configuration.
///
/// | Field | Default |
/// |---|---|
/// | `timeout` | 30s, per physical attempt |
/// | `max_retries` | 3 |
/// | `max_elapsed_time` | 60s, for the whole call |
/// | `insecure_skip_verify` | false |
/// | `default_headers` | empty |
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout of one physical attempt, covering connect and read.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Time budget of one logical call, across all attempts and waits.
    pub max_elapsed_time: Duration,
    /// Skip TLS certificate verification.
    ///
    /// Only use this against development endpoints.
    pub insecure_skip_verify: bool,
    /// Headers sent with every request, request headers take precedence.
    pub default_headers: HeaderMap,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            max_elapsed_time: Duration::from_secs(60),
            insecure_skip_verify: false,
            default_headers: HeaderMap::new(),
        }
    }
}

impl TransportConfig {
    /// Build the retry policy described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            max_elapsed_time: self.max_elapsed_time,
            ..Default::default()
        }
    }
}

/// RetryPolicy decides how many attempts a call may make and how long to
/// wait between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Time budget of one logical call.
    pub max_elapsed_time: Duration,
    /// Wait before the first retry.
    pub initial_interval: Duration,
    /// Growth factor of the wait, clamped into `[1, 100]`.
    pub multiplier: f32,
    /// Upper bound of a single wait before jitter.
    pub max_interval: Duration,
    /// Add up to one extra wait of random length.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_elapsed_time: Duration::from_secs(60),
            initial_interval: Duration::from_millis(500),
            multiplier: 1.5,
            max_interval: Duration::from_secs(60),
            jitter: true,
        }
    }
}

const MAX_MULTIPLIER: f32 = 100.0;

impl RetryPolicy {
    /// Build the waits of one call, one per retry.
    ///
    /// Waits never grow past `max_interval` or `max_elapsed_time`. A multiplier
    /// that is not finite is treated as 1.
    pub fn backoff(&self) -> impl Iterator<Item = Duration> + Send {
        let factor = if self.multiplier.is_finite() {
            self.multiplier.clamp(1.0, MAX_MULTIPLIER)
        } else {
            1.0
        };
        // Growing and jittering a wait must stay within Duration.
        let max_delay = self
            .max_interval
            .min(self.max_elapsed_time)
            .min(Duration::MAX / (2 * MAX_MULTIPLIER as u32));

        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.initial_interval.min(max_delay))
            .with_factor(factor)
            .with_max_delay(max_delay)
            .with_max_times(self.max_retries);
        if self.jitter {
            builder = builder.with_jitter();
        }
        builder.build()
    }
}

/// Transport executes a request with bounded retries.
///
/// An attempt is retried when [`crate::HttpSend`] reports a transient error
/// or the response status is 5xx. Every other response, 4xx included, is
/// returned as is. The request is sent byte for byte identical on every
/// attempt: signing material is never regenerated here.
#[derive(Debug, Clone)]
pub struct Transport {
    ctx: Context,
    policy: RetryPolicy,
}

impl Transport {
    /// Create a new transport sending through `ctx`.
    pub fn new(ctx: Context, policy: RetryPolicy) -> Self {
        Self { ctx, policy }
    }

    /// Get the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send request, retrying transient failures until the policy is spent.
    ///
    /// - `RetryExhausted` once attempts reach `max_retries + 1` or the elapsed
    ///   time reaches `max_elapsed_time`, the last failure is kept as source.
    /// - `Cancelled` as soon as `cancel` fires, even in the middle of an
    ///   attempt or a wait.
    pub async fn send(
        &self,
        req: http::Request<Bytes>,
        cancel: &CancellationToken,
    ) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        let start = Instant::now();
        let mut backoff = self.policy.backoff();
        let mut attempts = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(cancelled(attempts));
            }

            attempts += 1;
            let req = rebuild_request(&parts, &body);
            debug!("{} {}: attempt {attempts}", parts.method, parts.uri);

            // A running attempt must not outlive the budget of the call.
            let remaining = self
                .policy
                .max_elapsed_time
                .saturating_sub(start.elapsed());
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(attempts)),
                res = tokio::time::timeout(remaining, self.ctx.http_send(req)) => res,
            };
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(timeout) => return Err(exhausted(&parts, attempts, start).with_source(timeout)),
            };

            let err = match outcome {
                Ok(resp) if resp.status().as_u16() >= 500 => {
                    let status = resp.status();
                    // Release the buffered body before the next attempt.
                    drop(resp);
                    Error::transient_transport(format!(
                        "server error: status code {}",
                        status.as_u16()
                    ))
                }
                Ok(resp) => return Ok(resp),
                Err(err) if err.is_retryable() => err,
                Err(err) => return Err(err),
            };

            let elapsed = start.elapsed();
            let wait = match backoff.next() {
                Some(wait) if elapsed < self.policy.max_elapsed_time => {
                    wait.min(self.policy.max_elapsed_time - elapsed)
                }
                _ => return Err(exhausted(&parts, attempts, start).with_source(err)),
            };
            warn!(
                "{} {} attempt {attempts} failed: {err}, retrying in {wait:?}",
                parts.method, parts.uri
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(attempts)),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

fn exhausted(parts: &http::request::Parts, attempts: usize, start: Instant) -> Error {
    Error::retry_exhausted(format!(
        "{} {} failed after {attempts} attempts in {:?}",
        parts.method,
        parts.uri,
        start.elapsed()
    ))
}

fn cancelled(attempts: usize) -> Error {
    Error::cancelled(format!("request cancelled after {attempts} attempts"))
}

/// `http::request::Parts` can't be cloned because of extensions, rebuild
/// a fresh request from the pieces that go on the wire.
fn rebuild_request(parts: &http::request::Parts, body: &Bytes) -> http::Request<Bytes> {
    let mut req = http::Request::new(body.clone());
    *req.method_mut() = parts.method.clone();
    *req.uri_mut() = parts.uri.clone();
    *req.version_mut() = parts.version;
    *req.headers_mut() = parts.headers.clone();
    req
}
