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

use std::mem;

use http::header::HeaderName;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;

use crate::{Error, Result};

/// Signing context for request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// HTTP query parameters, percent decoded, in their original order.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let (path, query) = split_uri(&parts.uri)?;

        Ok(SigningRequest {
            method: parts.method.clone(),
            path,
            query,
            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    ///
    /// Only headers are returned, the uri is never rewritten so that the
    /// request sent is exactly the one that has been signed.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        Ok(())
    }

    /// Get the path percent decoded.
    ///
    /// Returns `RequestInvalid` if the path carries a broken escape sequence
    /// or doesn't decode into valid utf-8.
    pub fn path_percent_decoded(&self) -> Result<String> {
        check_escapes("path", &self.path)?;

        percent_encoding::percent_decode_str(&self.path)
            .decode_utf8()
            .map(|v| v.into_owned())
            .map_err(|e| Error::request_invalid("path is not valid utf-8").with_source(e))
    }

    /// Group query values by name.
    ///
    /// Names are sorted bytewise, values keep their original relative order.
    ///
    /// ```shell
    /// [(b, 1), (a, 2), (b, 3)] => [(a, [2]), (b, [1, 3])]
    /// ```
    pub fn query_grouped(&self) -> Vec<(&str, Vec<&str>)> {
        let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
        for (k, v) in &self.query {
            match grouped.iter_mut().find(|(name, _)| *name == k.as_str()) {
                Some((_, values)) => values.push(v.as_str()),
                None => grouped.push((k.as_str(), vec![v.as_str()])),
            }
        }
        grouped.sort_by(|(a, _), (b, _)| a.cmp(b));
        grouped
    }

    /// Insert a header, replacing any existing value.
    #[inline]
    pub fn header_insert(&mut self, name: HeaderName, value: &str) -> Result<()> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(())
    }
}

/// Split uri into its raw path and decoded query pairs.
fn split_uri(uri: &Uri) -> Result<(String, Vec<(String, String)>)> {
    let path = uri.path();
    if path.is_empty() {
        return Err(Error::request_invalid(format!("uri {uri} has no path")));
    }

    let query = match uri.query() {
        Some(v) => {
            check_escapes("query", v)?;
            // Separators are ascii, so the whole query decodes into utf-8
            // only if every name and value does.
            percent_encoding::percent_decode_str(v)
                .decode_utf8()
                .map_err(|e| Error::request_invalid("query is not valid utf-8").with_source(e))?;

            form_urlencoded::parse(v.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        }
        None => Vec::new(),
    };

    Ok((path.to_string(), query))
}

/// Every `%` must start a complete escape sequence.
fn check_escapes(part: &str, raw: &str) -> Result<()> {
    let bs = raw.as_bytes();
    for (idx, b) in bs.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let valid = bs.len() > idx + 2
            && bs[idx + 1].is_ascii_hexdigit()
            && bs[idx + 2].is_ascii_hexdigit();
        if !valid {
            return Err(Error::request_invalid(format!(
                "invalid escape in {part}: {raw}"
            )));
        }
    }
    Ok(())
}
