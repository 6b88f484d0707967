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

//! Hash related utils.

use crate::Error;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use sha2::Digest;
use sha2::Sha256;

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Base64 decode
pub fn base64_decode(content: &str) -> crate::Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(content)
        .map_err(|e| Error::unexpected("base64 decode failed").with_source(e))
}

/// SHA256 digest.
pub fn sha256(content: &[u8]) -> [u8; 32] {
    Sha256::digest(content).into()
}

/// Base64 encoded SHA256 hash.
///
/// The value used by `Content-SHA256`. Empty content still has a hash:
/// `47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=`.
pub fn base64_sha256(content: &[u8]) -> String {
    base64_encode(Sha256::digest(content).as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base64_sha256() {
        let cases = vec![
            ("empty", "", "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="),
            ("abc", "abc", "ungWv48Bz+pBQUDeXa4iI7ADYaOWF3qctBD/YfIAFa0="),
            (
                "json",
                r#"{"addresses":["3SYQn32YG7XowiCzXKuXqnqBWtFvQDp3WeK36eE8rTEi"],"coin_name":"USDT_SOL"}"#,
                "xDqrtH/Wcn55WUVQmfa557ivHLQlKgLXpLqRWJiYrfk=",
            ),
        ];

        for (name, input, expected) in cases {
            assert_eq!(base64_sha256(input.as_bytes()), expected, "Failed on: {name}");
            // deterministic
            assert_eq!(
                base64_sha256(input.as_bytes()),
                base64_sha256(input.as_bytes())
            );
        }
    }

    #[test]
    fn test_base64_sha256_distinguishes_bodies() {
        assert_ne!(base64_sha256(b"{}"), base64_sha256(b"{ }"));
        assert_ne!(base64_sha256(b""), base64_sha256(b"\n"));
    }

    #[test]
    fn test_base64_round_trip() -> crate::Result<()> {
        let encoded = base64_encode(b"cactus");
        assert_eq!(encoded, "Y2FjdHVz");
        assert_eq!(base64_decode(&encoded)?, b"cactus");
        assert!(base64_decode("not base64!").is_err());
        Ok(())
    }
}
