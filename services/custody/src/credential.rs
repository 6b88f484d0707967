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

use cactus_sign_core::utils::Redact;
use cactus_sign_core::SigningCredential;
use p256::ecdsa::{SigningKey, VerifyingKey};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Credential that holds the api key, the access key id and the P-256
/// signing key.
///
/// The key is shared behind `Arc`, cloning a credential never copies key
/// material.
#[derive(Clone)]
pub struct Credential {
    /// API key sent as `x-api-key` and embedded in the canonical string.
    pub api_key: String,
    /// Access key id placed in the `Authorization` header.
    pub access_key_id: String,
    /// Private key used to sign requests.
    pub signing_key: Arc<SigningKey>,
}

impl Credential {
    /// Create a new credential.
    pub fn new(api_key: &str, access_key_id: &str, signing_key: SigningKey) -> Self {
        Self {
            api_key: api_key.to_string(),
            access_key_id: access_key_id.to_string(),
            signing_key: Arc::new(signing_key),
        }
    }

    /// Public half of the signing key, the one uploaded to cactus custody.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from(self.signing_key.as_ref())
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &Redact::from(&self.api_key))
            .field("access_key_id", &self.access_key_id)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.access_key_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signing_key() -> SigningKey {
        SigningKey::from_slice(&[0x11; 32]).expect("scalar must be valid")
    }

    #[test]
    fn test_is_valid() {
        let cases = vec![
            ("api-key", "ak", true),
            ("", "ak", false),
            ("api-key", "", false),
        ];

        for (api_key, ak, expected) in cases {
            let cred = Credential::new(api_key, ak, signing_key());
            assert_eq!(cred.is_valid(), expected, "{api_key:?} {ak:?}");
        }
    }

    #[test]
    fn test_debug_hides_secrets() {
        let cred = Credential::new(
            "X5SGmgTAoYaVw1t7oD2p82pHgf0eNNVw3wxYGgM2",
            "ak-1",
            signing_key(),
        );
        let output = format!("{cred:?}");
        assert!(output.contains("X5S***gM2"));
        assert!(output.contains("ak-1"));
        assert!(!output.contains("X5SGmgTAoYaVw1t7oD2p82pHgf0eNNVw3wxYGgM2"));
    }

    #[test]
    fn test_clone_shares_key() {
        let cred = Credential::new("api-key", "ak", signing_key());
        let cloned = cred.clone();
        assert!(Arc::ptr_eq(&cred.signing_key, &cloned.signing_key));
        assert_eq!(cred.verifying_key(), cloned.verifying_key());
    }
}
