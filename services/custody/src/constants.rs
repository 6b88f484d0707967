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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in cactus custody api.
pub const X_API_KEY: &str = "x-api-key";
pub const X_API_NONCE: &str = "x-api-nonce";
pub const CONTENT_SHA256: &str = "content-sha256";

// Env values used in cactus custody api.
pub const CACTUS_ENDPOINT: &str = "CACTUS_ENDPOINT";
pub const CACTUS_API_KEY: &str = "CACTUS_API_KEY";
pub const CACTUS_ACCESS_KEY_ID: &str = "CACTUS_ACCESS_KEY_ID";
pub const CACTUS_KEY_FILE: &str = "CACTUS_KEY_FILE";
pub const CACTUS_KEY_PASSPHRASE: &str = "CACTUS_KEY_PASSPHRASE";

pub const DEFAULT_ENDPOINT: &str = "https://api.mycactus.dev";
pub const DEFAULT_ECHO_ENDPOINT: &str = "https://ipconfig.io";

/// Media type of both the body and the accepted response.
pub const APPLICATION_JSON: &str = "application/json";

/// Scheme prefix of the `Authorization` header.
pub const AUTHORIZATION_SCHEME: &str = "api";

/// AsciiSet used to put ids into path segments.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
