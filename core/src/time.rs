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

//! Time related utils.

use crate::Error;
use chrono::NaiveDateTime;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse http date back into datetime.
pub fn parse_http_date(s: &str) -> crate::Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT").map_err(|e| {
        Error::unexpected(format!("parse '{s}' into http date failed")).with_source(e)
    })?;
    Ok(t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2020, 3, 3, 12, 26, 57).unwrap()
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(test_time()), "Tue, 03 Mar 2020 12:26:57 GMT");
    }

    #[test]
    fn test_parse_http_date() -> crate::Result<()> {
        assert_eq!(parse_http_date("Tue, 03 Mar 2020 12:26:57 GMT")?, test_time());
        assert!(parse_http_date("2020-03-03T12:26:57Z").is_err());
        Ok(())
    }
}
