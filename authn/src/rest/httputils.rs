// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Utilities to extract HTTP Basic credentials from requests.

use crate::model::Password;
use animes_core::model::Username;
use animes_core::rest::{RestError, RestResult, get_unique_header};
use base64::Engine;
use base64::engine::general_purpose;
use http::header::HeaderMap;

/// Authentication scheme advertised to clients and accepted from them.
pub(super) const BASIC_SCHEME: &str = "Basic";

/// Builds an authentication error for the `realm` with a `message` describing the problem.
fn unauthorized<M: Into<String>>(realm: &'static str, message: M) -> RestError {
    RestError::Unauthorized { scheme: BASIC_SCHEME, realm, message: message.into() }
}

/// Validates that the `Authorization` HTTP header contains a textual payload for the Basic
/// scheme and returns it.
fn get_authorization_header<'a>(
    headers: &'a HeaderMap,
    realm: &'static str,
) -> RestResult<&'a str> {
    let authz = get_unique_header(headers, "Authorization")
        .map_err(|e| unauthorized(realm, e.to_string()))?
        .ok_or_else(|| unauthorized(realm, "Missing Authorization header"))?
        .to_str()
        .map_err(|e| unauthorized(realm, format!("Bad encoding in Authorization header: {}", e)))?;

    let (scheme, payload) = match authz.split_once(' ') {
        Some((scheme, payload)) if !scheme.is_empty() => (scheme, payload),
        Some(_) => return Err(unauthorized(realm, "Bad Authorization header: missing scheme")),
        None if authz.is_empty() => {
            return Err(unauthorized(realm, "Bad Authorization header: missing scheme"));
        }
        None => return Err(unauthorized(realm, "Bad Authorization header: missing payload")),
    };
    if scheme != BASIC_SCHEME {
        return Err(unauthorized(realm, "Unsupported scheme"));
    }
    Ok(payload)
}

/// Extracts the Basic credentials from the `Authorization` header in `headers`.
///
/// All failures are reported as authentication errors for `realm` so that clients get a chance
/// to retry with valid credentials.
pub fn get_basic_auth(
    headers: &HeaderMap,
    realm: &'static str,
) -> RestResult<(Username, Password)> {
    let payload = get_authorization_header(headers, realm)?;

    let payload = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| unauthorized(realm, format!("Bad base64 encoding in payload: {}", e)))?;
    let payload = String::from_utf8(payload)
        .map_err(|e| unauthorized(realm, format!("Bad UTF-8 encoding in payload: {}", e)))?;

    // Passwords may contain colons but usernames cannot.
    let (username, password) =
        payload.split_once(':').ok_or_else(|| unauthorized(realm, "Bad content"))?;

    let username = Username::new(username).map_err(|e| unauthorized(realm, e.to_string()))?;
    let password = Password::new(password).map_err(|e| unauthorized(realm, e.to_string()))?;
    Ok((username, password))
}
