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

//! Middleware that authenticates and authorizes every request before it reaches its handler.

use crate::driver::AuthnDriver;
use crate::rest::httputils::{BASIC_SCHEME, get_basic_auth};
use animes_core::driver::DriverError;
use animes_core::rest::RestError;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Authenticates the caller with HTTP Basic and checks the request against the security policy.
///
/// On success, the authenticated `Principal` is stored in the request extensions so that
/// handlers can obtain it via `Extension<Principal>`.  Authentication problems yield a 401 with
/// a challenge for the realm and authorization problems yield a 403.
pub async fn require_access(
    State(driver): State<AuthnDriver>,
    mut request: Request,
    next: Next,
) -> Result<Response, RestError> {
    let realm = driver.realm();
    let (username, password) = get_basic_auth(request.headers(), realm)?;

    let principal = match driver.clone().login(username, password).await {
        Ok(principal) => principal,
        Err(DriverError::Unauthorized(message)) => {
            return Err(RestError::Unauthorized { scheme: BASIC_SCHEME, realm, message });
        }
        Err(e) => return Err(e.into()),
    };

    if let Err(e) = driver.authorize(&principal, request.method(), request.uri().path()) {
        log::warn!("Denied access to {}: {}", principal, e);
        return Err(e.into());
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
