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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::AnimeName;
use animes_authn::driver::{AccessRule, AuthnDriver, SecurityPolicy};
use animes_authn::model::Role;
use animes_authn::rest::require_access;
use animes_core::rest::FieldError;
use axum::{Router, http, middleware};

mod anime_by_id_get;
mod anime_delete;
mod anime_get;
mod animes_all_get;
mod animes_find_get;
mod animes_get;
mod animes_post;
mod animes_put;
#[cfg(test)]
mod testutils;

/// Authentication realm advertised to clients.
pub(crate) const REALM: &str = "animes";

/// Returns the rules that decide which roles can access which APIs.
pub(crate) fn security_policy() -> SecurityPolicy {
    SecurityPolicy::new(vec![
        AccessRule::new("/animes/admin/**").with_roles(&[Role::Admin]),
        AccessRule::new("/animes/*").with_method(http::Method::DELETE).with_roles(&[Role::Admin]),
        AccessRule::new("/animes")
            .with_method(http::Method::POST)
            .with_roles(&[Role::User, Role::Admin]),
        AccessRule::new("/animes/**").with_roles(&[Role::User]),
    ])
}

/// Validates the raw `name` of an anime received in a request, recording any problems in
/// `errors`.
fn validate_name(name: Option<String>, errors: &mut Vec<FieldError>) -> Option<AnimeName> {
    match AnimeName::new(name.unwrap_or_default()) {
        Ok(name) => Some(name),
        Err(e) => {
            errors.push(FieldError::new("name", e.to_string()));
            None
        }
    }
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver, authn: AuthnDriver) -> Router {
    use axum::routing::{delete, get};
    Router::new()
        .route(
            "/animes",
            get(animes_get::handler).post(animes_post::handler).put(animes_put::handler),
        )
        .route("/animes/all", get(animes_all_get::handler))
        .route("/animes/find", get(animes_find_get::handler))
        .route("/animes/by-id/:id", get(anime_by_id_get::handler))
        .route("/animes/admin/:id", delete(anime_delete::handler))
        .route("/animes/:id", get(anime_get::handler).delete(anime_delete::handler))
        .route_layer(middleware::from_fn_with_state(authn, require_access))
        .with_state(driver)
}
