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

//! API to get one anime on behalf of a known principal.

use crate::driver::Driver;
use crate::model::AnimeId;
use animes_authn::model::Principal;
use animes_core::rest::{EmptyBody, RestError};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<AnimeId>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    log::debug!("Principal {} requested anime {}", principal, id);
    let anime = driver.find_by_id_or_fail(id).await?;

    Ok(Json(anime))
}
