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

//! API to add an anime to the catalog.

use crate::driver::Driver;
use crate::model::AnimeName;
use crate::rest::validate_name;
use animes_core::rest::{FieldError, RestError, Validate, ValidJson};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Json, http};
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Message sent by the client to create an anime.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct CreateAnimeRequest {
    /// Name of the new anime.
    name: Option<String>,
}

impl Validate for CreateAnimeRequest {
    type Valid = AnimeName;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let mut errors = vec![];
        match validate_name(self.name, &mut errors) {
            Some(name) => Ok(name),
            None => Err(errors),
        }
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidJson(name): ValidJson<CreateAnimeRequest>,
) -> Result<impl IntoResponse, RestError> {
    let anime = driver.save(name).await?;

    Ok((http::StatusCode::CREATED, Json(anime)))
}
