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

//! API to find animes by their exact name.

use crate::driver::Driver;
use animes_core::rest::{EmptyBody, FieldError, RestError, Validate, ValidQuery};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Query parameters.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct FindAnimesRequest {
    /// Name to look for.
    name: Option<String>,
}

impl Validate for FindAnimesRequest {
    type Valid = String;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        self.name.ok_or_else(|| vec![FieldError::new("name", "The name parameter is required")])
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidQuery(name): ValidQuery<FindAnimesRequest>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let animes = driver.find_by_name(&name).await?;

    Ok(Json(animes))
}
