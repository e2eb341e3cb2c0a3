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

//! API to get the whole catalog at once.

use crate::driver::Driver;
use animes_core::rest::{EmptyBody, RestError};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let animes = driver.list_all_non_pageable().await?;

    Ok(Json(animes))
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use animes_core::rest::testutils::*;
    use axum::http;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/animes/all".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Naruto", "Berserk", "Chunibyou"]).await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_basic_auth(USER, TEST_PASSWORD)
            .send_empty()
            .await
            .expect_json::<Vec<Anime>>()
            .await;
        assert_eq!(animes, response);
    }

    #[tokio::test]
    async fn test_empty() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_basic_auth(USER, TEST_PASSWORD)
            .send_empty()
            .await
            .expect_text("^\\[\\]$")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(),
        auth = (USER, TEST_PASSWORD)
    );
}
