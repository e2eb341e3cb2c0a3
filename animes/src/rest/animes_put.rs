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

//! API to replace an existing anime.

use crate::driver::Driver;
use crate::model::{Anime, AnimeId};
use crate::rest::validate_name;
use animes_core::rest::{FieldError, RestError, Validate, ValidJson};
use axum::extract::State;
use axum::http;
use axum::response::IntoResponse;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Message sent by the client to replace an anime.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct ReplaceAnimeRequest {
    /// Identifier of the anime to replace.
    id: Option<i64>,

    /// New name for the anime.
    name: Option<String>,
}

impl Validate for ReplaceAnimeRequest {
    type Valid = Anime;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let mut errors = vec![];
        let id = self.id.map(AnimeId::new);
        if id.is_none() {
            errors.push(FieldError::new("id", "The id cannot be empty"));
        }
        let name = validate_name(self.name, &mut errors);
        match (id, name) {
            (Some(id), Some(name)) => Ok(Anime::new(id, name)),
            _ => Err(errors),
        }
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidJson(anime): ValidJson<ReplaceAnimeRequest>,
) -> Result<impl IntoResponse, RestError> {
    driver.replace(anime).await?;

    Ok(http::StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::rest::testutils::*;
    use animes_authn::model::{Role, Roles};
    use animes_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::PUT, "/animes".to_owned())
    }

    #[tokio::test]
    async fn test_replace() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou", "Berserk"]).await;

        for _ in 0..2 {
            let request = ReplaceAnimeRequest {
                id: Some(animes[0].id().as_i64()),
                name: Some("Chunibyou2".to_owned()),
            };
            OneShotBuilder::new(context.app(), route())
                .with_basic_auth(USER, TEST_PASSWORD)
                .send_json(request)
                .await
                .expect_status(http::StatusCode::NO_CONTENT)
                .expect_empty()
                .await;
        }

        assert_eq!(
            Some(Anime::new(*animes[0].id(), AnimeName::from("Chunibyou2"))),
            context.get(*animes[0].id()).await
        );
        assert_eq!(Some(animes[1].clone()), context.get(*animes[1].id()).await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        let request = ReplaceAnimeRequest { id: Some(42), name: Some("Chunibyou".to_owned()) };
        OneShotBuilder::new(context.app(), route())
            .with_basic_auth(USER, TEST_PASSWORD)
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("^Anime not found$")
            .await;

        assert_eq!(0, context.count().await);
    }

    #[tokio::test]
    async fn test_invalid_fields() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou"]).await;

        OneShotBuilder::new(context.app(), route())
            .with_basic_auth(USER, TEST_PASSWORD)
            .send_json(ReplaceAnimeRequest { id: None, name: Some(String::new()) })
            .await
            .expect_validation_error("id,name", "The id cannot be empty, The name cannot be empty")
            .await;

        assert_eq!(Some(animes[0].clone()), context.get(*animes[0].id()).await);
    }

    #[tokio::test]
    async fn test_wrong_field_type() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou"]).await;

        let details = OneShotBuilder::new(context.app(), route())
            .with_basic_auth(USER, TEST_PASSWORD)
            .send_json(serde_json::json!({"id": "seven", "name": "Chunibyou2"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error_details()
            .await;
        assert_eq!("InvalidRequest", details.developer_message);

        assert_eq!(Some(animes[0].clone()), context.get(*animes[0].id()).await);
    }

    #[tokio::test]
    async fn test_admin_without_user_role() {
        let context = TestContext::setup().await;
        let animes = context.create_all(&["Chunibyou"]).await;
        context.add_user("boss", Roles::from([Role::Admin])).await;

        let request =
            ReplaceAnimeRequest { id: Some(animes[0].id().as_i64()), name: Some("X".to_owned()) };
        OneShotBuilder::new(context.app(), route())
            .with_basic_auth("boss", TEST_PASSWORD)
            .send_json(request)
            .await
            .expect_status(http::StatusCode::FORBIDDEN)
            .expect_error("requires one of the roles USER")
            .await;

        assert_eq!(Some(animes[0].clone()), context.get(*animes[0].id()).await);
    }

    test_payload_must_be_json!(
        TestContext::setup().await.into_app(),
        route(),
        auth = (USER, TEST_PASSWORD)
    );
}
