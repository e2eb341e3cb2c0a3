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

//! Test utilities for the REST API.

use crate::db::{AnimeRepository, SqliteAnimeRepository};
use crate::driver::Driver;
use crate::model::*;
use crate::rest::{REALM, app, security_policy};
use animes_authn::db::{CredentialStore, InMemoryCredentialStore};
use animes_authn::driver::AuthnDriver;
use animes_authn::driver::testutils::test_users;
pub(crate) use animes_authn::driver::testutils::TEST_PASSWORD;
use animes_authn::model::{Password, Roles, User};
use animes_core::db::DbError;
use animes_core::model::Username;
use axum::Router;
use std::sync::Arc;

/// Name of a test user that only holds the `USER` role.
pub(crate) const USER: &str = "devdojo";

/// Name of a test user that holds both the `USER` and `ADMIN` roles.
pub(crate) const ADMIN: &str = "wesley";

/// State of a running test.
pub(crate) struct TestContext {
    /// Direct access to the repository behind the app.
    repo: SqliteAnimeRepository,

    /// Direct access to the users known by the app.
    store: Arc<InMemoryCredentialStore>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app on top of an empty SQLite catalog and the well-known test users.
    pub(crate) async fn setup() -> Self {
        let db = animes_core::db::sqlite::testutils::setup().await;
        let repo = SqliteAnimeRepository::new(db);
        repo.init_schema().await.unwrap();

        let store = Arc::from(InMemoryCredentialStore::new(test_users()));
        let authn = AuthnDriver::new(store.clone(), security_policy(), REALM);

        let driver = Driver::new(Arc::from(repo.clone()));
        let app = app(driver, authn);
        Self { repo, store, app }
    }

    /// Gets a copy of the app.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Registers a user called `username` with `roles` and the test password.
    pub(crate) async fn add_user(&self, username: &'static str, roles: Roles) {
        let password = Password::from(TEST_PASSWORD).hash_for_testing();
        let user = User::new(Username::from(username), password).with_roles(roles);
        self.store.create_user(&user).await.unwrap();
    }

    /// Creates one anime per entry in `names`, bypassing the app, and returns them.
    pub(crate) async fn create_all(&self, names: &[&'static str]) -> Vec<Anime> {
        let mut animes = vec![];
        for name in names {
            animes.push(self.repo.create(&AnimeName::from(*name)).await.unwrap());
        }
        animes
    }

    /// Gets the anime `id`, or `None` if it does not exist.
    pub(crate) async fn get(&self, id: AnimeId) -> Option<Anime> {
        match self.repo.find_by_id(id).await {
            Ok(anime) => Some(anime),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Returns the number of animes in the catalog.
    pub(crate) async fn count(&self) -> usize {
        self.repo.find_all().await.unwrap().len()
    }
}
