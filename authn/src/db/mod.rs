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

//! Credential stores to look up users and their roles.

use crate::model::User;
use animes_core::db::DbResult;
use animes_core::model::Username;
use async_trait::async_trait;

mod memory;
pub use memory::InMemoryCredentialStore;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCredentialStore;
#[cfg(any(feature = "sqlite", test))]
mod sqlite;
#[cfg(any(feature = "sqlite", test))]
pub use sqlite::SqliteCredentialStore;

/// Operations to look up and register the users that can access the service.
#[async_trait]
pub trait CredentialStore {
    /// Gets information about an existing user named `username`.
    async fn get_user_by_username(&self, username: &Username) -> DbResult<User>;

    /// Registers a new `user`, failing with `AlreadyExists` if the username is taken.
    async fn create_user(&self, user: &User) -> DbResult<()>;
}
