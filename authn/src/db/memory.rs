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

//! Implementation of the credential store in memory.

use crate::db::CredentialStore;
use crate::model::User;
use animes_core::db::{DbError, DbResult};
use animes_core::model::Username;
use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::HashMap;

/// A credential store that keeps a fixed list of users in memory.
///
/// Useful for deployments with a handful of well-known accounts and for tests.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    /// Known users keyed by their username.
    users: Mutex<HashMap<Username, User>>,
}

impl InMemoryCredentialStore {
    /// Creates a new store seeded with `users`.  Later entries replace earlier ones that have
    /// the same username.
    pub fn new<I: IntoIterator<Item = User>>(users: I) -> Self {
        let users = users.into_iter().map(|user| (user.username().clone(), user)).collect();
        Self { users: Mutex::new(users) }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get_user_by_username(&self, username: &Username) -> DbResult<User> {
        let users = self.users.lock().await;
        users.get(username).cloned().ok_or(DbError::NotFound)
    }

    async fn create_user(&self, user: &User) -> DbResult<()> {
        let mut users = self.users.lock().await;
        if users.contains_key(user.username()) {
            return Err(DbError::AlreadyExists);
        }
        users.insert(user.username().clone(), user.clone());
        Ok(())
    }
}
