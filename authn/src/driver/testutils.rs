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

//! Test utilities for the authentication driver.

use crate::db::{CredentialStore, InMemoryCredentialStore};
use crate::driver::{AccessRule, AuthnDriver, SecurityPolicy};
use crate::model::{HashedPassword, Password, Role, Roles, User};
use animes_core::model::Username;
use std::sync::Arc;

/// Password shared by all the users returned by `test_users`.
pub const TEST_PASSWORD: &str = "academy";

/// Realm used by drivers created for testing.
pub const TEST_REALM: &str = "test-realm";

/// Returns the well-known users for tests: `devdojo` is a regular user and `wesley` is also an
/// administrator.
pub fn test_users() -> Vec<User> {
    vec![
        User::new(Username::from("devdojo"), Password::from(TEST_PASSWORD).hash_for_testing())
            .with_name("DevDojo Academy")
            .with_roles(Roles::from([Role::User])),
        User::new(Username::from("wesley"), Password::from(TEST_PASSWORD).hash_for_testing())
            .with_name("William Suane")
            .with_roles(Roles::from([Role::User, Role::Admin])),
    ]
}

/// Returns a policy that restricts `/animes/admin/**` to administrators and the rest of
/// `/animes/**` to regular users.
pub fn test_policy() -> SecurityPolicy {
    SecurityPolicy::new(vec![
        AccessRule::new("/animes/admin/**").with_roles(&[Role::Admin]),
        AccessRule::new("/animes/**").with_roles(&[Role::User]),
    ])
}

/// State of a running test.
pub struct TestContext {
    /// The credential store backing the driver.
    store: Arc<InMemoryCredentialStore>,

    /// The driver under test.
    driver: AuthnDriver,
}

impl TestContext {
    /// Initializes a driver with the `test_users` and the `test_policy`.
    pub async fn setup() -> Self {
        Self::setup_with_policy(test_policy()).await
    }

    /// Initializes a driver with the `test_users` and a custom `policy`.
    pub async fn setup_with_policy(policy: SecurityPolicy) -> Self {
        let store = Arc::from(InMemoryCredentialStore::new(test_users()));
        let driver = AuthnDriver::new(store.clone(), policy, TEST_REALM);
        Self { store, driver }
    }

    /// Gets a copy of the driver.
    pub fn driver(&self) -> AuthnDriver {
        self.driver.clone()
    }

    /// Adds a user without roles that has a raw password `hash`, bypassing all hashing.
    pub async fn add_user_with_hash(&self, username: &'static str, hash: &'static str) {
        let user = User::new(Username::from(username), HashedPassword::new(hash));
        self.store.create_user(&user).await.unwrap();
    }
}
