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

//! Business logic for user authentication and authorization.

use crate::db::CredentialStore;
use std::sync::Arc;

mod bootstrap;
mod login;
mod policy;
pub use policy::{AccessRule, SecurityPolicy};
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver consume it.  Cloning the driver is cheap because
/// all of its state is shared.
#[derive(Clone)]
pub struct AuthnDriver {
    /// The store that knows about the users allowed to access the service.
    store: Arc<dyn CredentialStore + Send + Sync>,

    /// Rules that determine which roles can access which APIs.
    policy: Arc<SecurityPolicy>,

    /// Authentication realm to return to requests.
    realm: &'static str,
}

impl AuthnDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        store: Arc<dyn CredentialStore + Send + Sync>,
        policy: SecurityPolicy,
        realm: &'static str,
    ) -> Self {
        Self { store, policy: Arc::from(policy), realm }
    }

    /// Gets the authentication realm.
    pub fn realm(&self) -> &'static str {
        self.realm
    }
}
