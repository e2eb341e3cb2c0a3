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

//! The `User` data type.

use crate::model::{HashedPassword, Principal, Roles};
use animes_core::model::Username;

/// Representation of a user's credentials as kept by a credential store.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    /// Name of the user, used to log in.
    username: Username,

    /// Display name of the user.
    name: String,

    /// Hashed password.
    password: HashedPassword,

    /// Roles granted to the user.
    roles: Roles,
}

impl User {
    /// Creates a new user with the given login credentials and no roles.
    pub fn new(username: Username, password: HashedPassword) -> Self {
        let name = username.as_str().to_owned();
        Self { username, name, password, roles: Roles::default() }
    }

    /// Modifies a user to set its display name.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Modifies a user to replace its roles.
    pub fn with_roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }

    /// Gets the user's username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Gets the user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the user's password as a hash.
    pub fn password(&self) -> &HashedPassword {
        &self.password
    }

    /// Gets the user's roles.
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Converts the user into the principal that represents it once authenticated.
    pub fn into_principal(self) -> Principal {
        Principal::new(self.username, self.roles)
    }
}
