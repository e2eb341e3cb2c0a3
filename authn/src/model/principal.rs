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

//! The `Principal` data type.

use crate::model::{Role, Roles};
use animes_core::model::Username;
use std::fmt;

/// An authenticated user as seen by the handlers of a request.
#[derive(Clone, Debug, PartialEq)]
pub struct Principal {
    /// Name of the authenticated user.
    username: Username,

    /// Roles granted to the authenticated user.
    roles: Roles,
}

impl Principal {
    /// Creates a new principal for `username` with `roles`.
    pub fn new(username: Username, roles: Roles) -> Self {
        Self { username, roles }
    }

    /// Gets the principal's username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Gets the principal's roles.
    pub fn roles(&self) -> &Roles {
        &self.roles
    }

    /// Returns true if the principal holds at least one of the `wanted` roles.
    pub fn has_any_role(&self, wanted: &[Role]) -> bool {
        self.roles.contains_any(wanted)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.username, self.roles.to_authorities())
    }
}
