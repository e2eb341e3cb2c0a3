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

//! The `Role` and `Roles` data types.

use animes_core::model::{ModelError, ModelResult};
use std::collections::BTreeSet;
use std::fmt;

/// Prefix that identifies an authority as a role.
const ROLE_PREFIX: &str = "ROLE_";

/// A role that grants access to a subset of the APIs.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Role {
    /// Regular user, allowed to query and modify the catalog.
    User,

    /// Administrator, additionally allowed to delete from the catalog.
    Admin,
}

impl Role {
    /// Returns the name of the role without the authority prefix.
    pub fn name(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses a single authority such as `ROLE_ADMIN`.
    pub fn from_authority(authority: &str) -> ModelResult<Self> {
        match authority.strip_prefix(ROLE_PREFIX) {
            Some("USER") => Ok(Role::User),
            Some("ADMIN") => Ok(Role::Admin),
            _ => Err(ModelError(format!("Unknown authority '{}'", authority))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ROLE_PREFIX, self.name())
    }
}

/// The set of roles granted to a user.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Roles(BTreeSet<Role>);

impl Roles {
    /// Parses a comma-separated list of authorities such as `ROLE_USER,ROLE_ADMIN`.
    ///
    /// Whitespace around each authority is ignored, as are empty entries.
    pub fn from_authorities(authorities: &str) -> ModelResult<Self> {
        let mut roles = BTreeSet::default();
        for authority in authorities.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            roles.insert(Role::from_authority(authority)?);
        }
        Ok(Roles(roles))
    }

    /// Formats the roles as a comma-separated list of authorities, ready to be stored.
    pub fn to_authorities(&self) -> String {
        self.0.iter().map(Role::to_string).collect::<Vec<String>>().join(",")
    }

    /// Returns true if `role` is part of this set.
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Returns true if any of the `wanted` roles is part of this set.
    pub fn contains_any(&self, wanted: &[Role]) -> bool {
        wanted.iter().any(|role| self.contains(*role))
    }

    /// Returns true if the set has no roles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[Role; N]> for Roles {
    fn from(roles: [Role; N]) -> Self {
        Roles(BTreeSet::from(roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_authority() {
        assert_eq!("ROLE_USER", Role::User.to_string());
        assert_eq!("ROLE_ADMIN", Role::Admin.to_string());
        assert_eq!(Role::User, Role::from_authority("ROLE_USER").unwrap());
        assert_eq!(Role::Admin, Role::from_authority("ROLE_ADMIN").unwrap());
    }

    #[test]
    fn test_role_authority_error() {
        assert!(Role::from_authority("USER").is_err());
        assert!(Role::from_authority("ROLE_user").is_err());
        assert_eq!(
            ModelError("Unknown authority 'ROLE_ROOT'".to_owned()),
            Role::from_authority("ROLE_ROOT").unwrap_err()
        );
    }

    #[test]
    fn test_roles_from_authorities() {
        assert_eq!(Roles::default(), Roles::from_authorities("").unwrap());
        assert_eq!(Roles::from([Role::User]), Roles::from_authorities("ROLE_USER").unwrap());
        assert_eq!(
            Roles::from([Role::User, Role::Admin]),
            Roles::from_authorities("ROLE_ADMIN, ROLE_USER,").unwrap()
        );
        assert!(Roles::from_authorities("ROLE_USER,ROLE_GUEST").is_err());
    }

    #[test]
    fn test_roles_to_authorities() {
        assert_eq!("", Roles::default().to_authorities());
        assert_eq!("ROLE_USER,ROLE_ADMIN", Roles::from([Role::Admin, Role::User]).to_authorities());
    }

    #[test]
    fn test_roles_contains_any() {
        let roles = Roles::from([Role::User]);
        assert!(roles.contains(Role::User));
        assert!(!roles.contains(Role::Admin));
        assert!(roles.contains_any(&[Role::Admin, Role::User]));
        assert!(!roles.contains_any(&[Role::Admin]));
        assert!(!roles.contains_any(&[]));
        assert!(!roles.is_empty());
        assert!(Roles::default().is_empty());
    }
}
