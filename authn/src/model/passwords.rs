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

//! The `Password` and `HashedPassword` data types.

use animes_core::model::{ModelError, ModelResult};
use std::fmt;

/// Cost factor for newly-hashed passwords.
const BCRYPT_COST: u32 = 10;

/// Smallest cost factor accepted by bcrypt.
#[cfg(any(test, feature = "testutils"))]
const BCRYPT_MIN_COST: u32 = 4;

/// Prefix that delegating password encoders put in front of bcrypt hashes.
const BCRYPT_ID_PREFIX: &str = "{bcrypt}";

/// Maximum number of bytes that bcrypt takes into account.
const MAX_PASSWORD_LENGTH: usize = 72;

/// An opaque type to hold a password, protecting it from leaking into logs.
#[derive(PartialEq)]
#[cfg_attr(any(test, feature = "testutils"), derive(Clone))]
pub struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.len() > MAX_PASSWORD_LENGTH {
            return Err(ModelError("Password is too long".to_owned()));
        }
        Ok(Password(s))
    }

    /// Hashes the password.  Consumes the password because there is no context in which keeping
    /// the password alive once we have generated its hash is correct.
    pub fn hash(self) -> ModelResult<HashedPassword> {
        self.hash_with_cost(BCRYPT_COST)
    }

    /// Hashes the password with the cheapest cost that bcrypt allows.  Only useful for testing
    /// purposes, where hashing speed matters more than security.
    #[cfg(any(test, feature = "testutils"))]
    pub fn hash_for_testing(self) -> HashedPassword {
        self.hash_with_cost(BCRYPT_MIN_COST).expect("Hashing a valid password must succeed")
    }

    /// Hashes the password with the given bcrypt `cost`.
    fn hash_with_cost(self, cost: u32) -> ModelResult<HashedPassword> {
        let hashed =
            bcrypt::hash(self.0, cost).map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    pub fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.bcrypt_hash())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(Clone, PartialEq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    ///
    /// The hash may carry a `{bcrypt}` identifier prefix, as stored by other systems that share
    /// the same users table.
    pub fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the raw bcrypt hash without any identifier prefix.
    fn bcrypt_hash(&self) -> &str {
        self.0.strip_prefix(BCRYPT_ID_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}
