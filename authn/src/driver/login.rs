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

//! Extends the driver with the `login` method.

use crate::driver::AuthnDriver;
use crate::model::{Password, Principal};
use animes_core::db::DbError;
use animes_core::driver::{DriverError, DriverResult};
use animes_core::model::Username;

impl AuthnDriver {
    /// Checks the `password` of the user with `username` and returns its principal.
    pub async fn login(self, username: Username, password: Password) -> DriverResult<Principal> {
        let user = match self.store.get_user_by_username(&username).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                return Err(DriverError::Unauthorized("Unknown user".to_owned()));
            }
            Err(e) => return Err(e.into()),
        };

        let valid = password.verify(user.password()).map_err(|e| {
            DriverError::BackendError(format!("Cannot verify password of {}: {}", username, e))
        })?;
        if !valid {
            return Err(DriverError::Unauthorized("Invalid password".to_owned()));
        }

        Ok(user.into_principal())
    }
}
