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

//! Extends the driver with the `ensure_user` method.

use crate::driver::AuthnDriver;
use crate::model::User;
use animes_core::db::DbError;
use animes_core::driver::DriverResult;

impl AuthnDriver {
    /// Creates `user` in the credential store unless a user with the same username exists.
    ///
    /// Returns true if the user was created.  Existing users are left untouched so that their
    /// passwords and roles survive restarts of the service.
    pub async fn ensure_user(self, user: User) -> DriverResult<bool> {
        match self.store.create_user(&user).await {
            Ok(()) => {
                log::info!(
                    "Created user {} with roles {}",
                    user.username(),
                    user.roles().to_authorities()
                );
                Ok(true)
            }
            Err(DbError::AlreadyExists) => {
                log::info!("User {} already exists; not modifying it", user.username());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}
