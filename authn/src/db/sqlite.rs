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

//! Implementation of the credential store using SQLite.

use crate::db::CredentialStore;
use crate::model::{HashedPassword, Roles, User};
use animes_core::db::sqlite::{SqliteDb, map_sqlx_error};
use animes_core::db::{DbError, DbResult};
use animes_core::model::Username;
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("sqlite.sql");

impl TryFrom<SqliteRow> for User {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let username: String = row.try_get("username").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        let password: String = row.try_get("password").map_err(map_sqlx_error)?;
        let authorities: String = row.try_get("authorities").map_err(map_sqlx_error)?;

        Ok(User::new(Username::new(username)?, HashedPassword::new(password))
            .with_name(name)
            .with_roles(Roles::from_authorities(&authorities)?))
    }
}

/// A credential store backed by the `users` table of an SQLite database.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    /// Connection to the database.
    db: SqliteDb,
}

impl SqliteCredentialStore {
    /// Creates a new store backed by `db`.
    pub fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// Creates the tables needed by the store if they do not exist yet.
    pub async fn init_schema(&self) -> DbResult<()> {
        self.db.run_schema(SCHEMA).await
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get_user_by_username(&self, username: &Username) -> DbResult<User> {
        let mut conn = self.db.acquire().await?;
        let query_str = "SELECT * FROM users WHERE username = ?";
        let row = sqlx::query(query_str)
            .bind(username.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        User::try_from(row)
    }

    async fn create_user(&self, user: &User) -> DbResult<()> {
        let mut conn = self.db.acquire().await?;
        let query_str =
            "INSERT INTO users (username, name, password, authorities) VALUES (?, ?, ?, ?)";
        sqlx::query(query_str)
            .bind(user.username().as_str())
            .bind(user.name())
            .bind(user.password().as_str())
            .bind(user.roles().to_authorities())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}
