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

//! Implementation of the anime repository using SQLite.

use crate::db::{AnimeRepository, limit_and_offset, order_by};
use crate::model::*;
use animes_core::db::sqlite::{SqliteDb, map_sqlx_error};
use animes_core::db::{DbError, DbResult, expect_one_row};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("sqlite.sql");

impl TryFrom<SqliteRow> for Anime {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        Ok(Anime::new(AnimeId::new(id), AnimeName::new(name)?))
    }
}

/// An anime repository backed by the `animes` table of an SQLite database.
#[derive(Clone)]
pub(crate) struct SqliteAnimeRepository {
    /// Connection to the database.
    db: SqliteDb,
}

impl SqliteAnimeRepository {
    /// Creates a new repository backed by `db`.
    pub(crate) fn new(db: SqliteDb) -> Self {
        Self { db }
    }

    /// Creates the tables needed by the repository if they do not exist yet.
    pub(crate) async fn init_schema(&self) -> DbResult<()> {
        self.db.run_schema(SCHEMA).await
    }

    /// Runs the listing `query_str`, which must take a single `name` parameter if `name` is set.
    async fn find_many(&self, query_str: &str, name: Option<&str>) -> DbResult<Vec<Anime>> {
        let mut conn = self.db.acquire().await?;
        let mut query = sqlx::query(query_str);
        if let Some(name) = name {
            query = query.bind(name);
        }
        let mut rows = query.fetch(&mut *conn);

        let mut animes = vec![];
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            animes.push(Anime::try_from(row)?);
        }
        Ok(animes)
    }
}

#[async_trait]
impl AnimeRepository for SqliteAnimeRepository {
    async fn find_all_paged(&self, spec: &PageSpec) -> DbResult<Page<Anime>> {
        let mut tx = self.db.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM animes")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let (limit, offset) = limit_and_offset(spec);
        let query_str = format!(
            "SELECT id, name FROM animes {} LIMIT ? OFFSET ?",
            order_by(spec.sort.as_ref())
        );
        let rows = sqlx::query(&query_str)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        let content = rows.into_iter().map(Anime::try_from).collect::<DbResult<Vec<Anime>>>()?;
        let total = u64::try_from(total)
            .map_err(|e| DbError::DataIntegrityError(format!("Invalid row count: {}", e)))?;
        Ok(Page::new(content, spec, total))
    }

    async fn find_all(&self) -> DbResult<Vec<Anime>> {
        self.find_many("SELECT id, name FROM animes ORDER BY id", None).await
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Anime>> {
        self.find_many("SELECT id, name FROM animes WHERE name = ? ORDER BY id", Some(name)).await
    }

    async fn find_by_id(&self, id: AnimeId) -> DbResult<Anime> {
        let mut conn = self.db.acquire().await?;
        let query_str = "SELECT id, name FROM animes WHERE id = ?";
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Anime::try_from(row)
    }

    async fn create(&self, name: &AnimeName) -> DbResult<Anime> {
        let mut conn = self.db.acquire().await?;
        let query_str = "INSERT INTO animes (name) VALUES (?)";
        let done = sqlx::query(query_str)
            .bind(name.as_str())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Anime::new(AnimeId::new(done.last_insert_rowid()), name.clone()))
    }

    async fn save(&self, anime: &Anime) -> DbResult<()> {
        let mut conn = self.db.acquire().await?;
        let query_str = "UPDATE animes SET name = ? WHERE id = ?";
        let done = sqlx::query(query_str)
            .bind(anime.name().as_str())
            .bind(anime.id().as_i64())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        expect_one_row(done.rows_affected())
    }

    async fn delete(&self, id: AnimeId) -> DbResult<()> {
        let mut conn = self.db.acquire().await?;
        let query_str = "DELETE FROM animes WHERE id = ?";
        let done = sqlx::query(query_str)
            .bind(id.as_i64())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        expect_one_row(done.rows_affected())
    }
}
