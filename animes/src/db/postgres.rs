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

//! Implementation of the anime repository using PostgreSQL.

use crate::db::{AnimeRepository, limit_and_offset, order_by};
use crate::model::*;
use animes_core::db::postgres::{PostgresDb, map_sqlx_error};
use animes_core::db::{DbError, DbResult, expect_one_row};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::postgres::PgRow;

/// Schema to use to initialize the database.
const SCHEMA: &str = include_str!("postgres.sql");

impl TryFrom<PgRow> for Anime {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(map_sqlx_error)?;
        Ok(Anime::new(AnimeId::new(id), AnimeName::new(name)?))
    }
}

/// An anime repository backed by the `animes` table of a PostgreSQL database.
#[derive(Clone)]
pub(crate) struct PostgresAnimeRepository {
    /// Connection to the database.
    db: PostgresDb,
}

impl PostgresAnimeRepository {
    /// Creates a new repository backed by `db`.
    pub(crate) fn new(db: PostgresDb) -> Self {
        Self { db }
    }

    /// Creates the tables needed by the repository if they do not exist yet.
    pub(crate) async fn init_schema(&self) -> DbResult<()> {
        self.db.run_schema(SCHEMA).await
    }
}

#[async_trait]
impl AnimeRepository for PostgresAnimeRepository {
    async fn find_all_paged(&self, spec: &PageSpec) -> DbResult<Page<Anime>> {
        let mut tx = self.db.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM animes")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let (limit, offset) = limit_and_offset(spec);
        let query_str = format!(
            "SELECT id, name FROM animes {} LIMIT $1 OFFSET $2",
            order_by(spec.sort.as_ref())
        );
        let mut rows = sqlx::query(&query_str).bind(limit).bind(offset).fetch(&mut *tx);
        let mut content = vec![];
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            content.push(Anime::try_from(row)?);
        }
        drop(rows);

        tx.commit().await.map_err(map_sqlx_error)?;

        let total = u64::try_from(total)
            .map_err(|e| DbError::DataIntegrityError(format!("Invalid row count: {}", e)))?;
        Ok(Page::new(content, spec, total))
    }

    async fn find_all(&self) -> DbResult<Vec<Anime>> {
        let mut conn = self.db.acquire().await?;
        let query_str = "SELECT id, name FROM animes ORDER BY id";
        let rows = sqlx::query(query_str).fetch_all(&mut *conn).await.map_err(map_sqlx_error)?;
        rows.into_iter().map(Anime::try_from).collect()
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Anime>> {
        let mut conn = self.db.acquire().await?;
        let query_str = "SELECT id, name FROM animes WHERE name = $1 ORDER BY id";
        let rows = sqlx::query(query_str)
            .bind(name)
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        rows.into_iter().map(Anime::try_from).collect()
    }

    async fn find_by_id(&self, id: AnimeId) -> DbResult<Anime> {
        let mut conn = self.db.acquire().await?;
        let query_str = "SELECT id, name FROM animes WHERE id = $1";
        let row = sqlx::query(query_str)
            .bind(id.as_i64())
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Anime::try_from(row)
    }

    async fn create(&self, name: &AnimeName) -> DbResult<Anime> {
        let mut conn = self.db.acquire().await?;
        let query_str = "INSERT INTO animes (name) VALUES ($1) RETURNING id";
        let id: i64 = sqlx::query_scalar(query_str)
            .bind(name.as_str())
            .fetch_one(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Anime::new(AnimeId::new(id), name.clone()))
    }

    async fn save(&self, anime: &Anime) -> DbResult<()> {
        let mut conn = self.db.acquire().await?;
        let query_str = "UPDATE animes SET name = $1 WHERE id = $2";
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
        let query_str = "DELETE FROM animes WHERE id = $1";
        let done = sqlx::query(query_str)
            .bind(id.as_i64())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        expect_one_row(done.rows_affected())
    }
}
