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

//! Database abstraction in terms of the operations needed by the service.

use crate::model::*;
use animes_core::db::DbResult;
use async_trait::async_trait;

#[cfg(test)]
mod memory;
#[cfg(test)]
pub(crate) use memory::InMemoryAnimeRepository;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub(crate) use postgres::PostgresAnimeRepository;
#[cfg(test)]
mod sqlite;
#[cfg(test)]
pub(crate) use sqlite::SqliteAnimeRepository;

/// Operations to query and mutate the anime catalog.
#[async_trait]
pub(crate) trait AnimeRepository {
    /// Gets the page of animes described by `spec` and the size of the whole catalog.
    async fn find_all_paged(&self, spec: &PageSpec) -> DbResult<Page<Anime>>;

    /// Gets all animes sorted by identifier.
    async fn find_all(&self) -> DbResult<Vec<Anime>>;

    /// Gets all animes whose name is exactly `name`, sorted by identifier.
    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Anime>>;

    /// Gets the anime identified by `id`.
    async fn find_by_id(&self, id: AnimeId) -> DbResult<Anime>;

    /// Creates a new anime called `name` and returns it with its assigned identifier.
    async fn create(&self, name: &AnimeName) -> DbResult<Anime>;

    /// Overwrites the name of the existing `anime`.
    async fn save(&self, anime: &Anime) -> DbResult<()>;

    /// Deletes the anime identified by `id`.
    async fn delete(&self, id: AnimeId) -> DbResult<()>;
}

/// Returns the `ORDER BY` clause to use for listings sorted as `sort`.
///
/// Ties are always broken by identifier so that pagination is stable.
fn order_by(sort: Option<&Sort>) -> &'static str {
    match sort.map(|s| (s.field, s.direction)) {
        None | Some((SortField::Id, Direction::Asc)) => "ORDER BY id ASC",
        Some((SortField::Id, Direction::Desc)) => "ORDER BY id DESC",
        Some((SortField::Name, Direction::Asc)) => "ORDER BY name ASC, id ASC",
        Some((SortField::Name, Direction::Desc)) => "ORDER BY name DESC, id ASC",
    }
}

/// Converts the paging parameters in `spec` to the `LIMIT` and `OFFSET` values of a query.
fn limit_and_offset(spec: &PageSpec) -> (i64, i64) {
    let offset = i64::try_from(spec.offset()).unwrap_or(i64::MAX);
    (i64::from(spec.size), offset)
}
