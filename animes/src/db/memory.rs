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

//! Implementation of the anime repository in memory.

use crate::db::AnimeRepository;
use crate::model::*;
use animes_core::db::{DbError, DbResult};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mutable state of the in-memory repository.
#[derive(Default)]
struct Catalog {
    /// All animes keyed by their identifier.
    animes: BTreeMap<AnimeId, Anime>,

    /// Last identifier handed out to a new anime.
    last_id: i64,
}

/// An anime repository that keeps the whole catalog in memory.
#[derive(Default)]
pub(crate) struct InMemoryAnimeRepository {
    /// The catalog protected against concurrent access.
    catalog: Mutex<Catalog>,
}

/// Compares two animes according to the requested `sort`, breaking ties by identifier.
fn compare(sort: Option<&Sort>, a: &Anime, b: &Anime) -> Ordering {
    let Some(sort) = sort else {
        return a.id().cmp(b.id());
    };
    let ordering = match sort.field {
        SortField::Id => a.id().cmp(b.id()),
        SortField::Name => a.name().cmp(b.name()),
    };
    let ordering = match sort.direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id().cmp(b.id()))
}

#[async_trait]
impl AnimeRepository for InMemoryAnimeRepository {
    async fn find_all_paged(&self, spec: &PageSpec) -> DbResult<Page<Anime>> {
        let catalog = self.catalog.lock().await;

        let mut animes = catalog.animes.values().cloned().collect::<Vec<Anime>>();
        animes.sort_by(|a, b| compare(spec.sort.as_ref(), a, b));

        let offset = usize::try_from(spec.offset()).unwrap_or(usize::MAX);
        let content = animes.into_iter().skip(offset).take(spec.size as usize).collect();
        Ok(Page::new(content, spec, catalog.animes.len() as u64))
    }

    async fn find_all(&self) -> DbResult<Vec<Anime>> {
        let catalog = self.catalog.lock().await;
        Ok(catalog.animes.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Vec<Anime>> {
        let catalog = self.catalog.lock().await;
        Ok(catalog.animes.values().filter(|a| a.name().as_str() == name).cloned().collect())
    }

    async fn find_by_id(&self, id: AnimeId) -> DbResult<Anime> {
        let catalog = self.catalog.lock().await;
        catalog.animes.get(&id).cloned().ok_or(DbError::NotFound)
    }

    async fn create(&self, name: &AnimeName) -> DbResult<Anime> {
        let mut catalog = self.catalog.lock().await;
        catalog.last_id += 1;
        let anime = Anime::new(AnimeId::new(catalog.last_id), name.clone());
        catalog.animes.insert(*anime.id(), anime.clone());
        Ok(anime)
    }

    async fn save(&self, anime: &Anime) -> DbResult<()> {
        let mut catalog = self.catalog.lock().await;
        match catalog.animes.get_mut(anime.id()) {
            Some(existing) => {
                *existing = anime.clone();
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn delete(&self, id: AnimeId) -> DbResult<()> {
        let mut catalog = self.catalog.lock().await;
        catalog.animes.remove(&id).map(|_| ()).ok_or(DbError::NotFound)
    }
}
