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

//! Test utilities for the business layer.

use crate::db::{AnimeRepository, InMemoryAnimeRepository};
use crate::driver::Driver;
use crate::model::*;
use animes_core::db::DbError;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The repository backing the driver, for direct inspection.
    repo: Arc<InMemoryAnimeRepository>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes a driver with an empty in-memory catalog.
    pub(crate) async fn setup() -> Self {
        let repo = Arc::from(InMemoryAnimeRepository::default());
        let driver = Driver::new(repo.clone());
        Self { repo, driver }
    }

    /// Gets a copy of the driver.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates one anime per entry in `names`, bypassing the driver, and returns them.
    pub(crate) async fn create_all(&self, names: &[&'static str]) -> Vec<Anime> {
        let mut animes = vec![];
        for name in names {
            animes.push(self.repo.create(&AnimeName::from(*name)).await.unwrap());
        }
        animes
    }

    /// Gets the anime `id`, which must exist.
    pub(crate) async fn get(&self, id: AnimeId) -> Anime {
        self.repo.find_by_id(id).await.unwrap()
    }

    /// Returns true if the anime `id` exists.
    pub(crate) async fn exists(&self, id: AnimeId) -> bool {
        match self.repo.find_by_id(id).await {
            Ok(_) => true,
            Err(DbError::NotFound) => false,
            Err(e) => panic!("{:?}", e),
        }
    }
}
