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

//! Operations that query the catalog.

use crate::driver::{Driver, map_anime_error};
use crate::model::*;
use animes_core::driver::DriverResult;

impl Driver {
    /// Gets the page of the catalog described by `spec`.
    pub(crate) async fn list_all(self, spec: PageSpec) -> DriverResult<Page<Anime>> {
        Ok(self.repo.find_all_paged(&spec).await?)
    }

    /// Gets the whole catalog.
    pub(crate) async fn list_all_non_pageable(self) -> DriverResult<Vec<Anime>> {
        Ok(self.repo.find_all().await?)
    }

    /// Gets all animes named exactly `name`.
    pub(crate) async fn find_by_name(self, name: &str) -> DriverResult<Vec<Anime>> {
        if name.is_empty() {
            return Ok(vec![]);
        }
        Ok(self.repo.find_by_name(name).await?)
    }

    /// Gets the anime identified by `id`, failing if it does not exist.
    pub(crate) async fn find_by_id_or_fail(self, id: AnimeId) -> DriverResult<Anime> {
        self.repo.find_by_id(id).await.map_err(map_anime_error)
    }
}
