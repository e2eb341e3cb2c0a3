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

//! Business logic for the service.

use crate::db::AnimeRepository;
use animes_core::db::DbError;
use animes_core::driver::DriverError;
use std::sync::Arc;

mod anime;
mod animes;
#[cfg(test)]
pub(crate) mod testutils;

/// Message reported to clients when an operation targets an anime that does not exist.
const NOT_FOUND_MESSAGE: &str = "Anime not found";

/// Converts a database error into a driver error, naming the anime for missing entries.
fn map_anime_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(NOT_FOUND_MESSAGE.to_owned()),
        e => e.into(),
    }
}

/// Business logic.
///
/// The public operations exposed by the driver consume it to make it clear that each one is a
/// single, self-contained request.  Cloning the driver is cheap because the repository is shared.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The repository that the driver uses for persistence.
    repo: Arc<dyn AnimeRepository + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(repo: Arc<dyn AnimeRepository + Send + Sync>) -> Self {
        Self { repo }
    }
}
