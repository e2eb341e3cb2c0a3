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

//! High-level data types.

use animes_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// Maximum number of characters in an anime name, matching the width of the storage column.
pub(crate) const MAX_NAME_LENGTH: usize = 255;

/// Number of elements per page when the client does not ask for a valid size.
pub(crate) const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a client can ask for.
pub(crate) const MAX_PAGE_SIZE: u32 = 2000;

/// Storage-assigned identifier of an anime.
#[derive(Clone, Copy, Constructor, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Serialize)]
#[serde(transparent)]
pub(crate) struct AnimeId(i64);

impl AnimeId {
    /// Returns the identifier as a raw integer, ready to be stored.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

/// Name of an anime, guaranteed to be non-empty and to fit in the storage column.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct AnimeName(String);

impl AnimeName {
    /// Creates a new name after validating its contents.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("The name cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_NAME_LENGTH {
            return Err(ModelError(format!(
                "The name cannot be longer than {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AnimeName {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        AnimeName::new(s)
    }
}

impl From<AnimeName> for String {
    fn from(name: AnimeName) -> Self {
        name.0
    }
}

#[cfg(test)]
impl From<&'static str> for AnimeName {
    /// Creates a new name from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        AnimeName::new(s).expect("Hardcoded anime names must be valid")
    }
}

/// An entry in the anime catalog.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub(crate) struct Anime {
    /// Identifier assigned by the storage engine.
    id: AnimeId,

    /// Name of the anime.
    name: AnimeName,
}

/// Properties by which a listing of animes can be sorted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SortField {
    /// Sort by the identifier.
    Id,

    /// Sort by the name.
    Name,
}

/// Direction in which to sort a listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Direction {
    /// Smallest values first.
    Asc,

    /// Largest values first.
    Desc,
}

/// Ordering requested for a listing of animes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Sort {
    /// Property to sort by.
    pub(crate) field: SortField,

    /// Direction in which to sort the property.
    pub(crate) direction: Direction,
}

impl Sort {
    /// Parses a sort specification of the form `property[,asc|desc]`.
    ///
    /// The property name is case-sensitive but the direction is not.
    pub(crate) fn parse(spec: &str) -> ModelResult<Self> {
        let (field, direction) = match spec.split_once(',') {
            Some((field, direction)) => (field, Some(direction)),
            None => (spec, None),
        };

        let field = match field {
            "id" => SortField::Id,
            "name" => SortField::Name,
            _ => return Err(ModelError(format!("Unknown sort property '{}'", field))),
        };

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(ModelError(format!("Unknown sort direction '{}'", other)));
            }
        };

        Ok(Self { field, direction })
    }
}

/// Parameters to fetch a single page of a listing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PageSpec {
    /// Zero-based index of the page to fetch.
    pub(crate) page: u32,

    /// Maximum number of elements in the page, between 1 and `MAX_PAGE_SIZE`.
    pub(crate) size: u32,

    /// Ordering of the listing, or `None` to sort by identifier.
    pub(crate) sort: Option<Sort>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE, sort: None }
    }
}

impl PageSpec {
    /// Returns the number of elements that precede the requested page.
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// A bounded slice of a listing plus the information needed to navigate the rest of it.
#[derive(Debug, Getters, PartialEq)]
pub(crate) struct Page<T> {
    /// Elements in this page.
    content: Vec<T>,

    /// Zero-based index of this page.
    number: u32,

    /// Requested page size.
    size: u32,

    /// Number of elements in the whole listing.
    total_elements: u64,
}

impl<T> Page<T> {
    /// Creates a page holding `content` for the request described by `spec`.
    pub(crate) fn new(content: Vec<T>, spec: &PageSpec, total_elements: u64) -> Self {
        Self { content, number: spec.page, size: spec.size, total_elements }
    }

    /// Returns the number of pages needed to cover the whole listing.
    pub(crate) fn total_pages(&self) -> u64 {
        if self.size == 0 { 1 } else { self.total_elements.div_ceil(u64::from(self.size)) }
    }

    /// Returns true if this is the first page.
    pub(crate) fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Returns true if there are no pages after this one.
    pub(crate) fn is_last(&self) -> bool {
        u64::from(self.number) + 1 >= self.total_pages()
    }

    /// Consumes the page and returns its elements.
    pub(crate) fn into_content(self) -> Vec<T> {
        self.content
    }
}
