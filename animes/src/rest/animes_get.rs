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

//! API to get one page of the catalog.

use crate::driver::Driver;
use crate::model::*;
use animes_core::rest::{EmptyBody, FieldError, RestError, Validate, ValidQuery};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

/// Query parameters, following the conventions of Spring Data pagination.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct PageRequest {
    /// Zero-based page index.  Negative values are treated as zero.
    page: Option<i64>,

    /// Page size.  Values out of range are replaced by the default or clamped to the maximum.
    size: Option<i64>,

    /// Sort specification of the form `property[,asc|desc]`.
    sort: Option<String>,
}

impl Validate for PageRequest {
    type Valid = PageSpec;

    fn validate(self) -> Result<Self::Valid, Vec<FieldError>> {
        let page = u32::try_from(self.page.unwrap_or(0).max(0)).unwrap_or(u32::MAX);

        let size = match self.size {
            Some(size) if size >= 1 => {
                u32::try_from(size).unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE)
            }
            _ => DEFAULT_PAGE_SIZE,
        };

        let sort = match self.sort.as_deref() {
            None | Some("") => None,
            Some(sort) => match Sort::parse(sort) {
                Ok(sort) => Some(sort),
                Err(e) => return Err(vec![FieldError::new("sort", e.to_string())]),
            },
        };

        Ok(PageSpec { page, size, sort })
    }
}

/// Representation of a page of animes as returned to clients.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageResponse {
    /// The animes in this page.
    content: Vec<Anime>,

    /// Zero-based index of this page.
    number: u32,

    /// Requested page size.
    size: u32,

    /// Number of animes in the whole catalog.
    total_elements: u64,

    /// Number of pages in the whole catalog.
    total_pages: u64,

    /// Number of animes in this page.
    number_of_elements: usize,

    /// Whether this is the first page.
    first: bool,

    /// Whether this is the last page.
    last: bool,

    /// Whether this page has no animes.
    empty: bool,
}

impl From<Page<Anime>> for PageResponse {
    fn from(page: Page<Anime>) -> Self {
        let number = *page.number();
        let size = *page.size();
        let total_elements = *page.total_elements();
        let total_pages = page.total_pages();
        let first = page.is_first();
        let last = page.is_last();
        let content = page.into_content();
        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            number,
            size,
            total_elements,
            total_pages,
            first,
            last,
        }
    }
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    ValidQuery(spec): ValidQuery<PageRequest>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let page = driver.list_all(spec).await?;

    Ok(Json(PageResponse::from(page)))
}
