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

//! API to list the books in the catalog.

use crate::driver::Driver;
use crate::model::{BookFilter, BookPage, Page, Pagination, PerPage};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use bookshelf_core::rest::{EmptyBody, RestError};
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Query parameters accepted by this API.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct ListBooksRequest {
    /// Page to return, starting at 1.
    #[serde(default)]
    pub(crate) page: Page,

    /// Maximum number of books per page.
    #[serde(default)]
    pub(crate) per_page: PerPage,

    /// Case-insensitive text to look for in the titles.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) search: Option<String>,

    /// Author to match exactly.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) author: Option<String>,

    /// Category to match exactly.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) category: Option<String>,
}

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    request: Result<Query<ListBooksRequest>, QueryRejection>,
    _: EmptyBody,
) -> Result<Json<BookPage>, RestError> {
    let Query(request) = request?;

    let filter = BookFilter::new(request.search, request.author, request.category);
    let pagination = Pagination { page: request.page, per_page: request.per_page };
    let page = driver.list_books(filter, pagination).await?;

    Ok(Json(page))
}
