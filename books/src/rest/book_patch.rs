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

//! API to partially update one book.

use crate::driver::Driver;
use crate::model::{Author, Book, BookId, BookPatch, Category, Isbn, Title};
use axum::Json;
use axum::extract::{Path, State};
use bookshelf_core::rest::RestError;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Message sent to the server to update a book.  Absent and null fields are left untouched.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct UpdateBookRequest {
    /// New title for the book.
    #[serde(default)]
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) title: Option<Title>,

    /// New author for the book.
    #[serde(default)]
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) author: Option<Author>,

    /// New ISBN for the book.
    #[serde(default)]
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) isbn: Option<Isbn>,

    /// New category for the book.
    #[serde(default)]
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) category: Option<Category>,
}

impl From<UpdateBookRequest> for BookPatch {
    fn from(request: UpdateBookRequest) -> Self {
        BookPatch {
            title: request.title,
            author: request.author,
            isbn: request.isbn,
            category: request.category,
        }
    }
}

/// PATCH handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookRequest>,
) -> Result<Json<Book>, RestError> {
    let id = BookId::new(&id)?;
    let book = driver.update_book(id, BookPatch::from(request)).await?;
    Ok(Json(book))
}
