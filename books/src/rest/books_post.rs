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

//! API to add a book to the catalog.

use crate::driver::Driver;
use crate::model::{Author, Book, Category, Isbn, Title};
use axum::extract::State;
use axum::{Json, http};
use bookshelf_core::rest::RestError;
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;

/// Message sent to the server to create a book.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct CreateBookRequest {
    /// Title of the new book.
    pub(crate) title: Title,

    /// Author of the new book.
    pub(crate) author: Author,

    /// ISBN of the new book, which must not be in use by any other book.
    pub(crate) isbn: Isbn,

    /// Category of the new book.
    pub(crate) category: Category,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<CreateBookRequest>,
) -> Result<(http::StatusCode, Json<Book>), RestError> {
    let book =
        driver.create_book(request.title, request.author, request.isbn, request.category).await?;
    Ok((http::StatusCode::CREATED, Json(book)))
}
