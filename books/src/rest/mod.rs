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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;
use tower_http::cors::CorsLayer;

mod book_delete;
mod book_get;
mod book_patch;
mod books_get;
mod books_post;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;

    let books = get(books_get::handler).post(books_post::handler);
    Router::new()
        .route("/api/v1/books/", books.clone())
        .route("/api/v1/books", books)
        .route(
            "/api/v1/books/:id",
            get(book_get::handler).patch(book_patch::handler).delete(book_delete::handler),
        )
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
