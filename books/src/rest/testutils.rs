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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use bookshelf_core::db::{Db, DbError};
use std::sync::Arc;

/// State of a running REST test.
pub(crate) struct TestContext {
    /// Database backing the app, for direct access to its contents.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app on top of a fresh in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(bookshelf_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Returns a handle to the app for a single request.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Inserts a book directly into the database and returns it.
    pub(crate) async fn insert_book(
        &self,
        title: &'static str,
        author: &'static str,
        isbn: &'static str,
        category: &'static str,
    ) -> Book {
        let book = Book::new(
            BookId::generate(),
            Title::from(title),
            Author::from(author),
            Isbn::from(isbn),
            Category::from(category),
        );
        db::create_book(&mut self.db.ex().await.unwrap(), &book).await.unwrap();
        book
    }

    /// Fetches the book `id` straight from the database.
    pub(crate) async fn get_book(&self, id: &BookId) -> Option<Book> {
        match db::get_book(&mut self.db.ex().await.unwrap(), id).await {
            Ok(book) => Some(book),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Counts all books in the database.
    pub(crate) async fn count_books(&self) -> u64 {
        db::count_books(&mut self.db.ex().await.unwrap(), &BookFilter::default()).await.unwrap()
    }
}
