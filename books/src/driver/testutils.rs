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

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use bookshelf_core::db::{Db, Executor};
use std::sync::Arc;

/// State of a running driver test.
pub(crate) struct TestContext {
    /// Database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver on top of a fresh in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(bookshelf_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    /// Returns a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Runs the raw `sql` statements against the database, bypassing the driver.
    pub(crate) async fn run_sql(&self, sql: &str) {
        match self.ex().await {
            Executor::Sqlite(mut ex) => {
                bookshelf_core::db::sqlite::run_schema(&mut ex, sql).await.unwrap()
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Returns a copy of the driver, which is consumed by every operation.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Inserts a book directly into the database, bypassing the driver.
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
        db::create_book(&mut self.ex().await, &book).await.unwrap();
        book
    }
}
