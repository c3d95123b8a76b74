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

use crate::model::{BookId, Isbn};
use bookshelf_core::db::{Db, DbError, Executor};
use bookshelf_core::driver::{DriverError, DriverResult};
use std::sync::Arc;

mod book;
mod books;
#[cfg(test)]
mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

/// Converts a database error into a driver error, giving a book-specific message to misses.
fn map_book_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound("Book not found".to_owned()),
        e => e.into(),
    }
}

/// Builds the error returned when `isbn` is already assigned to another book.
fn duplicate_isbn(isbn: &Isbn) -> DriverError {
    DriverError::AlreadyExists(format!("Book with ISBN '{}' already exists", isbn.as_str()))
}

/// Fails if `isbn` is assigned to a book other than `except`.
async fn ensure_isbn_available(
    ex: &mut Executor,
    isbn: &Isbn,
    except: Option<&BookId>,
) -> DriverResult<()> {
    match crate::db::get_book_by_isbn(ex, isbn).await? {
        Some(other) if Some(other.id()) != except => Err(duplicate_isbn(isbn)),
        _ => Ok(()),
    }
}
