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

//! Operations on one book.

use crate::db;
use crate::driver::{Driver, duplicate_isbn, ensure_isbn_available, map_book_error};
use crate::model::*;
use bookshelf_core::db::DbError;
use bookshelf_core::driver::{DriverError, DriverResult};
use log::warn;

impl Driver {
    /// Gets the book identified by `id`.
    pub(crate) async fn get_book(self, id: BookId) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;
        let book = db::get_book(tx.ex(), &id).await.map_err(map_book_error)?;
        tx.commit().await?;
        Ok(book)
    }

    /// Applies the changes in `patch` to the book identified by `id` and returns the book as
    /// stored after the update.
    pub(crate) async fn update_book(self, id: BookId, patch: BookPatch) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;

        let book = db::get_book(tx.ex(), &id).await.map_err(map_book_error)?;

        if patch.is_empty() {
            return Err(DriverError::InvalidInput("No data to update".to_owned()));
        }

        if let Some(isbn) = patch.isbn.as_ref() {
            ensure_isbn_available(tx.ex(), isbn, Some(&id)).await?;
        }

        let book = patch.apply(book);
        match db::update_book(tx.ex(), &book).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => {
                warn!("Concurrent assignment of ISBN {} to another book", book.isbn().as_str());
                return Err(duplicate_isbn(book.isbn()));
            }
            Err(e) => return Err(map_book_error(e)),
        }

        let book = db::get_book(tx.ex(), &id).await.map_err(map_book_error)?;
        tx.commit().await?;
        Ok(book)
    }

    /// Deletes the book identified by `id`.
    pub(crate) async fn delete_book(self, id: BookId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        db::delete_book(tx.ex(), &id).await.map_err(map_book_error)?;
        tx.commit().await?;
        Ok(())
    }
}
