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

//! Operations on the collection of books.

use crate::db;
use crate::driver::{Driver, duplicate_isbn, ensure_isbn_available, map_book_error};
use crate::model::*;
use bookshelf_core::db::DbError;
use bookshelf_core::driver::DriverResult;
use log::warn;

impl Driver {
    /// Gets the page of books described by `pagination` among those that match `filter`.
    pub(crate) async fn list_books(
        self,
        filter: BookFilter,
        pagination: Pagination,
    ) -> DriverResult<BookPage> {
        let mut tx = self.db.begin().await?;
        let total = db::count_books(tx.ex(), &filter).await?;
        let books = db::list_books(tx.ex(), &filter, pagination).await?;
        tx.commit().await?;
        Ok(BookPage::new(books, total, pagination))
    }

    /// Creates a new book with the given contents and returns it as stored.
    pub(crate) async fn create_book(
        self,
        title: Title,
        author: Author,
        isbn: Isbn,
        category: Category,
    ) -> DriverResult<Book> {
        let mut tx = self.db.begin().await?;

        ensure_isbn_available(tx.ex(), &isbn, None).await?;

        let book = Book::new(BookId::generate(), title, author, isbn, category);
        match db::create_book(tx.ex(), &book).await {
            Ok(()) => (),
            Err(DbError::AlreadyExists) => {
                warn!("Concurrent creation of a book with ISBN {}", book.isbn().as_str());
                return Err(duplicate_isbn(book.isbn()));
            }
            Err(e) => return Err(e.into()),
        }

        let book = db::get_book(tx.ex(), book.id()).await.map_err(map_book_error)?;
        tx.commit().await?;
        Ok(book)
    }
}
