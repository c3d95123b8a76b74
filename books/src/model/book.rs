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

//! The `Book` entity and its partial updates.

use crate::model::{Author, BookId, Category, Isbn, Title};
use derive_getters::Getters;
use derive_more::Constructor;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

/// A book in the catalog.
#[derive(Clone, Constructor, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct Book {
    /// Immutable identifier assigned at creation time.
    id: BookId,

    /// Title of the book.
    title: Title,

    /// Author of the book.
    author: Author,

    /// ISBN of the book, unique across the catalog.
    isbn: Isbn,

    /// Category the book belongs to.
    category: Category,
}

/// A set of changes to apply to an existing book.  Fields set to `None` are left untouched.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct BookPatch {
    /// New title, if any.
    pub(crate) title: Option<Title>,

    /// New author, if any.
    pub(crate) author: Option<Author>,

    /// New ISBN, if any.
    pub(crate) isbn: Option<Isbn>,

    /// New category, if any.
    pub(crate) category: Option<Category>,
}

impl BookPatch {
    /// Returns true if the patch does not change any field.
    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.category.is_none()
    }

    /// Merges the fields present in this patch onto `book`, returning the updated book.
    pub(crate) fn apply(self, book: Book) -> Book {
        let Book { id, title, author, isbn, category } = book;
        Book {
            id,
            title: self.title.unwrap_or(title),
            author: self.author.unwrap_or(author),
            isbn: self.isbn.unwrap_or(isbn),
            category: self.category.unwrap_or(category),
        }
    }
}
