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

//! Types to filter and paginate the catalog.

use crate::model::Book;
use bookshelf_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Page number to return when none is requested.
const DEFAULT_PAGE: u32 = 1;

/// Page size to use when none is requested.
const DEFAULT_PER_PAGE: u32 = 10;

/// Largest page size that callers can request.
const MAX_PER_PAGE: u32 = 20;

/// A 1-based page number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Page(u32);

impl Page {
    /// Creates a new page number, making sure it is valid.
    pub(crate) fn new(page: u32) -> ModelResult<Self> {
        if page < 1 {
            return Err(ModelError("page must be greater than or equal to 1".to_owned()));
        }
        Ok(Self(page))
    }

    /// Returns the page number as an integer.
    #[cfg(test)]
    pub(crate) fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for Page {
    fn default() -> Self {
        Self(DEFAULT_PAGE)
    }
}

impl<'de> Deserialize<'de> for Page {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        Page::new(raw).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// The number of books to return per page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct PerPage(u32);

impl PerPage {
    /// Creates a new page size, making sure it is within the accepted range.
    pub(crate) fn new(per_page: u32) -> ModelResult<Self> {
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(ModelError(format!("per_page must be between 1 and {}", MAX_PER_PAGE)));
        }
        Ok(Self(per_page))
    }

    /// Returns the page size as an integer.
    #[cfg(test)]
    pub(crate) fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for PerPage {
    fn default() -> Self {
        Self(DEFAULT_PER_PAGE)
    }
}

impl<'de> Deserialize<'de> for PerPage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u32::deserialize(deserializer)?;
        PerPage::new(raw).map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}

/// The window of results to return from a listing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Pagination {
    /// The page to return.
    pub(crate) page: Page,

    /// The number of items in each page.
    pub(crate) per_page: PerPage,
}

impl Pagination {
    /// Returns the number of items to skip before the first item of the requested page.
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page.0 - 1) * u64::from(self.per_page.0)
    }

    /// Returns the maximum number of items in the requested page.
    pub(crate) fn limit(&self) -> u64 {
        u64::from(self.per_page.0)
    }
}

/// Criteria to select books from the catalog.  All present criteria must match.
#[derive(Clone, Debug, Default, Eq, Getters, PartialEq)]
pub(crate) struct BookFilter {
    /// Case-insensitive substring to look for in the title.
    search: Option<String>,

    /// Exact author to match.
    author: Option<String>,

    /// Exact category to match.
    category: Option<String>,
}

impl BookFilter {
    /// Creates a new filter.  Empty strings are treated as absent criteria.
    pub(crate) fn new(
        search: Option<String>,
        author: Option<String>,
        category: Option<String>,
    ) -> Self {
        /// Discards `s` if it is empty.
        fn non_empty(s: Option<String>) -> Option<String> {
            s.filter(|s| !s.is_empty())
        }

        Self { search: non_empty(search), author: non_empty(author), category: non_empty(category) }
    }
}

/// A page of books plus the metadata needed to navigate the rest of the listing.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct BookPage {
    /// The books in this page.
    books: Vec<Book>,

    /// Total number of books that match the filter, ignoring pagination.
    total: u64,

    /// The number of this page.
    page: Page,

    /// The maximum number of books per page.
    per_page: PerPage,

    /// Total number of pages.
    pages: u64,

    /// Whether there is a page after this one.
    has_next: bool,

    /// Whether there is a page before this one.
    has_prev: bool,
}

impl BookPage {
    /// Assembles the page at `pagination` that holds `books` out of `total` matching books.
    pub(crate) fn new(books: Vec<Book>, total: u64, pagination: Pagination) -> Self {
        let per_page = pagination.limit();
        Self {
            books,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            pages: total.div_ceil(per_page),
            has_next: pagination.offset() + per_page < total,
            has_prev: pagination.page.0 > 1,
        }
    }

    /// Returns the books in this page.
    #[cfg(test)]
    pub(crate) fn books(&self) -> &[Book] {
        &self.books
    }

    /// Returns the total number of matching books.
    #[cfg(test)]
    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Returns the total number of pages.
    #[cfg(test)]
    pub(crate) fn pages(&self) -> u64 {
        self.pages
    }

    /// Returns whether there are more pages after this one.
    #[cfg(test)]
    pub(crate) fn has_next(&self) -> bool {
        self.has_next
    }

    /// Returns whether there are pages before this one.
    #[cfg(test)]
    pub(crate) fn has_prev(&self) -> bool {
        self.has_prev
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_de_tokens, assert_de_tokens_error};

    /// Syntactic sugar to build a valid pagination.
    fn pagination(page: u32, per_page: u32) -> Pagination {
        Pagination { page: Page::new(page).unwrap(), per_page: PerPage::new(per_page).unwrap() }
    }

    #[test]
    fn test_page_validation() {
        assert_eq!(1, Page::default().as_u32());
        assert_eq!(7, Page::new(7).unwrap().as_u32());
        assert_eq!(
            ModelError("page must be greater than or equal to 1".to_owned()),
            Page::new(0).unwrap_err()
        );
    }

    #[test]
    fn test_per_page_validation() {
        assert_eq!(10, PerPage::default().as_u32());
        assert_eq!(1, PerPage::new(1).unwrap().as_u32());
        assert_eq!(20, PerPage::new(20).unwrap().as_u32());
        assert!(PerPage::new(0).is_err());
        assert_eq!(
            ModelError("per_page must be between 1 and 20".to_owned()),
            PerPage::new(21).unwrap_err()
        );
    }

    #[test]
    fn test_page_de() {
        assert_de_tokens(&Page::new(3).unwrap(), &[Token::U32(3)]);
        assert_de_tokens_error::<Page>(&[Token::U32(0)], "page must be greater than or equal to 1");
        assert_de_tokens_error::<PerPage>(&[Token::U32(50)], "per_page must be between 1 and 20");
    }

    #[test]
    fn test_pagination_window() {
        assert_eq!(0, pagination(1, 10).offset());
        assert_eq!(10, pagination(1, 10).limit());
        assert_eq!(40, pagination(3, 20).offset());
        assert_eq!(Pagination::default(), pagination(1, 10));
    }

    #[test]
    fn test_filter_ignores_empty_strings() {
        let filter =
            BookFilter::new(Some("".to_owned()), Some("Herbert".to_owned()), Some("".to_owned()));
        assert_eq!(&None, filter.search());
        assert_eq!(&Some("Herbert".to_owned()), filter.author());
        assert_eq!(&None, filter.category());
    }

    #[test]
    fn test_book_page_empty() {
        let page = BookPage::new(vec![], 0, pagination(1, 10));
        assert_eq!(0, page.total());
        assert_eq!(0, page.pages());
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn test_book_page_navigation() {
        let first = BookPage::new(vec![], 25, pagination(1, 10));
        assert_eq!(3, first.pages());
        assert!(first.has_next());
        assert!(!first.has_prev());

        let middle = BookPage::new(vec![], 25, pagination(2, 10));
        assert!(middle.has_next());
        assert!(middle.has_prev());

        let last = BookPage::new(vec![], 25, pagination(3, 10));
        assert!(!last.has_next());
        assert!(last.has_prev());

        let beyond = BookPage::new(vec![], 25, pagination(9, 10));
        assert_eq!(3, beyond.pages());
        assert!(!beyond.has_next());
        assert!(beyond.has_prev());
    }

    #[test]
    fn test_book_page_exact_multiple() {
        let page = BookPage::new(vec![], 20, pagination(2, 10));
        assert_eq!(2, page.pages());
        assert!(!page.has_next());
    }
}
