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

//! Database tests shared by all implementations.

use crate::db::*;
use crate::model::*;
use bookshelf_core::db::Db;
use std::sync::Arc;

/// Syntactic sugar to instantiate a book with a fresh identifier.
fn make_book(
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    category: &'static str,
) -> Book {
    Book::new(
        BookId::generate(),
        Title::from(title),
        Author::from(author),
        Isbn::from(isbn),
        Category::from(category),
    )
}

/// Syntactic sugar to build a pagination window.
fn window(page: u32, per_page: u32) -> Pagination {
    Pagination { page: Page::new(page).unwrap(), per_page: PerPage::new(per_page).unwrap() }
}

/// Syntactic sugar to build a filter from hardcoded strings.
fn filter(
    search: Option<&'static str>,
    author: Option<&'static str>,
    category: Option<&'static str>,
) -> BookFilter {
    BookFilter::new(
        search.map(str::to_owned),
        author.map(str::to_owned),
        category.map(str::to_owned),
    )
}

/// Extracts the titles of `books` for easier comparisons.
fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|b| b.title().as_str()).collect()
}

async fn test_create_and_get(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "9780441013593", "Sci-Fi");
    create_book(&mut ex, &book).await.unwrap();

    assert_eq!(book, get_book(&mut ex, book.id()).await.unwrap());
}

async fn test_get_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_book(&mut ex, &make_book("Dune", "Frank Herbert", "1", "Sci-Fi")).await.unwrap();

    assert_eq!(DbError::NotFound, get_book(&mut ex, &BookId::generate()).await.unwrap_err());
}

async fn test_create_duplicate_isbn(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    create_book(&mut ex, &book).await.unwrap();

    let other = make_book("Emma", "Jane Austen", "123", "Classics");
    assert_eq!(DbError::AlreadyExists, create_book(&mut ex, &other).await.unwrap_err());

    assert_eq!(book, get_book(&mut ex, book.id()).await.unwrap());
    assert_eq!(DbError::NotFound, get_book(&mut ex, other.id()).await.unwrap_err());
}

async fn test_get_book_by_isbn(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    create_book(&mut ex, &book).await.unwrap();

    assert_eq!(Some(book), get_book_by_isbn(&mut ex, &Isbn::from("123")).await.unwrap());
    assert_eq!(None, get_book_by_isbn(&mut ex, &Isbn::from("1234")).await.unwrap());
}

async fn test_update_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    let other = make_book("Emma", "Jane Austen", "456", "Classics");
    create_book(&mut ex, &book).await.unwrap();
    create_book(&mut ex, &other).await.unwrap();

    let patch = BookPatch {
        title: Some(Title::from("Dune Messiah")),
        isbn: Some(Isbn::from("789")),
        ..Default::default()
    };
    let updated = patch.apply(book.clone());
    update_book(&mut ex, &updated).await.unwrap();

    assert_eq!(updated, get_book(&mut ex, book.id()).await.unwrap());
    assert_eq!(other, get_book(&mut ex, other.id()).await.unwrap());
    assert_eq!(None, get_book_by_isbn(&mut ex, &Isbn::from("123")).await.unwrap());
}

async fn test_update_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    assert_eq!(DbError::NotFound, update_book(&mut ex, &book).await.unwrap_err());
}

async fn test_update_duplicate_isbn(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    let other = make_book("Emma", "Jane Austen", "456", "Classics");
    create_book(&mut ex, &book).await.unwrap();
    create_book(&mut ex, &other).await.unwrap();

    let patch = BookPatch { isbn: Some(Isbn::from("456")), ..Default::default() };
    assert_eq!(
        DbError::AlreadyExists,
        update_book(&mut ex, &patch.apply(book.clone())).await.unwrap_err()
    );

    assert_eq!(book, get_book(&mut ex, book.id()).await.unwrap());
}

async fn test_delete_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    let other = make_book("Emma", "Jane Austen", "456", "Classics");
    create_book(&mut ex, &book).await.unwrap();
    create_book(&mut ex, &other).await.unwrap();

    delete_book(&mut ex, book.id()).await.unwrap();

    assert_eq!(DbError::NotFound, get_book(&mut ex, book.id()).await.unwrap_err());
    assert_eq!(other, get_book(&mut ex, other.id()).await.unwrap());
}

async fn test_delete_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, delete_book(&mut ex, &BookId::generate()).await.unwrap_err());
}

async fn test_count_and_list_filters(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    for book in [
        make_book("Dune", "Frank Herbert", "1", "Sci-Fi"),
        make_book("Dune Messiah", "Frank Herbert", "2", "Sci-Fi"),
        make_book("The Dunwich Horror", "H. P. Lovecraft", "3", "Horror"),
        make_book("Emma", "Jane Austen", "4", "Classics"),
        make_book("Persuasion", "Jane Austen", "5", "Classics"),
    ] {
        create_book(&mut ex, &book).await.unwrap();
    }

    let cases = [
        (filter(None, None, None), vec![
            "Dune",
            "Dune Messiah",
            "Emma",
            "Persuasion",
            "The Dunwich Horror",
        ]),
        (filter(Some("dun"), None, None), vec!["Dune", "Dune Messiah", "The Dunwich Horror"]),
        (filter(Some("MESSIAH"), None, None), vec!["Dune Messiah"]),
        (filter(Some("Herbert"), None, None), vec![]),
        (filter(None, Some("Jane Austen"), None), vec!["Emma", "Persuasion"]),
        (filter(None, Some("jane austen"), None), vec![]),
        (filter(None, Some("Jane"), None), vec![]),
        (filter(None, None, Some("Sci-Fi")), vec!["Dune", "Dune Messiah"]),
        (filter(Some("dun"), None, Some("Horror")), vec!["The Dunwich Horror"]),
        (filter(Some("dun"), Some("Jane Austen"), None), vec![]),
        (filter(Some(""), Some(""), Some("")), vec![
            "Dune",
            "Dune Messiah",
            "Emma",
            "Persuasion",
            "The Dunwich Horror",
        ]),
    ];
    for (filter, exp_titles) in cases {
        let books = list_books(&mut ex, &filter, window(1, 20)).await.unwrap();
        assert_eq!(exp_titles, titles(&books), "Filter was {:?}", filter);
        assert_eq!(
            exp_titles.len() as u64,
            count_books(&mut ex, &filter).await.unwrap(),
            "Filter was {:?}",
            filter
        );
    }
}

async fn test_list_pagination(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    for (title, isbn) in [("C", "3"), ("A", "1"), ("E", "5"), ("B", "2"), ("D", "4")] {
        let book = Book::new(
            BookId::generate(),
            Title::from(title),
            Author::from("Someone"),
            Isbn::from(isbn),
            Category::from("Misc"),
        );
        create_book(&mut ex, &book).await.unwrap();
    }

    let all = BookFilter::default();
    assert_eq!(5, count_books(&mut ex, &all).await.unwrap());
    assert_eq!(vec!["A", "B"], titles(&list_books(&mut ex, &all, window(1, 2)).await.unwrap()));
    assert_eq!(vec!["C", "D"], titles(&list_books(&mut ex, &all, window(2, 2)).await.unwrap()));
    assert_eq!(vec!["E"], titles(&list_books(&mut ex, &all, window(3, 2)).await.unwrap()));
    assert!(list_books(&mut ex, &all, window(4, 2)).await.unwrap().is_empty());
}

async fn test_list_same_title_is_stable(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let mut ids = vec![];
    for isbn in ["1", "2", "3", "4"] {
        let book = make_book("Untitled", "Anonymous", isbn, "Misc");
        create_book(&mut ex, &book).await.unwrap();
        ids.push(*book.id());
    }

    let all = BookFilter::default();
    let mut seen = vec![];
    for page in 1..=4 {
        let books = list_books(&mut ex, &all, window(page, 1)).await.unwrap();
        assert_eq!(1, books.len());
        seen.push(*books[0].id());
    }
    let mut exp_ids = seen.clone();
    exp_ids.sort();
    exp_ids.dedup();
    assert_eq!(4, exp_ids.len(), "Pages returned duplicate books");
    ids.sort();
    assert_eq!(ids, exp_ids);
}

async fn test_tx_rollback_discards_book(db: Arc<dyn Db + Send + Sync>) {
    let book = make_book("Dune", "Frank Herbert", "123", "Sci-Fi");
    {
        let mut tx = db.begin().await.unwrap();
        create_book(tx.ex(), &book).await.unwrap();
    }

    let mut ex = db.ex().await.unwrap();
    assert_eq!(DbError::NotFound, get_book(&mut ex, book.id()).await.unwrap_err());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta])? ) => {
        bookshelf_core::db::testutils::generate_tests!(
            $( #[$extra], )?
            $setup,
            $crate::db::tests,
            test_create_and_get,
            test_get_not_found,
            test_create_duplicate_isbn,
            test_get_book_by_isbn,
            test_update_ok,
            test_update_not_found,
            test_update_duplicate_isbn,
            test_delete_ok,
            test_delete_not_found,
            test_count_and_list_filters,
            test_list_pagination,
            test_list_same_title_is_stable,
            test_tx_rollback_discards_book
        );
    }
];

use generate_db_tests;

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use bookshelf_core::db::postgres::testutils;

    /// Connects to the test database and initializes the schema.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = Arc::from(testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        setup().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );

    /// Assumes a database created with a UTF-8 locale so that `lower()` knows about accents.
    #[tokio::test]
    #[ignore = "Requires environment configuration and is expensive"]
    async fn test_search_folds_non_ascii_case() {
        let db = setup().await;
        let mut ex = db.ex().await.unwrap();

        create_book(&mut ex, &make_book("Élan Vital", "Henri Bergson", "1", "Philosophy"))
            .await
            .unwrap();

        let search = filter(Some("élan"), None, None);
        let books = list_books(&mut ex, &search, window(1, 20)).await.unwrap();
        assert_eq!(vec!["Élan Vital"], titles(&books));
        assert_eq!(1, count_books(&mut ex, &search).await.unwrap());
    }
}

mod sqlite {
    use super::*;
    use bookshelf_core::db::sqlite::testutils;

    /// Creates an in-memory database and initializes the schema.
    async fn setup() -> Arc<dyn Db + Send + Sync> {
        let db = Arc::from(testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(setup().await);

    #[tokio::test]
    async fn test_search_only_folds_ascii_case() {
        let db = setup().await;
        let mut ex = db.ex().await.unwrap();

        create_book(&mut ex, &make_book("Élan Vital", "Henri Bergson", "1", "Philosophy"))
            .await
            .unwrap();

        let search = filter(Some("VITAL"), None, None);
        assert_eq!(1, count_books(&mut ex, &search).await.unwrap());

        let search = filter(Some("élan"), None, None);
        assert_eq!(0, count_books(&mut ex, &search).await.unwrap());
        assert!(list_books(&mut ex, &search, window(1, 20)).await.unwrap().is_empty());
    }
}
