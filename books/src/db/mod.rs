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

//! Database abstraction to manipulate the catalog of books.

use crate::model::{Author, Book, BookFilter, BookId, Category, Isbn, Pagination, Title};
#[cfg(feature = "postgres")]
use bookshelf_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use bookshelf_core::db::sqlite;
use bookshelf_core::db::{DbError, DbResult, Executor};
use futures::TryStreamExt;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Converts a count or a position computed in the model to the signed type used by the database.
fn to_db_i64(value: u64) -> DbResult<i64> {
    i64::try_from(value)
        .map_err(|_| DbError::BackendError(format!("Value {} does not fit in the database", value)))
}

/// Converts a count returned by the database to the unsigned type used in the model.
fn from_db_i64(value: i64) -> DbResult<u64> {
    u64::try_from(value)
        .map_err(|_| DbError::DataIntegrityError(format!("Invalid negative count {}", value)))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Book {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: uuid::Uuid = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
        let author: String = row.try_get("author").map_err(postgres::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(postgres::map_sqlx_error)?;
        let category: String = row.try_get("category").map_err(postgres::map_sqlx_error)?;

        Ok(Book::new(
            BookId::from(id),
            Title::new(title)?,
            Author::new(author)?,
            Isbn::new(isbn)?,
            Category::new(category)?,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Book {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
        let author: String = row.try_get("author").map_err(sqlite::map_sqlx_error)?;
        let isbn: String = row.try_get("isbn").map_err(sqlite::map_sqlx_error)?;
        let category: String = row.try_get("category").map_err(sqlite::map_sqlx_error)?;

        Ok(Book::new(
            BookId::new(&id)?,
            Title::new(title)?,
            Author::new(author)?,
            Isbn::new(isbn)?,
            Category::new(category)?,
        ))
    }
}

/// Persists a new `book`.
///
/// Fails with `AlreadyExists` if another book already has the same identifier or ISBN.
pub(crate) async fn create_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO books (id, title, author, isbn, category)
                VALUES ($1, $2, $3, $4, $5)";
            let done = sqlx::query(query_str)
                .bind(book.id().as_uuid())
                .bind(book.title().as_str())
                .bind(book.author().as_str())
                .bind(book.isbn().as_str())
                .bind(book.category().as_str())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO books (id, title, author, isbn, category)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(book.id().to_string())
                .bind(book.title().as_str())
                .bind(book.author().as_str())
                .bind(book.isbn().as_str())
                .bind(book.category().as_str())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets the book identified by `id`.
pub(crate) async fn get_book(ex: &mut Executor, id: &BookId) -> DbResult<Book> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM books WHERE id = $1";
            let raw_book = sqlx::query(query_str)
                .bind(id.as_uuid())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            match raw_book {
                Some(row) => Book::try_from(row),
                None => Err(DbError::NotFound),
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM books WHERE id = ?";
            let raw_book = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match raw_book {
                Some(row) => Book::try_from(row),
                None => Err(DbError::NotFound),
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the book that has the given `isbn`, if any.
pub(crate) async fn get_book_by_isbn(ex: &mut Executor, isbn: &Isbn) -> DbResult<Option<Book>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM books WHERE isbn = $1";
            let raw_book = sqlx::query(query_str)
                .bind(isbn.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            raw_book.map(Book::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM books WHERE isbn = ?";
            let raw_book = sqlx::query(query_str)
                .bind(isbn.as_str())
                .fetch_optional(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            raw_book.map(Book::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Overwrites all mutable fields of the stored book that has the same identifier as `book`.
///
/// Fails with `NotFound` if the book does not exist and with `AlreadyExists` if the new ISBN is
/// already in use by a different book.
pub(crate) async fn update_book(ex: &mut Executor, book: &Book) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE books SET title = $1, author = $2, isbn = $3, category = $4
                WHERE id = $5";
            let done = sqlx::query(query_str)
                .bind(book.title().as_str())
                .bind(book.author().as_str())
                .bind(book.isbn().as_str())
                .bind(book.category().as_str())
                .bind(book.id().as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE books SET title = ?, author = ?, isbn = ?, category = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(book.title().as_str())
                .bind(book.author().as_str())
                .bind(book.isbn().as_str())
                .bind(book.category().as_str())
                .bind(book.id().to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the book identified by `id`.
pub(crate) async fn delete_book(ex: &mut Executor, id: &BookId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM books WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.as_uuid())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM books WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Counts all books that match `filter`.
pub(crate) async fn count_books(ex: &mut Executor, filter: &BookFilter) -> DbResult<u64> {
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT COUNT(*) AS count FROM books
                WHERE ($1::TEXT IS NULL OR strpos(lower(title), lower($1)) > 0)
                    AND ($2::TEXT IS NULL OR author = $2)
                    AND ($3::TEXT IS NULL OR category = $3)";
            let row = sqlx::query(query_str)
                .bind(filter.search().as_deref())
                .bind(filter.author().as_deref())
                .bind(filter.category().as_deref())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("count").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            // SQLite's built-in lower() only folds ASCII letters so searches for accented
            // characters are case sensitive on this backend.
            let query_str = "
                SELECT COUNT(*) AS count FROM books
                WHERE (?1 IS NULL OR instr(lower(title), lower(?1)) > 0)
                    AND (?2 IS NULL OR author = ?2)
                    AND (?3 IS NULL OR category = ?3)";
            let row = sqlx::query(query_str)
                .bind(filter.search().as_deref())
                .bind(filter.author().as_deref())
                .bind(filter.category().as_deref())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("count").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    from_db_i64(count)
}

/// Lists the books that match `filter` within the window described by `pagination`.
///
/// Books are sorted by title and then by identifier so that consecutive pages never overlap.
pub(crate) async fn list_books(
    ex: &mut Executor,
    filter: &BookFilter,
    pagination: Pagination,
) -> DbResult<Vec<Book>> {
    let limit = to_db_i64(pagination.limit())?;
    let offset = to_db_i64(pagination.offset())?;

    let mut books = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM books
                WHERE ($1::TEXT IS NULL OR strpos(lower(title), lower($1)) > 0)
                    AND ($2::TEXT IS NULL OR author = $2)
                    AND ($3::TEXT IS NULL OR category = $3)
                ORDER BY title, id
                LIMIT $4 OFFSET $5";
            let mut rows = sqlx::query(query_str)
                .bind(filter.search().as_deref())
                .bind(filter.author().as_deref())
                .bind(filter.category().as_deref())
                .bind(limit)
                .bind(offset)
                .fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                books.push(Book::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            // Case folding is ASCII-only here too.  See count_books.
            let query_str = "
                SELECT * FROM books
                WHERE (?1 IS NULL OR instr(lower(title), lower(?1)) > 0)
                    AND (?2 IS NULL OR author = ?2)
                    AND (?3 IS NULL OR category = ?3)
                ORDER BY title, id
                LIMIT ?4 OFFSET ?5";
            let mut rows = sqlx::query(query_str)
                .bind(filter.search().as_deref())
                .bind(filter.author().as_deref())
                .bind(filter.category().as_deref())
                .bind(limit)
                .bind(offset)
                .fetch(&mut **ex);
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                books.push(Book::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(books)
}
