//! Books repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
};

/// Read-only catalog lookup used during order assembly.
///
/// Split out as a trait so the order service can be exercised against an
/// in-memory catalog in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookSource: Send + Sync {
    /// Resolve a book by identifier; absent books are a `NotFound` error.
    async fn book_by_id(&self, id: i32) -> AppResult<Book>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books by keyword in title or author; no keyword returns the
    /// whole catalog.
    pub async fn search(&self, keyword: Option<&str>) -> AppResult<Vec<Book>> {
        let books = match keyword {
            Some(kw) if !kw.is_empty() => {
                sqlx::query_as::<_, Book>(
                    r#"
                    SELECT * FROM books
                    WHERE title ILIKE $1 OR author ILIKE $1
                    ORDER BY id
                    "#,
                )
                .bind(format!("%{}%", kw))
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(books)
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author, buy_price, rent_price,
                               available_for_purchase, available_for_rent)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.buy_price)
        .bind(book.rent_price)
        .bind(book.available_for_purchase.unwrap_or(true))
        .bind(book.available_for_rent.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an existing book (only provided fields)
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        // Build dynamic update query
        let mut sets = Vec::new();
        let mut param_idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(book.title, "title");
        add_field!(book.author, "author");
        add_field!(book.buy_price, "buy_price");
        add_field!(book.rent_price, "rent_price");
        add_field!(book.available_for_purchase, "available_for_purchase");
        add_field!(book.available_for_rent, "available_for_rent");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE books SET {} WHERE id = ${}",
            sets.join(", "),
            param_idx
        );

        let mut builder = sqlx::query(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(book.title);
        bind_field!(book.author);
        bind_field!(book.buy_price);
        bind_field!(book.rent_price);
        bind_field!(book.available_for_purchase);
        bind_field!(book.available_for_rent);

        let result = builder.bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        self.get_by_id(id).await
    }
}

#[async_trait]
impl BookSource for BooksRepository {
    async fn book_by_id(&self, id: i32) -> AppResult<Book> {
        self.get_by_id(id).await
    }
}
