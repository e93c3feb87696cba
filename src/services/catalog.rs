//! Catalog management service

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books by keyword; no keyword returns the whole catalog
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query.keyword.as_deref()).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: &CreateBook) -> AppResult<Book> {
        require_positive("buy_price", book.buy_price)?;
        require_positive("rent_price", book.rent_price)?;

        self.repository.books.create(book).await
    }

    /// Update an existing book (only provided fields)
    pub async fn update_book(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        // Check if book exists
        self.repository.books.get_by_id(id).await?;

        if let Some(price) = book.buy_price {
            require_positive("buy_price", price)?;
        }
        if let Some(price) = book.rent_price {
            require_positive("rent_price", price)?;
        }

        self.repository.books.update(id, book).await
    }
}

fn require_positive(field: &str, price: Decimal) -> AppResult<()> {
    if price <= Decimal::ZERO {
        return Err(AppError::Validation(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}
