//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::order::TransactionType;

/// Book model from database.
///
/// Availability flags are display hints for the storefront; order placement
/// does not consult them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[schema(value_type = String, example = "15.99")]
    pub buy_price: Decimal,
    #[schema(value_type = String, example = "3.99")]
    pub rent_price: Decimal,
    pub available_for_purchase: bool,
    pub available_for_rent: bool,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Unit price for the given transaction intent: the buy price for a
    /// purchase, the rent price for a rental.
    pub fn price_for(&self, transaction_type: TransactionType) -> Decimal {
        match transaction_type {
            TransactionType::Purchase => self.buy_price,
            TransactionType::Rental => self.rent_price,
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    /// Price for buying the book (must be positive)
    #[schema(value_type = String, example = "15.99")]
    pub buy_price: Decimal,
    /// Price for renting the book (must be positive)
    #[schema(value_type = String, example = "3.99")]
    pub rent_price: Decimal,
    pub available_for_purchase: Option<bool>,
    pub available_for_rent: Option<bool>,
}

/// Update book request (all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    #[schema(value_type = Option<String>)]
    pub buy_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub rent_price: Option<Decimal>,
    pub available_for_purchase: Option<bool>,
    pub available_for_rent: Option<bool>,
}

/// Book search query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Keyword matched against title or author; empty returns the whole catalog
    pub keyword: Option<String>,
}
