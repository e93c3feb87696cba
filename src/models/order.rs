//! Order and line-item models and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Transaction intent for one line item: purchase or rental.
///
/// The legacy wire values `buy`/`rent` are accepted on input; output is
/// always the canonical lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[serde(alias = "buy")]
    Purchase,
    #[serde(alias = "rent")]
    Rental,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Rental => "rental",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "purchase" | "buy" => Ok(TransactionType::Purchase),
            "rental" | "rent" => Ok(TransactionType::Rental),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

// SQLx conversion for TransactionType
impl sqlx::Type<Postgres> for TransactionType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for TransactionType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for TransactionType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Payment status of an order. Only two states exist; managers may toggle
/// between them in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

// SQLx conversion for PaymentStatus
impl sqlx::Type<Postgres> for PaymentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for PaymentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for PaymentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Persisted order line item.
///
/// Title, author and price are snapshotted at order time so later catalog
/// edits or deletions never change a historical order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    pub transaction_type: TransactionType,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
}

/// Order row as stored, without its line items
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub user_id: i32,
    pub user_email: String,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn with_items(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            user_email: self.user_email,
            total_amount: self.total_amount,
            payment_status: self.payment_status,
            created_at: self.created_at,
            items,
        }
    }
}

/// Full order aggregate with its line items, as returned on the wire
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub user_email: String,
    #[schema(value_type = String, example = "19.98")]
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// Line item assembled from a request, awaiting persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub book_id: i32,
    pub book_title: String,
    pub book_author: String,
    pub transaction_type: TransactionType,
    pub price: Decimal,
}

/// One line-item request inside a create-order body.
///
/// `transaction_type` stays a raw string here; the order service validates
/// it so that a bad intent rejects the batch instead of failing JSON
/// deserialization of the whole request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderItem {
    pub book_id: i32,
    /// "purchase" or "rental" (legacy "buy"/"rent" accepted)
    pub transaction_type: String,
}

/// Create order request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrder {
    pub items: Vec<CreateOrderItem>,
}

/// Update payment status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentStatus {
    /// "Pending" or "Paid"
    pub payment_status: String,
}
