//! Orders repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::order::{NewOrderItem, Order, OrderItem, OrderRow, PaymentStatus},
};

#[derive(Clone)]
pub struct OrdersRepository {
    pool: Pool<Postgres>,
}

impl OrdersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist an order and its line items in a single transaction.
    ///
    /// Either the order row and every item land together or nothing is
    /// written at all.
    pub async fn create(
        &self,
        user_id: i32,
        items: &[NewOrderItem],
        total: Decimal,
    ) -> AppResult<Order> {
        let mut tx = self.pool.begin().await?;

        let order_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO orders (user_id, total_amount, payment_status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(total)
        .bind(PaymentStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, book_id, book_title, book_author,
                                         transaction_type, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order_id)
            .bind(item.book_id)
            .bind(&item.book_title)
            .bind(&item.book_author)
            .bind(item.transaction_type)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_by_id(order_id).await
    }

    /// Get order by ID with its line items
    pub async fn get_by_id(&self, id: i32) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.user_id, u.email AS user_email, o.total_amount,
                   o.payment_status, o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order with id {} not found", id)))?;

        let items = self.items_for(id).await?;

        Ok(row.with_items(items))
    }

    /// List all orders, most recent first
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.user_id, u.email AS user_email, o.total_amount,
                   o.payment_status, o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List orders placed by one user, most recent first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.user_id, u.email AS user_email, o.total_amount,
                   o.payment_status, o.created_at
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.user_id = $1
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Set the payment status of an order
    pub async fn update_payment_status(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> AppResult<Order> {
        let result = sqlx::query("UPDATE orders SET payment_status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Order with id {} not found", id)));
        }

        self.get_by_id(id).await
    }

    /// Line items of one order, in insertion order.
    async fn items_for(&self, order_id: i32) -> AppResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, book_id, book_title, book_author, transaction_type, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn attach_items(&self, rows: Vec<OrderRow>) -> AppResult<Vec<Order>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            orders.push(row.with_items(items));
        }
        Ok(orders)
    }
}
