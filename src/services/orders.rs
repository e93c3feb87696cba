//! Order placement and payment tracking service

use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::order::{CreateOrder, CreateOrderItem, NewOrderItem, Order, PaymentStatus, TransactionType},
    repository::{books::BookSource, Repository},
    services::notifier::NotifierService,
};

#[derive(Clone)]
pub struct OrdersService {
    repository: Repository,
    notifier: NotifierService,
}

impl OrdersService {
    pub fn new(repository: Repository, notifier: NotifierService) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Place an order: resolve and price every requested line, then persist
    /// the order and its items as one atomic unit.
    ///
    /// Any failure while assembling rejects the whole batch; nothing is
    /// written unless every line resolves.
    pub async fn place_order(&self, user_id: i32, request: &CreateOrder) -> AppResult<Order> {
        if request.items.is_empty() {
            return Err(AppError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        // Token identity may outlive the account row
        self.repository.users.get_by_id(user_id).await?;

        let (items, total) = assemble(&self.repository.books, &request.items).await?;

        let order = self.repository.orders.create(user_id, &items, total).await?;

        // Receipt delivery happens off the request path and never affects
        // the committed order
        self.notifier.enqueue_receipt(&order);

        Ok(order)
    }

    /// List all orders, most recent first
    pub async fn list_all(&self) -> AppResult<Vec<Order>> {
        self.repository.orders.list_all().await
    }

    /// List orders placed by one user, most recent first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Order>> {
        self.repository.orders.list_for_user(user_id).await
    }

    /// Get order by ID
    pub async fn get_order(&self, id: i32) -> AppResult<Order> {
        self.repository.orders.get_by_id(id).await
    }

    /// Set the payment status of an order. Repeating a status is a no-op.
    pub async fn update_payment_status(&self, id: i32, raw_status: &str) -> AppResult<Order> {
        let status: PaymentStatus = raw_status.parse().map_err(|_| {
            AppError::Validation("payment_status must be \"Pending\" or \"Paid\"".to_string())
        })?;

        self.repository.orders.update_payment_status(id, status).await
    }
}

/// Resolve every requested line against the catalog, snapshotting title,
/// author and price at order time, and compute the exact total.
async fn assemble(
    catalog: &dyn BookSource,
    requests: &[CreateOrderItem],
) -> AppResult<(Vec<NewOrderItem>, Decimal)> {
    let mut items = Vec::with_capacity(requests.len());
    let mut total = Decimal::ZERO;

    for request in requests {
        let book = catalog.book_by_id(request.book_id).await?;

        let transaction_type: TransactionType = request.transaction_type.parse().map_err(|_| {
            AppError::Validation("Transaction type must be \"purchase\" or \"rental\"".to_string())
        })?;

        let price = book.price_for(transaction_type);
        total += price;

        items.push(NewOrderItem {
            book_id: book.id,
            book_title: book.title,
            book_author: book.author,
            transaction_type,
            price,
        });
    }

    Ok((items, total))
}
