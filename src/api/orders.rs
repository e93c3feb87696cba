//! Order endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::order::{CreateOrder, Order, UpdatePaymentStatus},
};

use super::AuthenticatedUser;

/// Place an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Empty order or invalid transaction type"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "A requested book does not exist")
    )
)]
pub async fn create_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let order = state
        .services
        .orders
        .place_order(claims.user_id, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List all orders, newest first
#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders", body = [Order]),
        (status = 403, description = "Manager access required")
    )
)]
pub async fn list_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Order>>> {
    claims.require_manager()?;

    let orders = state.services.orders.list_all().await?;
    Ok(Json(orders))
}

/// List the authenticated customer's own orders, newest first
#[utoipa::path(
    get,
    path = "/orders/mine",
    tag = "orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own orders", body = [Order]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_orders(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.services.orders.list_for_user(claims.user_id).await?;
    Ok(Json(orders))
}

/// Get one order
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = Order),
        (status = 403, description = "Not the owner and not a manager"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Order>> {
    let order = state.services.orders.get_order(id).await?;

    // Customers may only read their own orders
    if order.user_id != claims.user_id {
        claims.require_manager()?;
    }

    Ok(Json(order))
}

/// Update payment status of an order
#[utoipa::path(
    put,
    path = "/orders/{id}/payment",
    tag = "orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Order ID")
    ),
    request_body = UpdatePaymentStatus,
    responses(
        (status = 200, description = "Payment status updated", body = Order),
        (status = 400, description = "Unknown payment status"),
        (status = 403, description = "Manager access required"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_payment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePaymentStatus>,
) -> AppResult<Json<Order>> {
    claims.require_manager()?;

    let order = state
        .services
        .orders
        .update_payment_status(id, &request.payment_status)
        .await?;

    Ok(Json(order))
}
