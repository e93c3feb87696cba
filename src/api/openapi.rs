//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, orders};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstall API",
        version = "1.0.0",
        description = "Online bookstore REST API for browsing, ordering and payment tracking",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Books
        books::search_books,
        books::create_book,
        books::update_book,
        // Orders
        orders::create_order,
        orders::list_orders,
        orders::my_orders,
        orders::get_order,
        orders::update_payment,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::RegisterUser,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            // Orders
            crate::models::order::Order,
            crate::models::order::OrderItem,
            crate::models::order::TransactionType,
            crate::models::order::PaymentStatus,
            crate::models::order::CreateOrder,
            crate::models::order::CreateOrderItem,
            crate::models::order::UpdatePaymentStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog browsing and management"),
        (name = "orders", description = "Order placement and payment tracking")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
