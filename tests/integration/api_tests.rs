//! API integration tests
//!
//! These run against a live server with the seed data loaded:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Log in as the seeded manager account and return its token
async fn manager_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a fresh customer account and return its token
async fn customer_token(client: &Client) -> String {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": format!("reader{}", suffix),
            "email": format!("reader{}@example.com", suffix),
            "password": "secret99"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["role"], "manager");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_duplicate_username() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": "admin",
            "email": "somebody@example.com",
            "password": "secret99"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_registered_accounts_are_customers() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "customer");
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = manager_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_search_requires_authentication() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_search_books_without_keyword_returns_catalog() {
    let client = Client::new();
    let token = manager_token(&client).await;

    let response = client
        .get(format!("{}/books/search", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("Expected an array of books");
    assert!(!books.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_search_books_matches_title_and_author() {
    let client = Client::new();
    let token = manager_token(&client).await;

    let response = client
        .get(format!("{}/books/search?keyword=orwell", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("Expected an array of books");
    assert!(books
        .iter()
        .any(|b| b["author"] == "George Orwell" && b["title"] == "1984"));
}

#[tokio::test]
#[ignore]
async fn test_create_book_requires_manager() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Unauthorized Book",
            "author": "Nobody",
            "buy_price": "10.00",
            "rent_price": "2.00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_create_and_update_book() {
    let client = Client::new();
    let token = manager_token(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Fahrenheit 451",
            "author": "Ray Bradbury",
            "buy_price": "13.49",
            "rent_price": "2.79"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["id"].as_i64().expect("No book ID");
    assert_eq!(body["buy_price"], "13.49");
    assert_eq!(body["available_for_purchase"], true);

    // Partial update: only the rent price changes
    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "rent_price": "2.99" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["rent_price"], "2.99");
    assert_eq!(body["title"], "Fahrenheit 451");
}

#[tokio::test]
#[ignore]
async fn test_place_order_and_read_it_back() {
    let client = Client::new();
    let token = customer_token(&client).await;

    // Book 2 is the seeded "1984": buy 14.99, rent 3.49
    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "items": [
                { "book_id": 2, "transaction_type": "purchase" },
                { "book_id": 2, "transaction_type": "rental" }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["id"].as_i64().expect("No order ID");
    assert_eq!(body["payment_status"], "Pending");
    assert_eq!(body["total_amount"], "18.48");

    let items = body["items"].as_array().expect("Expected items array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["transaction_type"], "purchase");
    assert_eq!(items[0]["price"], "14.99");
    assert_eq!(items[0]["book_title"], "1984");
    assert_eq!(items[1]["transaction_type"], "rental");
    assert_eq!(items[1]["price"], "3.49");

    // Owner reads the order back unchanged
    let response = client
        .get(format!("{}/orders/{}", BASE_URL, order_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["total_amount"], "18.48");
    assert_eq!(fetched["payment_status"], "Pending");
    assert_eq!(fetched["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_place_order_accepts_legacy_intent_names() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "items": [ { "book_id": 1, "transaction_type": "buy" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"][0]["transaction_type"], "purchase");
    assert_eq!(body["items"][0]["price"], "15.99");
}

#[tokio::test]
#[ignore]
async fn test_empty_order_is_rejected() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_book_aborts_order_without_persisting() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "items": [
                { "book_id": 1, "transaction_type": "purchase" },
                { "book_id": 999999, "transaction_type": "purchase" }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    // Nothing of the batch was committed for this fresh account
    let response = client
        .get(format!("{}/orders/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_invalid_intent_aborts_order_without_persisting() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "items": [ { "book_id": 1, "transaction_type": "subscribe" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/orders/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_order_list_requires_manager() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .get(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_manager_lists_orders_newest_first() {
    let client = Client::new();
    let customer = customer_token(&client).await;

    let mut created_ids = Vec::new();
    for _ in 0..2 {
        let response = client
            .post(format!("{}/orders", BASE_URL))
            .header("Authorization", format!("Bearer {}", customer))
            .json(&json!({
                "items": [ { "book_id": 3, "transaction_type": "rental" } ]
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Failed to parse response");
        created_ids.push(body["id"].as_i64().expect("No order ID"));
    }

    let manager = manager_token(&client).await;
    let response = client
        .get(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", manager))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let orders = body.as_array().expect("Expected an array of orders");

    // The later of the two orders comes back before the earlier one
    let position = |id: i64| {
        orders
            .iter()
            .position(|o| o["id"].as_i64() == Some(id))
            .expect("Created order missing from list")
    };
    assert!(position(created_ids[1]) < position(created_ids[0]));
}

#[tokio::test]
#[ignore]
async fn test_my_orders_shows_only_own_orders() {
    let client = Client::new();
    let token = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "items": [ { "book_id": 6, "transaction_type": "purchase" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["id"].as_i64().unwrap();

    let response = client
        .get(format!("{}/orders/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let orders = body.as_array().expect("Expected an array of orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"].as_i64(), Some(order_id));
    assert_eq!(orders[0]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_customers_cannot_read_other_orders() {
    let client = Client::new();
    let owner = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", owner))
        .json(&json!({
            "items": [ { "book_id": 1, "transaction_type": "rental" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["id"].as_i64().unwrap();

    let stranger = customer_token(&client).await;
    let response = client
        .get(format!("{}/orders/{}", BASE_URL, order_id))
        .header("Authorization", format!("Bearer {}", stranger))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_update_payment_status_is_manager_only_and_idempotent() {
    let client = Client::new();
    let customer = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", customer))
        .json(&json!({
            "items": [ { "book_id": 4, "transaction_type": "purchase" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["id"].as_i64().unwrap();

    // Customers may not settle payments
    let response = client
        .put(format!("{}/orders/{}/payment", BASE_URL, order_id))
        .header("Authorization", format!("Bearer {}", customer))
        .json(&json!({ "payment_status": "Paid" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    let manager = manager_token(&client).await;

    // Applying Paid twice leaves the same observable state
    for _ in 0..2 {
        let response = client
            .put(format!("{}/orders/{}/payment", BASE_URL, order_id))
            .header("Authorization", format!("Bearer {}", manager))
            .json(&json!({ "payment_status": "Paid" }))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["payment_status"], "Paid");
    }
}

#[tokio::test]
#[ignore]
async fn test_unknown_payment_status_is_rejected() {
    let client = Client::new();
    let customer = customer_token(&client).await;

    let response = client
        .post(format!("{}/orders", BASE_URL))
        .header("Authorization", format!("Bearer {}", customer))
        .json(&json!({
            "items": [ { "book_id": 5, "transaction_type": "rental" } ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let order_id = body["id"].as_i64().unwrap();

    let manager = manager_token(&client).await;
    let response = client
        .put(format!("{}/orders/{}/payment", BASE_URL, order_id))
        .header("Authorization", format!("Bearer {}", manager))
        .json(&json!({ "payment_status": "Refunded" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Stored status is unchanged
    let response = client
        .get(format!("{}/orders/{}", BASE_URL, order_id))
        .header("Authorization", format!("Bearer {}", manager))
        .send()
        .await
        .expect("Failed to send request");

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["payment_status"], "Pending");
}

#[tokio::test]
#[ignore]
async fn test_payment_update_on_missing_order_is_404() {
    let client = Client::new();
    let manager = manager_token(&client).await;

    let response = client
        .put(format!("{}/orders/999999/payment", BASE_URL))
        .header("Authorization", format!("Bearer {}", manager))
        .json(&json!({ "payment_status": "Paid" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
