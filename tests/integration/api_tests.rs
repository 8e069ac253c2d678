//! API integration tests
//!
//! Need a running server on localhost:8080 with a migrated database and
//! `JWT_SECRET` matching the server's secret.

use catalog_server::models::{Permission, UserClaims};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Sign a token the way the identity service does
fn token(permissions: Vec<Permission>) -> String {
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me".to_string());
    UserClaims {
        sub: 1,
        username: "librarian".to_string(),
        permissions,
        exp: chrono::Utc::now().timestamp() + 3600,
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

fn librarian() -> String {
    token(vec![
        Permission::CanRenew,
        Permission::CanMarkReturned,
        Permission::CanEditAuthors,
        Permission::CanEditBooks,
    ])
}

fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}

/// Create a language and a book, returns the book id
async fn create_book(client: &Client, token: &str) -> i64 {
    let language: Value = client
        .post(format!("{}/languages", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": unique("Language") }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "The Left Hand of Darkness",
            "summary": "An envoy on the planet Gethen.",
            "isbn": "9780441478125",
            "language_id": language["id"],
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    book["id"].as_i64().expect("No book id in response")
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
async fn test_catalog_summary() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_i64());
    assert!(body["genres"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["per_page"], 10);
    assert!(body["items"].as_array().map(|items| items.len() <= 10).unwrap_or(false));
}

#[tokio::test]
#[ignore]
async fn test_edit_requires_token() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "first_name": "Ursula", "last_name": "Le Guin" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_edit_requires_permission() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(token(vec![Permission::CanRenew]))
        .json(&json!({ "first_name": "Ursula", "last_name": "Le Guin" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_author_lifespan_is_checked() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(librarian())
        .json(&json!({
            "first_name": "Ursula",
            "last_name": "Le Guin",
            "date_of_birth": "1929-10-21",
            "date_of_death": "1920-01-22",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_copy_transitions_from_available() {
    let client = Client::new();
    let token = librarian();
    let book_id = create_book(&client, &token).await;

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "Ace, 1969", "status": "available" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy: Value = response.json().await.expect("Failed to parse response");
    let copy_id = copy["id"].as_str().expect("No copy id in response").to_string();
    assert_eq!(copy["status"], "available");
    assert!(copy["due_back"].is_null());

    let response = client
        .post(format!("{}/copies/{}/return", BASE_URL, copy_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .bearer_auth(&token)
        .json(&json!({ "due_back": chrono::Local::now().date_naive() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidTransition");

    let response = client
        .get(format!("{}/copies/{}", BASE_URL, copy_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let details: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(details["status"], "available");
}

#[tokio::test]
#[ignore]
async fn test_copy_cannot_be_created_on_loan() {
    let client = Client::new();
    let token = librarian();
    let book_id = create_book(&client, &token).await;

    let response = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "Ace, 1969", "status": "on_loan" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_unknown_copy_is_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/copies/{}", BASE_URL, uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_my_loans() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .bearer_auth(token(vec![]))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_all_loans_requires_permission() {
    let client = Client::new();

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .bearer_auth(token(vec![Permission::CanRenew]))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_lend_renew_and_return() {
    let client = Client::new();
    let token = librarian();
    let book_id = create_book(&client, &token).await;
    let today = chrono::Local::now().date_naive();

    let copy: Value = client
        .post(format!("{}/books/{}/copies", BASE_URL, book_id))
        .bearer_auth(&token)
        .json(&json!({ "imprint": "Ace, 1969", "status": "available" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let copy_id = copy["id"].as_str().expect("No copy id in response").to_string();

    // The token holder (sub = 1) is the borrower
    let response = client
        .post(format!("{}/copies/{}/loan", BASE_URL, copy_id))
        .bearer_auth(&token)
        .json(&json!({ "borrower_id": 1, "due_back": today + chrono::Duration::days(21) }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["copy"]["status"], "on_loan");
    assert_eq!(body["copy"]["borrower_id"], 1);

    let mine: Value = client
        .get(format!("{}/loans/mine", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(mine["total"].as_i64().unwrap_or(0) >= 1);

    let latest = today + chrono::Duration::days(28);
    let response = client
        .post(format!("{}/copies/{}/renew", BASE_URL, copy_id))
        .bearer_auth(&token)
        .json(&json!({ "due_back": latest }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["copy"]["due_back"], json!(latest));

    let response = client
        .post(format!("{}/copies/{}/return", BASE_URL, copy_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["copy"]["status"], "available");
    assert!(body["copy"]["borrower_id"].is_null());
    assert!(body["copy"]["due_back"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_genre_is_conflict() {
    let client = Client::new();
    let token = librarian();
    let name = unique("Genre");

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_huge_page_is_empty() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?page={}", BASE_URL, i64::MAX))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["items"].as_array().map(|items| items.len()), Some(0));
}
