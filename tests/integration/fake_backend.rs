//! In-process stand-in for the library backend REST API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use library_admin::{client::HttpBackend, config::ApiConfig};

pub const TOKEN: &str = "secret-token";

/// What the fake backend received
#[derive(Default)]
pub struct Seen {
    pub authorization: Vec<String>,
    pub issue_queries: Vec<HashMap<String, String>>,
    pub book_queries: Vec<HashMap<String, String>>,
    pub saved_orders: Vec<Value>,
    pub removed_books: Vec<(i64, String)>,
    /// Make the next order save fail with a 500
    pub fail_next_save: bool,
    /// `start`/`end` marks of every order save, in arrival order
    pub save_log: Vec<&'static str>,
}

pub type Shared = Arc<Mutex<Seen>>;

fn record_auth(seen: &Shared, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    seen.lock().unwrap().authorization.push(value);
}

async fn list_issues(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record_auth(&seen, &headers);
    seen.lock().unwrap().issue_queries.push(query);
    Json(json!([
        {
            "id": 1,
            "book_id": "B1",
            "book_title": "War and Peace",
            "customer_id": "C1",
            "customer_name": "Anna",
            "date_issued": "2024-01-01",
            "date_return": null,
            "extended": false,
            "status": "issued"
        },
        {
            "id": 2,
            "book_id": "B2",
            "book_title": "Dead Souls",
            "customer_id": "C2",
            "customer_name": "Pavel",
            "date_issued": "2024-01-05T10:30:00Z",
            "date_return": "2024-01-20",
            "extended": true,
            "status": "returned"
        }
    ]))
}

async fn list_books(
    State(seen): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.lock().unwrap().book_queries.push(query);
    Json(json!({
        "books": [
            { "id": "B1", "title": "War and Peace", "author": "Leo Tolstoy", "total_copies": 2, "available_copies": 1 },
            { "id": "B9", "title": "The Cherry Orchard", "authors": [{ "id": 4, "full_name": "Anton Chekhov" }] }
        ],
        "total": 2
    }))
}

async fn get_book(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "B9" {
        (
            StatusCode::OK,
            Json(json!({ "id": "B9", "title": "The Cherry Orchard", "author": "Anton Chekhov" })),
        )
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "Book not found" })))
    }
}

async fn create_issue(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["book_id"] == "B1" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Book is not available" })),
        )
    } else {
        (StatusCode::CREATED, Json(json!({ "success": true, "message": "Book issued" })))
    }
}

async fn return_issue(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({ "success": false, "error": "Issue is already closed" }))
}

async fn extend_issue(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({ "success": true, "message": "Issue extended" }))
}

async fn get_exhibition(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id != 7 {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Exhibition not found" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "exhibition": {
                "id": 7,
                "title": "Russian Classics",
                "start_date": "2024-03-01",
                "end_date": null,
                "is_active": true
            },
            "books": [
                { "id": "B3", "title": "Oblomov", "display_order": 2 },
                { "id": "B1", "title": "War and Peace", "author": "Leo Tolstoy", "display_order": 1 },
                { "id": "B2", "title": "Dead Souls", "display_order": 5 }
            ]
        })),
    )
}

async fn toggle_exhibition(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!({ "success": true }))
}

async fn add_exhibition_book(Path(_id): Path<i64>, Json(_body): Json<Value>) -> Json<Value> {
    Json(json!({ "success": true, "message": "Book added" }))
}

async fn remove_exhibition_book(
    State(seen): State<Shared>,
    Path((id, book_id)): Path<(i64, String)>,
) -> Json<Value> {
    seen.lock().unwrap().removed_books.push((id, book_id));
    Json(json!({ "success": true }))
}

async fn save_book_order(
    State(seen): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_auth(&seen, &headers);
    let fail = {
        let mut seen = seen.lock().unwrap();
        seen.save_log.push("start");
        std::mem::take(&mut seen.fail_next_save)
    };

    // Long enough for an unserialized second save to arrive meanwhile
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut seen = seen.lock().unwrap();
    seen.save_log.push("end");
    if fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Database unavailable" })),
        );
    }
    seen.saved_orders.push(body);
    (StatusCode::OK, Json(json!({ "success": true })))
}

fn router(seen: Shared) -> Router {
    let api = Router::new()
        .route("/books", get(list_books))
        .route("/books/:id", get(get_book))
        .route("/issues", get(list_issues).post(create_issue))
        .route("/issues/:id/return", post(return_issue))
        .route("/issues/:id/extend", post(extend_issue))
        .route("/exhibitions/:id", get(get_exhibition))
        .route("/exhibitions/:id/toggle", post(toggle_exhibition))
        .route("/exhibitions/:id/books", post(add_exhibition_book))
        .route("/exhibitions/:id/books/order", put(save_book_order))
        .route("/exhibitions/:id/books/:book_id", delete(remove_exhibition_book))
        .with_state(seen);

    Router::new().nest("/api", api)
}

/// Start the fake backend on a free port and return its API base URL
pub async fn spawn() -> (String, Shared) {
    let seen = Shared::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(seen.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api/", addr), seen)
}

pub fn backend(base_url: &str) -> HttpBackend {
    HttpBackend::new(&ApiConfig {
        base_url: base_url.to_string(),
        token: Some(TOKEN.to_string()),
        timeout_secs: 5,
    })
    .unwrap()
}
