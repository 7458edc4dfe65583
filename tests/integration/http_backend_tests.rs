use chrono::NaiveDate;

use library_admin::{
    client::{BookQuery, HttpBackend, LibraryBackend},
    config::ApiConfig,
    domain::loan::LoanStatus,
    error::ErrorCode,
    models::{BookAuthors, CreateIssue, IssueFilter, IssueQuery},
    AppError,
};

use crate::fake_backend::{backend, spawn, TOKEN};

#[tokio::test]
async fn test_list_issues_decodes_rows() {
    let (url, seen) = spawn().await;
    let issues = backend(&url)
        .list_issues(&IssueQuery {
            status: IssueFilter::Active,
            search: Some("war".into()),
            customer_id: None,
        })
        .await
        .unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].status, LoanStatus::Outstanding);
    assert_eq!(issues[0].date_issued, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(issues[1].date_issued, NaiveDate::from_ymd_opt(2024, 1, 5));
    assert_eq!(issues[1].status, LoanStatus::Returned);

    let seen = seen.lock().unwrap();
    let query = &seen.issue_queries[0];
    assert_eq!(query.get("status").map(String::as_str), Some("active"));
    assert_eq!(query.get("search").map(String::as_str), Some("war"));
    assert!(!query.contains_key("customer_id"));
    assert_eq!(seen.authorization[0], format!("Bearer {}", TOKEN));
}

#[tokio::test]
async fn test_paginated_book_list() {
    let (url, seen) = spawn().await;
    let books = backend(&url)
        .list_books(&BookQuery {
            search: Some("chekhov".into()),
            available_only: true,
        })
        .await
        .unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].authors, BookAuthors::Legacy("Leo Tolstoy".into()));
    assert_eq!(books[1].authors.display_name().as_deref(), Some("Anton Chekhov"));
    assert_eq!(books[1].total_copies, 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.book_queries[0].get("available").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    let (url, _) = spawn().await;
    let err = backend(&url).get_book("B404").await.unwrap_err();
    assert!(matches!(&err, AppError::NotFound(message) if message == "Book not found"));
    assert_eq!(err.code(), ErrorCode::NoSuchData);
}

#[tokio::test]
async fn test_rejected_issue_carries_backend_message() {
    let (url, _) = spawn().await;
    let err = backend(&url)
        .create_issue(&CreateIssue {
            book_id: "B1".into(),
            customer_id: "C1".into(),
        })
        .await
        .unwrap_err();

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Book is not available");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_unsuccessful_body_is_an_error() {
    let (url, _) = spawn().await;
    let err = backend(&url).return_issue(1).await.unwrap_err();
    assert!(matches!(err, AppError::Api { status: 200, .. }));
}

#[tokio::test]
async fn test_successful_mutation() {
    let (url, _) = spawn().await;
    let message = backend(&url).extend_issue(1).await.unwrap();
    assert!(message.is_success());
    assert_eq!(message.message.as_deref(), Some("Issue extended"));
}

#[tokio::test]
async fn test_exhibition_details() {
    let (url, _) = spawn().await;
    let details = backend(&url).get_exhibition(7).await.unwrap();
    assert_eq!(details.exhibition.title, "Russian Classics");
    assert_eq!(details.books.len(), 3);
    assert_eq!(details.books[1].book.title, "War and Peace");
    assert_eq!(details.books[1].display_order, Some(1));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&ApiConfig {
        base_url: format!("http://{}/api", addr),
        token: None,
        timeout_secs: 2,
    })
    .unwrap();
    let err = backend.list_exhibitions().await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::BackendUnreachable);
}
