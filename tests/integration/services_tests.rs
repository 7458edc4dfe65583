use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use library_admin::{
    error::DomainError,
    models::IssueQuery,
    report::SortColumn,
    services::{exhibitions::ExhibitionSession, Services},
    AppConfig, AppError,
};

use crate::fake_backend::{backend, spawn};

async fn services() -> (Services, crate::fake_backend::Shared) {
    let (url, seen) = spawn().await;
    let services = Services::new(Arc::new(backend(&url)), &AppConfig::default());
    (services, seen)
}

fn order(session: &ExhibitionSession) -> Vec<&str> {
    session.order().book_ids().collect()
}

#[tokio::test]
async fn test_open_normalizes_backend_order() {
    let (services, _) = services().await;
    let session = services.exhibitions.open(7).await.unwrap();
    assert_eq!(order(&session), vec!["B1", "B3", "B2"]);
    let orders: Vec<u32> = session
        .order()
        .entries()
        .iter()
        .map(|e| e.display_order)
        .collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reorder_sends_book_orders() {
    let (services, seen) = services().await;
    let mut session = services.exhibitions.open(7).await.unwrap();
    services
        .exhibitions
        .reorder(&mut session, &["B2", "B1", "B3"])
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.saved_orders,
        vec![json!({
            "book_orders": [
                { "book_id": "B2", "display_order": 1 },
                { "book_id": "B1", "display_order": 2 },
                { "book_id": "B3", "display_order": 3 }
            ]
        })]
    );
}

#[tokio::test]
async fn test_failed_save_restores_last_saved_order() {
    let (services, seen) = services().await;
    let mut session = services.exhibitions.open(7).await.unwrap();
    seen.lock().unwrap().fail_next_save = true;

    let err = services
        .exhibitions
        .move_book(&mut session, "B2", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Api { status: 500, .. }));
    assert_eq!(order(&session), vec!["B1", "B3", "B2"]);

    services
        .exhibitions
        .move_book(&mut session, "B2", 0)
        .await
        .unwrap();
    assert_eq!(order(&session), vec!["B2", "B1", "B3"]);
}

#[tokio::test]
async fn test_remove_then_add_from_catalog() {
    let (services, seen) = services().await;
    let mut session = services.exhibitions.open(7).await.unwrap();

    services
        .exhibitions
        .remove_book(&mut session, "B3")
        .await
        .unwrap();
    assert_eq!(order(&session), vec!["B1", "B2"]);
    assert_eq!(seen.lock().unwrap().removed_books, vec![(7, "B3".to_string())]);

    let candidates = services
        .exhibitions
        .search_candidates(&session, "a")
        .await
        .unwrap();
    let ids: Vec<&str> = candidates.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["B9"]);

    let book = services.catalog.get_book("B9").await.unwrap();
    services
        .exhibitions
        .add_book(&mut session, book)
        .await
        .unwrap();
    assert_eq!(order(&session), vec!["B1", "B2", "B9"]);
    assert_eq!(session.books()[2].title, "The Cherry Orchard");
}

#[tokio::test]
async fn test_missing_exhibition() {
    let (services, _) = services().await;
    assert!(matches!(
        services.exhibitions.open(99).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_loans_flow() {
    let (services, _) = services().await;
    let loans = &services.loans;

    let view = loans.load(IssueQuery::default()).await.unwrap();
    // Newest first
    assert_eq!(view.issues[0].id, 2);

    let view = loans.resort(view, SortColumn::Id);
    assert_eq!(view.issues[0].id, 1);

    let err = loans.extend_issue(&view, 2).await.unwrap_err();
    assert_eq!(err.as_domain(), Some(DomainError::AlreadyReturned));

    let view = loans.extend_issue(&view, 1).await.unwrap();
    assert_eq!(view.issues.len(), 2);

    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let overdue = loans.overdue_report(&view, today);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].issue_id, 1);
    assert_eq!(overdue[0].days_overdue, 10);

    let csv = loans.export_csv(&view);
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains("War and Peace"));
}

#[tokio::test]
async fn test_saves_on_one_exhibition_do_not_overlap() {
    let (services, seen) = services().await;
    let mut first = services.exhibitions.open(7).await.unwrap();
    let mut second = services.exhibitions.open(7).await.unwrap();

    let (a, b) = tokio::join!(
        services.exhibitions.reorder(&mut first, &["B2", "B1", "B3"]),
        services.exhibitions.move_book(&mut second, "B1", 2),
    );
    a.unwrap();
    b.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.save_log, vec!["start", "end", "start", "end"]);
    assert_eq!(seen.saved_orders.len(), 2);
}
