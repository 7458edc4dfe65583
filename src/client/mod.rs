//! Access to the library backend REST API

pub mod http;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        exhibition::{AddExhibitionBook, BookOrderUpdate},
        ApiMessage, Author, AuthorForm, Book, BookForm, CreateIssue, Customer, CustomerForm,
        Exhibition, ExhibitionDetails, ExhibitionForm, Issue, IssueQuery,
    },
};

pub use http::HttpBackend;

/// Book list query
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    pub search: Option<String>,
    pub available_only: bool,
}

/// Operations the backend offers to the admin screens.
///
/// The backend owns all persisted state; every method is one round-trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    // Books
    async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: &str) -> AppResult<Book>;
    async fn create_book(&self, book: &BookForm) -> AppResult<ApiMessage>;
    async fn update_book(&self, book: &BookForm) -> AppResult<ApiMessage>;
    async fn delete_book(&self, id: &str) -> AppResult<ApiMessage>;

    // Authors
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn create_author(&self, author: &AuthorForm) -> AppResult<ApiMessage>;
    async fn update_author(&self, id: i64, author: &AuthorForm) -> AppResult<ApiMessage>;
    async fn delete_author(&self, id: i64) -> AppResult<ApiMessage>;

    // Customers
    async fn list_customers(&self, search: &str) -> AppResult<Vec<Customer>>;
    async fn get_customer(&self, id: &str) -> AppResult<Customer>;
    async fn create_customer(&self, customer: &CustomerForm) -> AppResult<ApiMessage>;
    async fn update_customer(&self, id: &str, customer: &CustomerForm) -> AppResult<ApiMessage>;
    async fn delete_customer(&self, id: &str) -> AppResult<ApiMessage>;

    // Issues
    async fn list_issues(&self, query: &IssueQuery) -> AppResult<Vec<Issue>>;
    async fn create_issue(&self, issue: &CreateIssue) -> AppResult<ApiMessage>;
    async fn return_issue(&self, id: i64) -> AppResult<ApiMessage>;
    async fn extend_issue(&self, id: i64) -> AppResult<ApiMessage>;

    // Exhibitions
    async fn list_exhibitions(&self) -> AppResult<Vec<Exhibition>>;
    async fn get_exhibition(&self, id: i64) -> AppResult<ExhibitionDetails>;
    async fn create_exhibition(&self, exhibition: &ExhibitionForm) -> AppResult<ApiMessage>;
    async fn update_exhibition(&self, id: i64, exhibition: &ExhibitionForm) -> AppResult<ApiMessage>;
    async fn delete_exhibition(&self, id: i64) -> AppResult<ApiMessage>;
    async fn toggle_exhibition(&self, id: i64) -> AppResult<ApiMessage>;
    async fn add_exhibition_book(&self, id: i64, book: &AddExhibitionBook) -> AppResult<ApiMessage>;
    async fn remove_exhibition_book(&self, id: i64, book_id: &str) -> AppResult<ApiMessage>;
    async fn save_book_order(&self, id: i64, order: &BookOrderUpdate) -> AppResult<ApiMessage>;
}
