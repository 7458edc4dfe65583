//! reqwest implementation of [`LibraryBackend`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{BookQuery, LibraryBackend};
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{
        book::BookList,
        exhibition::{AddExhibitionBook, BookOrderUpdate},
        ApiMessage, Author, AuthorForm, Book, BookForm, CreateIssue, Customer, CustomerForm,
        Exhibition, ExhibitionDetails, ExhibitionForm, Issue, IssueQuery,
    },
};

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body, turning error statuses into
    /// [`AppError`]s that carry the backend's message
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.error.or(m.message))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        tracing::warn!("Backend answered {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            Err(AppError::NotFound(message))
        } else {
            Err(AppError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Like [`send`](Self::send) for mutating endpoints: a 2xx answer with
    /// `success: false` is still a rejection
    async fn mutate(&self, builder: RequestBuilder) -> AppResult<ApiMessage> {
        let message: ApiMessage = self.send(builder).await?;
        if message.is_success() {
            Ok(message)
        } else {
            let reason = message
                .error
                .or(message.message)
                .unwrap_or_else(|| "Request rejected".to_string());
            tracing::warn!("Backend rejected request: {}", reason);
            Err(AppError::Api {
                status: StatusCode::OK.as_u16(),
                message: reason,
            })
        }
    }
}

#[async_trait]
impl LibraryBackend for HttpBackend {
    async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut builder = self.request(Method::GET, "/books");
        if let Some(search) = &query.search {
            builder = builder.query(&[("search", search)]);
        }
        if query.available_only {
            builder = builder.query(&[("available", "true")]);
        }
        let list: BookList = self.send(builder).await?;
        Ok(list.into_books())
    }

    async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.send(self.request(Method::GET, &format!("/books/{}", id)))
            .await
    }

    async fn create_book(&self, book: &BookForm) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, "/books").json(book))
            .await
    }

    async fn update_book(&self, book: &BookForm) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::PUT, &format!("/books/{}", book.id))
                .json(book),
        )
        .await
    }

    async fn delete_book(&self, id: &str) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::DELETE, &format!("/books/{}", id)))
            .await
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.send(self.request(Method::GET, "/authors")).await
    }

    async fn create_author(&self, author: &AuthorForm) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, "/authors").json(author))
            .await
    }

    async fn update_author(&self, id: i64, author: &AuthorForm) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::PUT, &format!("/authors/{}", id))
                .json(author),
        )
        .await
    }

    async fn delete_author(&self, id: i64) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::DELETE, &format!("/authors/{}", id)))
            .await
    }

    async fn list_customers(&self, search: &str) -> AppResult<Vec<Customer>> {
        let mut builder = self.request(Method::GET, "/customers");
        if !search.is_empty() {
            builder = builder.query(&[("search", search)]);
        }
        self.send(builder).await
    }

    async fn get_customer(&self, id: &str) -> AppResult<Customer> {
        self.send(self.request(Method::GET, &format!("/customers/{}", id)))
            .await
    }

    async fn create_customer(&self, customer: &CustomerForm) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, "/customers").json(customer))
            .await
    }

    async fn update_customer(&self, id: &str, customer: &CustomerForm) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::PUT, &format!("/customers/{}", id))
                .json(customer),
        )
        .await
    }

    async fn delete_customer(&self, id: &str) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::DELETE, &format!("/customers/{}", id)))
            .await
    }

    async fn list_issues(&self, query: &IssueQuery) -> AppResult<Vec<Issue>> {
        let mut builder = self
            .request(Method::GET, "/issues")
            .query(&[("status", query.status.as_str())]);
        if let Some(search) = &query.search {
            builder = builder.query(&[("search", search)]);
        }
        if let Some(customer_id) = &query.customer_id {
            builder = builder.query(&[("customer_id", customer_id)]);
        }
        self.send(builder).await
    }

    async fn create_issue(&self, issue: &CreateIssue) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, "/issues").json(issue))
            .await
    }

    async fn return_issue(&self, id: i64) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, &format!("/issues/{}/return", id)))
            .await
    }

    async fn extend_issue(&self, id: i64) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, &format!("/issues/{}/extend", id)))
            .await
    }

    async fn list_exhibitions(&self) -> AppResult<Vec<Exhibition>> {
        self.send(self.request(Method::GET, "/exhibitions")).await
    }

    async fn get_exhibition(&self, id: i64) -> AppResult<ExhibitionDetails> {
        self.send(self.request(Method::GET, &format!("/exhibitions/{}", id)))
            .await
    }

    async fn create_exhibition(&self, exhibition: &ExhibitionForm) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, "/exhibitions").json(exhibition))
            .await
    }

    async fn update_exhibition(&self, id: i64, exhibition: &ExhibitionForm) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::PUT, &format!("/exhibitions/{}", id))
                .json(exhibition),
        )
        .await
    }

    async fn delete_exhibition(&self, id: i64) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::DELETE, &format!("/exhibitions/{}", id)))
            .await
    }

    async fn toggle_exhibition(&self, id: i64) -> AppResult<ApiMessage> {
        self.mutate(self.request(Method::POST, &format!("/exhibitions/{}/toggle", id)))
            .await
    }

    async fn add_exhibition_book(&self, id: i64, book: &AddExhibitionBook) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::POST, &format!("/exhibitions/{}/books", id))
                .json(book),
        )
        .await
    }

    async fn remove_exhibition_book(&self, id: i64, book_id: &str) -> AppResult<ApiMessage> {
        self.mutate(self.request(
            Method::DELETE,
            &format!("/exhibitions/{}/books/{}", id, book_id),
        ))
        .await
    }

    async fn save_book_order(&self, id: i64, order: &BookOrderUpdate) -> AppResult<ApiMessage> {
        self.mutate(
            self.request(Method::PUT, &format!("/exhibitions/{}/books/order", id))
                .json(order),
        )
        .await
    }
}
