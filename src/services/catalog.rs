//! Catalog management service: books, authors and customers

use std::sync::Arc;

use validator::Validate;

use crate::{
    client::{BookQuery, LibraryBackend},
    error::{AppError, AppResult},
    models::{ApiMessage, Author, AuthorForm, Book, BookForm, Customer, CustomerForm},
};

#[derive(Clone)]
pub struct CatalogService {
    backend: Arc<dyn LibraryBackend>,
}

impl CatalogService {
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self { backend }
    }

    /// Search books by title, author or ISBN
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.backend.list_books(query).await
    }

    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.backend.get_book(id).await
    }

    pub async fn create_book(&self, book: &BookForm) -> AppResult<ApiMessage> {
        book.validate()?;
        let result = self.backend.create_book(book).await?;
        tracing::info!("Created book {}", book.id);
        Ok(result)
    }

    pub async fn update_book(&self, book: &BookForm) -> AppResult<ApiMessage> {
        book.validate()?;
        let result = self.backend.update_book(book).await?;
        tracing::info!("Updated book {}", book.id);
        Ok(result)
    }

    pub async fn delete_book(&self, id: &str) -> AppResult<ApiMessage> {
        let result = self.backend.delete_book(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(result)
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.backend.list_authors().await
    }

    pub async fn create_author(&self, author: &AuthorForm) -> AppResult<ApiMessage> {
        author.validate()?;
        let result = self.backend.create_author(author).await?;
        tracing::info!("Created author {}", author.full_name);
        Ok(result)
    }

    pub async fn update_author(&self, id: i64, author: &AuthorForm) -> AppResult<ApiMessage> {
        author.validate()?;
        self.backend.update_author(id, author).await
    }

    pub async fn delete_author(&self, id: i64) -> AppResult<ApiMessage> {
        let result = self.backend.delete_author(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(result)
    }

    /// Customers matching `search` (all of them when empty)
    pub async fn search_customers(&self, search: &str) -> AppResult<Vec<Customer>> {
        self.backend.list_customers(search.trim()).await
    }

    pub async fn get_customer(&self, id: &str) -> AppResult<Customer> {
        self.backend.get_customer(id).await
    }

    pub async fn create_customer(&self, customer: &CustomerForm) -> AppResult<ApiMessage> {
        customer.validate()?;
        let result = self.backend.create_customer(customer).await?;
        tracing::info!("Created customer {}", customer.name);
        Ok(result)
    }

    pub async fn update_customer(&self, id: &str, customer: &CustomerForm) -> AppResult<ApiMessage> {
        customer.validate()?;
        if let Some(form_id) = &customer.id {
            if form_id != id {
                return Err(AppError::BadRequest(format!(
                    "Customer id {} does not match {}",
                    form_id, id
                )));
            }
        }
        self.backend.update_customer(id, customer).await
    }

    pub async fn delete_customer(&self, id: &str) -> AppResult<ApiMessage> {
        let result = self.backend.delete_customer(id).await?;
        tracing::info!("Deleted customer {}", id);
        Ok(result)
    }
}
