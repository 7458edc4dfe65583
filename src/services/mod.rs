//! Business logic services

pub mod catalog;
pub mod exhibitions;
pub mod loans;

use std::sync::Arc;

use crate::{client::LibraryBackend, config::AppConfig};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub exhibitions: exhibitions::ExhibitionsService,
}

impl Services {
    /// Create all services on top of the given backend
    pub fn new(backend: Arc<dyn LibraryBackend>, config: &AppConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(backend.clone()),
            loans: loans::LoansService::new(backend.clone(), config.loan_policy()),
            exhibitions: exhibitions::ExhibitionsService::new(backend, config.exhibitions.max_books),
        }
    }
}
