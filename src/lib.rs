//! Library administration client
//!
//! Loan tracking, exhibition curation and catalog maintenance on top of the
//! library backend REST API.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod report;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
