//! Data models exchanged with the library backend

pub mod author;
pub mod book;
pub mod customer;
pub mod dates;
pub mod exhibition;
pub mod issue;

use serde::Deserialize;

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{AuthorRef, Book, BookAuthors, BookForm};
pub use customer::{Customer, CustomerForm};
pub use exhibition::{Exhibition, ExhibitionDetails, ExhibitionForm};
pub use issue::{CreateIssue, Issue, IssueFilter, IssueQuery};

/// Envelope of every mutating endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub exhibition_id: Option<i64>,
}

impl ApiMessage {
    /// Without a `success` flag, the absence of `error` decides
    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(self.error.is_none())
    }
}
