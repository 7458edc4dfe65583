//! Issue (book loan) model as exchanged with the backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::optional_date;
use crate::domain::loan::{LoanRecord, LoanStatus};

/// Loan row listed by the issues screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub book_id: String,
    #[serde(default)]
    pub book_title: String,
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, with = "optional_date")]
    pub date_issued: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub date_return: Option<NaiveDate>,
    #[serde(default)]
    pub extended: bool,
    #[serde(default = "default_status")]
    pub status: LoanStatus,
}

fn default_status() -> LoanStatus {
    LoanStatus::Outstanding
}

impl Issue {
    /// Lifecycle view of this issue
    pub fn record(&self) -> LoanRecord {
        LoanRecord {
            id: self.id,
            issue_date: self.date_issued,
            return_date: self.date_return,
            extended: self.extended,
            status: self.status,
        }
    }
}

/// Status filter of the issues list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueFilter {
    #[default]
    All,
    Active,
}

impl IssueFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueFilter::All => "all",
            IssueFilter::Active => "active",
        }
    }
}

impl std::str::FromStr for IssueFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(IssueFilter::All),
            "active" | "issued" => Ok(IssueFilter::Active),
            other => Err(format!("unknown issue filter: {}", other)),
        }
    }
}

/// Query for the issues list
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub status: IssueFilter,
    pub search: Option<String>,
    pub customer_id: Option<String>,
}

/// Issue a book to a customer
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssue {
    pub book_id: String,
    pub customer_id: String,
}
