//! Exhibition model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::book::Book;
use super::dates::optional_date;
use crate::domain::exhibition::ExhibitionBookEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibition {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn active_by_default() -> bool {
    true
}

impl Exhibition {
    /// Active and within its date range on `today`
    pub fn is_running(&self, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        if matches!(self.start_date, Some(start) if today < start) {
            return false;
        }
        if matches!(self.end_date, Some(end) if today > end) {
            return false;
        }
        true
    }
}

/// Book shown in an exhibition
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExhibitionBook {
    #[serde(flatten)]
    pub book: Book,
    #[serde(default)]
    pub display_order: Option<u32>,
}

/// `GET /exhibitions/{id}` payload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExhibitionDetails {
    pub exhibition: Exhibition,
    #[serde(default)]
    pub books: Vec<ExhibitionBook>,
}

impl ExhibitionDetails {
    /// Ordering rows as the backend sent them. Books without an order
    /// keep their position in the response.
    pub fn order_rows(&self) -> Vec<ExhibitionBookEntry> {
        self.books
            .iter()
            .enumerate()
            .map(|(index, b)| ExhibitionBookEntry {
                book_id: b.book.id.clone(),
                display_order: b.display_order.unwrap_or(index as u32 + 1),
            })
            .collect()
    }
}

/// Create or update exhibition request
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_period"))]
pub struct ExhibitionForm {
    #[validate(length(min = 1, message = "Exhibition title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

fn validate_period(form: &ExhibitionForm) -> Result<(), validator::ValidationError> {
    match (form.start_date, form.end_date) {
        (Some(start), Some(end)) if start > end => {
            let mut err = validator::ValidationError::new("start_date");
            err.message = Some("Start date cannot be after end date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Add a book to an exhibition.
/// Without `display_order` the backend appends after its highest order.
#[derive(Debug, Clone, Serialize)]
pub struct AddExhibitionBook {
    pub book_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

/// Save the order of an exhibition's books
#[derive(Debug, Clone, Serialize)]
pub struct BookOrderUpdate {
    pub book_orders: Vec<ExhibitionBookEntry>,
}
