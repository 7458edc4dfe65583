//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dates::optional_date;

/// Catalog author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub full_name: String,
    #[serde(default, with = "optional_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "optional_date")]
    pub death_date: Option<NaiveDate>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub wikipedia_url: Option<String>,
}

/// Create or update author request
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_lifespan"))]
pub struct AuthorForm {
    #[validate(length(min = 1, message = "Author name is required"))]
    pub full_name: String,
    #[serde(with = "optional_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(with = "optional_date")]
    pub death_date: Option<NaiveDate>,
    pub biography: Option<String>,
    #[validate(url(message = "Invalid Wikipedia link"))]
    pub wikipedia_url: Option<String>,
}

fn validate_lifespan(form: &AuthorForm) -> Result<(), validator::ValidationError> {
    match (form.birth_date, form.death_date) {
        (Some(born), Some(died)) if died < born => {
            let mut err = validator::ValidationError::new("death_date");
            err.message = Some("Death date precedes birth date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
