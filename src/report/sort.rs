//! Column sorting of the issues table

use std::cmp::Ordering;

use crate::domain::loan::LoanPolicy;
use crate::models::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    BookTitle,
    CustomerName,
    DateIssued,
    DueDate,
    DateReturn,
    Status,
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortColumn::Id),
            "book" | "book_title" => Ok(SortColumn::BookTitle),
            "customer" | "customer_name" => Ok(SortColumn::CustomerName),
            "issued" | "date_issued" => Ok(SortColumn::DateIssued),
            "due" | "due_date" => Ok(SortColumn::DueDate),
            "returned" | "date_return" => Ok(SortColumn::DateReturn),
            "status" => Ok(SortColumn::Status),
            other => Err(format!("unknown sort column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort of the issues table. Newest issues first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::DateIssued,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Clicking the current column flips the direction, another column
    /// starts ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                column,
                direction: SortDirection::Asc,
            }
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare(a: &Issue, b: &Issue, column: SortColumn, policy: &LoanPolicy) -> Ordering {
    // `None < Some(_)`: rows without a date lead in ascending order
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::BookTitle => compare_text(&a.book_title, &b.book_title),
        SortColumn::CustomerName => compare_text(&a.customer_name, &b.customer_name),
        SortColumn::DateIssued => a.date_issued.cmp(&b.date_issued),
        SortColumn::DueDate => policy
            .due_date(a.date_issued, a.extended)
            .cmp(&policy.due_date(b.date_issued, b.extended)),
        SortColumn::DateReturn => a.date_return.cmp(&b.date_return),
        SortColumn::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

/// Stable sort of `issues` in place
pub fn sort_issues(issues: &mut [Issue], state: SortState, policy: &LoanPolicy) {
    issues.sort_by(|a, b| {
        let ordering = compare(a, b, state.column, policy);
        match state.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
