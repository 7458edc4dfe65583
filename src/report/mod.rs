//! Issues history: table sorting, CSV export, overdue report

pub mod csv;
pub mod overdue;
pub mod sort;

pub use csv::{export_csv, export_file_name};
pub use overdue::{overdue_report, IssueStatistics, OverdueRow};
pub use sort::{sort_issues, SortColumn, SortDirection, SortState};
