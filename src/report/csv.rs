//! CSV export of the issues history

use chrono::NaiveDate;

use crate::domain::loan::LoanPolicy;
use crate::models::dates::format_calendar_date;
use crate::models::Issue;

/// Byte-order mark so spreadsheet tools pick UTF-8
pub const BOM: char = '\u{FEFF}';

pub const HEADER: [&str; 7] = [
    "ID",
    "Book",
    "Customer",
    "IssueDate",
    "DueDate",
    "ReturnDate",
    "Status",
];

/// Quote a field when it holds a separator, a quote or a line break
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render `issues` in their current order
pub fn export_csv(issues: &[Issue], policy: &LoanPolicy) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&HEADER.join(","));

    for issue in issues {
        let due = policy
            .due_date(issue.date_issued, issue.extended)
            .map(format_calendar_date)
            .unwrap_or_else(|| "unknown".to_string());
        let fields = [
            issue.id.to_string(),
            issue.book_title.clone(),
            issue.customer_name.clone(),
            issue.date_issued.map(format_calendar_date).unwrap_or_default(),
            due,
            issue.date_return.map(format_calendar_date).unwrap_or_default(),
            issue.status.to_string(),
        ];
        out.push('\n');
        out.push_str(&row(&fields));
    }

    out
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("issues_history_{}.csv", format_calendar_date(today))
}
