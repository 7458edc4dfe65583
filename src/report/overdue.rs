//! Overdue report and loan statistics

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::loan::{days_borrowed, LoanPolicy, LoanStatus};
use crate::models::dates::optional_date;
use crate::models::Issue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueRow {
    pub issue_id: i64,
    pub book_title: String,
    pub customer_name: String,
    #[serde(with = "optional_date")]
    pub date_issued: Option<NaiveDate>,
    #[serde(with = "optional_date")]
    pub due_date: Option<NaiveDate>,
    pub days_borrowed: i64,
    pub days_overdue: i64,
}

/// Overdue issues on `now`, most overdue first
pub fn overdue_report(issues: &[Issue], now: NaiveDate, policy: &LoanPolicy) -> Vec<OverdueRow> {
    let mut rows: Vec<OverdueRow> = issues
        .iter()
        .filter_map(|issue| {
            let record = issue.record();
            if !policy.record_is_overdue(now, &record) {
                return None;
            }
            Some(OverdueRow {
                issue_id: issue.id,
                book_title: issue.book_title.clone(),
                customer_name: issue.customer_name.clone(),
                date_issued: issue.date_issued,
                due_date: policy.record_due_date(&record),
                days_borrowed: days_borrowed(now, &record),
                days_overdue: policy.days_overdue(now, &record),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue).then(a.issue_id.cmp(&b.issue_id)));
    rows
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueStatistics {
    pub total: usize,
    pub outstanding: usize,
    pub returned: usize,
    pub overdue: usize,
    pub extended: usize,
}

impl IssueStatistics {
    pub fn collect(issues: &[Issue], now: NaiveDate, policy: &LoanPolicy) -> Self {
        issues.iter().fold(Self::default(), |mut stats, issue| {
            stats.total += 1;
            match issue.status {
                LoanStatus::Outstanding => stats.outstanding += 1,
                LoanStatus::Returned => stats.returned += 1,
            }
            if issue.extended {
                stats.extended += 1;
            }
            if policy.record_is_overdue(now, &issue.record()) {
                stats.overdue += 1;
            }
            stats
        })
    }
}
