//! Loan lifecycle: due dates, overdue detection and the loan state machine.
//!
//! A loan starts `Outstanding` when the backend issues it, may be extended
//! once while outstanding, and becomes `Returned` for good. The due date is
//! always derived from the issue date and the extension flag and is never
//! stored.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Standard loan period in days
pub const LOAN_PERIOD_DAYS: u32 = 21;

/// Days added by the single allowed extension
pub const EXTENSION_DAYS: u32 = 7;

/// Loan state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Checked out and not yet returned. The backend calls this `issued`.
    #[serde(alias = "issued", alias = "active")]
    Outstanding,
    Returned,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Outstanding => "outstanding",
            LoanStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loan as far as the lifecycle rules are concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: i64,
    pub issue_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub extended: bool,
    pub status: LoanStatus,
}

impl LoanRecord {
    /// A freshly issued loan
    pub fn outstanding(id: i64, issue_date: NaiveDate) -> Self {
        Self {
            id,
            issue_date: Some(issue_date),
            return_date: None,
            extended: false,
            status: LoanStatus::Outstanding,
        }
    }

    pub fn is_returned(&self) -> bool {
        self.status == LoanStatus::Returned
    }
}

/// Loan period constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPolicy {
    pub loan_period_days: u32,
    pub extension_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: LOAN_PERIOD_DAYS,
            extension_days: EXTENSION_DAYS,
        }
    }
}

impl LoanPolicy {
    /// Total days a loan may stay out
    pub fn period(&self, extended: bool) -> u32 {
        if extended {
            self.loan_period_days.saturating_add(self.extension_days)
        } else {
            self.loan_period_days
        }
    }

    /// Due date of a loan, or `None` when the issue date is unknown or the
    /// due date falls past the last representable date
    pub fn due_date(&self, issue_date: Option<NaiveDate>, extended: bool) -> Option<NaiveDate> {
        issue_date?.checked_add_days(Days::new(u64::from(self.period(extended))))
    }

    pub fn is_overdue(
        &self,
        now: NaiveDate,
        issue_date: Option<NaiveDate>,
        extended: bool,
        status: LoanStatus,
    ) -> bool {
        if status == LoanStatus::Returned {
            return false;
        }
        match self.due_date(issue_date, extended) {
            Some(due) => now > due,
            None => false,
        }
    }

    pub fn record_due_date(&self, record: &LoanRecord) -> Option<NaiveDate> {
        self.due_date(record.issue_date, record.extended)
    }

    pub fn record_is_overdue(&self, now: NaiveDate, record: &LoanRecord) -> bool {
        self.is_overdue(now, record.issue_date, record.extended, record.status)
    }

    /// Whole days past the due date, 0 when the loan is not overdue
    pub fn days_overdue(&self, now: NaiveDate, record: &LoanRecord) -> i64 {
        if !self.record_is_overdue(now, record) {
            return 0;
        }
        self.record_due_date(record)
            .map(|due| (now - due).num_days())
            .unwrap_or(0)
    }
}

/// Days the item has been out: until the return date for returned loans,
/// until `now` otherwise. Unknown issue dates count as 0.
pub fn days_borrowed(now: NaiveDate, record: &LoanRecord) -> i64 {
    let Some(issued) = record.issue_date else {
        return 0;
    };
    let end = match (record.status, record.return_date) {
        (LoanStatus::Returned, Some(returned)) => returned,
        _ => now,
    };
    (end - issued).num_days().max(0)
}

/// Due date under the standard policy
pub fn compute_due_date(issue_date: Option<NaiveDate>, extended: bool) -> Option<NaiveDate> {
    LoanPolicy::default().due_date(issue_date, extended)
}

/// Overdue check under the standard policy
pub fn is_overdue(
    now: NaiveDate,
    issue_date: Option<NaiveDate>,
    extended: bool,
    status: LoanStatus,
) -> bool {
    LoanPolicy::default().is_overdue(now, issue_date, extended, status)
}

/// Extend an outstanding loan. Only one extension is ever granted.
pub fn extend(record: &LoanRecord) -> Result<LoanRecord, DomainError> {
    if record.is_returned() {
        return Err(DomainError::AlreadyReturned);
    }
    if record.extended {
        return Err(DomainError::AlreadyExtended);
    }
    Ok(LoanRecord {
        extended: true,
        ..record.clone()
    })
}

/// Close a loan on `return_date`
pub fn mark_returned(record: &LoanRecord, return_date: NaiveDate) -> Result<LoanRecord, DomainError> {
    if record.is_returned() {
        return Err(DomainError::AlreadyReturned);
    }
    if matches!(record.issue_date, Some(issued) if return_date < issued) {
        return Err(DomainError::InvalidDate);
    }
    Ok(LoanRecord {
        return_date: Some(return_date),
        status: LoanStatus::Returned,
        ..record.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_due_date_adds_loan_period() {
        let issued = date("2024-01-01");
        assert_eq!(compute_due_date(Some(issued), false), Some(date("2024-01-22")));
        assert_eq!(compute_due_date(Some(issued), true), Some(date("2024-01-29")));
    }

    #[test]
    fn test_due_date_over_many_issue_dates() {
        let mut issued = date("2023-12-20");
        // Crosses a year end, a leap day and both DST switch weekends
        for _ in 0..400 {
            for extended in [false, true] {
                let expected = issued + Duration::days(if extended { 28 } else { 21 });
                assert_eq!(compute_due_date(Some(issued), extended), Some(expected));
            }
            issued = issued.succ_opt().unwrap();
        }
        assert_eq!(compute_due_date(Some(date("2024-02-20")), false), Some(date("2024-03-12")));
    }

    #[test]
    fn test_due_date_unknown_without_issue_date() {
        assert_eq!(compute_due_date(None, false), None);
        assert_eq!(compute_due_date(None, true), None);
    }

    #[test]
    fn test_overdue_boundary() {
        let issued = Some(date("2024-01-01"));
        assert!(!is_overdue(date("2024-01-22"), issued, false, LoanStatus::Outstanding));
        assert!(is_overdue(date("2024-01-23"), issued, false, LoanStatus::Outstanding));
        assert!(!is_overdue(date("2024-01-23"), issued, true, LoanStatus::Outstanding));
        assert!(is_overdue(date("2024-01-30"), issued, true, LoanStatus::Outstanding));
    }

    #[test]
    fn test_returned_is_never_overdue() {
        let issued = Some(date("2020-01-01"));
        for now in [date("2020-01-01"), date("2021-06-15"), date("2030-12-31")] {
            assert!(!is_overdue(now, issued, false, LoanStatus::Returned));
            assert!(!is_overdue(now, issued, true, LoanStatus::Returned));
        }
    }

    #[test]
    fn test_unknown_issue_date_is_not_overdue() {
        assert!(!is_overdue(date("2030-01-01"), None, false, LoanStatus::Outstanding));
    }

    #[test]
    fn test_extend_once() {
        let loan = LoanRecord::outstanding(1, date("2024-01-01"));
        let extended = extend(&loan).unwrap();
        assert!(extended.extended);
        assert_eq!(
            LoanPolicy::default().record_due_date(&extended),
            Some(date("2024-01-29"))
        );

        assert_eq!(extend(&extended), Err(DomainError::AlreadyExtended));
        assert!(extended.extended);
        assert!(!loan.extended);
    }

    #[test]
    fn test_extend_returned_loan() {
        let loan = LoanRecord::outstanding(1, date("2024-01-01"));
        let returned = mark_returned(&loan, date("2024-01-10")).unwrap();
        assert_eq!(extend(&returned), Err(DomainError::AlreadyReturned));
    }

    #[test]
    fn test_mark_returned() {
        let loan = LoanRecord::outstanding(7, date("2024-01-01"));
        let returned = mark_returned(&loan, date("2024-01-01")).unwrap();
        assert_eq!(returned.status, LoanStatus::Returned);
        assert_eq!(returned.return_date, Some(date("2024-01-01")));
        assert_eq!(returned.issue_date, loan.issue_date);
    }

    #[test]
    fn test_mark_returned_before_issue_date() {
        let loan = LoanRecord::outstanding(7, date("2024-01-10"));
        let snapshot = loan.clone();
        assert_eq!(
            mark_returned(&loan, date("2024-01-09")),
            Err(DomainError::InvalidDate)
        );
        assert_eq!(loan, snapshot);
    }

    #[test]
    fn test_mark_returned_twice() {
        let loan = LoanRecord::outstanding(7, date("2024-01-01"));
        let returned = mark_returned(&loan, date("2024-01-05")).unwrap();
        assert_eq!(
            mark_returned(&returned, date("2024-01-06")),
            Err(DomainError::AlreadyReturned)
        );
    }

    #[test]
    fn test_days_overdue_and_borrowed() {
        let policy = LoanPolicy::default();
        let loan = LoanRecord::outstanding(3, date("2024-01-01"));
        assert_eq!(policy.days_overdue(date("2024-01-22"), &loan), 0);
        assert_eq!(policy.days_overdue(date("2024-01-25"), &loan), 3);
        assert_eq!(days_borrowed(date("2024-01-25"), &loan), 24);

        let returned = mark_returned(&loan, date("2024-01-11")).unwrap();
        assert_eq!(policy.days_overdue(date("2024-03-01"), &returned), 0);
        assert_eq!(days_borrowed(date("2024-03-01"), &returned), 10);
    }

    #[test]
    fn test_custom_policy() {
        let policy = LoanPolicy {
            loan_period_days: 14,
            extension_days: 7,
        };
        assert_eq!(policy.due_date(Some(date("2024-01-01")), false), Some(date("2024-01-15")));
        assert_eq!(policy.period(true), 21);
    }

    #[test]
    fn test_due_date_past_calendar_end() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.due_date(Some(NaiveDate::MAX), false), None);
        let late = LoanRecord::outstanding(9, NaiveDate::MAX);
        assert!(!policy.record_is_overdue(NaiveDate::MAX, &late));
        assert_eq!(policy.days_overdue(NaiveDate::MAX, &late), 0);
    }

    #[test]
    fn test_huge_policy_saturates() {
        let policy = LoanPolicy {
            loan_period_days: u32::MAX,
            extension_days: 7,
        };
        assert_eq!(policy.period(true), u32::MAX);
        assert_eq!(policy.due_date(Some(date("2024-01-01")), true), None);
    }
}
