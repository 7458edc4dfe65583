//! Loan (issue) management service

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    client::LibraryBackend,
    domain::loan::{self, LoanPolicy},
    error::{AppError, AppResult},
    models::{ApiMessage, CreateIssue, Issue, IssueQuery},
    report::{self, IssueStatistics, OverdueRow, SortColumn, SortState},
};

/// What the issues screen currently shows
#[derive(Debug, Clone)]
pub struct IssuesView {
    pub query: IssueQuery,
    pub sort: SortState,
    pub issues: Vec<Issue>,
}

impl IssuesView {
    pub fn find(&self, id: i64) -> AppResult<&Issue> {
        self.issues
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Issue with id {} not found", id)))
    }
}

#[derive(Clone)]
pub struct LoansService {
    backend: Arc<dyn LibraryBackend>,
    policy: LoanPolicy,
}

impl LoansService {
    pub fn new(backend: Arc<dyn LibraryBackend>, policy: LoanPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &LoanPolicy {
        &self.policy
    }

    /// Fetch issues, newest first
    pub async fn load(&self, query: IssueQuery) -> AppResult<IssuesView> {
        self.load_sorted(query, SortState::default()).await
    }

    async fn load_sorted(&self, query: IssueQuery, sort: SortState) -> AppResult<IssuesView> {
        let mut issues = self.backend.list_issues(&query).await?;
        report::sort_issues(&mut issues, sort, &self.policy);
        tracing::debug!("Loaded {} issues", issues.len());
        Ok(IssuesView { query, sort, issues })
    }

    /// Fetch again, keeping the view's filter and sort
    pub async fn reload(&self, view: &IssuesView) -> AppResult<IssuesView> {
        self.load_sorted(view.query.clone(), view.sort).await
    }

    /// Sort by `column`, flipping the direction when it is already the sort column
    pub fn resort(&self, mut view: IssuesView, column: SortColumn) -> IssuesView {
        view.sort = view.sort.toggle(column);
        report::sort_issues(&mut view.issues, view.sort, &self.policy);
        view
    }

    pub fn due_date(&self, issue: &Issue) -> Option<NaiveDate> {
        self.policy.due_date(issue.date_issued, issue.extended)
    }

    pub fn is_overdue(&self, issue: &Issue, today: NaiveDate) -> bool {
        self.policy.record_is_overdue(today, &issue.record())
    }

    /// Issue a book to a customer
    pub async fn issue_book(&self, book_id: &str, customer_id: &str) -> AppResult<ApiMessage> {
        if book_id.trim().is_empty() || customer_id.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Book ID and Customer ID are required".to_string(),
            ));
        }
        let result = self
            .backend
            .create_issue(&CreateIssue {
                book_id: book_id.to_string(),
                customer_id: customer_id.to_string(),
            })
            .await?;
        tracing::info!("Issued book {} to customer {}", book_id, customer_id);
        Ok(result)
    }

    /// Return an issue on `today`. Rejected locally when the loan is already
    /// closed; no request is sent in that case.
    pub async fn return_issue(&self, view: &IssuesView, id: i64, today: NaiveDate) -> AppResult<IssuesView> {
        let issue = view.find(id)?;
        loan::mark_returned(&issue.record(), today)?;

        self.backend.return_issue(id).await?;
        tracing::info!("Issue {} returned", id);
        self.reload(view).await
    }

    /// Grant the one-time extension
    pub async fn extend_issue(&self, view: &IssuesView, id: i64) -> AppResult<IssuesView> {
        let issue = view.find(id)?;
        let extended = loan::extend(&issue.record())?;

        self.backend.extend_issue(id).await?;
        tracing::info!(
            "Issue {} extended, now due {:?}",
            id,
            self.policy.record_due_date(&extended)
        );
        self.reload(view).await
    }

    pub fn export_csv(&self, view: &IssuesView) -> String {
        report::export_csv(&view.issues, &self.policy)
    }

    /// Write the CSV export of `view` to `path`
    pub async fn write_csv(&self, view: &IssuesView, path: &Path) -> AppResult<()> {
        if view.issues.is_empty() {
            return Err(AppError::NotFound("No issues to export".to_string()));
        }
        tokio::fs::write(path, self.export_csv(view)).await?;
        tracing::info!("Exported {} issues to {}", view.issues.len(), path.display());
        Ok(())
    }

    pub fn overdue_report(&self, view: &IssuesView, today: NaiveDate) -> Vec<OverdueRow> {
        report::overdue_report(&view.issues, today, &self.policy)
    }

    pub fn statistics(&self, view: &IssuesView, today: NaiveDate) -> IssueStatistics {
        IssueStatistics::collect(&view.issues, today, &self.policy)
    }
}
