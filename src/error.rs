//! Error types for the library administration client

use thiserror::Error;

/// Stable numeric codes, used as process exit codes by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    BadValue = 2,
    NoSuchData = 3,
    BackendFailure = 4,
    BackendUnreachable = 5,
    AlreadyExtended = 10,
    AlreadyReturned = 11,
    InvalidDate = 12,
    CapacityExceeded = 13,
    SequenceMismatch = 14,
    DuplicateBook = 15,
}

/// Rejections raised by the loan and exhibition rules.
///
/// All of them are local and recoverable: the operation that produced one
/// has not been applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("Loan has already been extended")]
    AlreadyExtended,

    #[error("Loan has already been returned")]
    AlreadyReturned,

    #[error("Return date precedes issue date")]
    InvalidDate,

    #[error("Exhibition cannot contain more than the maximum number of books")]
    CapacityExceeded,

    #[error("Book order does not match the exhibition's books")]
    SequenceMismatch,

    #[error("Book is already part of the exhibition")]
    DuplicateBook,
}

impl DomainError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::AlreadyExtended => ErrorCode::AlreadyExtended,
            DomainError::AlreadyReturned => ErrorCode::AlreadyReturned,
            DomainError::InvalidDate => ErrorCode::InvalidDate,
            DomainError::CapacityExceeded => ErrorCode::CapacityExceeded,
            DomainError::SequenceMismatch => ErrorCode::SequenceMismatch,
            DomainError::DuplicateBook => ErrorCode::DuplicateBook,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(e) => e.code(),
            AppError::Http(e) if e.is_connect() || e.is_timeout() => ErrorCode::BackendUnreachable,
            AppError::Http(_) | AppError::Api { .. } => ErrorCode::BackendFailure,
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorCode::BadValue,
            AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// The domain rejection behind this error, if any
    pub fn as_domain(&self) -> Option<DomainError> {
        match self {
            AppError::Domain(e) => Some(*e),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
