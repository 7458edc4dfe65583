//! Configuration management for the administration client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::domain::{exhibition::MAX_BOOKS, loan::LoanPolicy};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend REST API, e.g. `http://localhost:5000/api`
    pub base_url: String,
    /// Bearer token sent with every request
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoansConfig {
    pub loan_period_days: u32,
    pub extension_days: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExhibitionsConfig {
    pub max_books: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub exhibitions: ExhibitionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARY_ADMIN_API__BASE_URL, LIBRARY_ADMIN_LOANS__LOAN_PERIOD_DAYS, ...
            .add_source(
                Environment::with_prefix("LIBRARY_ADMIN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .set_override_option("api.token", env::var("API_TOKEN").ok())?
            .build()?;

        config.try_deserialize::<Self>()?.checked()
    }

    /// Reject values outside what the lending and exhibition rules allow
    pub fn checked(self) -> Result<Self, ConfigError> {
        if self.exhibitions.max_books > MAX_BOOKS {
            return Err(ConfigError::Message(format!(
                "exhibitions.max_books must not exceed {}, got {}",
                MAX_BOOKS, self.exhibitions.max_books
            )));
        }
        Ok(self)
    }

    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy {
            loan_period_days: self.loans.loan_period_days,
            extension_days: self.loans.extension_days,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        let policy = LoanPolicy::default();
        Self {
            loan_period_days: policy.loan_period_days,
            extension_days: policy.extension_days,
        }
    }
}

impl Default for ExhibitionsConfig {
    fn default() -> Self {
        Self {
            max_books: MAX_BOOKS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
