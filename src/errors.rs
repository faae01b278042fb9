//! Unified error types for `BudgetPulse`.
//!
//! Every fallible operation in the crate returns [`Result`], so store failures,
//! validation problems and configuration mistakes all flow through one enum.

use thiserror::Error;

/// All errors the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// The backing store rejected or failed a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Amount is zero, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A date string could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date: {value}")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// No transaction with this id belongs to the user
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The transaction id that was looked up
        id: i64,
    },

    /// An operation needed a signed-in user but none was given
    #[error("No signed-in user")]
    MissingUser,

    /// I/O error (config file reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion failed (row limits and the like)
    #[error("Conversion error: {0}")]
    Conversion(#[from] std::num::TryFromIntError),

    /// The background refresh task panicked or was cancelled
    #[error("Refresh task error: {0}")]
    RefreshTask(#[from] tokio::task::JoinError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
