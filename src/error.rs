use thiserror::Error;

use crate::services::StoreError;

/// Failures surfaced by the matching core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Daily limit of {limit} reached")]
    QuotaExceeded { limit: u32 },

    #[error("Insufficient coins: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds { balance, required } => {
                CoreError::InsufficientFunds { balance, required }
            }
            StoreError::NotFound(what) => CoreError::NotFound(what),
            StoreError::BalanceOverflow { balance, amount } => CoreError::Validation(format!(
                "amount {} would overflow balance {}",
                amount, balance
            )),
            other => CoreError::Storage(other),
        }
    }
}

impl CoreError {
    /// Short machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_failed",
            CoreError::QuotaExceeded { .. } => "quota_exceeded",
            CoreError::InsufficientFunds { .. } => "insufficient_funds",
            CoreError::NotFound(_) => "not_found",
            CoreError::Forbidden(_) => "forbidden",
            CoreError::Storage(_) => "storage_error",
        }
    }
}
