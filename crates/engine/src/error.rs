//! The module contains the errors the engine can throw.
//!
//! [`LedgerBusy`] is the only retryable variant: another writer holds the
//! shop's ledger lock and callers should retry after it is released.
//!
//! [`LedgerBusy`]: EngineError::LedgerBusy
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Ledger busy: {0}")]
    LedgerBusy(String),
    #[error("Shop still has transactions: {0}")]
    ShopNotEmpty(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidEntry(a), Self::InvalidEntry(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::LedgerBusy(a), Self::LedgerBusy(b)) => a == b,
            (Self::ShopNotEmpty(a), Self::ShopNotEmpty(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
