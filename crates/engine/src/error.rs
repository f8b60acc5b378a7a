//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`MissingExchangeRate`] thrown when a closing is attempted before any
//!   Bs/USD rate was recorded.
//! - [`Forbidden`] thrown when the session role is not allowed to run an
//!   operation.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`MissingExchangeRate`]: EngineError::MissingExchangeRate
//!  [`Forbidden`]: EngineError::Forbidden
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid credentials or inactive user")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("No exchange rate recorded yet")]
    MissingExchangeRate,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRate(a), Self::InvalidRate(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::MissingExchangeRate, Self::MissingExchangeRate) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
