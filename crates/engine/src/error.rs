//! The module contains the errors the engine can throw.
//!
//! Every rejection names the invariant it violated so callers can render an
//! actionable message instead of a generic failure.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Forbidden transition: {0}")]
    ForbiddenTransition(String),
    #[error("Illegal transition: {0}")]
    IllegalTransition(String),
    #[error("Not available: {0}")]
    Unavailable(String),
    #[error("Self booking: {0}")]
    SelfBooking(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
    /// Payment-provider call failed before a definitive answer (timeout,
    /// transport error). Safe to retry; no local state was derived from it.
    #[error("Payment provider error: {0}")]
    Provider(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ForbiddenTransition(a), Self::ForbiddenTransition(b)) => a == b,
            (Self::IllegalTransition(a), Self::IllegalTransition(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a == b,
            (Self::SelfBooking(a), Self::SelfBooking(b)) => a == b,
            (Self::InvalidRange(a), Self::InvalidRange(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::PaymentFailed(a), Self::PaymentFailed(b)) => a == b,
            (Self::Provider(a), Self::Provider(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
