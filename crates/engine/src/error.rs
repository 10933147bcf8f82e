//! The module contains the errors the engine can throw.
//!
//! Every variant belongs to one [`ErrorKind`], the coarse class a caller
//! uses to decide how to report the failure:
//!
//! - [`ErrorKind::BadRequest`]: malformed input, sign violations, stock
//!   that would go negative, returning more than was dispatched.
//! - [`ErrorKind::NotFound`]: a product, box, trip, employee, truck,
//!   supplier, purchase or payment is missing.
//! - [`ErrorKind::Conflict`]: an open trip already exists for the truck, a
//!   payment already exists for the period, a trip is already closed.
//! - [`ErrorKind::Internal`]: store or transaction failure.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Trip closed: {0}")]
    TripClosed(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Failure class of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuantity(_)
            | Self::InvalidAmount(_)
            | Self::InvalidInput(_)
            | Self::InsufficientStock(_) => ErrorKind::BadRequest,
            Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::ExistingKey(_) | Self::TripClosed(_) => ErrorKind::Conflict,
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::TripClosed(a), Self::TripClosed(b)) => a == b,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let cases = [
            (EngineError::InvalidQuantity("x".into()), ErrorKind::BadRequest),
            (EngineError::InvalidAmount("x".into()), ErrorKind::BadRequest),
            (EngineError::InvalidInput("x".into()), ErrorKind::BadRequest),
            (EngineError::InsufficientStock("x".into()), ErrorKind::BadRequest),
            (EngineError::KeyNotFound("x".into()), ErrorKind::NotFound),
            (EngineError::ExistingKey("x".into()), ErrorKind::Conflict),
            (EngineError::TripClosed("x".into()), ErrorKind::Conflict),
            (
                EngineError::Database(DbErr::Custom("boom".into())),
                ErrorKind::Internal,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn messages_carry_the_key() {
        let err = EngineError::KeyNotFound("product 7".to_string());
        assert_eq!(err.to_string(), "\"product 7\" key not found!");
    }
}
