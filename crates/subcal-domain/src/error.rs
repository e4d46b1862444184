use thiserror::Error;

use crate::CurrencyCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        left: CurrencyCode,
        right: CurrencyCode,
    },
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Amount overflow")]
    Overflow,
}
