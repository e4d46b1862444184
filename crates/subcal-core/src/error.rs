use rust_decimal::Decimal;
use thiserror::Error;

use subcal_domain::{CurrencyCode, DomainError, SubscriptionId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("No conversion rate from {from} to {to}")]
    MissingRate { from: CurrencyCode, to: CurrencyCode },
    #[error("Invalid conversion rate {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),
    #[error("Subscription has no id")]
    MissingId,
    #[error("Amount overflow while totaling {0}")]
    Overflow(String),
    #[error("Store error: {0}")]
    Store(String),
}
