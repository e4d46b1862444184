//! Currency-tagged decimal amounts.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{
    currency::{format_currency_value, FormatOptions, LocaleConfig},
    CurrencyCode, DomainError,
};

/// A decimal amount in a single currency.
///
/// The amount is always rounded to the currency's minor units. Values in
/// different currencies never combine without an explicit [`Money::convert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MoneyRepr")]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

#[derive(Deserialize)]
struct MoneyRepr {
    amount: Decimal,
    currency: CurrencyCode,
}

impl From<MoneyRepr> for Money {
    fn from(repr: MoneyRepr) -> Self {
        Money::new(repr.amount, repr.currency)
    }
}

impl Money {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        let amount = amount
            .round_dp_with_strategy(currency.minor_units(), RoundingStrategy::MidpointNearestEven);
        Self { amount, currency }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Sums two values of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(DomainError::Overflow)?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    pub fn checked_sub(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(DomainError::Overflow)?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    /// Multiplies the amount by `factor`, keeping the currency.
    pub fn scale(&self, factor: Decimal) -> Result<Money, DomainError> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or(DomainError::Overflow)?;
        Ok(Money::new(amount, self.currency.clone()))
    }

    /// Re-expresses the amount in `target` using a `self.currency -> target` multiplier.
    pub fn convert(&self, rate: Decimal, target: CurrencyCode) -> Result<Money, DomainError> {
        let amount = self.amount.checked_mul(rate).ok_or(DomainError::Overflow)?;
        Ok(Money::new(amount, target))
    }

    pub fn format(&self, locale: &LocaleConfig, options: &FormatOptions) -> String {
        format_currency_value(self.amount, &self.currency, locale, options)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(DomainError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fixed = self.amount;
        fixed.rescale(self.currency.minor_units());
        write!(f, "{} {}", fixed, self.currency)
    }
}
