//! Conversion rate table used to normalise totals into a display currency.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use subcal_domain::CurrencyCode;

use crate::CoreError;

/// One `from -> to` multiplier: `amount_in_to = amount_in_from * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
}

/// Currency-pair multipliers supplied by the configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateEntry>", into = "Vec<RateEntry>")]
pub struct ConversionRates {
    rates: BTreeMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl ConversionRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the `from -> to` rate. Rates must be positive.
    pub fn insert(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<(), CoreError> {
        if rate <= Decimal::ZERO {
            return Err(CoreError::InvalidRate { from, to, rate });
        }
        self.rates.insert((from, to), rate);
        Ok(())
    }

    pub fn with_rate(
        mut self,
        from: impl Into<CurrencyCode>,
        to: impl Into<CurrencyCode>,
        rate: Decimal,
    ) -> Result<Self, CoreError> {
        self.insert(from.into(), to.into(), rate)?;
        Ok(self)
    }

    pub fn remove(&mut self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        self.rates.remove(&(from.clone(), to.clone()))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn entries(&self) -> Vec<RateEntry> {
        self.rates
            .iter()
            .map(|((from, to), rate)| RateEntry {
                from: from.clone(),
                to: to.clone(),
                rate: *rate,
            })
            .collect()
    }

    /// Multiplier taking amounts from `from` into `to`.
    ///
    /// Same currency is always 1. Otherwise the direct pair wins, then the
    /// inverse of the reverse pair. Absent pairs are `None`, never parity.
    pub fn lookup(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&(from.clone(), to.clone())) {
            return Some(*rate);
        }
        self.rates
            .get(&(to.clone(), from.clone()))
            .and_then(|reverse| Decimal::ONE.checked_div(*reverse))
    }

    /// Converts a raw amount, failing when no rate links the two currencies.
    pub fn convert_amount(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CoreError> {
        let rate = self.lookup(from, to).ok_or_else(|| CoreError::MissingRate {
            from: from.clone(),
            to: to.clone(),
        })?;
        amount
            .checked_mul(rate)
            .ok_or_else(|| CoreError::Overflow(format!("{from} -> {to} conversion")))
    }
}

impl TryFrom<Vec<RateEntry>> for ConversionRates {
    type Error = CoreError;

    fn try_from(entries: Vec<RateEntry>) -> Result<Self, Self::Error> {
        let mut rates = ConversionRates::new();
        for entry in entries {
            rates.insert(entry.from, entry.to, entry.rate)?;
        }
        Ok(rates)
    }
}

impl From<ConversionRates> for Vec<RateEntry> {
    fn from(rates: ConversionRates) -> Self {
        rates.entries()
    }
}
