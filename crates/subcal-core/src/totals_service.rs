//! Normalised recurring-cost totals over the included subscriptions.

use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use subcal_domain::{CurrencyCode, Money, SubscriptionRecord};

use crate::{rates::ConversionRates, CoreError};

/// Period a total is expressed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Monthly,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Monthly, Period::Yearly];

    fn from_annual(self, annual: Decimal) -> Decimal {
        match self {
            Period::Monthly => annual / Decimal::from(12),
            Period::Yearly => annual,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Monthly => f.write_str("Monthly"),
            Period::Yearly => f.write_str("Yearly"),
        }
    }
}

/// Effective recurring cost in the display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsResult {
    pub display_currency: CurrencyCode,
    pub period_totals: BTreeMap<Period, Money>,
    /// Number of records that contributed to the totals.
    pub counted: usize,
}

impl TotalsResult {
    fn from_annual(display_currency: CurrencyCode, annual: Decimal, counted: usize) -> Self {
        let period_totals = Period::ALL
            .into_iter()
            .map(|period| {
                (
                    period,
                    Money::new(period.from_annual(annual), display_currency.clone()),
                )
            })
            .collect();
        Self {
            display_currency,
            period_totals,
            counted,
        }
    }

    pub fn get(&self, period: Period) -> Money {
        self.period_totals
            .get(&period)
            .cloned()
            .unwrap_or_else(|| Money::zero(self.display_currency.clone()))
    }

    pub fn monthly(&self) -> Money {
        self.get(Period::Monthly)
    }

    pub fn yearly(&self) -> Money {
        self.get(Period::Yearly)
    }
}

pub struct TotalsService;

impl TotalsService {
    /// Annual cost of one record in its own currency, unrounded.
    ///
    /// Uses [`subcal_domain::Interval::occurrences_per_year`], which treats a
    /// year as 365 days or 52 weeks; this is an estimate, not a billing schedule.
    pub fn annualized(record: &SubscriptionRecord) -> Result<Decimal, CoreError> {
        let rule = &record.rule;
        record
            .cost
            .amount()
            .checked_mul(rule.interval().occurrences_per_year())
            .and_then(|yearly| yearly.checked_div(Decimal::from(rule.step_count())))
            .ok_or_else(|| CoreError::Overflow(record.name.clone()))
    }

    /// Totals the included records in `display_currency`.
    ///
    /// A record whose currency cannot be converted aborts the whole call with
    /// [`CoreError::MissingRate`]; partial totals are never returned.
    pub fn aggregate(
        records: &[SubscriptionRecord],
        display_currency: &CurrencyCode,
        rates: &ConversionRates,
    ) -> Result<TotalsResult, CoreError> {
        let mut annual = Decimal::ZERO;
        let mut counted = 0usize;
        for record in records.iter().filter(|record| record.included) {
            let native = Self::annualized(record)?;
            let converted = rates.convert_amount(native, record.currency(), display_currency)?;
            annual = annual
                .checked_add(converted)
                .ok_or_else(|| CoreError::Overflow(record.name.clone()))?;
            counted += 1;
        }
        tracing::debug!(
            counted,
            skipped = records.len() - counted,
            currency = %display_currency,
            %annual,
            "aggregated subscription totals"
        );
        Ok(TotalsResult::from_annual(
            display_currency.clone(),
            annual,
            counted,
        ))
    }

    /// Annual totals of the included records grouped by native currency, without conversion.
    pub fn per_currency(
        records: &[SubscriptionRecord],
    ) -> Result<BTreeMap<CurrencyCode, Money>, CoreError> {
        let mut sums: BTreeMap<CurrencyCode, Decimal> = BTreeMap::new();
        for record in records.iter().filter(|record| record.included) {
            let native = Self::annualized(record)?;
            let entry = sums.entry(record.currency().clone()).or_default();
            *entry = entry
                .checked_add(native)
                .ok_or_else(|| CoreError::Overflow(record.name.clone()))?;
        }
        Ok(sums
            .into_iter()
            .map(|(currency, annual)| {
                let money = Money::new(annual, currency.clone());
                (currency, money)
            })
            .collect())
    }
}
