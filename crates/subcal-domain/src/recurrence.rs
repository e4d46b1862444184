//! Billing cadences and occurrence enumeration.

use std::{fmt, iter::FusedIterator};

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Unit a recurrence steps by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[serde(alias = "day", alias = "days")]
    Daily,
    #[serde(alias = "week", alias = "weeks")]
    Weekly,
    #[serde(alias = "month", alias = "months")]
    Monthly,
    #[serde(alias = "year", alias = "years")]
    Yearly,
}

impl Interval {
    /// Nominal number of billing events per year for a step of one unit.
    ///
    /// This is an estimate for cost normalisation only: days count as 365 and
    /// weeks as 52 regardless of leap years, so summing a daily or weekly
    /// subscription over an actual year can differ slightly. Exact billing
    /// dates come from [`RecurrenceRule::occurrences_in`].
    pub fn occurrences_per_year(self) -> Decimal {
        match self {
            Interval::Daily => Decimal::from(365),
            Interval::Weekly => Decimal::from(52),
            Interval::Monthly => Decimal::from(12),
            Interval::Yearly => Decimal::ONE,
        }
    }

    fn unit_label(self) -> &'static str {
        match self {
            Interval::Daily => "Day",
            Interval::Weekly => "Week",
            Interval::Monthly => "Month",
            Interval::Yearly => "Year",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
            Interval::Yearly => "Yearly",
        };
        f.write_str(label)
    }
}

/// "Bills every `step_count` `interval`s starting at `anchor_date`."
///
/// Rules are immutable; editing a subscription replaces its rule wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RuleRepr")]
pub struct RecurrenceRule {
    anchor_date: NaiveDate,
    interval: Interval,
    step_count: u32,
}

#[derive(Deserialize)]
struct RuleRepr {
    anchor_date: NaiveDate,
    interval: Interval,
    step_count: u32,
}

impl TryFrom<RuleRepr> for RecurrenceRule {
    type Error = DomainError;

    fn try_from(repr: RuleRepr) -> Result<Self, Self::Error> {
        RecurrenceRule::new(repr.anchor_date, repr.interval, repr.step_count)
    }
}

impl RecurrenceRule {
    pub fn new(
        anchor_date: NaiveDate,
        interval: Interval,
        step_count: u32,
    ) -> Result<Self, DomainError> {
        if step_count < 1 {
            return Err(DomainError::InvalidRule(
                "step count must be at least 1".into(),
            ));
        }
        Ok(Self {
            anchor_date,
            interval,
            step_count,
        })
    }

    pub fn daily(anchor_date: NaiveDate) -> Self {
        Self::every_one(anchor_date, Interval::Daily)
    }

    pub fn weekly(anchor_date: NaiveDate) -> Self {
        Self::every_one(anchor_date, Interval::Weekly)
    }

    pub fn monthly(anchor_date: NaiveDate) -> Self {
        Self::every_one(anchor_date, Interval::Monthly)
    }

    pub fn yearly(anchor_date: NaiveDate) -> Self {
        Self::every_one(anchor_date, Interval::Yearly)
    }

    fn every_one(anchor_date: NaiveDate, interval: Interval) -> Self {
        Self {
            anchor_date,
            interval,
            step_count: 1,
        }
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Billing events per year, see [`Interval::occurrences_per_year`].
    pub fn occurrences_per_year(&self) -> Decimal {
        self.interval.occurrences_per_year() / Decimal::from(self.step_count)
    }

    pub fn label(&self) -> String {
        match self.step_count {
            1 => self.interval.to_string(),
            n => format!("Every {} {}s", n, self.interval.unit_label()),
        }
    }

    /// Date of the `index`-th billing event (the anchor is index 0).
    ///
    /// Month and year steps are always measured from the anchor, so a day
    /// clamped to a short month does not carry over to later occurrences.
    /// Returns `None` once dates leave chrono's representable range.
    pub fn nth_occurrence(&self, index: u32) -> Option<NaiveDate> {
        let steps = u64::from(index) * u64::from(self.step_count);
        match self.interval {
            Interval::Daily => self.anchor_date.checked_add_days(Days::new(steps)),
            Interval::Weekly => self
                .anchor_date
                .checked_add_days(Days::new(steps.checked_mul(7)?)),
            Interval::Monthly => {
                let months = u32::try_from(steps).ok()?;
                self.anchor_date.checked_add_months(Months::new(months))
            }
            Interval::Yearly => {
                let months = u32::try_from(steps.checked_mul(12)?).ok()?;
                self.anchor_date.checked_add_months(Months::new(months))
            }
        }
    }

    /// Index of the first occurrence falling on or after `date`.
    fn first_index_on_or_after(&self, date: NaiveDate) -> Option<u32> {
        if date <= self.anchor_date {
            return Some(0);
        }
        let step = i64::from(self.step_count);
        let mut index = match self.interval {
            Interval::Daily | Interval::Weekly => {
                let unit = if self.interval == Interval::Daily { 1 } else { 7 };
                let elapsed = (date - self.anchor_date).num_days();
                let span = step * unit;
                return u32::try_from((elapsed + span - 1) / span).ok();
            }
            Interval::Monthly | Interval::Yearly => {
                let unit = if self.interval == Interval::Monthly { 1 } else { 12 };
                let elapsed = months_between(self.anchor_date, date);
                u32::try_from(elapsed.div_euclid(step * unit)).ok()?
            }
        };
        // The estimate lands in or before `date`'s month; at most one more step is needed.
        while self.nth_occurrence(index)? < date {
            index = index.checked_add(1)?;
        }
        Some(index)
    }

    /// Whether the rule bills on `date`.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.first_index_on_or_after(date)
            .and_then(|index| self.nth_occurrence(index))
            .is_some_and(|candidate| candidate == date)
    }

    /// First billing date on or after `date`.
    pub fn next_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.first_index_on_or_after(date)
            .and_then(|index| self.nth_occurrence(index))
    }

    /// Lazily enumerates the billing dates inside `[start, end_inclusive]`.
    pub fn occurrences_in(&self, start: NaiveDate, end_inclusive: NaiveDate) -> Occurrences {
        let next_index = if start > end_inclusive || self.anchor_date > end_inclusive {
            None
        } else {
            self.first_index_on_or_after(start)
        };
        Occurrences {
            rule: *self,
            next_index,
            end: end_inclusive,
        }
    }
}

/// Free-function form of [`RecurrenceRule::occurrences_in`].
pub fn occurrences_in(
    rule: &RecurrenceRule,
    start: NaiveDate,
    end_inclusive: NaiveDate,
) -> Occurrences {
    rule.occurrences_in(start, end_inclusive)
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    years * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Iterator over a rule's billing dates within a closed range.
///
/// Owns a copy of its rule; calling `occurrences_in` again with the same
/// arguments yields the same sequence.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    next_index: Option<u32>,
    end: NaiveDate,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index?;
        match self.rule.nth_occurrence(index) {
            Some(date) if date <= self.end => {
                self.next_index = index.checked_add(1);
                Some(date)
            }
            _ => {
                self.next_index = None;
                None
            }
        }
    }
}

impl FusedIterator for Occurrences {}
