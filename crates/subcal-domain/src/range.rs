use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Closed calendar range `[start, end]`. A range whose start is after its end is empty.
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The whole calendar month `month` of `year`.
    pub fn month(year: i32, month: u32) -> Result<Self, DomainError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DomainError::InvalidDate(format!("{year:04}-{month:02}")))?;
        let last = last_day_of_month(first)
            .ok_or_else(|| DomainError::InvalidDate(format!("{year:04}-{month:02}")))?;
        Ok(Self::new(first, last))
    }

    /// The calendar month containing `date`.
    pub fn month_containing(date: NaiveDate) -> Result<Self, DomainError> {
        Self::month(date.year(), date.month())
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn len_days(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() as u64 + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.pred_opt(),
        // Only the final representable month has no successor.
        None => Some(NaiveDate::MAX),
    }
}
