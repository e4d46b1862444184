//! Projects subscription billing dates onto a visible calendar range.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use subcal_domain::{DateRange, SubscriptionRecord};

use crate::CoreError;

/// Billing dates mapped to the subscriptions charged on them.
///
/// Buckets keep the order of the input collection. Dates without charges are
/// absent; [`OccurrenceMap::get`] returns an empty slice for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceMap<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a SubscriptionRecord>>,
}

impl<'a> OccurrenceMap<'a> {
    pub fn get(&self, date: NaiveDate) -> &[&'a SubscriptionRecord] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.buckets.contains_key(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a SubscriptionRecord])> + '_ {
        self.buckets
            .iter()
            .map(|(date, bucket)| (*date, bucket.as_slice()))
    }

    /// Number of dates carrying at least one charge.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of (date, subscription) pairs across all buckets.
    pub fn total_occurrences(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    fn push(&mut self, date: NaiveDate, record: &'a SubscriptionRecord) {
        self.buckets.entry(date).or_default().push(record);
    }
}

pub struct ProjectionService;

impl ProjectionService {
    /// Buckets every record's billing dates within `[start, end_inclusive]`.
    ///
    /// All records are projected whether or not they are included in totals.
    pub fn project(
        records: &[SubscriptionRecord],
        start: NaiveDate,
        end_inclusive: NaiveDate,
    ) -> OccurrenceMap<'_> {
        let mut map = OccurrenceMap::default();
        for record in records {
            for date in record.rule.occurrences_in(start, end_inclusive) {
                map.push(date, record);
            }
        }
        tracing::debug!(
            records = records.len(),
            dates = map.len(),
            occurrences = map.total_occurrences(),
            %start,
            %end_inclusive,
            "projected subscription occurrences"
        );
        map
    }

    pub fn project_range(records: &[SubscriptionRecord], range: DateRange) -> OccurrenceMap<'_> {
        Self::project(records, range.start, range.end)
    }

    /// Projection for one calendar month, as shown by a month grid.
    pub fn project_month(
        records: &[SubscriptionRecord],
        year: i32,
        month: u32,
    ) -> Result<OccurrenceMap<'_>, CoreError> {
        let range = DateRange::month(year, month)?;
        Ok(Self::project_range(records, range))
    }

    /// Each record paired with its next billing date on or after `from`, in input order.
    pub fn next_occurrences(
        records: &[SubscriptionRecord],
        from: NaiveDate,
    ) -> Vec<(&SubscriptionRecord, NaiveDate)> {
        records
            .iter()
            .filter_map(|record| {
                record
                    .rule
                    .next_on_or_after(from)
                    .map(|date| (record, date))
            })
            .collect()
    }
}
