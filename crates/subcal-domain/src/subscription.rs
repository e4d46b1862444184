//! Subscription records as held by the session and exchanged with stores.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CurrencyCode, DomainError, Interval, Money, RecurrenceRule};

/// Store-assigned identity of a persisted subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A recurring charge.
///
/// `included` is session state that decides whether the record counts towards
/// totals; it is never persisted and every record read from a store starts
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSubscription", into = "StoredSubscription")]
pub struct SubscriptionRecord {
    pub id: Option<SubscriptionId>,
    pub name: String,
    pub cost: Money,
    pub rule: RecurrenceRule,
    pub included: bool,
}

impl SubscriptionRecord {
    pub fn new(name: impl Into<String>, cost: Money, rule: RecurrenceRule) -> Self {
        Self {
            id: None,
            name: name.into(),
            cost,
            rule,
            included: true,
        }
    }

    pub fn with_id(mut self, id: SubscriptionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn currency(&self) -> &CurrencyCode {
        self.cost.currency()
    }
}

/// Flat shape a subscription store reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubscriptionId>,
    pub name: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    pub anchor_date: NaiveDate,
    pub interval: Interval,
    #[serde(default = "StoredSubscription::default_step_count")]
    pub step_count: u32,
}

impl StoredSubscription {
    fn default_step_count() -> u32 {
        1
    }
}

impl TryFrom<StoredSubscription> for SubscriptionRecord {
    type Error = DomainError;

    fn try_from(stored: StoredSubscription) -> Result<Self, Self::Error> {
        let rule = RecurrenceRule::new(stored.anchor_date, stored.interval, stored.step_count)?;
        Ok(Self {
            id: stored.id,
            name: stored.name,
            cost: Money::new(stored.amount, stored.currency),
            rule,
            included: true,
        })
    }
}

impl From<SubscriptionRecord> for StoredSubscription {
    fn from(record: SubscriptionRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            amount: record.cost.amount(),
            currency: record.cost.currency().clone(),
            anchor_date: record.rule.anchor_date(),
            interval: record.rule.interval(),
            step_count: record.rule.step_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_shape_roundtrips_without_included_flag() {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut record = SubscriptionRecord::new(
            "Streaming",
            Money::new(Decimal::new(1599, 2), CurrencyCode::new("EUR")),
            RecurrenceRule::monthly(anchor),
        )
        .with_id(SubscriptionId::new());
        record.included = false;

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("included").is_none());
        assert_eq!(json["anchorDate"], "2024-03-15");
        assert_eq!(json["interval"], "monthly");
        assert_eq!(json["stepCount"], 1);

        let loaded: SubscriptionRecord = serde_json::from_value(json).unwrap();
        assert!(loaded.included);
        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.rule, record.rule);
        assert_eq!(loaded.cost, record.cost);
    }

    #[test]
    fn stored_shape_without_id_or_step_uses_defaults() {
        let loaded: SubscriptionRecord = serde_json::from_str(
            r#"{"name":"Gym","amount":"30","currency":"usd","anchorDate":"2024-01-10","interval":"weeks"}"#,
        )
        .unwrap();
        assert!(!loaded.is_persisted());
        assert_eq!(loaded.rule.step_count(), 1);
        assert_eq!(loaded.rule.interval(), Interval::Weekly);
        assert_eq!(loaded.currency().as_str(), "USD");
    }

    #[test]
    fn stored_shape_rejects_non_iso_currency() {
        let result = serde_json::from_str::<SubscriptionRecord>(
            r#"{"name":"Gym","amount":"30","currency":"dollars","anchorDate":"2024-01-10","interval":"weekly"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn stored_shape_rejects_zero_step() {
        let result = serde_json::from_str::<SubscriptionRecord>(
            r#"{"name":"Bad","amount":"1","currency":"USD","anchorDate":"2024-01-10","interval":"daily","stepCount":0}"#,
        );
        assert!(result.is_err());
    }
}
