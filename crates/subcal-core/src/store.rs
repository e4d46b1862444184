//! Collaborator seams: where records and settings come from and where
//! notifications go. Implementations live outside the pure services.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use subcal_config::DEFAULT_NOTIFICATION_DOMAIN;
use subcal_domain::{CurrencyCode, LocaleConfig, Money, SubscriptionId, SubscriptionRecord};

use crate::{rates::ConversionRates, CoreError};

/// Push-notification target (server plus topic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub topic: String,
    pub domain: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            topic: String::new(),
            domain: DEFAULT_NOTIFICATION_DOMAIN.into(),
        }
    }
}

impl NotificationSettings {
    /// Notifications are only sent once a topic is configured.
    pub fn is_enabled(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Publish URL for the configured topic, e.g. `https://ntfy.sh/bills`.
    pub fn endpoint(&self) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        Some(format!(
            "{}/{}",
            self.domain.trim_end_matches('/'),
            self.topic.trim()
        ))
    }
}

/// Everything the session needs from the configuration store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub display_currency: CurrencyCode,
    #[serde(default)]
    pub conversion_rates: ConversionRates,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Events pushed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    SubscriptionSaved { name: String, created: bool },
    SubscriptionDeleted { name: String },
    UpcomingBilling {
        name: String,
        date: NaiveDate,
        cost: Money,
    },
}

impl Notification {
    /// One-line message suitable for a push notification body.
    pub fn message(&self) -> String {
        match self {
            Notification::SubscriptionSaved {
                name,
                created: true,
            } => format!("Subscription added: {name}"),
            Notification::SubscriptionSaved {
                name,
                created: false,
            } => format!("Subscription updated: {name}"),
            Notification::SubscriptionDeleted { name } => format!("Subscription removed: {name}"),
            Notification::UpcomingBilling { name, date, cost } => {
                format!("{name} bills {cost} on {date}")
            }
        }
    }
}

/// CRUD over persisted subscription records.
pub trait SubscriptionStore: Send + Sync {
    /// All records in store order.
    fn list(&self) -> Result<Vec<SubscriptionRecord>, CoreError>;
    fn get(&self, id: SubscriptionId) -> Result<SubscriptionRecord, CoreError>;
    /// Persists a record without an id and returns the id the store assigned.
    fn create(&self, record: &SubscriptionRecord) -> Result<SubscriptionId, CoreError>;
    fn update(&self, record: &SubscriptionRecord) -> Result<(), CoreError>;
    fn delete(&self, id: SubscriptionId) -> Result<(), CoreError>;
}

pub trait ConfigurationStore: Send + Sync {
    fn load(&self) -> Result<Settings, CoreError>;
    fn save(&self, settings: &Settings) -> Result<(), CoreError>;
}

/// Fire-and-forget delivery; callers log failures and carry on.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), CoreError>;
}

impl<T: SubscriptionStore + ?Sized> SubscriptionStore for Arc<T> {
    fn list(&self) -> Result<Vec<SubscriptionRecord>, CoreError> {
        (**self).list()
    }

    fn get(&self, id: SubscriptionId) -> Result<SubscriptionRecord, CoreError> {
        (**self).get(id)
    }

    fn create(&self, record: &SubscriptionRecord) -> Result<SubscriptionId, CoreError> {
        (**self).create(record)
    }

    fn update(&self, record: &SubscriptionRecord) -> Result<(), CoreError> {
        (**self).update(record)
    }

    fn delete(&self, id: SubscriptionId) -> Result<(), CoreError> {
        (**self).delete(id)
    }
}

impl<T: ConfigurationStore + ?Sized> ConfigurationStore for Arc<T> {
    fn load(&self) -> Result<Settings, CoreError> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        (**self).save(settings)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: &Notification) -> Result<(), CoreError> {
        (**self).notify(notification)
    }
}
