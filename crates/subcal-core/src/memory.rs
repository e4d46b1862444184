//! In-memory collaborator implementations for embedding and tests.

use std::sync::{Mutex, RwLock};

use subcal_domain::{SubscriptionId, SubscriptionRecord};

use crate::{
    store::{ConfigurationStore, Notification, NotificationSink, Settings, SubscriptionStore},
    CoreError,
};

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Store("lock poisoned".into())
}

/// Keeps records in insertion order.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<Vec<SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, assigning ids to records that lack one.
    pub fn with_records(records: impl IntoIterator<Item = SubscriptionRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                record.id.get_or_insert_with(SubscriptionId::new);
                record
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn list(&self) -> Result<Vec<SubscriptionRecord>, CoreError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.clone())
    }

    fn get(&self, id: SubscriptionId) -> Result<SubscriptionRecord, CoreError> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .iter()
            .find(|record| record.id == Some(id))
            .cloned()
            .ok_or(CoreError::SubscriptionNotFound(id))
    }

    fn create(&self, record: &SubscriptionRecord) -> Result<SubscriptionId, CoreError> {
        let id = SubscriptionId::new();
        let mut stored = record.clone();
        stored.id = Some(id);
        stored.included = true;
        self.records.write().map_err(poisoned)?.push(stored);
        Ok(id)
    }

    fn update(&self, record: &SubscriptionRecord) -> Result<(), CoreError> {
        let id = record.id.ok_or(CoreError::MissingId)?;
        let mut records = self.records.write().map_err(poisoned)?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == Some(id))
            .ok_or(CoreError::SubscriptionNotFound(id))?;
        *slot = record.clone();
        slot.included = true;
        Ok(())
    }

    fn delete(&self, id: SubscriptionId) -> Result<(), CoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|record| record.id != Some(id));
        if records.len() == before {
            return Err(CoreError::SubscriptionNotFound(id));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    settings: RwLock<Settings>,
}

impl InMemoryConfigurationStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl ConfigurationStore for InMemoryConfigurationStore {
    fn load(&self) -> Result<Settings, CoreError> {
        Ok(self.settings.read().map_err(poisoned)?.clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        *self.settings.write().map_err(poisoned)? = settings.clone();
        Ok(())
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: &Notification) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Remembers delivered notifications so tests can inspect them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) -> Result<(), CoreError> {
        self.delivered
            .lock()
            .map_err(poisoned)?
            .push(notification.clone());
        Ok(())
    }
}
