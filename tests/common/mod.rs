#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use subcal::{
    CurrencyCode, FileConfigurationStore, InMemoryConfigurationStore, InMemorySubscriptionStore,
    Money, NotificationSettings, RecordingSink, RecurrenceRule, Settings, SubscriptionManager,
    SubscriptionRecord,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn record(name: &str, cents: i64, currency: &str, rule: RecurrenceRule) -> SubscriptionRecord {
    SubscriptionRecord::new(
        name,
        Money::new(Decimal::new(cents, 2), CurrencyCode::new(currency)),
        rule,
    )
}

pub fn notifying_settings() -> Settings {
    Settings {
        notifications: NotificationSettings {
            topic: "bills".into(),
            ..NotificationSettings::default()
        },
        ..Settings::default()
    }
}

/// Session over in-memory collaborators plus a handle on the delivered notifications.
pub fn memory_session(
    records: Vec<SubscriptionRecord>,
    settings: Settings,
) -> (SubscriptionManager, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let manager = SubscriptionManager::open(
        Box::new(InMemorySubscriptionStore::with_records(records)),
        Box::new(InMemoryConfigurationStore::new(settings)),
        Box::new(Arc::clone(&sink)),
    )
    .expect("open session");
    (manager, sink)
}

/// File-backed configuration store rooted in a unique temporary directory.
pub fn file_config_store() -> FileConfigurationStore {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    FileConfigurationStore::with_base_dir(base).expect("create config store for temp dir")
}
