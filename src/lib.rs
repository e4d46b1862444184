#![doc(test(attr(deny(warnings))))]

//! Subscription calendar: projects recurring billing dates onto a calendar
//! and totals the recurring cost of the included subscriptions.

pub mod config_store;
pub mod errors;
pub mod manager;
pub mod utils;

pub use config_store::FileConfigurationStore;
pub use errors::SubcalError;
pub use manager::SubscriptionManager;

pub use subcal_config::{Config, ConfigError, ConfigManager};
pub use subcal_core::{
    ConfigurationStore, ConversionRates, CoreError, InMemoryConfigurationStore,
    InMemorySubscriptionStore, Notification, NotificationSettings, NotificationSink, NullSink,
    OccurrenceMap, Period, ProjectionService, RecordingSink, Settings, SubscriptionStore,
    TotalsResult, TotalsService,
};
pub use subcal_domain::{
    CurrencyCode, DateRange, DomainError, Interval, LocaleConfig, Money, RecurrenceRule,
    SubscriptionId, SubscriptionRecord,
};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subcal tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
