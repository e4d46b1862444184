//! subcal-config
//!
//! Persistent user preferences: display currency, locale, notification
//! target and conversion rates. Owns the Config data structure plus disk
//! persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, NotificationConfig, RateConfig, DEFAULT_NOTIFICATION_DOMAIN};
