use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NOTIFICATION_DOMAIN: &str = "https://ntfy.sh";

/// Stores user-configurable preferences for the subscription calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversion_rates: Vec<RateConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            notifications: NotificationConfig::default(),
            conversion_rates: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    /// Sets or replaces the `from -> to` rate, keeping one entry per pair.
    pub fn set_rate(&mut self, from: &str, to: &str, rate: Decimal) {
        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();
        match self
            .conversion_rates
            .iter_mut()
            .find(|entry| entry.from == from && entry.to == to)
        {
            Some(entry) => entry.rate = rate,
            None => self.conversion_rates.push(RateConfig { from, to, rate }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub topic: String,
    #[serde(default = "NotificationConfig::default_domain")]
    pub domain: String,
}

impl NotificationConfig {
    pub fn default_domain() -> String {
        DEFAULT_NOTIFICATION_DOMAIN.into()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            domain: Self::default_domain(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
}
