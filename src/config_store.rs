//! JSON-file backed [`ConfigurationStore`].

use std::path::PathBuf;

use subcal_config::{Config, ConfigError, ConfigManager, NotificationConfig};
use subcal_core::{ConfigurationStore, ConversionRates, CoreError, NotificationSettings, Settings};
use subcal_domain::{CurrencyCode, LocaleConfig};

use crate::SubcalError;

fn store_error(err: ConfigError) -> CoreError {
    CoreError::Store(err.to_string())
}

/// Adapts [`ConfigManager`] to the session's configuration seam.
#[derive(Debug, Clone)]
pub struct FileConfigurationStore {
    manager: ConfigManager,
}

impl FileConfigurationStore {
    pub fn new(manager: ConfigManager) -> Self {
        Self { manager }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SubcalError> {
        Ok(Self::new(ConfigManager::with_base_dir(base)?))
    }

    pub fn default_location() -> Result<Self, SubcalError> {
        Ok(Self::new(ConfigManager::default_location()?))
    }

    pub fn manager(&self) -> &ConfigManager {
        &self.manager
    }

    /// Snapshots the current file into the backups directory.
    pub fn backup(&self, note: Option<&str>) -> Result<String, SubcalError> {
        let config = self.manager.load()?;
        Ok(self.manager.backup(&config, note)?)
    }

    /// Replaces the active configuration with a named backup.
    pub fn restore(&self, backup_name: &str) -> Result<Settings, SubcalError> {
        let config = self.manager.restore(backup_name)?;
        let settings = settings_from_config(&config)?;
        self.manager.save(&config)?;
        tracing::info!(backup = backup_name, "restored configuration backup");
        Ok(settings)
    }
}

impl ConfigurationStore for FileConfigurationStore {
    fn load(&self) -> Result<Settings, CoreError> {
        let config = self.manager.load().map_err(store_error)?;
        settings_from_config(&config)
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        let config = config_from_settings(settings);
        self.manager.save(&config).map_err(store_error)
    }
}

/// Validates the raw file contents into session settings.
pub fn settings_from_config(config: &Config) -> Result<Settings, CoreError> {
    let mut conversion_rates = ConversionRates::new();
    for entry in &config.conversion_rates {
        conversion_rates.insert(
            CurrencyCode::parse(&entry.from)?,
            CurrencyCode::parse(&entry.to)?,
            entry.rate,
        )?;
    }
    Ok(Settings {
        display_currency: CurrencyCode::parse(&config.currency)?,
        conversion_rates,
        notifications: NotificationSettings {
            topic: config.notifications.topic.clone(),
            domain: config.notifications.domain.clone(),
        },
        locale: LocaleConfig::for_tag(&config.locale),
    })
}

/// File representation of `settings`. Every field is owned by the settings.
pub fn config_from_settings(settings: &Settings) -> Config {
    let mut config = Config {
        locale: settings.locale.language_tag.clone(),
        currency: settings.display_currency.as_str().to_string(),
        notifications: NotificationConfig {
            topic: settings.notifications.topic.clone(),
            domain: settings.notifications.domain.clone(),
        },
        ..Config::default()
    };
    for entry in settings.conversion_rates.entries() {
        config.set_rate(entry.from.as_str(), entry.to.as_str(), entry.rate);
    }
    config
}
