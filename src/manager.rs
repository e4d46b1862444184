use chrono::{Days, NaiveDate};

use subcal_core::{
    ConfigurationStore, CoreError, Notification, NotificationSink, OccurrenceMap,
    ProjectionService, Settings, SubscriptionStore, TotalsResult, TotalsService,
};
use subcal_domain::{DateRange, FormatOptions, Money, SubscriptionId, SubscriptionRecord};

use crate::SubcalError;

/// Session facade that owns the working set of records and wires the
/// collaborators into the pure projection and totals services.
pub struct SubscriptionManager {
    records: Vec<SubscriptionRecord>,
    settings: Settings,
    store: Box<dyn SubscriptionStore>,
    config: Box<dyn ConfigurationStore>,
    sink: Box<dyn NotificationSink>,
}

impl SubscriptionManager {
    /// Creates an empty session; call [`SubscriptionManager::refresh`] to load state.
    pub fn new(
        store: Box<dyn SubscriptionStore>,
        config: Box<dyn ConfigurationStore>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        Self {
            records: Vec::new(),
            settings: Settings::default(),
            store,
            config,
            sink,
        }
    }

    /// Creates a session and loads records and settings right away.
    pub fn open(
        store: Box<dyn SubscriptionStore>,
        config: Box<dyn ConfigurationStore>,
        sink: Box<dyn NotificationSink>,
    ) -> Result<Self, SubcalError> {
        let mut manager = Self::new(store, config, sink);
        manager.refresh()?;
        Ok(manager)
    }

    /// Reloads settings and records. Every reloaded record starts included.
    pub fn refresh(&mut self) -> Result<(), SubcalError> {
        self.settings = self.config.load()?;
        Ok(self.reload_records()?)
    }

    pub fn records(&self) -> &[SubscriptionRecord] {
        &self.records
    }

    pub fn record(&self, id: SubscriptionId) -> Option<&SubscriptionRecord> {
        self.records.iter().find(|record| record.id == Some(id))
    }

    pub fn included(&self) -> impl Iterator<Item = &SubscriptionRecord> + '_ {
        self.records.iter().filter(|record| record.included)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Creates the record when it has no id, otherwise updates it in place.
    pub fn save(&mut self, record: SubscriptionRecord) -> Result<SubscriptionId, SubcalError> {
        let (id, created) = match record.id {
            Some(id) => {
                self.store.update(&record)?;
                (id, false)
            }
            None => (self.store.create(&record)?, true),
        };
        tracing::info!(%id, name = %record.name, created, "saved subscription");
        self.reload_records()?;
        self.notify(&Notification::SubscriptionSaved {
            name: record.name,
            created,
        });
        Ok(id)
    }

    pub fn delete(&mut self, id: SubscriptionId) -> Result<(), SubcalError> {
        let name = match self.record(id) {
            Some(record) => record.name.clone(),
            None => self.store.get(id)?.name,
        };
        self.store.delete(id)?;
        tracing::info!(%id, name = %name, "deleted subscription");
        self.reload_records()?;
        self.notify(&Notification::SubscriptionDeleted { name });
        Ok(())
    }

    /// Flips whether the record counts towards totals. Session-only, never persisted.
    pub fn toggle_included(&mut self, id: SubscriptionId) -> Option<bool> {
        let record = self.records.iter_mut().find(|record| record.id == Some(id))?;
        record.included = !record.included;
        Some(record.included)
    }

    /// Returns `false` when no loaded record carries `id`.
    pub fn set_included(&mut self, id: SubscriptionId, included: bool) -> bool {
        match self.records.iter_mut().find(|record| record.id == Some(id)) {
            Some(record) => {
                record.included = included;
                true
            }
            None => false,
        }
    }

    pub fn include_all(&mut self) {
        self.records
            .iter_mut()
            .for_each(|record| record.included = true);
    }

    /// Persists new settings, then reloads the working set.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), SubcalError> {
        self.config.save(&settings)?;
        tracing::info!(
            display_currency = %settings.display_currency,
            rates = settings.conversion_rates.len(),
            "updated settings"
        );
        self.settings = settings;
        Ok(self.reload_records()?)
    }

    pub fn view(&self, range: DateRange) -> OccurrenceMap<'_> {
        ProjectionService::project_range(&self.records, range)
    }

    pub fn month_view(&self, year: i32, month: u32) -> Result<OccurrenceMap<'_>, SubcalError> {
        Ok(ProjectionService::project_month(&self.records, year, month)?)
    }

    /// Monthly and yearly totals of the included records in the display currency.
    pub fn totals(&self) -> Result<TotalsResult, SubcalError> {
        Ok(TotalsService::aggregate(
            &self.records,
            &self.settings.display_currency,
            &self.settings.conversion_rates,
        )?)
    }

    /// Renders an amount with the configured locale.
    pub fn format_money(&self, money: &Money) -> String {
        money.format(&self.settings.locale, &FormatOptions::default())
    }

    /// Sends one `UpcomingBilling` per occurrence within `[from, from + horizon_days]`
    /// and returns how many were delivered.
    pub fn announce_upcoming(&self, from: NaiveDate, horizon_days: u32) -> usize {
        if !self.settings.notifications.is_enabled() {
            tracing::debug!("notifications disabled, skipping upcoming billing");
            return 0;
        }
        let end = from
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        let map = ProjectionService::project(&self.records, from, end);
        let mut delivered = 0;
        for (date, bucket) in map.iter() {
            for record in bucket {
                let notification = Notification::UpcomingBilling {
                    name: record.name.clone(),
                    date,
                    cost: record.cost.clone(),
                };
                if self.deliver(&notification) {
                    delivered += 1;
                }
            }
        }
        tracing::info!(delivered, %from, %end, "announced upcoming billing");
        delivered
    }

    fn reload_records(&mut self) -> Result<(), CoreError> {
        let mut records = self.store.list()?;
        records.iter_mut().for_each(|record| record.included = true);
        tracing::debug!(count = records.len(), "loaded subscriptions");
        self.records = records;
        Ok(())
    }

    fn notify(&self, notification: &Notification) {
        if self.settings.notifications.is_enabled() {
            self.deliver(notification);
        }
    }

    fn deliver(&self, notification: &Notification) -> bool {
        match self.sink.notify(notification) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, message = %notification.message(), "notification delivery failed");
                false
            }
        }
    }
}
