mod common;

use std::sync::Arc;

use common::{date, memory_session, notifying_settings, record};
use rust_decimal::Decimal;
use subcal::{
    ConversionRates, CoreError, CurrencyCode, DateRange, InMemoryConfigurationStore,
    InMemorySubscriptionStore, Interval, LocaleConfig, Notification, NotificationSink,
    RecordingSink, RecurrenceRule, Settings, SubcalError, SubscriptionId, SubscriptionManager,
    SubscriptionStore,
};

#[test]
fn open_loads_records_as_included() {
    let (manager, _) = memory_session(
        vec![
            record("Music", 999, "USD", RecurrenceRule::monthly(date(2024, 1, 5))),
            record("Cloud", 299, "USD", RecurrenceRule::monthly(date(2024, 1, 12))),
        ],
        Settings::default(),
    );

    assert_eq!(manager.records().len(), 2);
    assert_eq!(manager.included().count(), 2);
    assert!(manager.records().iter().all(|record| record.id.is_some()));
}

#[test]
fn save_creates_then_updates_and_notifies() {
    let (mut manager, sink) = memory_session(Vec::new(), notifying_settings());

    let id = manager
        .save(record("Video", 1549, "USD", RecurrenceRule::monthly(date(2024, 2, 1))))
        .expect("create");
    assert_eq!(manager.records().len(), 1);

    let mut edited = manager.record(id).cloned().expect("saved record");
    edited.name = "Video HD".into();
    let same_id = manager.save(edited).expect("update");

    assert_eq!(same_id, id);
    assert_eq!(manager.records().len(), 1);
    assert_eq!(manager.records()[0].name, "Video HD");
    assert_eq!(
        sink.delivered(),
        vec![
            Notification::SubscriptionSaved {
                name: "Video".into(),
                created: true,
            },
            Notification::SubscriptionSaved {
                name: "Video HD".into(),
                created: false,
            },
        ]
    );
}

#[test]
fn delete_removes_record_and_notifies() {
    let (mut manager, sink) = memory_session(
        vec![record("Old", 500, "USD", RecurrenceRule::yearly(date(2021, 6, 1)))],
        notifying_settings(),
    );
    let id = manager.records()[0].id.expect("seeded id");

    manager.delete(id).expect("delete");

    assert!(manager.records().is_empty());
    assert_eq!(sink.delivered()[0].message(), "Subscription removed: Old");
    assert!(matches!(
        manager.delete(id),
        Err(SubcalError::Core(CoreError::SubscriptionNotFound(_)))
    ));
}

#[test]
fn notifications_are_skipped_without_topic() {
    let (mut manager, sink) = memory_session(Vec::new(), Settings::default());

    manager
        .save(record("Quiet", 100, "USD", RecurrenceRule::daily(date(2024, 1, 1))))
        .expect("create");

    assert!(sink.delivered().is_empty());
    assert_eq!(manager.announce_upcoming(date(2024, 1, 1), 7), 0);
}

#[test]
fn toggling_inclusion_changes_totals_but_not_the_calendar() {
    let (mut manager, _) = memory_session(
        vec![
            record("Music", 1000, "USD", RecurrenceRule::monthly(date(2024, 1, 5))),
            record("Gym", 3000, "USD", RecurrenceRule::monthly(date(2024, 1, 5))),
        ],
        Settings::default(),
    );
    let gym = manager.records()[1].id.expect("seeded id");

    assert_eq!(manager.totals().unwrap().monthly().amount(), Decimal::new(4000, 2));

    assert_eq!(manager.toggle_included(gym), Some(false));
    assert_eq!(manager.included().count(), 1);
    assert_eq!(manager.totals().unwrap().monthly().amount(), Decimal::new(1000, 2));
    assert_eq!(manager.month_view(2024, 3).unwrap().get(date(2024, 3, 5)).len(), 2);

    assert_eq!(manager.toggle_included(gym), Some(true));
    assert_eq!(manager.toggle_included(SubscriptionId::new()), None);
}

#[test]
fn refresh_resets_transient_inclusion() {
    let (mut manager, _) = memory_session(
        vec![record("Music", 1000, "USD", RecurrenceRule::monthly(date(2024, 1, 5)))],
        Settings::default(),
    );
    let id = manager.records()[0].id.expect("seeded id");
    assert!(manager.set_included(id, false));

    manager.refresh().expect("refresh");

    assert!(manager.records()[0].included);
}

#[test]
fn totals_follow_updated_display_currency() {
    let (mut manager, _) = memory_session(
        vec![
            record("US", 1000, "USD", RecurrenceRule::monthly(date(2024, 1, 1))),
            record("EU", 1000, "EUR", RecurrenceRule::monthly(date(2024, 1, 1))),
        ],
        Settings::default(),
    );

    assert!(matches!(
        manager.totals(),
        Err(SubcalError::Core(CoreError::MissingRate { .. }))
    ));

    let settings = Settings {
        display_currency: CurrencyCode::new("EUR"),
        conversion_rates: ConversionRates::new()
            .with_rate("EUR", "USD", Decimal::new(125, 2))
            .unwrap(),
        ..Settings::default()
    };
    manager.update_settings(settings).expect("update settings");

    let totals = manager.totals().expect("totals");
    assert_eq!(totals.monthly().currency().as_str(), "EUR");
    assert_eq!(totals.monthly().amount(), Decimal::new(1800, 2));
    assert_eq!(totals.yearly().amount(), Decimal::new(21600, 2));
}

#[test]
fn views_cover_requested_ranges() {
    let (manager, _) = memory_session(
        vec![record("Rent", 120000, "USD", RecurrenceRule::monthly(date(2024, 1, 31)))],
        Settings::default(),
    );

    let feb = manager.month_view(2024, 2).expect("month");
    assert_eq!(feb.dates().collect::<Vec<_>>(), vec![date(2024, 2, 29)]);

    let spring = manager.view(DateRange::new(date(2024, 3, 1), date(2024, 5, 31)));
    assert_eq!(
        spring.dates().collect::<Vec<_>>(),
        vec![date(2024, 3, 31), date(2024, 4, 30), date(2024, 5, 31)]
    );

    assert!(manager.month_view(2024, 13).is_err());
    assert!(manager
        .view(DateRange::new(date(2024, 5, 1), date(2024, 4, 1)))
        .is_empty());
}

#[test]
fn announce_upcoming_sends_each_occurrence_in_horizon() {
    let (manager, sink) = memory_session(
        vec![
            record(
                "Coffee",
                450,
                "USD",
                RecurrenceRule::new(date(2024, 3, 1), Interval::Daily, 3).unwrap(),
            ),
            record("Rent", 120000, "USD", RecurrenceRule::monthly(date(2024, 1, 31))),
        ],
        notifying_settings(),
    );

    let sent = manager.announce_upcoming(date(2024, 3, 28), 4);

    // Coffee on 03-28 and 03-31, rent on 03-31.
    assert_eq!(sent, 3);
    let delivered = sink.delivered();
    assert_eq!(delivered.len(), 3);
    assert_eq!(
        delivered[0],
        Notification::UpcomingBilling {
            name: "Coffee".into(),
            date: date(2024, 3, 28),
            cost: manager.records()[0].cost.clone(),
        }
    );
    assert_eq!(delivered[2].message(), "Rent bills 1200.00 USD on 2024-03-31");
}

struct FailingSink;

impl NotificationSink for FailingSink {
    fn notify(&self, _notification: &Notification) -> Result<(), CoreError> {
        Err(CoreError::Store("push endpoint unreachable".into()))
    }
}

#[test]
fn sink_failures_never_abort_mutations() {
    let mut manager = SubscriptionManager::open(
        Box::new(InMemorySubscriptionStore::new()),
        Box::new(InMemoryConfigurationStore::new(notifying_settings())),
        Box::new(FailingSink),
    )
    .expect("open");

    let id = manager
        .save(record("Music", 999, "USD", RecurrenceRule::monthly(date(2024, 1, 5))))
        .expect("save succeeds despite sink failure");

    assert!(manager.record(id).is_some());
    assert_eq!(manager.announce_upcoming(date(2024, 1, 1), 31), 0);
}

#[test]
fn shared_store_sees_session_writes() {
    let store = Arc::new(InMemorySubscriptionStore::new());
    let mut manager = SubscriptionManager::open(
        Box::new(Arc::clone(&store)),
        Box::new(InMemoryConfigurationStore::default()),
        Box::new(RecordingSink::new()),
    )
    .expect("open");

    manager
        .save(record("Music", 999, "USD", RecurrenceRule::monthly(date(2024, 1, 5))))
        .expect("save");

    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn format_money_uses_configured_locale() {
    let settings = Settings {
        locale: LocaleConfig::for_tag("de-DE"),
        display_currency: CurrencyCode::new("EUR"),
        ..Settings::default()
    };
    let (manager, _) = memory_session(
        vec![record("Rent", 123456, "EUR", RecurrenceRule::monthly(date(2024, 1, 1)))],
        settings,
    );

    let formatted = manager.format_money(&manager.totals().unwrap().monthly());

    assert!(formatted.contains("1.234,56"), "got {formatted}");
}
