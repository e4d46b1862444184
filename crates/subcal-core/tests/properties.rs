use chrono::NaiveDate;
use rust_decimal::Decimal;
use subcal_core::{ConversionRates, CoreError, Period, ProjectionService, TotalsService};
use subcal_domain::{CurrencyCode, Interval, Money, RecurrenceRule, SubscriptionRecord};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_records() -> Vec<SubscriptionRecord> {
    let usd = CurrencyCode::new("USD");
    let specs = [
        ("Video", 1549, date(2023, 8, 31), Interval::Monthly, 1),
        ("Backup", 699, date(2024, 1, 3), Interval::Weekly, 1),
        ("Domain", 1800, date(2020, 2, 29), Interval::Yearly, 1),
        ("Coffee", 450, date(2024, 2, 10), Interval::Daily, 3),
        ("Magazine", 2500, date(2023, 12, 15), Interval::Monthly, 3),
        ("Insurance", 90000, date(2022, 6, 1), Interval::Yearly, 2),
    ];
    specs
        .into_iter()
        .map(|(name, cents, anchor, interval, step)| {
            SubscriptionRecord::new(
                name,
                Money::new(Decimal::new(cents, 2), usd.clone()),
                RecurrenceRule::new(anchor, interval, step).unwrap(),
            )
        })
        .collect()
}

#[test]
fn projection_total_equals_sum_of_enumerations() {
    let records = sample_records();
    let (start, end) = (date(2024, 1, 15), date(2024, 4, 14));

    let map = ProjectionService::project(&records, start, end);

    let expected: usize = records
        .iter()
        .map(|record| record.rule.occurrences_in(start, end).count())
        .sum();
    assert_eq!(map.total_occurrences(), expected);
    assert!(map.dates().all(|day| day >= start && day <= end));
    for (day, bucket) in map.iter() {
        assert!(!bucket.is_empty(), "{day} is present with an empty bucket");
        assert!(bucket.iter().all(|record| record.rule.occurs_on(day)));
    }
}

#[test]
fn projection_over_empty_inputs() {
    let records = sample_records();
    assert!(ProjectionService::project(&[], date(2024, 1, 1), date(2024, 12, 31)).is_empty());
    assert!(ProjectionService::project(&records, date(2024, 2, 1), date(2024, 1, 1)).is_empty());
}

#[test]
fn projection_and_aggregation_are_idempotent() {
    let records = sample_records();
    let usd = CurrencyCode::new("USD");
    let rates = ConversionRates::new();

    let first = ProjectionService::project(&records, date(2024, 1, 1), date(2024, 12, 31));
    let second = ProjectionService::project(&records, date(2024, 1, 1), date(2024, 12, 31));
    assert_eq!(first, second);

    let totals_a = TotalsService::aggregate(&records, &usd, &rates).unwrap();
    let totals_b = TotalsService::aggregate(&records, &usd, &rates).unwrap();
    assert_eq!(totals_a, totals_b);
}

#[test]
fn monthly_total_matches_per_record_formula() {
    let records = sample_records();
    let usd = CurrencyCode::new("USD");

    let totals = TotalsService::aggregate(&records, &usd, &ConversionRates::new()).unwrap();

    let expected: Decimal = records
        .iter()
        .map(|record| {
            record.cost.amount() * record.rule.occurrences_per_year() / Decimal::from(12)
        })
        .sum();
    let tolerance = Decimal::new(1, 2);
    let monthly = totals.get(Period::Monthly).amount();
    assert!(
        (monthly - expected).abs() <= tolerance,
        "monthly {monthly} vs expected {expected}"
    );
    assert_eq!(totals.monthly().currency(), &usd);
}

#[test]
fn empty_included_set_yields_zero_totals() {
    let eur = CurrencyCode::new("EUR");

    let totals = TotalsService::aggregate(&[], &eur, &ConversionRates::new()).unwrap();
    assert_eq!(totals.monthly(), Money::zero(eur.clone()));
    assert_eq!(totals.yearly(), Money::zero(eur.clone()));
    assert_eq!(totals.counted, 0);

    let mut records = sample_records();
    records.iter_mut().for_each(|record| record.included = false);
    let totals = TotalsService::aggregate(&records, &eur, &ConversionRates::new()).unwrap();
    assert!(totals.monthly().is_zero());
    assert!(totals.yearly().is_zero());
}

#[test]
fn missing_rate_aborts_the_whole_aggregate() {
    let records = sample_records();
    let err = TotalsService::aggregate(&records, &CurrencyCode::new("EUR"), &ConversionRates::new())
        .unwrap_err();
    assert!(matches!(err, CoreError::MissingRate { .. }));
}
