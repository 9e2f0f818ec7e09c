//! Proptest generators for property-based testing.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use stockbook_core::{NewEntry, NewItem};

/// Generate an item name: non-blank, letters/digits/inner spaces only, so
/// the name survives trimming and CSV round trips unchanged.
pub fn item_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,13}[A-Za-z0-9]".prop_map(String::from)
}

/// Generate a price in whole cents, non-negative and finite.
pub fn price() -> impl Strategy<Value = f64> {
    (0u32..=100_000u32).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Generate a units-sold count in tenths; zero is legal.
pub fn units() -> impl Strategy<Value = f64> {
    (0u32..=10_000u32).prop_map(|tenths| f64::from(tenths) / 10.0)
}

/// Generate a category label.
pub fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Food".to_string()),
        Just("Beverages".to_string()),
        Just("Household".to_string()),
        Just("Other".to_string()),
    ]
}

/// Generate a unit-type label.
pub fn unit_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pcs".to_string()),
        Just("kg".to_string()),
        Just("liters".to_string()),
        Just("boxes".to_string()),
    ]
}

/// Generate a bucket date somewhere in 2024.
pub fn bucket_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..=365i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

/// Generate a valid candidate record.
pub fn new_item() -> impl Strategy<Value = NewItem> {
    (item_name(), price(), units(), category(), unit_type()).prop_map(
        |(name, price, units, category, unit_type)| {
            NewItem::new(name, price, units, category, unit_type)
        },
    )
}

/// Generate a valid candidate catalog entry.
pub fn new_entry() -> impl Strategy<Value = NewEntry> {
    (item_name(), category(), unit_type())
        .prop_map(|(name, category, unit_type)| NewEntry::new(name, category, unit_type))
}

/// Parameters for filling one inventory bucket.
#[derive(Debug, Clone)]
pub struct BucketParams {
    pub date: NaiveDate,
    pub rows: Vec<NewItem>,
}

impl Arbitrary for BucketParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (bucket_date(), prop::collection::vec(new_item(), 0..12))
            .prop_map(|(date, rows)| BucketParams { date, rows })
            .boxed()
    }
}
