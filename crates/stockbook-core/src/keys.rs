//! The storage key layout.
//!
//! Every piece of persisted state lives under a well-known string key in
//! the key-value store. This module is the single source of truth for
//! those keys; nothing else in the workspace writes key literals.

use chrono::NaiveDate;

use crate::dates::{format_date, parse_date};

/// Prefix for per-date inventory buckets: `inventory_<YYYY-MM-DD>`.
pub const INVENTORY_PREFIX: &str = "inventory_";

/// The predefined catalog: a JSON array of `CatalogEntry`.
pub const PREDEFINED_ITEMS: &str = "predefinedItems";

/// Per-day review confirmations: a JSON object of date key to bool.
pub const DAILY_CONFIRMATIONS: &str = "daily_confirmations";

// Opaque configuration keys. The data layer never interprets these; they
// are round-tripped through the export bundle verbatim.
pub const CATEGORIES: &str = "categories";
pub const UNIT_TYPES: &str = "unit_types";
pub const SELECTED_LANGUAGE: &str = "selectedLanguage";
pub const CUSTOM_APP_TITLE: &str = "customAppTitle";
pub const SELECTED_CURRENCY: &str = "selectedCurrency";

/// The preference keys aggregated under `userPreferences` in the export
/// bundle, in their bundle field order.
pub const PREFERENCE_KEYS: [&str; 3] = [SELECTED_LANGUAGE, CUSTOM_APP_TITLE, SELECTED_CURRENCY];

/// Bucket key for a given date.
pub fn inventory_key(date: NaiveDate) -> String {
    format!("{INVENTORY_PREFIX}{}", format_date(date))
}

/// Recover the date from a bucket key. `None` when the key does not carry
/// the inventory prefix or its suffix is not a valid `YYYY-MM-DD` date.
pub fn parse_inventory_key(key: &str) -> Option<NaiveDate> {
    let suffix = key.strip_prefix(INVENTORY_PREFIX)?;
    parse_date(suffix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(inventory_key(date), "inventory_2024-06-01");
    }

    #[test]
    fn test_parse_inventory_key_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(parse_inventory_key(&inventory_key(date)), Some(date));
    }

    #[test]
    fn test_parse_inventory_key_rejects_foreign_keys() {
        assert_eq!(parse_inventory_key("predefinedItems"), None);
        assert_eq!(parse_inventory_key("inventory_2024-6-1"), None);
        assert_eq!(parse_inventory_key("inventory_2024-06-01_backup"), None);
        assert_eq!(parse_inventory_key("inventory_"), None);
    }
}
