//! Catalog export formats.
//!
//! The CSV dialect mirrors what older builds wrote: an unquoted header
//! line, then one row per entry with every field wrapped in double quotes
//! and embedded quotes doubled. Files produced here re-import cleanly
//! through the tolerant CSV reader (quotes are stripped on the way in).

use stockbook_core::csv::quote_field;
use stockbook_core::CatalogEntry;

/// The export header. Field names match the on-disk JSON field names.
pub const CSV_HEADER: &str = "name,category,unitType";

const CSV_TEMPLATE: &str = "name,category,unitType\n\
Apples,Food,lb\n\
Bananas,Food,lb\n\
Milk,Beverages,liters\n\
Bread,Food,pcs\n\
Coffee,Beverages,kg";

/// Render entries as CSV. No trailing newline.
pub fn entries_to_csv(entries: &[CatalogEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for entry in entries {
        lines.push(format!(
            "{},{},{}",
            quote_field(&entry.name),
            quote_field(&entry.category),
            quote_field(&entry.unit_type)
        ));
    }
    lines.join("\n")
}

/// Render entries as a pretty-printed JSON array.
pub fn entries_to_json(entries: &[CatalogEntry]) -> String {
    serde_json::to_string_pretty(entries).expect("catalog entries serialize to JSON")
}

/// A starter file showing the upload format.
pub fn csv_template() -> &'static str {
    CSV_TEMPLATE
}
