//! Parsing for the two catalog ingestion formats.
//!
//! Both formats are line-oriented and forgiving: a bad row is recorded and
//! skipped, it never aborts the batch. The only hard failure is a CSV file
//! whose header has no recognizable name column.

use serde::Serialize;

use stockbook_core::csv::{split_line, split_line_unquoted};
use stockbook_core::{NewEntry, ValidationError};

/// A row that was dropped during parsing, with its 1-based line number in
/// the pasted/uploaded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// One parsed line: either a candidate entry or a recorded skip.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRow {
    Candidate(NewEntry),
    Invalid(SkippedRow),
}

/// Partition parsed rows into candidates and skips, preserving order.
pub fn split_rows(rows: Vec<ParsedRow>) -> (Vec<NewEntry>, Vec<SkippedRow>) {
    let mut candidates = Vec::new();
    let mut invalid = Vec::new();
    for row in rows {
        match row {
            ParsedRow::Candidate(candidate) => candidates.push(candidate),
            ParsedRow::Invalid(skipped) => invalid.push(skipped),
        }
    }
    (candidates, invalid)
}

/// Parse a multi-line bulk paste.
///
/// Each non-blank line is `Name, Category, UnitType` split naively on
/// commas. A missing category or unit type falls back to the provided
/// default, and a blank default falls back to `Other` / `pcs`. A line with
/// an empty name is recorded as invalid.
pub fn parse_bulk_text(text: &str, default_category: &str, default_unit_type: &str) -> Vec<ParsedRow> {
    let mut rows = Vec::new();
    for (line_no, line) in numbered_lines(text) {
        let parts = split_line(line);
        let name = parts.first().map(String::as_str).unwrap_or("");
        if name.is_empty() {
            rows.push(ParsedRow::Invalid(SkippedRow {
                line: line_no,
                reason: "empty name".to_string(),
            }));
            continue;
        }
        let category = first_non_empty(parts.get(1), default_category, "Other");
        let unit_type = first_non_empty(parts.get(2), default_unit_type, "pcs");
        rows.push(ParsedRow::Candidate(NewEntry::new(name, category, unit_type)));
    }
    rows
}

/// The columns a CSV header was resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub category: Option<usize>,
    pub unit_type: Option<usize>,
}

impl ColumnMap {
    /// Resolve columns from lowercased header cells by substring match.
    ///
    /// Each role scans the header left to right on its own: a cell
    /// containing `name` or `item` is the name column, `category` or
    /// `type` the category column, `unit` or `measurement` the unit-type
    /// column. One cell may satisfy several roles (a header of
    /// `unit type` binds both category and unit). No name column is the
    /// one hard failure.
    pub fn resolve(headers: &[String]) -> Result<Self, ValidationError> {
        let name = headers
            .iter()
            .position(|h| h.contains("name") || h.contains("item"))
            .ok_or(ValidationError::MissingNameColumn)?;
        let category = headers
            .iter()
            .position(|h| h.contains("category") || h.contains("type"));
        let unit_type = headers
            .iter()
            .position(|h| h.contains("unit") || h.contains("measurement"));
        Ok(Self {
            name,
            category,
            unit_type,
        })
    }
}

/// Parse an uploaded CSV file.
///
/// The first non-blank line is the header; see [`ColumnMap::resolve`] for
/// how columns bind. Data cells are trimmed and have every double-quote
/// character stripped, so an embedded comma splits the cell (historical
/// behavior, kept for compatibility with files exported by older builds).
/// Empty category/unit cells default to `Other` / `pcs`; an empty name
/// makes the row invalid.
pub fn parse_csv(text: &str) -> Result<Vec<ParsedRow>, ValidationError> {
    let mut lines = numbered_lines(text);

    let header_line = match lines.next() {
        Some((_, line)) => line,
        None => return Err(ValidationError::MissingNameColumn),
    };
    let headers: Vec<String> = split_line(header_line)
        .into_iter()
        .map(|cell| cell.to_lowercase())
        .collect();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let values = split_line_unquoted(line);
        let name = values.get(columns.name).map(String::as_str).unwrap_or("");
        if name.is_empty() {
            rows.push(ParsedRow::Invalid(SkippedRow {
                line: line_no,
                reason: "empty name".to_string(),
            }));
            continue;
        }
        let category = first_non_empty(columns.category.and_then(|i| values.get(i)), "", "Other");
        let unit_type = first_non_empty(columns.unit_type.and_then(|i| values.get(i)), "", "pcs");
        rows.push(ParsedRow::Candidate(NewEntry::new(name, category, unit_type)));
    }
    Ok(rows)
}

/// Non-blank lines of `text` with their 1-based line numbers.
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn first_non_empty(cell: Option<&String>, default: &str, fallback: &str) -> String {
    if let Some(value) = cell {
        if !value.is_empty() {
            return value.clone();
        }
    }
    let default = default.trim();
    if !default.is_empty() {
        return default.to_string();
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(rows: Vec<ParsedRow>) -> Vec<NewEntry> {
        split_rows(rows).0
    }

    #[test]
    fn test_bulk_lines_parse_with_defaults() {
        let text = "Apples, Food, kg\nBananas\n\nMilk, Beverages\n";
        let rows = parse_bulk_text(text, "Grocery", "lb");
        let parsed = candidates(rows);

        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], NewEntry::new("Apples", "Food", "kg"));
        assert_eq!(parsed[1], NewEntry::new("Bananas", "Grocery", "lb"));
        assert_eq!(parsed[2], NewEntry::new("Milk", "Beverages", "lb"));
    }

    #[test]
    fn test_bulk_blank_defaults_fall_back_to_builtin() {
        let rows = parse_bulk_text("Bread", "", "  ");
        let parsed = candidates(rows);
        assert_eq!(parsed[0], NewEntry::new("Bread", "Other", "pcs"));
    }

    #[test]
    fn test_bulk_empty_name_is_recorded_with_line_number() {
        let text = "Apples\n, Food, kg\nBananas";
        let (parsed, invalid) = split_rows(parse_bulk_text(text, "Other", "pcs"));

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            invalid,
            vec![SkippedRow {
                line: 2,
                reason: "empty name".to_string(),
            }]
        );
    }

    #[test]
    fn test_csv_header_matches_by_substring() {
        let text = "Product Name,Item Type,Unit of Measurement\nApples,Food,kg";
        let parsed = candidates(parse_csv(text).unwrap());
        assert_eq!(parsed, vec![NewEntry::new("Apples", "Food", "kg")]);
    }

    #[test]
    fn test_csv_item_counts_as_name_header() {
        let text = "item,category,unit\nBread,Food,pcs";
        let parsed = candidates(parse_csv(text).unwrap());
        assert_eq!(parsed, vec![NewEntry::new("Bread", "Food", "pcs")]);
    }

    #[test]
    fn test_csv_without_name_column_is_a_hard_failure() {
        let result = parse_csv("category,unit\nFood,kg");
        assert!(matches!(result, Err(ValidationError::MissingNameColumn)));

        let result = parse_csv("");
        assert!(matches!(result, Err(ValidationError::MissingNameColumn)));
    }

    #[test]
    fn test_csv_one_header_cell_can_bind_two_roles() {
        // "unit type" contains both "type" (category) and "unit".
        let columns = ColumnMap::resolve(&["name".to_string(), "unit type".to_string()]).unwrap();
        assert_eq!(columns.category, Some(1));
        assert_eq!(columns.unit_type, Some(1));

        let parsed = candidates(parse_csv("name,unit type\nFlour,kg").unwrap());
        assert_eq!(parsed, vec![NewEntry::new("Flour", "kg", "kg")]);
    }

    #[test]
    fn test_csv_cells_lose_quotes_and_embedded_commas_split() {
        let text = "name,category,unitType\n\"Jam, Strawberry\",Food,jar";
        let parsed = candidates(parse_csv(text).unwrap());
        // The quoted comma still splits: the name cell is just "Jam" and
        // the remaining cells shift right.
        assert_eq!(parsed, vec![NewEntry::new("Jam", "Strawberry", "Food")]);
    }

    #[test]
    fn test_csv_empty_cells_default() {
        let text = "name,category,unitType\nSalt,,\nPepper";
        let parsed = candidates(parse_csv(text).unwrap());
        assert_eq!(parsed[0], NewEntry::new("Salt", "Other", "pcs"));
        assert_eq!(parsed[1], NewEntry::new("Pepper", "Other", "pcs"));
    }

    #[test]
    fn test_csv_empty_name_rows_are_recorded() {
        let text = "name,category,unitType\n,Food,kg\nApples,Food,kg";
        let (parsed, invalid) = split_rows(parse_csv(text).unwrap());
        assert_eq!(parsed.len(), 1);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].line, 2);
    }

    #[test]
    fn test_csv_blank_lines_are_ignored() {
        let text = "\n\nname,category,unitType\n\nApples,Food,kg\n\n";
        let parsed = candidates(parse_csv(text).unwrap());
        assert_eq!(parsed.len(), 1);
    }
}
