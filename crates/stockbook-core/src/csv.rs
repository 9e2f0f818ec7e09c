//! CSV text primitives.
//!
//! The catalog's CSV dialect is not RFC 4180 and never was: rows are split
//! naively on commas and quote characters are stripped from cells, while
//! export always wraps every field in double quotes. These helpers keep
//! that dialect in one place; a general-purpose CSV parser would change
//! behavior on historical files.

/// Split a line on commas and trim each cell. No quote handling; this is
/// the bulk-add paste format.
pub fn split_line(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

/// Split a line on commas, trim each cell and strip every double-quote
/// character. Quoted values are unquoted before matching; an embedded
/// comma therefore still splits the cell.
pub fn split_line_unquoted(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Wrap a field in double quotes, doubling embedded quote characters.
/// Export quotes every field unconditionally.
pub fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_line_trims_cells() {
        assert_eq!(
            split_line("Apples , Food,kg "),
            vec!["Apples", "Food", "kg"]
        );
    }

    #[test]
    fn test_split_line_keeps_empty_cells() {
        assert_eq!(split_line("Milk,,liters"), vec!["Milk", "", "liters"]);
    }

    #[test]
    fn test_split_line_unquoted_strips_quotes() {
        assert_eq!(
            split_line_unquoted(r#""Apples","Food","kg""#),
            vec!["Apples", "Food", "kg"]
        );
        // An embedded comma still splits, the quotes simply vanish.
        assert_eq!(
            split_line_unquoted(r#""Jam, Strawberry",Food,jar"#),
            vec!["Jam", "Strawberry", "Food", "jar"]
        );
    }

    #[test]
    fn test_split_handles_trailing_carriage_return() {
        assert_eq!(split_line_unquoted("Milk,Beverages,liters\r"), vec![
            "Milk",
            "Beverages",
            "liters"
        ]);
    }

    #[test]
    fn test_quote_field_always_quotes() {
        assert_eq!(quote_field("Apples"), "\"Apples\"");
        assert_eq!(quote_field(""), "\"\"");
    }

    #[test]
    fn test_quote_field_doubles_embedded_quotes() {
        assert_eq!(quote_field(r#"6" nails"#), r#""6"" nails""#);
    }
}
