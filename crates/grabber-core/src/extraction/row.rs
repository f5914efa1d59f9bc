//! Numeric value extraction from a single report row.

use lazy_static::lazy_static;
use regex::Regex;

use crate::profile::ColumnRule;

lazy_static! {
    /// Thousands-grouped number: "7", "1 234", "12 345 678,9".
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"\b\d{1,3}(?:[ \u{00a0}]\d{3})*(?:[.,]\d{1,3})?\b"
    ).unwrap();
}

/// Picks the one numeric column meant as the value of a matched row.
#[derive(Debug, Clone, Default)]
pub struct RowExtractor {
    columns: ColumnRule,
}

impl RowExtractor {
    /// Extractor with the default column rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column rule.
    pub fn with_columns(mut self, columns: ColumnRule) -> Self {
        self.columns = columns;
        self
    }

    /// All numeric tokens in the row, in order.
    pub fn tokens<'a>(&self, row: &'a str) -> Vec<&'a str> {
        NUMERIC_TOKEN.find_iter(row).map(|m| m.as_str()).collect()
    }

    /// The normalized value of the row, or `None` for an unrecognized layout.
    pub fn extract(&self, row: &str) -> Option<String> {
        let tokens = self.tokens(row);
        self.columns.select(&tokens).map(normalize_number)
    }
}

/// Extract the value of a row with the default column rule.
pub fn extract_value(row: &str) -> Option<String> {
    RowExtractor::new().extract(row)
}

/// Strip grouping spaces and use `.` as the decimal separator.
pub fn normalize_number(token: &str) -> String {
    token
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{00a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_tokens_take_first() {
        assert_eq!(extract_value("Денежные средства 1 234 5 678"), Some("1234".to_string()));
    }

    #[test]
    fn test_four_tokens_take_third() {
        assert_eq!(
            extract_value("Итого 1 000 2 000 3 000 4 000"),
            Some("3000".to_string())
        );
    }

    #[test]
    fn test_other_counts_yield_nothing() {
        assert_eq!(extract_value("Выручка"), None);
        assert_eq!(extract_value("Выручка 1 234"), None);
        assert_eq!(extract_value("Выручка 1 000  2 000  3 000"), None);
        assert_eq!(extract_value("Выручка 1 2 3 4 5"), None);
    }

    #[test]
    fn test_tokenization() {
        let extractor = RowExtractor::new();
        assert_eq!(extractor.tokens("Амортизация 12 345 10 000"), vec!["12 345", "10 000"]);
        assert_eq!(extractor.tokens("Прибыль 1\u{00a0}234,5\t987,25"), vec!["1\u{00a0}234,5", "987,25"]);
        // Ungrouped long runs are not thousands-grouped numbers.
        assert!(extractor.tokens("Код 12345").is_empty());
    }

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("12 345 678"), "12345678");
        assert_eq!(normalize_number("1\u{00a0}234,5"), "1234.5");
        assert_eq!(normalize_number("42"), "42");
    }

    #[test]
    fn test_custom_columns() {
        let extractor = RowExtractor::new().with_columns(ColumnRule::empty().with(3, 1).with(1, 0));
        assert_eq!(extractor.extract("Итого 1 000  2 000  3 000"), Some("2000".to_string()));
        assert_eq!(extractor.extract("Итого 7 500"), Some("7500".to_string()));
        assert_eq!(extractor.extract("Итого 1 000  2 000"), None);
    }
}
