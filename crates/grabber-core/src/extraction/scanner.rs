//! Single-field scanning and ambiguity resolution.

use std::collections::BTreeSet;

use tracing::trace;

use crate::models::record::{FieldValue, UnknownReason};
use crate::profile::{FieldSpec, KeywordSpec, PatternSpec};

use super::row::RowExtractor;

/// Scan the whole text for one field and resolve it to a single value.
pub fn scan_field(spec: &FieldSpec, text: &str) -> FieldValue {
    let candidates = match spec {
        FieldSpec::Keyword(spec) => keyword_candidates(spec, text),
        FieldSpec::Pattern(spec) => pattern_candidates(spec, text),
    };
    resolve(candidates)
}

/// Empty set is not found, one value wins, anything more is ambiguous.
fn resolve(candidates: BTreeSet<String>) -> FieldValue {
    let mut iter = candidates.into_iter();
    match (iter.next(), iter.next()) {
        (None, _) => FieldValue::Unknown(UnknownReason::NotFound),
        (Some(value), None) => FieldValue::Known(value),
        (Some(_), Some(_)) => FieldValue::Unknown(UnknownReason::Ambiguous),
    }
}

fn keyword_candidates(spec: &KeywordSpec, text: &str) -> BTreeSet<String> {
    let found: BTreeSet<&str> = spec
        .matchers()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(keyword, _)| keyword)
        .collect();

    trace!("Found keywords: {:?}", found);

    found
        .into_iter()
        .filter_map(|keyword| spec.normalize(keyword))
        .map(str::to_string)
        .collect()
}

fn pattern_candidates(spec: &PatternSpec, text: &str) -> BTreeSet<String> {
    let extractor = RowExtractor::new().with_columns(spec.columns().clone());
    let mut candidates = BTreeSet::new();

    for pattern in spec.patterns() {
        for row in pattern.find_iter(text) {
            match extractor.extract(row.as_str()) {
                Some(value) => {
                    trace!("Row {:?} -> {}", row.as_str().trim(), value);
                    candidates.insert(value);
                }
                None => trace!("Row {:?} has no recognizable value", row.as_str().trim()),
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProfileError;
    use crate::profile::{ColumnRule, ProfileConfig};
    use pretty_assertions::assert_eq;

    fn currency_spec(templates: &[&str]) -> FieldSpec {
        let profile = ProfileConfig::new()
            .keyword_field(
                "currency",
                [("рублей", "RUB"), ("руб", "RUB"), ("долларов", "USD")],
                templates.iter().copied(),
            )
            .compile()
            .unwrap();
        profile.field("currency").unwrap().clone()
    }

    fn pattern_spec(patterns: &[&str]) -> FieldSpec {
        let profile = ProfileConfig::new()
            .pattern_field("amortization", patterns.iter().copied())
            .compile()
            .unwrap();
        profile.field("amortization").unwrap().clone()
    }

    #[test]
    fn test_resolve_policy() {
        assert_eq!(resolve(BTreeSet::new()), FieldValue::Unknown(UnknownReason::NotFound));
        assert_eq!(
            resolve(BTreeSet::from(["RUB".to_string()])),
            FieldValue::Known("RUB".to_string())
        );
        assert_eq!(
            resolve(BTreeSet::from(["RUB".to_string(), "USD".to_string()])),
            FieldValue::Unknown(UnknownReason::Ambiguous)
        );
    }

    #[test]
    fn test_keyword_collapse() {
        let spec = currency_spec(&["{}"]);
        let text = "Отчет в тысячах рублей. Итого, тыс. руб.";
        assert_eq!(scan_field(&spec, text), FieldValue::Known("RUB".to_string()));
    }

    #[test]
    fn test_keyword_ambiguity() {
        let spec = currency_spec(&["{}"]);
        let text = "в тысячах рублей; курс 90 рублей за 1 доллар, 10 долларов";
        assert_eq!(scan_field(&spec, text), FieldValue::Unknown(UnknownReason::Ambiguous));
    }

    #[test]
    fn test_keyword_not_found() {
        let spec = currency_spec(&["{}"]);
        assert_eq!(
            scan_field(&spec, "Сумма в евро"),
            FieldValue::Unknown(UnknownReason::NotFound)
        );
    }

    #[test]
    fn test_templates_constrain_context() {
        let spec = currency_spec(&[r"тыс\.\s*{}"]);
        let text = "Показатели в тыс. руб.\nСправочно: 10 долларов";
        assert_eq!(scan_field(&spec, text), FieldValue::Known("RUB".to_string()));
    }

    #[test]
    fn test_keywords_without_templates_fail_to_compile() {
        let err = ProfileConfig::new()
            .keyword_field("currency", [("рублей", "RUB")], Vec::<String>::new())
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::MissingTemplates { .. }));
    }

    #[test]
    fn test_single_grouped_number_is_one_token() {
        // "12 345" is one thousands-grouped token, and one-token rows have no column.
        let spec = pattern_spec(&["Амортизация[0-9 ]*\n"]);
        assert_eq!(
            scan_field(&spec, "Амортизация 12 345\n"),
            FieldValue::Unknown(UnknownReason::NotFound)
        );
    }

    #[test]
    fn test_pattern_field_scenario() {
        let spec = pattern_spec(&["Амортизация[0-9 ]*\n"]);
        let text = "Выручка 500 400\nАмортизация 12 345 10 000\nПрочее\n";
        assert_eq!(scan_field(&spec, text), FieldValue::Known("12345".to_string()));
    }

    #[test]
    fn test_pattern_same_value_repeated() {
        let spec = pattern_spec(&["Амортизация[0-9 ]*\n"]);
        let text = "Амортизация 1 500 1 200\nпримечание\nАмортизация 1 500  900\n";
        assert_eq!(scan_field(&spec, text), FieldValue::Known("1500".to_string()));
    }

    #[test]
    fn test_pattern_conflicting_values() {
        let spec = pattern_spec(&["Амортизация[0-9 ]*\n"]);
        let text = "Амортизация 1 500 1 200\nАмортизация 2 000  900\n";
        assert_eq!(scan_field(&spec, text), FieldValue::Unknown(UnknownReason::Ambiguous));
    }

    #[test]
    fn test_unparseable_rows_are_discarded() {
        let spec = pattern_spec(&["Амортизация[0-9 ]*\n"]);
        let text = "Амортизация 1 500 1 200\nАмортизация 7\n";
        assert_eq!(scan_field(&spec, text), FieldValue::Known("1500".to_string()));

        assert_eq!(
            scan_field(&spec, "Амортизация 7\n"),
            FieldValue::Unknown(UnknownReason::NotFound)
        );
    }

    #[test]
    fn test_empty_pattern_list_resolves_unknown() {
        let spec = pattern_spec(&[]);
        assert_eq!(
            scan_field(&spec, "Амортизация 1 500 1 200\n"),
            FieldValue::Unknown(UnknownReason::NotFound)
        );
    }

    #[test]
    fn test_pattern_column_override() {
        let profile = ProfileConfig::new()
            .pattern_field_with_columns(
                "sales",
                ["Выручка[0-9 ]*\n"],
                ColumnRule::empty().with(3, 2),
            )
            .compile()
            .unwrap();
        let spec = profile.field("sales").unwrap();
        assert_eq!(
            scan_field(spec, "Выручка 1 000  2 000  3 000\n"),
            FieldValue::Known("3000".to_string())
        );
    }

    #[test]
    fn test_order_independence() {
        let text = "в тыс. руб.\nтакже в рублей\nАмортизация 1 500 1 200\nАмортизация 1 500 1 100\n";

        let forward = currency_spec(&["{}", r"тыс\.\s*{}"]);
        let backward = currency_spec(&[r"тыс\.\s*{}", "{}"]);
        assert_eq!(scan_field(&forward, text), scan_field(&backward, text));

        let forward = pattern_spec(&["Амортизация[0-9 ]*\n", "Амортизация 1 500[0-9 ]*\n"]);
        let backward = pattern_spec(&["Амортизация 1 500[0-9 ]*\n", "Амортизация[0-9 ]*\n"]);
        assert_eq!(scan_field(&forward, text), scan_field(&backward, text));
        assert_eq!(scan_field(&forward, text), FieldValue::Known("1500".to_string()));
    }
}
