//! Extraction profiles.
//!
//! A profile declares, per field, how the field is recognized in report
//! text. It comes in two forms:
//! - [`ProfileConfig`]: the serializable description (JSON on disk).
//! - [`ExtractionProfile`]: the validated, compiled form used for scanning.
//!
//! Compilation fails fast on malformed entries so that a bad profile never
//! silently degrades into unknown fields.

mod builtin;
mod unique;

use std::collections::BTreeMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, Result};

/// Substitution point inside keyword templates.
pub const PLACEHOLDER: &str = "{}";

/// Serializable profile description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Field name to field description.
    #[serde(deserialize_with = "unique::deserialize")]
    pub fields: BTreeMap<String, FieldConfig>,
}

/// Serializable description of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldConfig {
    /// Categorical field chosen from a fixed vocabulary.
    Keyword {
        /// Literal keyword to normalized value.
        #[serde(deserialize_with = "unique::deserialize")]
        keywords: BTreeMap<String, String>,
        /// Regex templates with one `{}` placeholder for the keyword.
        #[serde(default)]
        templates: Vec<String>,
    },
    /// Numeric field read out of a matched row.
    Pattern {
        /// Regexes matching whole rows.
        #[serde(default)]
        patterns: Vec<String>,
        /// Which numeric column holds the value.
        #[serde(default)]
        columns: ColumnRule,
    },
}

impl ProfileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword field.
    pub fn keyword_field<K, V, T>(
        mut self,
        name: impl Into<String>,
        keywords: impl IntoIterator<Item = (K, V)>,
        templates: impl IntoIterator<Item = T>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        T: Into<String>,
    {
        self.fields.insert(
            name.into(),
            FieldConfig::Keyword {
                keywords: keywords.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
                templates: templates.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Add a pattern field using the default column rule.
    pub fn pattern_field<P: Into<String>>(
        self,
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = P>,
    ) -> Self {
        self.pattern_field_with_columns(name, patterns, ColumnRule::default())
    }

    /// Add a pattern field with an explicit column rule.
    pub fn pattern_field_with_columns<P: Into<String>>(
        mut self,
        name: impl Into<String>,
        patterns: impl IntoIterator<Item = P>,
        columns: ColumnRule,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldConfig::Pattern {
                patterns: patterns.into_iter().map(Into::into).collect(),
                columns,
            },
        );
        self
    }

    /// Validate and compile into an [`ExtractionProfile`].
    pub fn compile(&self) -> std::result::Result<ExtractionProfile, ProfileError> {
        let mut fields = BTreeMap::new();

        for (name, field) in &self.fields {
            if name.trim().is_empty() {
                return Err(ProfileError::EmptyFieldName);
            }

            let spec = match field {
                FieldConfig::Keyword { keywords, templates } => {
                    FieldSpec::Keyword(KeywordSpec::compile(name, keywords, templates)?)
                }
                FieldConfig::Pattern { patterns, columns } => {
                    FieldSpec::Pattern(PatternSpec::compile(name, patterns, columns)?)
                }
            };
            fields.insert(name.clone(), spec);
        }

        debug!("Compiled extraction profile with {} fields", fields.len());
        Ok(ExtractionProfile { fields })
    }
}

/// Mapping from numeric-token count in a row to the index of the token that
/// holds the value. Rows with any other token count yield nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnRule {
    columns: BTreeMap<usize, usize>,
}

impl ColumnRule {
    /// A rule that selects nothing.
    pub fn empty() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// Select `column` (zero-based) when a row has exactly `count` tokens.
    pub fn with(mut self, count: usize, column: usize) -> Self {
        self.columns.insert(count, column);
        self
    }

    /// Pick the token for this row, if the layout is one the rule knows.
    pub fn select<'a>(&self, tokens: &[&'a str]) -> Option<&'a str> {
        self.columns
            .get(&tokens.len())
            .and_then(|&column| tokens.get(column).copied())
    }

    fn validate(&self, field: &str) -> std::result::Result<(), ProfileError> {
        for (&count, &column) in &self.columns {
            if column >= count {
                return Err(ProfileError::Column {
                    field: field.to_string(),
                    count,
                    column,
                });
            }
        }
        Ok(())
    }
}

/// First of two columns (current period), third of four (second table pair).
impl Default for ColumnRule {
    fn default() -> Self {
        Self::empty().with(2, 0).with(4, 2)
    }
}

/// Compiled description of one field.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    Keyword(KeywordSpec),
    Pattern(PatternSpec),
}

/// Keyword table with compiled per-keyword matchers.
#[derive(Debug, Clone)]
pub struct KeywordSpec {
    keywords: BTreeMap<String, String>,
    templates: Vec<String>,
    /// One regex per (keyword, template) pair.
    matchers: Vec<(String, Regex)>,
}

impl KeywordSpec {
    fn compile(
        field: &str,
        keywords: &BTreeMap<String, String>,
        templates: &[String],
    ) -> std::result::Result<Self, ProfileError> {
        if !keywords.is_empty() && templates.is_empty() {
            return Err(ProfileError::MissingTemplates {
                field: field.to_string(),
            });
        }

        for template in templates {
            if template.matches(PLACEHOLDER).count() != 1 {
                return Err(ProfileError::Template {
                    field: field.to_string(),
                    template: template.clone(),
                });
            }
        }

        let mut matchers = Vec::with_capacity(keywords.len() * templates.len());
        for keyword in keywords.keys() {
            if keyword.is_empty() {
                return Err(ProfileError::EmptyKeyword {
                    field: field.to_string(),
                });
            }
            for template in templates {
                let pattern = template.replacen(PLACEHOLDER, &regex::escape(keyword), 1);
                let regex = Regex::new(&pattern).map_err(|source| ProfileError::Pattern {
                    field: field.to_string(),
                    pattern,
                    source,
                })?;
                matchers.push((keyword.clone(), regex));
            }
        }

        Ok(Self {
            keywords: keywords.clone(),
            templates: templates.to_vec(),
            matchers,
        })
    }

    /// Normalized value for a keyword.
    pub fn normalize(&self, keyword: &str) -> Option<&str> {
        self.keywords.get(keyword).map(String::as_str)
    }

    pub fn keywords(&self) -> &BTreeMap<String, String> {
        &self.keywords
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub(crate) fn matchers(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.matchers.iter().map(|(k, re)| (k.as_str(), re))
    }
}

/// Row patterns with the column rule used to read their value.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    patterns: Vec<Regex>,
    columns: ColumnRule,
}

impl PatternSpec {
    fn compile(
        field: &str,
        patterns: &[String],
        columns: &ColumnRule,
    ) -> std::result::Result<Self, ProfileError> {
        columns.validate(field)?;

        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ProfileError::Pattern {
                    field: field.to_string(),
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            columns: columns.clone(),
        })
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    pub fn columns(&self) -> &ColumnRule {
        &self.columns
    }
}

/// Validated, compiled profile. Immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct ExtractionProfile {
    fields: BTreeMap<String, FieldSpec>,
}

impl ExtractionProfile {
    /// The built-in Russian financial report profile.
    pub fn builtin() -> std::result::Result<Self, ProfileError> {
        builtin::report_profile().compile()
    }

    /// Parse and compile a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProfileConfig = serde_json::from_str(json)?;
        Ok(config.compile()?)
    }

    /// Load and compile a profile from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loading extraction profile from {}", path.display());
        Self::from_json(&content)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterate fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializable form of this profile.
    pub fn to_config(&self) -> ProfileConfig {
        let fields = self
            .fields
            .iter()
            .map(|(name, spec)| {
                let field = match spec {
                    FieldSpec::Keyword(spec) => FieldConfig::Keyword {
                        keywords: spec.keywords.clone(),
                        templates: spec.templates.clone(),
                    },
                    FieldSpec::Pattern(spec) => FieldConfig::Pattern {
                        patterns: spec.patterns.iter().map(|re| re.as_str().to_string()).collect(),
                        columns: spec.columns.clone(),
                    },
                };
                (name.clone(), field)
            })
            .collect();
        ProfileConfig { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_profile_compiles() {
        let profile = ExtractionProfile::builtin().unwrap();
        for name in [
            "currency",
            "measure",
            "cash",
            "equity",
            "liabilities",
            "equity_liabilities",
            "sales",
            "interest_income",
            "interest_expense",
            "profit_before_tax",
            "clean_profit",
            "amortization",
            "capitalization",
        ] {
            assert!(profile.field(name).is_some(), "missing field {}", name);
        }
        assert!(matches!(profile.field("currency"), Some(FieldSpec::Keyword(_))));
        assert!(matches!(profile.field("cash"), Some(FieldSpec::Pattern(_))));
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let err = ProfileConfig::new()
            .keyword_field("currency", [("руб", "RUB")], ["рубли"])
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::Template { .. }));
    }

    #[test]
    fn test_template_with_two_placeholders_is_rejected() {
        let err = ProfileConfig::new()
            .keyword_field("currency", [("руб", "RUB")], ["{} {}"])
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::Template { .. }));
    }

    #[test]
    fn test_keywords_without_templates_are_rejected() {
        let err = ProfileConfig::new()
            .keyword_field("currency", [("рублей", "RUB")], Vec::<String>::new())
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::MissingTemplates { ref field } if field == "currency"));

        let err = ExtractionProfile::from_json(
            r#"{"fields": {"currency": {"kind": "keyword", "keywords": {"рублей": "RUB"}}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no templates"));
    }

    #[test]
    fn test_empty_keyword_table_compiles() {
        let profile = ProfileConfig::new()
            .keyword_field("currency", Vec::<(String, String)>::new(), Vec::<String>::new())
            .compile()
            .unwrap();
        assert!(matches!(profile.field("currency"), Some(FieldSpec::Keyword(_))));
    }

    #[test]
    fn test_duplicate_field_name_is_rejected() {
        let err = ExtractionProfile::from_json(
            r#"{"fields": {
                "cash": {"kind": "pattern", "patterns": ["Касса[0-9 ]*\n"]},
                "cash": {"kind": "pattern", "patterns": ["Денежные[0-9 ]*\n"]}
            }}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains(r#""cash" is defined more than once"#));
    }

    #[test]
    fn test_duplicate_keyword_is_rejected() {
        let err = ExtractionProfile::from_json(
            r#"{"fields": {"currency": {
                "kind": "keyword",
                "keywords": {"руб": "RUB", "руб": "USD"},
                "templates": ["{}"]
            }}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains(r#""руб" is defined more than once"#));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = ProfileConfig::new()
            .pattern_field("cash", ["Денежные средства ("])
            .compile()
            .unwrap_err();
        match err {
            ProfileError::Pattern { field, .. } => assert_eq!(field, "cash"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_column_out_of_range_is_rejected() {
        let err = ProfileConfig::new()
            .pattern_field_with_columns("cash", ["Касса"], ColumnRule::empty().with(2, 2))
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::Column { count: 2, column: 2, .. }));
    }

    #[test]
    fn test_empty_field_name_is_rejected() {
        let err = ProfileConfig::new()
            .pattern_field(" ", Vec::<String>::new())
            .compile()
            .unwrap_err();
        assert!(matches!(err, ProfileError::EmptyFieldName));
    }

    #[test]
    fn test_keywords_are_literal() {
        let profile = ProfileConfig::new()
            .keyword_field("measure", [("млн.", "1000000")], ["{}"])
            .compile()
            .unwrap();
        let Some(FieldSpec::Keyword(spec)) = profile.field("measure") else {
            panic!("expected keyword field");
        };
        let (_, regex) = spec.matchers().next().unwrap();
        assert!(regex.is_match("млн. руб"));
        assert!(!regex.is_match("млнX руб"));
    }

    #[test]
    fn test_json_round_trip_preserves_profile() {
        let config = ExtractionProfile::builtin().unwrap().to_config();
        let json = serde_json::to_string(&config).unwrap();
        let reloaded = ExtractionProfile::from_json(&json).unwrap();
        assert_eq!(reloaded.to_config(), config);
    }

    #[test]
    fn test_json_defaults() {
        let profile = ExtractionProfile::from_json(
            r#"{"fields": {
                "amortization": {"kind": "pattern", "patterns": ["Амортизация[0-9 ]*\n"]},
                "capitalization": {"kind": "pattern"},
                "custom": {"kind": "pattern", "patterns": ["Итого"], "columns": {"3": 1}}
            }}"#,
        )
        .unwrap();

        let Some(FieldSpec::Pattern(spec)) = profile.field("amortization") else {
            panic!("expected pattern field");
        };
        assert_eq!(spec.columns(), &ColumnRule::default());

        let Some(FieldSpec::Pattern(spec)) = profile.field("capitalization") else {
            panic!("expected pattern field");
        };
        assert!(spec.patterns().is_empty());

        let Some(FieldSpec::Pattern(spec)) = profile.field("custom") else {
            panic!("expected pattern field");
        };
        assert_eq!(spec.columns().select(&["1", "2", "3"]), Some("2"));
        assert_eq!(spec.columns().select(&["1", "2"]), None);
    }

    #[test]
    fn test_default_column_rule() {
        let rule = ColumnRule::default();
        assert_eq!(rule.select(&["a", "b"]), Some("a"));
        assert_eq!(rule.select(&["a", "b", "c", "d"]), Some("c"));
        assert_eq!(rule.select(&["a"]), None);
        assert_eq!(rule.select(&["a", "b", "c"]), None);
        assert_eq!(rule.select(&[]), None);
    }
}
