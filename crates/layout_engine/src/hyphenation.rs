//! Hyphenation rules
//!
//! A rule is a regular expression with two capture groups; every match is
//! rewritten as `${1}-${2}`, marking a legal break between the two groups.
//! Rule sets are usually authored with named character-class variables
//! (`V` for vowels, `C` for consonants) that are substituted into each
//! pattern before it is compiled.

use crate::{LayoutError, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Character inserted at break points by the default replacement
pub const BREAK_MARKER: char = '-';

/// Replacement template applied to every match
pub const DEFAULT_REPLACEMENT: &str = "${1}-${2}";

/// One compiled pattern and its replacement
#[derive(Debug, Clone)]
pub struct HyphenRule {
    pattern: Regex,
    replacement: String,
}

impl HyphenRule {
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_replacement(pattern, DEFAULT_REPLACEMENT)
    }

    pub fn with_replacement(pattern: &str, replacement: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| LayoutError::InvalidHyphenRule {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement.as_str()).into_owned()
    }
}

/// On-disk form of a rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyphenRuleFile {
    /// Placeholder name to character class
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Patterns, applied in order
    pub rules: Vec<String>,
}

/// Ordered list of hyphenation rules
#[derive(Debug, Clone, Default)]
pub struct HyphenRuleSet {
    rules: Vec<HyphenRule>,
}

impl HyphenRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<HyphenRule>) -> Self {
        Self { rules }
    }

    /// Compile patterns after substituting variables into them.
    ///
    /// Variables are substituted in name order, by plain text replacement.
    pub fn from_definitions(variables: &BTreeMap<String, String>, patterns: &[String]) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|pattern| {
                let expanded = variables
                    .iter()
                    .fold(pattern.clone(), |acc, (name, value)| acc.replace(name.as_str(), value));
                HyphenRule::new(&expanded)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: HyphenRuleFile = serde_json::from_str(json)?;
        Self::from_definitions(&file.variables, &file.rules)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let rules = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), rules = rules.len(), "Loaded hyphenation rules");
        Ok(rules)
    }

    pub fn push(&mut self, rule: HyphenRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order, returning the word with break markers
    pub fn hyphenate(&self, word: &str) -> String {
        self.rules.iter().fold(word.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Letter indices where `word` may be split.
    ///
    /// An index `i` means the first `i` letters stay on the current line.
    /// Positions at either end of the word are never returned.
    pub fn break_points(&self, word: &str) -> Vec<usize> {
        if self.rules.is_empty() {
            return Vec::new();
        }

        let length = word.chars().count();
        let mut points = Vec::new();
        let mut letters = 0;
        for ch in self.hyphenate(word).chars() {
            if ch != BREAK_MARKER {
                letters += 1;
            } else if letters > 0 && letters < length && points.last() != Some(&letters) {
                points.push(letters);
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn russian_variables() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("C".to_string(), "[бвгджзклмнпрстфхцчшщ]".to_string()),
            ("V".to_string(), "[аеёиоуыэюя]".to_string()),
        ])
    }

    #[test]
    fn test_single_rule() {
        let rules = HyphenRuleSet::from_rules(vec![HyphenRule::new("(ab)(cd)").unwrap()]);
        assert_eq!(rules.hyphenate("abcd"), "ab-cd");
        assert_eq!(rules.break_points("abcd"), vec![2]);
    }

    #[test]
    fn test_variables_substituted() {
        let patterns = vec!["(V)(V)".to_string()];
        let rules = HyphenRuleSet::from_definitions(&russian_variables(), &patterns).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.hyphenate("аоа"), "а-оа");
    }

    #[test]
    fn test_rules_apply_in_order() {
        let patterns = vec!["(CV)(CV)".to_string(), "(V)(CV)".to_string()];
        let rules = HyphenRuleSet::from_definitions(&russian_variables(), &patterns).unwrap();
        assert_eq!(rules.hyphenate("мама"), "ма-ма");
        assert_eq!(rules.break_points("мама"), vec![2]);
        assert_eq!(rules.break_points("молоко"), vec![2, 4]);
    }

    #[test]
    fn test_break_points_skip_word_edges() {
        let rules = HyphenRuleSet::from_rules(vec![
            HyphenRule::new("^()(a)").unwrap(),
            HyphenRule::new("(c)()$").unwrap(),
        ]);
        assert!(rules.break_points("abc").is_empty());
    }

    #[test]
    fn test_empty_rule_set() {
        let rules = HyphenRuleSet::new();
        assert!(rules.is_empty());
        assert_eq!(rules.hyphenate("word"), "word");
        assert!(rules.break_points("word").is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = HyphenRule::new("(unclosed").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidHyphenRule { .. }));
    }

    #[test]
    fn test_rule_file_from_json() {
        let json = r#"{
            "variables": { "v": "[aeiou]" },
            "rules": ["(v)(v)"]
        }"#;
        let rules = HyphenRuleSet::from_json(json).unwrap();
        assert_eq!(rules.break_points("beautiful"), vec![2]);
    }

    #[test]
    fn test_load_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{ "rules": ["(ab)(cd)"] }"#).unwrap();

        let rules = HyphenRuleSet::load(&path).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(HyphenRuleSet::load(&dir.path().join("missing.json")).is_err());
    }
}
