//! Conjunctive attribute predicates over device records.
//!
//! A [`Predicate`] is a set of `attribute = value` tests joined by AND. Values
//! are compared case-insensitively using Unicode simple case folding, which
//! does not depend on the process locale.

use crate::keys::AttributeKey;
use crate::record::DeviceRecord;
use std::collections::BTreeMap;
use std::fmt;

/// An expected value with its lowercase form computed once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedValue {
    /// Original value (for display)
    pub value: String,
    /// Pre-computed lowercase (for matching)
    pub lower: String,
}

impl ExpectedValue {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let lower = value.chars().flat_map(char::to_lowercase).collect();
        Self { value, lower }
    }

    /// Case-insensitive equality against a record value.
    #[inline]
    pub fn equals(&self, actual: &str) -> bool {
        actual
            .chars()
            .flat_map(char::to_lowercase)
            .eq(self.lower.chars())
    }
}

impl From<&str> for ExpectedValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ExpectedValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Logical AND of case-insensitive equality tests. The empty predicate
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    terms: BTreeMap<AttributeKey, ExpectedValue>,
}

impl Predicate {
    /// The empty predicate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term, replacing any previous value for the same key.
    pub fn with(mut self, key: AttributeKey, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a term, returning the value it replaced.
    pub fn insert(&mut self, key: AttributeKey, value: impl Into<String>) -> Option<String> {
        self.terms
            .insert(key, ExpectedValue::new(value))
            .map(|previous| previous.value)
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.terms.get(&key).map(|v| v.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> {
        self.terms.iter().map(|(k, v)| (*k, v.value.as_str()))
    }

    /// Check whether a record satisfies every term.
    ///
    /// A term whose attribute is absent from the record fails. Evaluation
    /// stops at the first failing term.
    pub fn matches(&self, record: &DeviceRecord) -> bool {
        self.terms.iter().all(|(key, expected)| {
            record
                .get(*key)
                .is_some_and(|actual| expected.equals(actual))
        })
    }
}

impl<V: Into<String>> FromIterator<(AttributeKey, V)> for Predicate {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, V)>>(iter: I) -> Self {
        let mut predicate = Predicate::new();
        predicate.extend(iter);
        predicate
    }
}

impl<V: Into<String>> Extend<(AttributeKey, V)> for Predicate {
    fn extend<I: IntoIterator<Item = (AttributeKey, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("all devices");
        }
        f.write_str("query {")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value:?}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DeviceRecord {
        DeviceRecord::from_object(value.as_object().unwrap()).unwrap()
    }

    #[test]
    fn test_expected_value_equals() {
        let expected = ExpectedValue::new("iOS");
        assert!(expected.equals("iOS"));
        assert!(expected.equals("ios"));
        assert!(expected.equals("IOS"));
        assert!(!expected.equals("iOS 17"));
        assert!(!expected.equals(""));
    }

    #[test]
    fn test_expected_value_is_not_ascii_only() {
        let expected = ExpectedValue::new("ÉQUIPE-München");
        assert!(expected.equals("équipe-münchen"));
    }

    #[test]
    fn test_case_insensitive_match() {
        let r = record(json!({"id": "1", "deviceOs": "iOS"}));
        assert!(Predicate::new()
            .with(AttributeKey::DeviceOs, "ios")
            .matches(&r));
    }

    #[test]
    fn test_all_terms_must_match() {
        let r = record(json!({
            "id": "1",
            "deviceOs": "Android",
            "displayStatus": "Available",
            "agentLocation": "Bangalore"
        }));

        let both = Predicate::new()
            .with(AttributeKey::DeviceOs, "android")
            .with(AttributeKey::DisplayStatus, "available");
        assert!(both.matches(&r));

        let one_wrong = both.clone().with(AttributeKey::AgentLocation, "Berlin");
        assert!(!one_wrong.matches(&r));
    }

    #[test]
    fn test_absent_attribute_does_not_match() {
        let r = record(json!({"id": "1", "model": null}));
        assert!(!Predicate::new().with(AttributeKey::Model, "").matches(&r));
        assert!(!Predicate::new().with(AttributeKey::Udid, "x").matches(&r));
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let r = record(json!({"id": "9"}));
        assert!(Predicate::new().matches(&r));
        assert!(Predicate::new().is_empty());
    }

    #[test]
    fn test_insert_replaces_previous_value() {
        let mut predicate = Predicate::new();
        assert_eq!(predicate.insert(AttributeKey::DeviceOs, "iOS"), None);
        assert_eq!(
            predicate.insert(AttributeKey::DeviceOs, "Android"),
            Some("iOS".to_string())
        );
        assert_eq!(predicate.len(), 1);
        assert_eq!(predicate.get(AttributeKey::DeviceOs), Some("Android"));
    }

    #[test]
    fn test_display_echoes_terms() {
        let predicate: Predicate = [
            (AttributeKey::DisplayStatus, "available"),
            (AttributeKey::DeviceOs, "iOS"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            predicate.to_string(),
            r#"query {deviceOs: "iOS", displayStatus: "available"}"#
        );
        assert_eq!(Predicate::new().to_string(), "all devices");
    }
}
