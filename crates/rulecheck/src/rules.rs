//! Rule sets
//!
//! A [`RuleSet`] maps each field to either a rule string or a nested rule set
//! applied to the field's own record. Field order is preserved and decides
//! which reject is reported first in fail-fast mode.
//!
//! ```
//! use rulecheck::rules::RuleSet;
//!
//! let rules = RuleSet::new()
//!     .field("name", "required|string")
//!     .nested("address", RuleSet::new().field("city", "required"));
//!
//! let from_json: RuleSet = serde_json::from_str(
//!     r#"{"name": "required|string", "address": {"city": "required"}}"#,
//! )
//! .unwrap();
//! assert_eq!(rules, from_json);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Rules for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// A rule string such as `"required|between:0,120"`.
    Rules(String),
    /// Rules for the fields of a nested record.
    Nested(RuleSet),
}

impl From<&str> for RuleSpec {
    fn from(rules: &str) -> Self {
        Self::Rules(rules.to_owned())
    }
}

impl From<String> for RuleSpec {
    fn from(rules: String) -> Self {
        Self::Rules(rules)
    }
}

impl From<RuleSet> for RuleSpec {
    fn from(rules: RuleSet) -> Self {
        Self::Nested(rules)
    }
}

/// Field name to [`RuleSpec`], in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: IndexMap<String, RuleSpec>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule string for `field`
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, field: impl Into<String>, rules: impl Into<String>) -> Self {
        self.insert(field, RuleSpec::Rules(rules.into()));
        self
    }

    /// Add a nested rule set for `field`
    #[must_use = "builder methods must be chained or built"]
    pub fn nested(mut self, field: impl Into<String>, rules: Self) -> Self {
        self.insert(field, RuleSpec::Nested(rules));
        self
    }

    /// Inserts or replaces the rules for `field`.
    pub fn insert(&mut self, field: impl Into<String>, spec: impl Into<RuleSpec>) {
        self.fields.insert(field.into(), spec.into());
    }

    /// Rules for `field`.
    pub fn get(&self, field: &str) -> Option<&RuleSpec> {
        self.fields.get(field)
    }

    /// Fields and their rules, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.fields.iter().map(|(field, spec)| (field.as_str(), spec))
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` when no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RuleSet
where
    K: Into<String>,
    V: Into<RuleSpec>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(field, spec)| (field.into(), spec.into()))
                .collect(),
        }
    }
}
