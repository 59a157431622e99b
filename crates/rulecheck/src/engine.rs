//! Validation engine
//!
//! [`Validator`] owns a [`Registry`] and a [`ValidatorConfig`]. Independent
//! validators share nothing, so they can run on different threads freely.
//!
//! # Evaluation order
//!
//! Fields are visited in rule-set order. For a field mapped to a nested rule
//! set, the engine recurses into the field's record if the field is present.
//! For a field mapped to a rule string, each parsed rule is dispatched:
//!
//! 1. a presence rule always runs, with the field name
//! 2. otherwise an unknown name passes, or fails under `strict_rules`
//! 3. otherwise the value rule runs if the field is present and is skipped if not
//!
//! With `resume_on_failed` off the first reject ends the whole call.
//!
//! # Examples
//!
//! ```
//! use rulecheck::prelude::*;
//! use serde_json::json;
//!
//! let validator = Validator::new();
//! let rules = RuleSet::new().field("age", "integer|between:18,65");
//!
//! let result = validator.validate_value(&json!({ "age": 15 }), &rules);
//! assert!(!result.is_success());
//! assert_eq!(result.rejects[0].rule, "between");
//! ```

use crate::config::{ConfigPatch, ValidatorConfig};
use crate::error::{InputError, RegistryError};
use crate::parser::{RuleDescriptor, parse};
use crate::registry::{Arity, Registry, ValidatorEntry};
use crate::result::{Reject, ValidationResult};
use crate::rules::{RuleSet, RuleSpec};
use crate::value::{Record, RecordExt, Value};
use serde::Deserialize;
use std::ops::ControlFlow;
use tracing::{debug, warn};

// ============================================================================
// VALIDATOR
// ============================================================================

/// A registry plus configuration; the entry point for validation.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: Registry,
    config: ValidatorConfig,
}

impl Validator {
    /// A validator with every built-in rule and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A validator with every built-in rule and the given configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// Starts building a validator.
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    /// Current configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Overwrites the options present in `patch`.
    pub fn set_config(&mut self, patch: impl Into<ConfigPatch>) {
        self.config.apply(patch.into());
        debug!(config = ?self.config, "validator configuration updated");
    }

    /// Like [`set_config`](Self::set_config), from a JSON object such as
    /// `{"resumeOnFailed": true}`. Unknown keys are ignored.
    pub fn set_config_json(&mut self, options: &serde_json::Value) -> Result<(), serde_json::Error> {
        let patch = ConfigPatch::deserialize(options)?;
        self.set_config(patch);
        Ok(())
    }

    /// The rule registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the rule registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Registers a value rule. See [`Registry::add`].
    pub fn add(
        &mut self,
        name: &str,
        entry: impl Into<ValidatorEntry>,
    ) -> Result<(), RegistryError> {
        self.registry.add(name, entry)
    }

    /// Registers a closure as a value rule. See [`Registry::add_predicate`].
    pub fn add_predicate<F>(
        &mut self,
        name: &str,
        arity: Arity,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Record, &Value, &[String]) -> bool + Send + Sync + 'static,
    {
        self.registry.add_predicate(name, arity, func)
    }

    /// Registers a pattern as a value rule. See [`Registry::add_pattern`].
    pub fn add_pattern(&mut self, name: &str, pattern: &str) -> Result<(), RegistryError> {
        self.registry.add_pattern(name, pattern)
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Validates `record` against `rules`.
    pub fn validate(&self, record: &Record, rules: &RuleSet) -> ValidationResult {
        let mut run = Run {
            registry: &self.registry,
            config: self.config,
            rejects: Vec::new(),
        };
        // A break only means fail-fast stopped early; the reject is recorded.
        let _ = run.record(record, rules, "");

        let result = ValidationResult::from_rejects(run.rejects);
        debug!(
            fields = rules.len(),
            status = ?result.status,
            rejects = result.rejects.len(),
            "validated record"
        );
        result
    }

    /// Validates a record supplied as JSON text.
    ///
    /// Text that is not a JSON object yields a failed result holding a single
    /// `invalid_input` reject; no rule is evaluated.
    pub fn validate_json(&self, input: &str, rules: &RuleSet) -> ValidationResult {
        match record_from_str(input) {
            Ok(record) => self.validate(&record, rules),
            Err(err) => invalid_input(&err),
        }
    }

    /// Validates a record supplied as a JSON value. Non-objects are invalid input.
    pub fn validate_value(&self, input: &serde_json::Value, rules: &RuleSet) -> ValidationResult {
        match Value::from(input.clone()) {
            Value::Object(record) => self.validate(&record, rules),
            _ => invalid_input(&InputError::NotAnObject {
                found: json_type(input),
            }),
        }
    }

    /// Validates `record` against a rule set supplied as JSON text.
    pub fn validate_rules_json(
        &self,
        record: &Record,
        rules: &str,
    ) -> Result<ValidationResult, InputError> {
        let rules: RuleSet = serde_json::from_str(rules)?;
        Ok(self.validate(record, &rules))
    }
}

/// Parses JSON text into a record.
pub fn record_from_str(input: &str) -> Result<Record, InputError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    let found = json_type(&value);
    Record::from_json(value).ok_or(InputError::NotAnObject { found })
}

fn invalid_input(err: &InputError) -> ValidationResult {
    debug!(error = %err, "input is not a record");
    ValidationResult::invalid_input(err.to_string())
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// State of one `validate` call.
struct Run<'a> {
    registry: &'a Registry,
    config: ValidatorConfig,
    rejects: Vec<Reject>,
}

impl Run<'_> {
    fn record(&mut self, record: &Record, rules: &RuleSet, path: &str) -> ControlFlow<()> {
        for (field, spec) in rules.iter() {
            match spec {
                RuleSpec::Nested(nested) => {
                    let Some(value) = record.get(field) else {
                        continue;
                    };
                    let empty = Record::new();
                    let child = value.as_record().unwrap_or(&empty);
                    self.record(child, nested, &join_path(path, field))?;
                }
                RuleSpec::Rules(rule_string) => {
                    for rule in parse(rule_string) {
                        if self.passes(record, field, &rule) {
                            continue;
                        }
                        self.reject(path, field, rule);
                        if !self.config.resume_on_failed {
                            return ControlFlow::Break(());
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    fn passes(&self, record: &Record, field: &str, rule: &RuleDescriptor) -> bool {
        let name = rule.name.as_str();

        if let Some(require) = self.registry.require(name) {
            let passed = require.call(name, record, field, &rule.args);
            debug!(field, rule = name, passed, "presence rule");
            return passed;
        }

        let Some(entry) = self.registry.validator(name) else {
            if self.config.strict_rules {
                warn!(field, rule = name, "unknown rule");
                return false;
            }
            debug!(field, rule = name, "unknown rule ignored");
            return true;
        };

        let Some(value) = record.get(field) else {
            return true;
        };
        let passed = entry.check(name, record, value, &rule.args);
        debug!(field, rule = name, passed, "value rule");
        passed
    }

    fn reject(&mut self, path: &str, field: &str, rule: RuleDescriptor) {
        let mut reject = Reject::new(field, rule.name)
            .with_path(path)
            .with_args(rule.args);
        if !self.registry.contains(&reject.rule) {
            reject = reject.with_message("unknown rule");
        }
        self.rejects.push(reject);
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_owned()
    } else {
        format!("{path}.{field}")
    }
}

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Debug)]
enum Pending {
    Entry(String, ValidatorEntry),
    Pattern(String, String),
}

/// Builder for [`Validator`]. Registrations are checked in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    pending: Vec<Pending>,
}

impl ValidatorBuilder {
    /// Set the whole configuration
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set `resume_on_failed` (defaults to `false`)
    #[must_use = "builder methods must be chained or built"]
    pub fn resume_on_failed(mut self, resume: bool) -> Self {
        self.config.resume_on_failed = resume;
        self
    }

    /// Set `strict_rules` (defaults to `false`)
    #[must_use = "builder methods must be chained or built"]
    pub fn strict_rules(mut self, strict: bool) -> Self {
        self.config.strict_rules = strict;
        self
    }

    /// Register a value rule
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, name: impl Into<String>, entry: impl Into<ValidatorEntry>) -> Self {
        self.pending.push(Pending::Entry(name.into(), entry.into()));
        self
    }

    /// Register a closure as a value rule
    #[must_use = "builder methods must be chained or built"]
    pub fn predicate<F>(self, name: impl Into<String>, arity: Arity, func: F) -> Self
    where
        F: Fn(&Record, &Value, &[String]) -> bool + Send + Sync + 'static,
    {
        self.rule(name, ValidatorEntry::predicate(arity, func))
    }

    /// Register a pattern as a value rule
    #[must_use = "builder methods must be chained or built"]
    pub fn pattern(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.pending
            .push(Pending::Pattern(name.into(), pattern.into()));
        self
    }

    /// Registers the pending rules and builds the validator.
    pub fn build(self) -> Result<Validator, RegistryError> {
        let mut validator = Validator::with_config(self.config);
        for pending in self.pending {
            match pending {
                Pending::Entry(name, entry) => validator.add(&name, entry)?,
                Pending::Pattern(name, pattern) => validator.add_pattern(&name, &pattern)?,
            }
        }
        Ok(validator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    fn pairs(result: &ValidationResult) -> Vec<(String, String)> {
        result
            .rejects
            .iter()
            .map(|r| (r.full_path(), r.rule.clone()))
            .collect()
    }

    #[test]
    fn value_rules_skip_absent_fields() {
        let validator = Validator::new();
        let rules = RuleSet::new().field("nick", "alpha|size:3");
        assert!(validator.validate(&Record::new(), &rules).is_success());
    }

    #[test]
    fn presence_rules_run_on_absent_fields() {
        let validator = Validator::new();
        let rules = RuleSet::new().field("x", "required");
        let result = validator.validate(&Record::new(), &rules);
        assert_eq!(pairs(&result), vec![("x".into(), "required".into())]);
    }

    #[test]
    fn falsy_present_value_fails_required_but_still_runs_value_rules() {
        let validator = Validator::with_config(ValidatorConfig {
            resume_on_failed: true,
            strict_rules: false,
        });
        let rules = RuleSet::new().field("name", "required|alpha");
        let result = validator.validate(&record(json!({"name": ""})), &rules);
        assert_eq!(
            pairs(&result),
            vec![
                ("name".into(), "required".into()),
                ("name".into(), "alpha".into())
            ]
        );
    }

    #[test]
    fn unknown_rules_pass_unless_strict() {
        let rules = RuleSet::new().field("a", "requird|string");
        let data = record(json!({"a": "x"}));

        assert!(Validator::new().validate(&data, &rules).is_success());

        let strict = Validator::builder().strict_rules(true).build().unwrap();
        let result = strict.validate(&data, &rules);
        let reject = result.first_reject().unwrap();
        assert_eq!(reject.rule, "requird");
        assert_eq!(reject.message.as_deref(), Some("unknown rule"));
    }

    #[test]
    fn nested_paths_are_dotted() {
        let validator = Validator::new();
        let rules = RuleSet::new().nested(
            "address",
            RuleSet::new().nested("geo", RuleSet::new().field("lat", "numeric")),
        );
        let data = record(json!({"address": {"geo": {"lat": "north"}}}));
        let result = validator.validate(&data, &rules);
        assert_eq!(pairs(&result), vec![("address.geo.lat".into(), "numeric".into())]);
        assert_eq!(result.rejects[0].path, "address.geo");
    }

    #[test]
    fn nested_rules_over_scalar_see_an_empty_record() {
        let validator = Validator::new();
        let rules = RuleSet::new().nested("address", RuleSet::new().field("city", "required"));
        let result = validator.validate(&record(json!({"address": "Main St"})), &rules);
        assert_eq!(pairs(&result), vec![("address.city".into(), "required".into())]);
    }

    #[test]
    fn nested_rules_over_absent_field_are_skipped() {
        let validator = Validator::new();
        let rules = RuleSet::new().nested("address", RuleSet::new().field("city", "required"));
        assert!(validator.validate(&Record::new(), &rules).is_success());
    }

    #[test]
    fn arity_mismatch_is_a_reject() {
        let validator = Validator::new();
        let rules = RuleSet::new().field("age", "between:1");
        let result = validator.validate(&record(json!({"age": 5})), &rules);
        assert_eq!(result.rejects[0].rule, "between");
        assert_eq!(result.rejects[0].args, vec!["1"]);
    }

    #[test]
    fn set_config_merges() {
        let mut validator = Validator::new();
        validator.set_config(ConfigPatch::new().strict_rules(true));
        validator
            .set_config_json(&json!({"resumeOnFailed": true, "verbose": 1}))
            .unwrap();
        assert_eq!(
            *validator.config(),
            ValidatorConfig {
                resume_on_failed: true,
                strict_rules: true,
            }
        );
        assert!(validator.set_config_json(&json!({"resumeOnFailed": "yes"})).is_err());
    }

    #[test]
    fn invalid_json_input() {
        let validator = Validator::new();
        let rules = RuleSet::new().field("x", "required");
        for input in ["{not json", "[1, 2]", "\"text\""] {
            let result = validator.validate_json(input, &rules);
            assert!(!result.is_success(), "{input}");
            assert_eq!(result.rejects.len(), 1);
            assert_eq!(result.rejects[0].rule, "invalid_input");
            assert_eq!(result.rejects[0].field, "");
        }
        assert!(validator.validate_json(r#"{"x": 1}"#, &rules).is_success());
    }

    #[test]
    fn builder_reports_bad_registrations() {
        let err = Validator::builder().pattern("bad", "(").build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { .. }));
        let err = Validator::builder()
            .predicate("a|b", Arity::Any, |_, _, _| true)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::ReservedSeparator { separator: '|', .. }));
    }

    #[test]
    fn record_from_str_requires_an_object() {
        assert!(record_from_str(r#"{"a": 1}"#).is_ok());
        assert!(matches!(
            record_from_str("3"),
            Err(InputError::NotAnObject { found: "number" })
        ));
        assert!(matches!(record_from_str("{"), Err(InputError::InvalidJson(_))));
    }
}
