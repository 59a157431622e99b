//! Rule registry
//!
//! Two independently keyed tables:
//!
//! - **requires**: presence rules `(record, field, args)`, evaluated whether or
//!   not the field is present
//! - **validators**: value rules `(record, value, args)` or patterns, evaluated
//!   only for present fields
//!
//! A name found in `requires` is never looked up in `validators`. Entries are
//! never removed; a later registration under the same name replaces the
//! earlier one.
//!
//! # Examples
//!
//! ```
//! use rulecheck::registry::{Arity, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_predicate("is_even", Arity::Exact(0), |_, value, _| {
//!         value.as_f64().is_some_and(|n| n % 2.0 == 0.0)
//!     })
//!     .unwrap();
//! registry.add_pattern("hex", "^[0-9a-f]+$").unwrap();
//!
//! assert!(registry.has_validator("is_even"));
//! assert!(registry.has_require("required"));
//! ```

mod builtin;
mod compare;
pub mod entry;
mod pattern_cache;
mod requires;

pub use entry::{Arity, Predicate, PredicateFn, Require, RequireFn, ValidatorEntry};

use crate::error::RegistryError;
use crate::value::{Record, Value};
use pattern_cache::PatternCache;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Characters reserved by the rule grammar.
const RESERVED: [char; 3] = ['|', ':', ','];

/// Registry of presence rules and value rules.
#[derive(Debug, Clone)]
pub struct Registry {
    requires: HashMap<String, Require>,
    validators: HashMap<String, ValidatorEntry>,
}

impl Registry {
    /// Creates a registry holding every built-in rule.
    pub fn new() -> Self {
        let mut registry = Self {
            requires: HashMap::new(),
            validators: HashMap::new(),
        };

        registry.register_presence_rules();
        registry.register_type_rules();
        registry.register_size_rules();
        registry.register_format_rules();
        registry.register_date_rules();
        registry.register_comparison_rules();
        registry.register_file_rules();

        registry
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a value rule, replacing any rule of the same name.
    ///
    /// Fails for empty names and names containing `|`, `:` or `,`, which the
    /// rule grammar could never address. The failure is also logged.
    pub fn add(
        &mut self,
        name: &str,
        entry: impl Into<ValidatorEntry>,
    ) -> Result<(), RegistryError> {
        let name = checked_name(name)?;
        let entry = entry.into();

        if self.requires.contains_key(&name) {
            warn!(rule = %name, "presence rule of the same name takes precedence");
        }
        debug!(rule = %name, kind = %entry.type_tag(), "registered validator");
        self.validators.insert(name, entry);
        Ok(())
    }

    /// Registers a closure as a value rule.
    pub fn add_predicate<F>(
        &mut self,
        name: &str,
        arity: Arity,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Record, &Value, &[String]) -> bool + Send + Sync + 'static,
    {
        self.add(name, Predicate::new(arity, func))
    }

    /// Compiles `pattern` and registers it as a value rule.
    pub fn add_pattern(&mut self, name: &str, pattern: &str) -> Result<(), RegistryError> {
        let regex = Regex::new(pattern).map_err(|err| {
            let err = RegistryError::invalid_pattern(name, &err);
            error!(error = %err, "rejected validator registration");
            err
        })?;
        self.add(name, regex)
    }

    /// Registers a presence rule, replacing any presence rule of the same name.
    pub fn add_require(&mut self, name: &str, require: Require) -> Result<(), RegistryError> {
        let name = checked_name(name)?;
        debug!(rule = %name, "registered presence rule");
        self.requires.insert(name, require);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// Presence rule registered under `name`.
    pub fn require(&self, name: &str) -> Option<&Require> {
        self.requires.get(name)
    }

    /// Value rule registered under `name`.
    pub fn validator(&self, name: &str) -> Option<&ValidatorEntry> {
        self.validators.get(name)
    }

    /// Check if a presence rule exists
    pub fn has_require(&self, name: &str) -> bool {
        self.requires.contains_key(name)
    }

    /// Check if a value rule exists
    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Returns `true` if `name` resolves in either table.
    pub fn contains(&self, name: &str) -> bool {
        self.has_require(name) || self.has_validator(name)
    }

    /// All rule names in both tables, sorted.
    pub fn rule_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .requires
            .keys()
            .chain(self.validators.keys())
            .cloned()
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    // ------------------------------------------------------------------------
    // Built-in groups
    // ------------------------------------------------------------------------

    fn require_builtin(
        &mut self,
        name: &str,
        arity: Arity,
        func: fn(&Record, &str, &[String]) -> bool,
    ) {
        self.requires
            .insert(name.to_owned(), Require::new(arity, func));
    }

    fn validator_builtin(&mut self, name: &str, entry: impl Into<ValidatorEntry>) {
        self.validators.insert(name.to_owned(), entry.into());
    }

    fn predicate_builtin(
        &mut self,
        name: &str,
        arity: Arity,
        func: fn(&Record, &Value, &[String]) -> bool,
    ) {
        self.validator_builtin(name, Predicate::new(arity, func));
    }

    fn register_presence_rules(&mut self) {
        self.require_builtin("required", Arity::Exact(0), requires::required);
        self.require_builtin("required_if", Arity::Pairs, requires::required_if);
        self.require_builtin("required_with", Arity::AtLeast(1), requires::required_with);
        self.require_builtin(
            "required_with_all",
            Arity::AtLeast(1),
            requires::required_with_all,
        );
        self.require_builtin(
            "required_without",
            Arity::AtLeast(1),
            requires::required_without,
        );
        self.require_builtin(
            "required_without_all",
            Arity::AtLeast(1),
            requires::required_without_all,
        );
    }

    fn register_type_rules(&mut self) {
        self.predicate_builtin("array", Arity::Exact(0), builtin::array);
        self.predicate_builtin("string", Arity::Exact(0), builtin::string);
        self.predicate_builtin("numeric", Arity::Exact(0), builtin::numeric);
        self.predicate_builtin("integer", Arity::Exact(0), builtin::integer);
        self.validator_builtin("boolean", builtin::BOOLEAN.clone());
    }

    fn register_size_rules(&mut self) {
        self.predicate_builtin("between", Arity::Exact(2), builtin::between);
        self.predicate_builtin("min", Arity::Exact(1), builtin::min);
        self.predicate_builtin("max", Arity::Exact(1), builtin::max);
        self.predicate_builtin("size", Arity::Exact(1), builtin::size);
        self.predicate_builtin("digits", Arity::Exact(1), builtin::digits);
        self.predicate_builtin("digits_between", Arity::Exact(2), builtin::digits_between);
    }

    fn register_format_rules(&mut self) {
        self.validator_builtin("accepted", builtin::ACCEPTED.clone());
        self.validator_builtin("alpha", builtin::ALPHA.clone());
        self.validator_builtin("alpha_dash", builtin::ALPHA_DASH.clone());
        self.validator_builtin("alpha_num", builtin::ALPHA_NUM.clone());
        self.validator_builtin("email", builtin::EMAIL.clone());
        self.validator_builtin("url", builtin::URL.clone());
        self.predicate_builtin("ip", Arity::Exact(0), builtin::ip);

        // Each registry owns its compile cache; clones share it.
        let cache = Arc::new(PatternCache::new());
        self.validator_builtin(
            "regex",
            Predicate::new(Arity::AtLeast(1), move |_, value, args| {
                builtin::regex(&cache, value, args)
            }),
        );
    }

    fn register_date_rules(&mut self) {
        self.predicate_builtin("date", Arity::Exact(0), builtin::date);
        self.predicate_builtin("after", Arity::Exact(1), builtin::after);
        self.predicate_builtin("before", Arity::Exact(1), builtin::before);
        self.predicate_builtin("date_format", Arity::Exact(1), builtin::date_format_rule);
    }

    fn register_comparison_rules(&mut self) {
        self.predicate_builtin("different", Arity::Exact(1), builtin::different);
        self.predicate_builtin("same", Arity::Exact(1), builtin::same);
        self.predicate_builtin("in", Arity::AtLeast(1), builtin::in_list);
        self.predicate_builtin("not_in", Arity::AtLeast(1), builtin::not_in_list);
    }

    fn register_file_rules(&mut self) {
        self.predicate_builtin("mimes", Arity::AtLeast(1), builtin::mimes);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Trims `name` and rejects names the rule grammar cannot address.
fn checked_name(name: &str) -> Result<String, RegistryError> {
    let trimmed = name.trim();
    let result = if trimmed.is_empty() {
        Err(RegistryError::EmptyName)
    } else if let Some(separator) = trimmed.chars().find(|c| RESERVED.contains(c)) {
        Err(RegistryError::ReservedSeparator {
            name: trimmed.to_owned(),
            separator,
        })
    } else {
        Ok(trimmed.to_owned())
    };
    result.inspect_err(|err| error!(error = %err, "rejected rule registration"))
}
