//! Registry entries
//!
//! Both tables of the registry store callables with an explicit [`Arity`].
//! The arity is checked before every call, so a rule body can index its
//! arguments without bounds checks of its own.

use crate::value::{Record, TypeTag, Value};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

// ============================================================================
// ARITY
// ============================================================================

/// Number of arguments a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// `n` or more arguments.
    AtLeast(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
    /// A non-empty, even number of arguments (`field,value` pairs).
    Pairs,
    /// Any number of arguments, including none.
    Any,
}

impl Arity {
    /// Returns `true` if `count` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::Range(min, max) => count >= min && count <= max,
            Self::Pairs => count >= 2 && count % 2 == 0,
            Self::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::Range(min, max) => write!(f, "{min} to {max}"),
            Self::Pairs => f.write_str("an even number (at least 2)"),
            Self::Any => f.write_str("any number"),
        }
    }
}

fn arity_ok(rule: &str, arity: Arity, args: &[String]) -> bool {
    if arity.accepts(args.len()) {
        return true;
    }
    warn!(
        rule,
        expected = %arity,
        got = args.len(),
        "rule called with wrong number of arguments"
    );
    false
}

// ============================================================================
// PREDICATE
// ============================================================================

/// Signature of a value rule: `(record, value, args) -> passed`.
pub type PredicateFn = dyn Fn(&Record, &Value, &[String]) -> bool + Send + Sync;

/// A value rule implemented in code.
#[derive(Clone)]
pub struct Predicate {
    arity: Arity,
    func: Arc<PredicateFn>,
}

impl Predicate {
    /// Wraps a closure or function as a predicate.
    pub fn new<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&Record, &Value, &[String]) -> bool + Send + Sync + 'static,
    {
        Self {
            arity,
            func: Arc::new(func),
        }
    }

    /// Declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Invokes the predicate. A call with the wrong number of arguments fails.
    pub fn call(&self, rule: &str, record: &Record, value: &Value, args: &[String]) -> bool {
        arity_ok(rule, self.arity, args) && (self.func)(record, value, args)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// REQUIRE
// ============================================================================

/// Signature of a presence rule: `(record, field, args) -> satisfied`.
pub type RequireFn = dyn Fn(&Record, &str, &[String]) -> bool + Send + Sync;

/// A presence rule. Receives the field *name*, since the field may be absent.
#[derive(Clone)]
pub struct Require {
    arity: Arity,
    func: Arc<RequireFn>,
}

impl Require {
    /// Wraps a closure or function as a presence rule.
    pub fn new<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&Record, &str, &[String]) -> bool + Send + Sync + 'static,
    {
        Self {
            arity,
            func: Arc::new(func),
        }
    }

    /// Declared arity.
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Invokes the rule. A call with the wrong number of arguments fails.
    pub fn call(&self, rule: &str, record: &Record, field: &str, args: &[String]) -> bool {
        arity_ok(rule, self.arity, args) && (self.func)(record, field, args)
    }
}

impl fmt::Debug for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Require")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// VALIDATOR ENTRY
// ============================================================================

/// A value rule: either code or a pattern matched against the stringified value.
#[derive(Debug, Clone)]
pub enum ValidatorEntry {
    /// Rule implemented as a predicate.
    Predicate(Predicate),
    /// Rule implemented as a regular expression. Arguments are ignored.
    Pattern(Regex),
}

impl ValidatorEntry {
    /// Shorthand for a predicate entry.
    pub fn predicate<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&Record, &Value, &[String]) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(arity, func))
    }

    /// Compiles `pattern` into a pattern entry.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// `function` for predicates, `regexp` for patterns.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Predicate(_) => TypeTag::Function,
            Self::Pattern(_) => TypeTag::RegExp,
        }
    }

    /// Runs the entry against `value`.
    pub fn check(&self, rule: &str, record: &Record, value: &Value, args: &[String]) -> bool {
        match self {
            Self::Predicate(predicate) => predicate.call(rule, record, value, args),
            Self::Pattern(regex) => regex.is_match(&value.stringify()),
        }
    }
}

impl From<Predicate> for ValidatorEntry {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Regex> for ValidatorEntry {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[rstest]
    #[case(Arity::Exact(1), 1, true)]
    #[case(Arity::Exact(1), 2, false)]
    #[case(Arity::AtLeast(1), 0, false)]
    #[case(Arity::AtLeast(1), 5, true)]
    #[case(Arity::Range(1, 2), 2, true)]
    #[case(Arity::Range(1, 2), 3, false)]
    #[case(Arity::Pairs, 0, false)]
    #[case(Arity::Pairs, 3, false)]
    #[case(Arity::Pairs, 4, true)]
    #[case(Arity::Any, 0, true)]
    fn arity_accepts(#[case] arity: Arity, #[case] count: usize, #[case] expected: bool) {
        assert_eq!(arity.accepts(count), expected);
    }

    #[test]
    fn predicate_rejects_wrong_arity_without_calling() {
        let predicate = Predicate::new(Arity::Exact(1), |_, _, args| args[0] == "x");
        let record = Record::new();
        assert!(predicate.call("p", &record, &Value::Null, &args(&["x"])));
        assert!(!predicate.call("p", &record, &Value::Null, &[]));
        assert!(!predicate.call("p", &record, &Value::Null, &args(&["x", "y"])));
    }

    #[test]
    fn pattern_matches_stringified_value() {
        let entry = ValidatorEntry::pattern("^[0-9]+$").unwrap();
        let record = Record::new();
        assert_eq!(entry.type_tag(), TypeTag::RegExp);
        assert!(entry.check("digits", &record, &Value::Number(42.0), &[]));
        assert!(!entry.check("digits", &record, &Value::Number(4.2), &[]));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(ValidatorEntry::pattern("(").is_err());
    }
}
