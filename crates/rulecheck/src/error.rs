//! Error types
//!
//! Rule violations are not errors: they are collected as
//! [`Reject`](crate::result::Reject)s in a
//! [`ValidationResult`](crate::result::ValidationResult). The types here cover
//! the remaining failure modes:
//!
//! - [`RegistryError`] - a custom rule could not be registered
//! - [`InputError`] - the record handed to the engine is not usable
//! - [`Rejected`] - a failed validation converted into an error for `?`

use crate::result::Reject;

/// Errors raised while registering custom rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The rule name is empty after trimming.
    #[error("rule name must not be empty")]
    EmptyName,

    /// The rule name contains a character reserved by the rule grammar.
    #[error("rule name '{name}' contains reserved separator '{separator}'")]
    ReservedSeparator {
        /// Offending name.
        name: String,
        /// The reserved character found in it.
        separator: char,
    },

    /// A pattern entry failed to compile.
    #[error("invalid pattern for rule '{name}': {reason}")]
    InvalidPattern {
        /// Rule name the pattern was registered under.
        name: String,
        /// Compiler message.
        reason: String,
    },
}

impl RegistryError {
    /// Creates an `InvalidPattern` error from a regex compile failure.
    pub fn invalid_pattern(name: impl Into<String>, error: &regex::Error) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            reason: error.to_string(),
        }
    }
}

/// Errors raised for unusable input records.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum InputError {
    /// The input string is not valid JSON.
    #[error("Invalid JSON string: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The input is valid JSON but not an object.
    #[error("Invalid input: expected a JSON object, got {found}")]
    NotAnObject {
        /// Type tag of what was supplied.
        found: &'static str,
    },
}

/// A failed validation, as an error.
///
/// Produced by [`ValidationResult::into_result`](crate::result::ValidationResult::into_result).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("validation failed with {} reject(s)", .rejects.len())]
pub struct Rejected {
    /// Every reject that was collected.
    pub rejects: Vec<Reject>,
}

impl Rejected {
    /// The first reject, which under fail-fast is the only one.
    #[must_use]
    pub fn first(&self) -> Option<&Reject> {
        self.rejects.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_messages() {
        assert_eq!(RegistryError::EmptyName.to_string(), "rule name must not be empty");
        let err = RegistryError::ReservedSeparator {
            name: "a|b".into(),
            separator: '|',
        };
        assert_eq!(
            err.to_string(),
            "rule name 'a|b' contains reserved separator '|'"
        );
    }

    #[test]
    fn input_error_from_serde() {
        let err: InputError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Invalid JSON string"));
    }

    #[test]
    fn rejected_counts() {
        let err = Rejected {
            rejects: vec![Reject::new("age", "between")],
        };
        assert_eq!(err.to_string(), "validation failed with 1 reject(s)");
        assert_eq!(err.first().map(|r| r.rule.as_str()), Some("between"));
    }
}
