//! Validation outcome
//!
//! A [`ValidationResult`] serialises to the wire shape callers expect:
//!
//! ```json
//! { "status": "failed", "rejects": [{ "path": "", "field": "age", "rule": "between", ... }] }
//! ```

use crate::error::Rejected;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule name of the synthetic reject produced for unusable input.
pub const INVALID_INPUT: &str = "invalid_input";

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every rule passed.
    Success,
    /// At least one rule failed.
    Failed,
}

/// One failing `(field, rule)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reject {
    /// Dotted path of the record holding the field; empty at top level.
    #[serde(default)]
    pub path: String,
    /// Field name.
    pub field: String,
    /// Name of the failed rule.
    pub rule: String,
    /// Arguments the rule was called with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Extra detail, set for synthetic rejects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Reject {
    /// Creates a reject for a top-level field.
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            field: field.into(),
            rule: rule.into(),
            args: Vec::new(),
            message: None,
        }
    }

    /// Set the containing record's path
    #[must_use = "builder methods must be chained or built"]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the rule arguments
    #[must_use = "builder methods must be chained or built"]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set a message
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Reject for input that could not be turned into a record.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("", INVALID_INPUT).with_message(message)
    }

    /// `path.field`, or just `field` at top level.
    #[must_use]
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            self.field.clone()
        } else {
            format!("{}.{}", self.path, self.field)
        }
    }
}

impl fmt::Display for Reject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.full_path(), self.rule)?;
        if !self.args.is_empty() {
            write!(f, ":{}", self.args.join(","))?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// Outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `success` iff `rejects` is empty.
    pub status: Status,
    /// Failures in evaluation order.
    pub rejects: Vec<Reject>,
}

impl ValidationResult {
    /// Builds a result; the status follows from `rejects`.
    #[must_use]
    pub fn from_rejects(rejects: Vec<Reject>) -> Self {
        let status = if rejects.is_empty() {
            Status::Success
        } else {
            Status::Failed
        };
        Self { status, rejects }
    }

    /// A passing result.
    #[must_use]
    pub fn success() -> Self {
        Self::from_rejects(Vec::new())
    }

    /// A failing result holding only the synthetic input reject.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::from_rejects(vec![Reject::invalid_input(message)])
    }

    /// Returns `true` if every rule passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// First recorded reject.
    #[must_use]
    pub fn first_reject(&self) -> Option<&Reject> {
        self.rejects.first()
    }

    /// Converts into a `Result` for use with `?`.
    pub fn into_result(self) -> Result<(), Rejected> {
        if self.is_success() {
            Ok(())
        } else {
            Err(Rejected {
                rejects: self.rejects,
            })
        }
    }
}
