//! Rule string parser
//!
//! A rule string is a pipe-separated list of rules, each with an optional
//! colon-introduced, comma-separated argument list:
//!
//! ```text
//! ruleset    := rulestring ("|" rulestring)*     ; "|" escaped as "\|"
//! rulestring := name (":" args)?                  ; ":" escaped as "\:"
//! args       := arg ("," arg)*                    ; "," escaped as "\,"
//! ```
//!
//! Whitespace around names and arguments is insignificant; whitespace inside
//! them is kept. Empty segments (`a||b`, a trailing `|`) are dropped.
//!
//! # Examples
//!
//! ```
//! use rulecheck::parser::parse;
//!
//! let rules = parse("required | between:0, 120 | in:a\\,b,c");
//! assert_eq!(rules.len(), 3);
//! assert_eq!(rules[1].name, "between");
//! assert_eq!(rules[1].args, vec!["0", "120"]);
//! assert_eq!(rules[2].args, vec!["a,b", "c"]);
//! ```

use crate::utils::{split, trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Rule separator and its escape.
const RULE_SEPARATOR: (&str, &str) = ("|", "\\|");
/// Name/argument separator and its escape.
const ARGS_SEPARATOR: (&str, &str) = (":", "\\:");
/// Argument separator and its escape.
const ARG_SEPARATOR: (&str, &str) = (",", "\\,");

/// One parsed rule: a registry key plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Rule name, looked up in the registry.
    pub name: String,
    /// Arguments, in source order.
    pub args: Vec<String>,
}

impl RuleDescriptor {
    /// Creates a descriptor from a name and arguments.
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

impl fmt::Display for RuleDescriptor {
    /// Renders the descriptor back into rule-string form, escaping separators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.name, &[RULE_SEPARATOR, ARGS_SEPARATOR]))?;
        if !self.args.is_empty() {
            let args: Vec<String> = self
                .args
                .iter()
                .map(|arg| escape(arg, &[RULE_SEPARATOR, ARG_SEPARATOR]))
                .collect();
            write!(f, ":{}", args.join(","))?;
        }
        Ok(())
    }
}

fn escape(text: &str, pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .fold(text.to_owned(), |acc, (sep, esc)| acc.replace(sep, esc))
}

/// Parses a rule string into descriptors, preserving source order.
#[must_use]
pub fn parse(rule_string: &str) -> Vec<RuleDescriptor> {
    let (rule_sep, rule_esc) = RULE_SEPARATOR;
    let (args_sep, args_esc) = ARGS_SEPARATOR;
    let (arg_sep, arg_esc) = ARG_SEPARATOR;

    let mut descriptors = Vec::new();
    for segment in split(rule_string, rule_sep, rule_esc) {
        let parts = split(&segment, args_sep, args_esc);
        let Some((key, rest)) = parts.split_first() else {
            continue;
        };

        let name = trim(key);
        if name.is_empty() {
            continue;
        }

        // Only the first colon separates; later ones belong to the arguments.
        let args = if rest.is_empty() {
            Vec::new()
        } else {
            split(&rest.join(args_sep), arg_sep, arg_esc)
                .iter()
                .map(|arg| trim(arg).to_owned())
                .collect()
        };

        descriptors.push(RuleDescriptor {
            name: name.to_owned(),
            args,
        });
    }

    trace!(rule_string, count = descriptors.len(), "parsed rule string");
    descriptors
}
