//! # rulecheck
//!
//! Rule-string validation for dynamic records.
//!
//! Rules are written per field as compact strings (`"required|string|size:11"`)
//! and checked against a [`Record`](value::Record), a JSON-like map that may
//! nest other records and may carry uploaded files.
//!
//! ## Quick Start
//!
//! ```
//! use rulecheck::prelude::*;
//! use serde_json::json;
//!
//! let mut validator = Validator::new();
//! validator
//!     .add_predicate("is_even", Arity::Exact(0), |_, value, _| {
//!         value.as_f64().is_some_and(|n| n % 2.0 == 0.0)
//!     })
//!     .unwrap();
//!
//! let rules = RuleSet::new()
//!     .field("name", "required|alpha")
//!     .field("phone", "required|size:11")
//!     .field("seats", "integer|is_even")
//!     .nested("address", RuleSet::new().field("city", "required"));
//!
//! let person = json!({
//!     "name": "Peter",
//!     "phone": "13800138000",
//!     "seats": 4,
//!     "address": { "city": "Shanghai" },
//! });
//! assert!(validator.validate_value(&person, &rules).is_success());
//! ```
//!
//! ## Rules
//!
//! - **Presence** ([`registry`]): `required`, `required_if`, `required_with`,
//!   `required_with_all`, `required_without`, `required_without_all`
//! - **Type**: `array`, `boolean`, `integer`, `numeric`, `string`
//! - **Size**: `between`, `min`, `max`, `size`, `digits`, `digits_between`
//! - **Format**: `accepted`, `alpha`, `alpha_dash`, `alpha_num`, `email`, `ip`,
//!   `url`, `regex`
//! - **Date**: `date`, `date_format`, `after`, `before`
//! - **Comparison**: `different`, `same`, `in`, `not_in`
//! - **File**: `mimes`
//!
//! ## Failure policy
//!
//! By default validation stops at the first reject. Set
//! [`resume_on_failed`](config::ValidatorConfig::resume_on_failed) to collect
//! every reject instead.

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod prelude;
pub mod registry;
pub mod result;
pub mod rules;
pub mod utils;
pub mod value;

pub use engine::{Validator, ValidatorBuilder};
