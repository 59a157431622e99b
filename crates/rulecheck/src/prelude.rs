//! Prelude module for convenient imports.
//!
//! ```
//! use rulecheck::prelude::*;
//!
//! let result = Validator::new().validate(&Record::new(), &RuleSet::new().field("x", "required"));
//! assert_eq!(result.status, Status::Failed);
//! ```

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::config::{ConfigPatch, ValidatorConfig};
pub use crate::engine::{Validator, ValidatorBuilder};
pub use crate::rules::{RuleSet, RuleSpec};

// ============================================================================
// DATA
// ============================================================================

pub use crate::value::{FileRef, Record, RecordExt, TypeTag, Value};

// ============================================================================
// REGISTRY
// ============================================================================

pub use crate::parser::RuleDescriptor;
pub use crate::registry::{Arity, Predicate, Registry, Require, ValidatorEntry};

// ============================================================================
// OUTCOME
// ============================================================================

pub use crate::error::{InputError, Rejected, RegistryError};
pub use crate::result::{Reject, Status, ValidationResult};
