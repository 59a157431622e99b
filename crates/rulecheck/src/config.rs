//! Validator configuration
//!
//! ```
//! use rulecheck::config::{ConfigPatch, ValidatorConfig};
//!
//! let mut config = ValidatorConfig::default();
//! config.apply(ConfigPatch::new().resume_on_failed(true));
//! assert!(config.resume_on_failed);
//! assert!(!config.strict_rules);
//! ```

use serde::{Deserialize, Serialize};

/// Options read on every validation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Collect every reject instead of stopping at the first one.
    pub resume_on_failed: bool,
    /// Reject rules whose name resolves in neither table, instead of ignoring them.
    pub strict_rules: bool,
}

impl ValidatorConfig {
    /// Overwrites the options present in `patch`.
    pub fn apply(&mut self, patch: ConfigPatch) {
        if let Some(resume) = patch.resume_on_failed {
            self.resume_on_failed = resume;
        }
        if let Some(strict) = patch.strict_rules {
            self.strict_rules = strict;
        }
    }
}

/// A partial configuration. Absent options are left untouched by
/// [`ValidatorConfig::apply`]; unknown keys are ignored on deserialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    /// New value for [`ValidatorConfig::resume_on_failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_on_failed: Option<bool>,
    /// New value for [`ValidatorConfig::strict_rules`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_rules: Option<bool>,
}

impl ConfigPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `resume_on_failed`
    #[must_use = "builder methods must be chained or built"]
    pub fn resume_on_failed(mut self, resume: bool) -> Self {
        self.resume_on_failed = Some(resume);
        self
    }

    /// Set `strict_rules`
    #[must_use = "builder methods must be chained or built"]
    pub fn strict_rules(mut self, strict: bool) -> Self {
        self.strict_rules = Some(strict);
        self
    }
}

impl From<ValidatorConfig> for ConfigPatch {
    fn from(config: ValidatorConfig) -> Self {
        Self {
            resume_on_failed: Some(config.resume_on_failed),
            strict_rules: Some(config.strict_rules),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_fail_fast_and_lenient() {
        let config = ValidatorConfig::default();
        assert!(!config.resume_on_failed);
        assert!(!config.strict_rules);
    }

    #[test]
    fn patch_only_touches_present_options() {
        let mut config = ValidatorConfig {
            resume_on_failed: true,
            strict_rules: false,
        };
        config.apply(ConfigPatch::new().strict_rules(true));
        assert!(config.resume_on_failed);
        assert!(config.strict_rules);
    }

    #[test]
    fn camel_case_keys_and_unknown_keys_ignored() {
        let patch: ConfigPatch =
            serde_json::from_value(json!({"resumeOnFailed": true, "color": "red"})).unwrap();
        assert_eq!(patch, ConfigPatch::new().resume_on_failed(true));

        let config = ValidatorConfig {
            resume_on_failed: true,
            strict_rules: false,
        };
        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({"resumeOnFailed": true, "strictRules": false})
        );
    }
}
