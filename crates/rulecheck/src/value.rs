//! Dynamic values under validation
//!
//! A [`Record`] is an insertion-ordered map from field name to [`Value`].
//! Values mirror what a JSON document can carry, plus two shapes JSON
//! cannot express: a single uploaded file and a list of files. Files are
//! only ever inspected through their size in kilobytes and their name.
//!
//! Records are built either from `serde_json` values or by hand:
//!
//! ```
//! use rulecheck::value::{FileRef, Record, RecordExt, Value};
//! use serde_json::json;
//!
//! let mut record = Record::from_json(json!({ "name": "Peter", "age": 24 })).unwrap();
//! record.insert("avatar".into(), Value::File(FileRef::new("me.png", 20 * 1024)));
//! assert_eq!(record["age"].as_f64(), Some(24.0));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A record under validation: field name to value, in insertion order.
pub type Record = IndexMap<String, Value>;

// ============================================================================
// FILE REFERENCE
// ============================================================================

/// An uploaded file, described by its name and size in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    /// File name, including its extension.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileRef {
    /// Creates a new file reference.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Size in whole kilobytes (`floor(bytes / 1024)`).
    #[must_use]
    pub fn kilobytes(&self) -> u64 {
        self.size / 1024
    }

    /// Extension after the last `.` of the file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.name)
    }
}

/// Returns the substring after the last `.` of `name`.
pub(crate) fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx + 1..])
}

// ============================================================================
// VALUE
// ============================================================================

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null`.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. All numbers are double precision, as in JSON.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A nested record.
    Object(Record),
    /// A single file.
    File(FileRef),
    /// A list of files.
    FileList(Vec<FileRef>),
}

/// Shape of a value, as reported by [`crate::utils::type_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `file`
    File,
    /// `filelist`
    FileList,
    /// `regexp`, only used for registry entries.
    RegExp,
    /// `function`, only used for registry entries.
    Function,
    /// `null`
    Null,
    /// `undefined`, the tag of an absent field.
    Undefined,
}

impl TypeTag {
    /// Lowercase tag name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::File => "file",
            Self::FileList => "filelist",
            Self::RegExp => "regexp",
            Self::Function => "function",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Returns the shape of this value.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Null => TypeTag::Null,
            Self::Bool(_) => TypeTag::Boolean,
            Self::Number(_) => TypeTag::Number,
            Self::String(_) => TypeTag::String,
            Self::Array(_) => TypeTag::Array,
            Self::Object(_) => TypeTag::Object,
            Self::File(_) => TypeTag::File,
            Self::FileList(_) => TypeTag::FileList,
        }
    }

    /// Returns the string slice if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the nested record if this is an object.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Object(record) => Some(record),
            _ => None,
        }
    }

    /// Truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::File(_) | Self::FileList(_) => true,
        }
    }

    /// Renders the value the way pattern rules see it.
    ///
    /// Numbers print without a trailing `.0`, arrays join their elements
    /// with `,`, objects print as `[object Object]` and files print their name.
    #[must_use]
    pub fn stringify(&self) -> String {
        match self {
            Self::Null => "null".to_owned(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Array(items) => items
                .iter()
                .map(|item| match item {
                    Self::Null => String::new(),
                    other => other.stringify(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Self::Object(_) => "[object Object]".to_owned(),
            Self::File(file) => file.name.clone(),
            Self::FileList(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Strict equality: same shape and same content.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// Loose equality with numeric coercion between numbers, numeric
    /// strings and booleans. `null` only equals `null`.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Number(n), Self::String(s)) | (Self::String(s), Self::Number(n)) => {
                string_to_number(s) == *n
            }
            (Self::Bool(b), other) | (other, Self::Bool(b)) => {
                Self::Number(f64::from(u8::from(*b))).loose_eq(other)
            }
            (Self::Array(_) | Self::Object(_), Self::String(s)) => self.stringify() == *s,
            (Self::String(s), Self::Array(_) | Self::Object(_)) => other.stringify() == *s,
            _ => self.strict_eq(other),
        }
    }

    /// Loose equality against a rule argument.
    #[must_use]
    pub fn loose_eq_str(&self, arg: &str) -> bool {
        self.loose_eq(&Self::String(arg.to_owned()))
    }
}

/// Formats an `f64` the way a JSON/JS host prints numbers.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else if !(1e-6..1e21).contains(&n.abs()) {
        // Exponent form outside the plain-decimal range, with an explicit `+`.
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

/// Numeric conversion of a string; blank strings are `0`, garbage is `NaN`.
pub(crate) fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<FileRef> for Value {
    fn from(value: FileRef) -> Self {
        Self::File(value)
    }
}

impl From<Vec<FileRef>> for Value {
    fn from(value: Vec<FileRef>) -> Self {
        Self::FileList(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Object(value)
    }
}

/// Construction of records from JSON.
pub trait RecordExt: Sized {
    /// Converts a JSON value into a record; `None` unless it is an object.
    fn from_json(value: serde_json::Value) -> Option<Self>;
}

impl RecordExt for Record {
    fn from_json(value: serde_json::Value) -> Option<Self> {
        match Value::from(value) {
            Value::Object(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_nested_json_in_order() {
        let record = Record::from_json(json!({"b": 1, "a": {"x": [true, null]}})).unwrap();
        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(record["a"].type_tag(), TypeTag::Object);
    }

    #[test]
    fn non_object_json_is_not_a_record() {
        assert!(Record::from_json(json!([1, 2])).is_none());
        assert!(Record::from_json(json!("text")).is_none());
    }

    #[test]
    fn stringify_matches_host_rendering() {
        assert_eq!(Value::Number(1.0).stringify(), "1");
        assert_eq!(Value::Number(1.5).stringify(), "1.5");
        assert_eq!(Value::Number(f64::NAN).stringify(), "NaN");
        assert_eq!(Value::Number(1e20).stringify(), "100000000000000000000");
        assert_eq!(Value::Number(1e21).stringify(), "1e+21");
        assert_eq!(Value::Number(-1.5e300).stringify(), "-1.5e+300");
        assert_eq!(Value::Number(0.000_001).stringify(), "0.000001");
        assert_eq!(Value::Number(1.5e-7).stringify(), "1.5e-7");
        assert_eq!(Value::Bool(true).stringify(), "true");
        assert_eq!(
            Value::Array(vec![Value::from("a"), Value::Number(2.0), Value::Null]).stringify(),
            "a,2,"
        );
        assert_eq!(Value::Object(Record::new()).stringify(), "[object Object]");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::File(FileRef::new("a.txt", 0)).is_truthy());
    }

    #[test]
    fn loose_and_strict_equality() {
        assert!(Value::Number(1.0).loose_eq_str("1"));
        assert!(!Value::Number(1.0).strict_eq(&Value::from("1")));
        assert!(Value::Bool(true).loose_eq_str("1"));
        assert!(!Value::Null.loose_eq_str("null"));
        assert!(Value::from("abc").loose_eq_str("abc"));
    }

    #[test]
    fn file_kilobytes_and_extension() {
        let file = FileRef::new("report.final.pdf", 2047);
        assert_eq!(file.kilobytes(), 1);
        assert_eq!(file.extension(), Some("pdf"));
        assert_eq!(FileRef::new("README", 0).extension(), None);
    }

    #[test]
    fn serializes_untagged() {
        let value = Value::Array(vec![Value::Number(2.0), Value::File(FileRef::new("a", 3))]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!([2.0, {"name": "a", "size": 3}])
        );
    }
}
