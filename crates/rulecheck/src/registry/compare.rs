//! Size comparisons for `between`, `min`, `max` and `size`.
//!
//! The measured quantity depends on the shape of the value:
//!
//! - strings compare lexicographically against the raw argument
//!   (`size` compares the character count instead)
//! - numbers compare numerically
//! - a file compares its size in kilobytes
//! - a file list must be non-empty and every file must satisfy the bound
//!
//! Any other shape fails.

use crate::value::{FileRef, Value, string_to_number};

/// What a size rule measures for a given value.
#[derive(Debug, Clone, Copy)]
enum Measured<'a> {
    Text(&'a str),
    Number(f64),
    File(&'a FileRef),
    Files(&'a [FileRef]),
    Other,
}

impl<'a> Measured<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(*n),
            Value::File(file) => Self::File(file),
            Value::FileList(files) => Self::Files(files),
            _ => Self::Other,
        }
    }

    /// Applies `text` to strings and `number` to everything numeric.
    fn check(self, text: impl Fn(&str) -> bool, number: impl Fn(f64) -> bool) -> bool {
        match self {
            Self::Text(s) => text(s),
            Self::Number(n) => number(n),
            Self::File(file) => number(file.kilobytes() as f64),
            Self::Files(files) => {
                !files.is_empty() && files.iter().all(|file| number(file.kilobytes() as f64))
            }
            Self::Other => false,
        }
    }
}

pub(crate) fn between(value: &Value, min: &str, max: &str) -> bool {
    let (lo, hi) = (string_to_number(min), string_to_number(max));
    Measured::of(value).check(|s| s >= min && s <= max, |n| n >= lo && n <= hi)
}

pub(crate) fn min(value: &Value, min: &str) -> bool {
    let lo = string_to_number(min);
    Measured::of(value).check(|s| s >= min, |n| n >= lo)
}

pub(crate) fn max(value: &Value, max: &str) -> bool {
    let hi = string_to_number(max);
    Measured::of(value).check(|s| s <= max, |n| n <= hi)
}

pub(crate) fn size(value: &Value, size: &str) -> bool {
    let expected = string_to_number(size);
    Measured::of(value).check(
        |s| s.chars().count() as f64 == expected,
        |n| n == expected,
    )
}
