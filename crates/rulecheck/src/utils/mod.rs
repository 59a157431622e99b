//! Stateless helpers shared by the parser and the built-in rules.
//!
//! - [`split`] - delimiter-aware splitting with an escape sequence
//! - [`trim`] - whitespace trimming
//! - [`type_of`] - shape inspection of an optional value
//! - [`in_array`] - exact-equality membership
//! - [`date`] - host date parsing and the `date_format` token language

pub mod date;

pub use date::{date_format, parse_date};

use crate::value::{TypeTag, Value};

/// Splits `input` on `separator`, keeping separators that are escaped.
///
/// The input is first cut on `escape` (for example `\|`); the pieces are then
/// cut on `separator` and the first piece of every escaped segment is glued
/// back onto the previous result with a literal `separator`.
///
/// # Examples
///
/// ```
/// use rulecheck::utils::split;
///
/// assert_eq!(split("a\\|b|c", "|", "\\|"), vec!["a|b", "c"]);
/// assert!(split("", "|", "\\|").is_empty());
/// ```
#[must_use]
pub fn split(input: &str, separator: &str, escape: &str) -> Vec<String> {
    if input.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<String> = Vec::new();
    for (i, chunk) in input.split(escape).enumerate() {
        for (j, piece) in chunk.split(separator).enumerate() {
            if i > 0 && j == 0 {
                if let Some(last) = result.last_mut() {
                    last.push_str(separator);
                    last.push_str(piece);
                    continue;
                }
            }
            result.push(piece.to_owned());
        }
    }
    result
}

/// Strips leading and trailing whitespace.
#[inline]
#[must_use]
pub fn trim(s: &str) -> &str {
    s.trim()
}

/// Returns the shape of a possibly absent value.
///
/// An absent field reports [`TypeTag::Undefined`].
#[must_use]
pub fn type_of(value: Option<&Value>) -> TypeTag {
    value.map_or(TypeTag::Undefined, Value::type_tag)
}

/// Exact-equality membership test, no coercion.
#[must_use]
pub fn in_array<T, U>(seq: &[T], value: &U) -> bool
where
    T: PartialEq<U>,
    U: ?Sized,
{
    seq.iter().any(|item| item == value)
}
