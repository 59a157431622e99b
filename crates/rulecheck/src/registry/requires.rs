//! Presence rules
//!
//! Each rule answers "is the presence constraint satisfied?", not "is the
//! field present?". The conditional variants either defer to [`required`]
//! or pass outright, depending on the companion fields named in `args`:
//!
//! | rule | defers to `required` when |
//! |---|---|
//! | `required_if:f,v,...` | every `f` is truthy and loosely equals its `v` |
//! | `required_with:f,...` | any `f` is present |
//! | `required_with_all:f,...` | every `f` is present |
//! | `required_without:f,...` | any `f` is absent |
//! | `required_without_all:f,...` | every `f` is absent |

use crate::value::Record;

/// The field holds a truthy value.
pub(crate) fn required(record: &Record, field: &str, _args: &[String]) -> bool {
    record.get(field).is_some_and(|value| value.is_truthy())
}

pub(crate) fn required_if(record: &Record, field: &str, args: &[String]) -> bool {
    for pair in args.chunks_exact(2) {
        let (other, expected) = (&pair[0], &pair[1]);
        let matches = record
            .get(other.as_str())
            .is_some_and(|value| value.is_truthy() && value.loose_eq_str(expected));
        if !matches {
            return true;
        }
    }
    required(record, field, &[])
}

pub(crate) fn required_with(record: &Record, field: &str, args: &[String]) -> bool {
    if args.iter().any(|other| record.contains_key(other.as_str())) {
        return required(record, field, &[]);
    }
    true
}

pub(crate) fn required_with_all(record: &Record, field: &str, args: &[String]) -> bool {
    if args.iter().all(|other| record.contains_key(other.as_str())) {
        return required(record, field, &[]);
    }
    true
}

pub(crate) fn required_without(record: &Record, field: &str, args: &[String]) -> bool {
    if args.iter().any(|other| !record.contains_key(other.as_str())) {
        return required(record, field, &[]);
    }
    true
}

pub(crate) fn required_without_all(record: &Record, field: &str, args: &[String]) -> bool {
    if args.iter().all(|other| !record.contains_key(other.as_str())) {
        return required(record, field, &[]);
    }
    true
}
