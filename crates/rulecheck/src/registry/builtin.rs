//! Built-in value rules.
//!
//! Every function here has the predicate signature `(record, value, args)`.
//! Argument counts are checked by the registry before the call, so the bodies
//! index `args` directly.

use super::compare;
use super::pattern_cache::PatternCache;
use crate::utils::{date_format, in_array, parse_date};
use crate::value::{Record, Value, extension_of};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

// ============================================================================
// FIXED PATTERNS
// ============================================================================

pub(crate) static ACCEPTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)^(yes|on|1|true)$").unwrap());

pub(crate) static ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

pub(crate) static ALPHA_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]+$").unwrap());

pub(crate) static ALPHA_NUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());

pub(crate) static BOOLEAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i-u)^(true|false|1|0|"1"|"0"|'1'|'0')$"#).unwrap());

pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][-A-Za-z0-9_.+]*@([A-Za-z0-9][-A-Za-z0-9]+\.)+[A-Za-z]{2,14}$").unwrap()
});

/// Lowercase, ASCII-only URLs with an optional scheme; host labels are dot-separated.
pub(crate) static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^((https|http|ftp|rtsp|mms)?://)?",
        r"(([0-9a-z_!~*'().&=+$%-]+: )?[0-9a-z_!~*'().&=+$%-]+@)?",
        r"(([0-9]{1,3}\.){3}[0-9]{1,3}|([0-9a-z_!~*'()-]+\.)*([0-9a-z][0-9a-z-]{0,61})?[0-9a-z]\.[a-z]{2,6})",
        r"(:[0-9]{1,4})?",
        r"((/?)|(/[0-9a-z_!~*'().;?:@&=+$,%#-]+)+/?)$",
    ))
    .unwrap()
});

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$")
        .unwrap()
});

static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^((([0-9A-Fa-f]{1,4}:){7}([0-9A-Fa-f]{1,4}|:))",
        r"|(([0-9A-Fa-f]{1,4}:){6}(:[0-9A-Fa-f]{1,4}|((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3})|:))",
        r"|(([0-9A-Fa-f]{1,4}:){5}(((:[0-9A-Fa-f]{1,4}){1,2})|:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3})|:))",
        r"|(([0-9A-Fa-f]{1,4}:){4}(((:[0-9A-Fa-f]{1,4}){1,3})|((:[0-9A-Fa-f]{1,4})?:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))",
        r"|(([0-9A-Fa-f]{1,4}:){3}(((:[0-9A-Fa-f]{1,4}){1,4})|((:[0-9A-Fa-f]{1,4}){0,2}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))",
        r"|(([0-9A-Fa-f]{1,4}:){2}(((:[0-9A-Fa-f]{1,4}){1,5})|((:[0-9A-Fa-f]{1,4}){0,3}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))",
        r"|(([0-9A-Fa-f]{1,4}:){1}(((:[0-9A-Fa-f]{1,4}){1,6})|((:[0-9A-Fa-f]{1,4}){0,4}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))",
        r"|(:(((:[0-9A-Fa-f]{1,4}){1,7})|((:[0-9A-Fa-f]{1,4}){0,5}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:)))",
        r"(%.+)?$",
    ))
    .unwrap()
});

// ============================================================================
// TYPE RULES
// ============================================================================

pub(crate) fn array(_: &Record, value: &Value, _: &[String]) -> bool {
    matches!(value, Value::Array(_))
}

pub(crate) fn string(_: &Record, value: &Value, _: &[String]) -> bool {
    matches!(value, Value::String(_))
}

pub(crate) fn numeric(_: &Record, value: &Value, _: &[String]) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

pub(crate) fn integer(_: &Record, value: &Value, _: &[String]) -> bool {
    value
        .as_f64()
        .is_some_and(|n| n.is_finite() && n.fract() == 0.0)
}

pub(crate) fn ip(_: &Record, value: &Value, _: &[String]) -> bool {
    let text = value.stringify();
    IPV4.is_match(&text) || IPV6.is_match(&text)
}

// ============================================================================
// SIZE RULES
// ============================================================================

pub(crate) fn between(_: &Record, value: &Value, args: &[String]) -> bool {
    compare::between(value, &args[0], &args[1])
}

pub(crate) fn min(_: &Record, value: &Value, args: &[String]) -> bool {
    compare::min(value, &args[0])
}

pub(crate) fn max(_: &Record, value: &Value, args: &[String]) -> bool {
    compare::max(value, &args[0])
}

pub(crate) fn size(_: &Record, value: &Value, args: &[String]) -> bool {
    compare::size(value, &args[0])
}

/// Parses a digit-count argument; negative or non-integer counts fail the rule.
fn count_arg(rule: &str, arg: &str) -> Option<usize> {
    let parsed = arg.parse::<usize>().ok();
    if parsed.is_none() {
        warn!(rule, arg, "digit count must be a non-negative integer");
    }
    parsed
}

/// Length of the stringified value if it consists of ASCII digits only.
fn digit_run(value: &Value) -> Option<usize> {
    let text = value.stringify();
    text.bytes().all(|b| b.is_ascii_digit()).then_some(text.len())
}

pub(crate) fn digits(_: &Record, value: &Value, args: &[String]) -> bool {
    let Some(count) = count_arg("digits", &args[0]) else {
        return false;
    };
    digit_run(value) == Some(count)
}

pub(crate) fn digits_between(_: &Record, value: &Value, args: &[String]) -> bool {
    let (Some(lo), Some(hi)) = (
        count_arg("digits_between", &args[0]),
        count_arg("digits_between", &args[1]),
    ) else {
        return false;
    };
    digit_run(value).is_some_and(|len| len >= lo && len <= hi)
}

// ============================================================================
// DATE RULES
// ============================================================================

fn date_of(value: &Value) -> Option<NaiveDateTime> {
    value.as_str().and_then(parse_date)
}

pub(crate) fn date(_: &Record, value: &Value, _: &[String]) -> bool {
    date_of(value).is_some()
}

pub(crate) fn after(_: &Record, value: &Value, args: &[String]) -> bool {
    match (date_of(value), parse_date(&args[0])) {
        (Some(value), Some(bound)) => value > bound,
        _ => false,
    }
}

pub(crate) fn before(_: &Record, value: &Value, args: &[String]) -> bool {
    match (date_of(value), parse_date(&args[0])) {
        (Some(value), Some(bound)) => value < bound,
        _ => false,
    }
}

/// Re-rendering the parsed date through `format` must reproduce the input.
pub(crate) fn date_format_rule(_: &Record, value: &Value, args: &[String]) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    parse_date(text).is_some_and(|date| date_format(&date, &args[0]) == text)
}

// ============================================================================
// COMPARISON RULES
// ============================================================================

pub(crate) fn different(record: &Record, value: &Value, args: &[String]) -> bool {
    let other = record.get(args[0].as_str()).unwrap_or(&Value::Null);
    !value.loose_eq(other)
}

pub(crate) fn same(record: &Record, value: &Value, args: &[String]) -> bool {
    record
        .get(args[0].as_str())
        .is_some_and(|other| value.strict_eq(other))
}

pub(crate) fn in_list(_: &Record, value: &Value, args: &[String]) -> bool {
    value.as_str().is_some_and(|s| in_array(args, s))
}

pub(crate) fn not_in_list(record: &Record, value: &Value, args: &[String]) -> bool {
    !in_list(record, value, args)
}

// ============================================================================
// FILE RULES
// ============================================================================

/// The extension of every named file must be listed.
pub(crate) fn mimes(_: &Record, value: &Value, args: &[String]) -> bool {
    let allowed = |name: &str| {
        extension_of(name).is_some_and(|ext| !ext.is_empty() && in_array(args, ext))
    };
    match value {
        Value::String(name) => allowed(name),
        Value::File(file) => allowed(&file.name),
        Value::FileList(files) => !files.is_empty() && files.iter().all(|f| allowed(&f.name)),
        _ => false,
    }
}

// ============================================================================
// DYNAMIC PATTERNS
// ============================================================================

/// Matches against a pattern supplied in the rule. Commas inside the pattern
/// were split off by the parser, so the arguments are joined back first.
pub(crate) fn regex(cache: &PatternCache, value: &Value, args: &[String]) -> bool {
    let pattern = args.join(",");
    cache
        .get(&pattern)
        .is_some_and(|regex| regex.is_match(&value.stringify()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FileRef;
    use rstest::rstest;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn check(f: fn(&Record, &Value, &[String]) -> bool, value: Value, a: &[&str]) -> bool {
        f(&Record::new(), &value, &args(a))
    }

    #[rstest]
    #[case("yes", true)]
    #[case("ON", true)]
    #[case("1", true)]
    #[case("True", true)]
    #[case("no", false)]
    #[case("yes please", false)]
    #[case("ye\u{17f}", false)]
    fn accepted_pattern(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(ACCEPTED.is_match(input), expected);
    }

    #[rstest]
    #[case("Alice", true, true, true)]
    #[case("Al1ce", false, true, true)]
    #[case("al-ice_1", false, false, true)]
    #[case("", false, false, false)]
    fn alpha_family(
        #[case] input: &str,
        #[case] alpha: bool,
        #[case] alpha_num: bool,
        #[case] alpha_dash: bool,
    ) {
        assert_eq!(ALPHA.is_match(input), alpha);
        assert_eq!(ALPHA_NUM.is_match(input), alpha_num);
        assert_eq!(ALPHA_DASH.is_match(input), alpha_dash);
    }

    #[rstest]
    #[case("true", true)]
    #[case("0", true)]
    #[case("\"1\"", true)]
    #[case("'0'", true)]
    #[case("yes", false)]
    #[case("fal\u{17f}e", false)]
    fn boolean_pattern(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(BOOLEAN.is_match(input), expected);
    }

    #[rstest]
    #[case("peter@example.com", true)]
    #[case("first.last+tag@mail.example.org", true)]
    #[case("not an email", false)]
    #[case("x@y", false)]
    #[case("ü@example.com", false)]
    #[case("peter@exämple.com", false)]
    #[case("x peter@example.com y", false)]
    fn email_pattern(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(EMAIL.is_match(input), expected);
    }

    #[rstest]
    #[case("http://www.example.com", true)]
    #[case("https://example.com/path/to?q=1", true)]
    #[case("example.com", true)]
    #[case("ftp://192.168.0.1:21/", true)]
    #[case("not a url", false)]
    #[case("example com", false)]
    #[case("192 168 0 1", false)]
    #[case("http://example_com", false)]
    fn url_pattern(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(URL.is_match(input), expected);
    }

    #[rstest]
    #[case("192.168.1.1", true)]
    #[case("255.255.255.255", true)]
    #[case("256.1.1.1", false)]
    #[case("::1", true)]
    #[case("2001:db8::8a2e:370:7334", true)]
    #[case("fe80::1%eth0", true)]
    #[case("1.2.3", false)]
    #[case("hello", false)]
    #[case("١.٢.٣.٤", false)]
    #[case("192.168.१.1", false)]
    #[case("::ffff:१9.0.0.1", false)]
    fn ip_addresses(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(check(ip, Value::from(input), &[]), expected);
    }

    #[test]
    fn type_rules() {
        assert!(check(array, Value::Array(vec![]), &[]));
        assert!(!check(array, Value::from("[]"), &[]));
        assert!(check(string, Value::from(""), &[]));
        assert!(!check(string, Value::Number(1.0), &[]));
        assert!(check(numeric, Value::Number(1.5), &[]));
        assert!(!check(numeric, Value::from("1.5"), &[]));
        assert!(!check(numeric, Value::Number(f64::INFINITY), &[]));
        assert!(check(integer, Value::Number(15.0), &[]));
        assert!(!check(integer, Value::Number(15.5), &[]));
        assert!(!check(integer, Value::from("15"), &[]));
    }

    #[test]
    fn digit_rules() {
        assert!(check(digits, Value::from("0123"), &["4"]));
        assert!(check(digits, Value::Number(123.0), &["3"]));
        assert!(!check(digits, Value::from("12a4"), &["4"]));
        assert!(!check(digits, Value::from("123"), &["-3"]));
        assert!(!check(digits, Value::Number(1e21), &["22"]));
        assert!(check(digits, Value::Number(1e20), &["21"]));
        assert!(check(digits_between, Value::from("12345"), &["4", "6"]));
        assert!(!check(digits_between, Value::from("123"), &["4", "6"]));
        assert!(!check(digits_between, Value::from("123"), &["x", "6"]));
    }

    #[test]
    fn date_rules() {
        assert!(check(date, Value::from("2015-03-04"), &[]));
        assert!(!check(date, Value::from("someday"), &[]));
        assert!(check(after, Value::from("2015-03-05"), &["2015-03-04"]));
        assert!(!check(after, Value::from("2015-03-04"), &["2015-03-04"]));
        assert!(!check(after, Value::from("garbage"), &["2015-03-04"]));
        assert!(check(before, Value::from("2015-03-03"), &["2015-03-04"]));
        assert!(!check(before, Value::from("2015-03-03"), &["garbage"]));
    }

    #[test]
    fn date_format_round_trip() {
        assert!(check(date_format_rule, Value::from("2015-03-04"), &["yyyy-MM-dd"]));
        assert!(!check(date_format_rule, Value::from("2015-3-4"), &["yyyy-MM-dd"]));
        assert!(!check(date_format_rule, Value::Number(2015.0), &["yyyy"]));
    }

    #[test]
    fn sibling_comparisons() {
        let mut record = Record::new();
        record.insert("password".into(), Value::from("secret"));
        record.insert("count".into(), Value::Number(1.0));

        let a = args(&["password"]);
        assert!(same(&record, &Value::from("secret"), &a));
        assert!(!same(&record, &Value::from("other"), &a));
        assert!(different(&record, &Value::from("other"), &a));
        assert!(!different(&record, &Value::from("secret"), &a));

        let count = args(&["count"]);
        assert!(!same(&record, &Value::from("1"), &count));
        assert!(!different(&record, &Value::from("1"), &count));
        assert!(different(&record, &Value::from("x"), &args(&["missing"])));
    }

    #[test]
    fn membership_is_strict() {
        assert!(check(in_list, Value::from("male"), &["male", "female"]));
        assert!(!check(in_list, Value::from("other"), &["male", "female"]));
        assert!(!check(in_list, Value::Number(1.0), &["1"]));
        assert!(check(not_in_list, Value::from("other"), &["male", "female"]));
        assert!(check(not_in_list, Value::Number(1.0), &["1"]));
    }

    #[test]
    fn mimes_checks_extensions() {
        let allowed = &["png", "jpg"];
        assert!(check(mimes, Value::from("avatar.png"), allowed));
        assert!(!check(mimes, Value::from("avatar.gif"), allowed));
        assert!(!check(mimes, Value::from("README"), allowed));
        assert!(check(mimes, Value::File(FileRef::new("a.jpg", 10)), allowed));
        assert!(check(
            mimes,
            Value::FileList(vec![FileRef::new("a.jpg", 1), FileRef::new("b.png", 1)]),
            allowed
        ));
        assert!(!check(
            mimes,
            Value::FileList(vec![FileRef::new("a.jpg", 1), FileRef::new("b.exe", 1)]),
            allowed
        ));
        assert!(!check(mimes, Value::FileList(vec![]), allowed));
    }

    #[test]
    fn dynamic_patterns_rejoin_commas() {
        let cache = PatternCache::new();
        assert!(regex(&cache, &Value::from("123"), &args(&["^[0-9]{1", "3}$"])));
        assert!(!regex(&cache, &Value::from("1234"), &args(&["^[0-9]{1", "3}$"])));
        assert!(!regex(&cache, &Value::from("x"), &args(&["("])));
    }
}
