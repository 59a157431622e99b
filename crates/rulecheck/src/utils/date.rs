//! Date parsing and formatting
//!
//! [`parse_date`] accepts the date shapes a host date parser commonly
//! understands. [`date_format`] renders a date through a small token language:
//!
//! | token | value | padding |
//! |---|---|---|
//! | `y+` | year | right-truncated to token length |
//! | `M+` | month (1-12) | zero-padded to token length |
//! | `d+` | day of month | zero-padded |
//! | `h+` | hour (0-23) | zero-padded |
//! | `m+` | minute | zero-padded |
//! | `s+` | second | zero-padded |
//! | `q+` | quarter (1-4) | zero-padded |
//! | `S` | millisecond | none |
//!
//! Only the first run of each token is substituted. A single-character token
//! is rendered without padding.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Naive date-time layouts tried after RFC 3339 and RFC 2822.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts; the time is midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a date string.
///
/// Offset-bearing inputs are normalised to UTC. Naive inputs are taken as-is.
///
/// # Examples
///
/// ```
/// use rulecheck::utils::parse_date;
///
/// assert!(parse_date("2015-03-04").is_some());
/// assert!(parse_date("2015-03-04T10:20:30Z").is_some());
/// assert!(parse_date("not a date").is_none());
/// ```
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Renders `date` through the token language described in the module docs.
///
/// # Examples
///
/// ```
/// use rulecheck::utils::{date_format, parse_date};
///
/// let date = parse_date("2015-03-04 05:06:07").unwrap();
/// assert_eq!(date_format(&date, "yyyy-MM-dd hh:mm:ss"), "2015-03-04 05:06:07");
/// assert_eq!(date_format(&date, "yy/M/d q"), "15/3/4 1");
/// ```
#[must_use]
pub fn date_format(date: &NaiveDateTime, pattern: &str) -> String {
    let mut out = pattern.to_owned();

    let year = date.year().to_string();
    out = replace_first_run(&out, 'y', false, |len| {
        let keep = len.min(year.len());
        year[year.len() - keep..].to_owned()
    });

    let fields: [(char, u32); 6] = [
        ('M', date.month()),
        ('d', date.day()),
        ('h', date.hour()),
        ('m', date.minute()),
        ('s', date.second()),
        ('q', date.month0() / 3 + 1),
    ];
    for (token, value) in fields {
        out = replace_first_run(&out, token, false, |len| pad(value, len));
    }

    let millis = date.nanosecond() / 1_000_000;
    replace_first_run(&out, 'S', true, |_| millis.to_string())
}

fn pad(value: u32, len: usize) -> String {
    if len == 1 {
        value.to_string()
    } else {
        format!("{value:0>len$}")
    }
}

/// Replaces the first run of `token` in `input` with `render(run_length)`.
///
/// With `single` set, only one character is consumed even inside a longer run.
fn replace_first_run(
    input: &str,
    token: char,
    single: bool,
    render: impl FnOnce(usize) -> String,
) -> String {
    let Some(start) = input.find(token) else {
        return input.to_owned();
    };
    let run = if single {
        1
    } else {
        input[start..].chars().take_while(|&c| c == token).count()
    };
    let end = start + run * token.len_utf8();

    let mut out = String::with_capacity(input.len() + 4);
    out.push_str(&input[..start]);
    out.push_str(&render(run));
    out.push_str(&input[end..]);
    out
}
