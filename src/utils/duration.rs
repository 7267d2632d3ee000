use once_cell::sync::Lazy;
use regex::Regex;

static HOURS_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*h").unwrap());
static MINUTES_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*m").unwrap());

/// Parses free-text durations such as `"8h 30m"`, `"45m"` or `"2 h"` into whole minutes.
///
/// Only the first hours token and the first minutes token count. Text without any
/// digit, and tokens too large to represent, contribute nothing.
pub fn parse_duration(text: &str) -> i64 {
    if !text.chars().any(|ch| ch.is_ascii_digit()) {
        return 0;
    }

    let hours = first_token_value(&HOURS_TOKEN, text);
    let minutes = first_token_value(&MINUTES_TOKEN, text);

    hours.saturating_mul(60).saturating_add(minutes)
}

pub fn parse_optional_duration(text: Option<&str>) -> i64 {
    text.map(parse_duration).unwrap_or(0)
}

fn first_token_value(pattern: &Regex, text: &str) -> i64 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|value| value.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}
