use crate::error::{AppError, AppResult};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

struct ClockParts {
    hours: i64,
    minutes: i64,
    meridiem: Option<Meridiem>,
}

/// Converts a 12-hour clock string (`"09:00 AM"`, `"5:30PM"`) into minutes since midnight.
///
/// Lenient: unparseable numbers count as 0 and out-of-range values are not rejected,
/// so `"13:00 PM"` yields 780. Use [`try_parse_shift_time`] to validate.
pub fn parse_shift_time(value: &str) -> i64 {
    let parts = split_clock(value);
    to_minutes(&parts)
}

/// Strict variant of [`parse_shift_time`]; returns `InvalidTime` for malformed or out-of-range input.
pub fn try_parse_shift_time(value: &str) -> AppResult<i64> {
    let upper = value.trim().to_ascii_uppercase();
    let (clock, meridiem) = strip_meridiem(&upper);
    let (hours_text, minutes_text) = clock.split_once(':').unwrap_or((clock, "00"));

    let hours = parse_digits(hours_text, 1, 2);
    let minutes = parse_digits(minutes_text, 2, 2);
    let (Some(hours), Some(minutes)) = (hours, minutes) else {
        return Err(AppError::invalid_time(value));
    };

    let hours_in_range = match meridiem {
        Some(_) => (1..=12).contains(&hours),
        None => (0..=23).contains(&hours),
    };
    if !hours_in_range || minutes > 59 {
        return Err(AppError::invalid_time(value));
    }

    Ok(to_minutes(&ClockParts {
        hours,
        minutes,
        meridiem,
    }))
}

/// Start of a shift plus its grace period, in minutes since midnight.
pub fn parse_shift_start(start_time: &str, grace_minutes: i64) -> i64 {
    parse_shift_time(start_time) + grace_minutes
}

pub fn try_parse_shift_start(start_time: &str, grace_minutes: i64) -> AppResult<i64> {
    Ok(try_parse_shift_time(start_time)? + grace_minutes)
}

/// Renders minutes since midnight as `"HH:MM AM|PM"`; values wrap around a day.
pub fn format_minutes_of_day(minutes: i64) -> String {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    let hours = minutes / 60;
    let suffix = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", display_hours, minutes % 60, suffix)
}

fn split_clock(value: &str) -> ClockParts {
    let upper = value.trim().to_ascii_uppercase();
    let (clock, meridiem) = strip_meridiem(&upper);

    let (hours_text, minutes_text) = match clock.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None => (clock, ""),
    };

    ClockParts {
        hours: hours_text.trim().parse().unwrap_or(0),
        minutes: minutes_text.trim().parse().unwrap_or(0),
        meridiem,
    }
}

fn parse_digits(text: &str, min_len: usize, max_len: usize) -> Option<i64> {
    let len = text.len();
    if len < min_len || len > max_len || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn strip_meridiem(value: &str) -> (&str, Option<Meridiem>) {
    if let Some(rest) = value.strip_suffix("AM") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else if let Some(rest) = value.strip_suffix("PM") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else {
        (value, None)
    }
}

fn to_minutes(parts: &ClockParts) -> i64 {
    let hours = match (parts.meridiem, parts.hours) {
        (Some(Meridiem::Am), 12) => 0,
        (Some(Meridiem::Pm), h) if h < 12 => h + 12,
        (_, h) => h,
    };
    hours * 60 + parts.minutes
}
