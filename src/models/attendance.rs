use chrono::{DateTime, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    /// Epoch milliseconds.
    pub check_in_time: i64,
    #[serde(default)]
    pub check_out_time: Option<i64>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

impl AttendanceRecord {
    pub fn check_in_at(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        millis_to_local(self.check_in_time, offset)
    }

    pub fn check_out_at(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        self.check_out_time
            .and_then(|millis| millis_to_local(millis, offset))
    }

    /// Minutes between check-in and check-out; `None` while still checked in.
    pub fn worked_minutes(&self) -> Option<i64> {
        let check_out = self.check_out_time?;
        Some(((check_out - self.check_in_time) / 60_000).max(0))
    }
}

fn millis_to_local(millis: i64, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(offset))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceShift {
    pub id: String,
    pub name: String,
    /// 12-hour clock, e.g. `"09:00 AM"`.
    pub start_time: String,
    pub end_time: String,
    /// Grace minutes after `start_time` before a check-in counts as late.
    #[serde(default)]
    pub late_mark_after: i64,
    #[serde(default)]
    pub office_days: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AttendanceShift {
    /// Matches full (`"Monday"`) or short (`"Mon"`) weekday names, any case.
    pub fn works_on(&self, weekday: Weekday) -> bool {
        let full = weekday_name(weekday);
        let short = &full[..3];
        self.office_days.iter().any(|day| {
            let day = day.trim();
            day.eq_ignore_ascii_case(full) || day.eq_ignore_ascii_case(short)
        })
    }
}

/// First shift flagged `is_default`, in input order.
pub fn find_default_shift(shifts: &[AttendanceShift]) -> Option<&AttendanceShift> {
    shifts.iter().find(|shift| shift.is_default)
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
