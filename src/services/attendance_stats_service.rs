use chrono::{DateTime, Datelike, FixedOffset};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::attendance::{find_default_shift, AttendanceRecord, AttendanceShift};
use crate::models::employee::{Employee, PayType, SalaryStructure};
use crate::models::payroll::AttendanceStats;
use crate::services::performance_score_service::minutes_of_day;
use crate::utils::shift_time::{parse_shift_start, try_parse_shift_start};

/// Five 9.5-hour weekdays plus a 4.5-hour Saturday.
const WEEKLY_WORK_HOURS: f64 = 5.0 * 9.5 + 1.0 * 4.5;
const WEEKS_PER_MONTH: f64 = 4.33;
pub const MONTHLY_WORK_MINUTES: f64 = WEEKLY_WORK_HOURS * 60.0 * WEEKS_PER_MONTH;

/// Pay per minute used for lateness deductions; 0 for unknown pay types.
pub fn per_minute_rate(salary: &SalaryStructure) -> f64 {
    match salary.pay_type {
        Some(PayType::Monthly) => salary.monthly_rate.unwrap_or(0.0) / MONTHLY_WORK_MINUTES,
        Some(PayType::Hourly) => salary.hourly_rate.unwrap_or(0.0) / 60.0,
        None => 0.0,
    }
}

/// The employee's check-ins that fall in `year`/`month` when read in `offset`.
pub(crate) fn records_in_month<'a>(
    employee_id: &'a str,
    records: &'a [AttendanceRecord],
    year: i32,
    month: u32,
    offset: &'a FixedOffset,
) -> impl Iterator<Item = (&'a AttendanceRecord, DateTime<FixedOffset>)> + 'a {
    records
        .iter()
        .filter(move |record| record.employee_id == employee_id)
        .filter_map(move |record| record.check_in_at(offset).map(|at| (record, at)))
        .filter(move |(_, at)| at.year() == year && at.month() == month)
}

/// Monthly lateness figures; all zero when there is no default shift or no salary structure.
pub fn compute_attendance_stats(
    employee: &Employee,
    records: &[AttendanceRecord],
    shifts: &[AttendanceShift],
    year: i32,
    month: u32,
    offset: &FixedOffset,
) -> AttendanceStats {
    let Some(shift) = find_default_shift(shifts) else {
        debug!(target: "app::attendance", employee_id = %employee.id, "no default shift, empty stats");
        return AttendanceStats::default();
    };
    let Some(salary) = employee.salary_structure.as_ref() else {
        debug!(target: "app::attendance", employee_id = %employee.id, "no salary structure, empty stats");
        return AttendanceStats::default();
    };

    let shift_start = parse_shift_start(&shift.start_time, shift.late_mark_after);
    tally(employee, records, shift, shift_start, salary, year, month, offset)
}

/// Strict variant of [`compute_attendance_stats`] that names the missing input.
pub fn try_compute_attendance_stats(
    employee: &Employee,
    records: &[AttendanceRecord],
    shifts: &[AttendanceShift],
    year: i32,
    month: u32,
    offset: &FixedOffset,
) -> AppResult<AttendanceStats> {
    let shift = find_default_shift(shifts).ok_or_else(AppError::missing_default_shift)?;
    let salary = employee
        .salary_structure
        .as_ref()
        .ok_or_else(|| AppError::missing_salary_structure(&employee.id))?;
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!("month out of range: {month}")));
    }

    let shift_start = try_parse_shift_start(&shift.start_time, shift.late_mark_after)?;
    Ok(tally(employee, records, shift, shift_start, salary, year, month, offset))
}

#[allow(clippy::too_many_arguments)]
fn tally(
    employee: &Employee,
    records: &[AttendanceRecord],
    shift: &AttendanceShift,
    shift_start_minutes: i64,
    salary: &SalaryStructure,
    year: i32,
    month: u32,
    offset: &FixedOffset,
) -> AttendanceStats {
    let mut stats = AttendanceStats::default();

    for (_, check_in) in records_in_month(&employee.id, records, year, month, offset) {
        stats.days_worked += 1;

        if !shift.works_on(check_in.weekday()) {
            continue;
        }
        let lateness = minutes_of_day(&check_in) - shift_start_minutes;
        if lateness > 0 {
            stats.late_days += 1;
            stats.total_lateness_minutes += lateness;
        }
    }

    stats.lateness_deduction = stats.total_lateness_minutes as f64 * per_minute_rate(salary);
    stats
}
