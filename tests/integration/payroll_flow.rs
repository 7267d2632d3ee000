//! Monthly attendance stats and payroll summaries across a small roster.

use bizdash_core_lib::models::attendance::{AttendanceRecord, AttendanceShift};
use bizdash_core_lib::models::employee::{Employee, SalaryStructure};
use bizdash_core_lib::models::payroll::AttendanceStats;
use bizdash_core_lib::models::settings::ScoringSettings;
use bizdash_core_lib::services::attendance_stats_service::MONTHLY_WORK_MINUTES;
use bizdash_core_lib::{
    compute_attendance_stats, try_compute_attendance_stats, AppError, PayrollService,
};
use chrono::{FixedOffset, TimeZone};
use serde_json::json;

fn offset() -> FixedOffset {
    FixedOffset::east_opt(6 * 3600).unwrap()
}

fn shifts() -> Vec<AttendanceShift> {
    serde_json::from_value(json!([
        {
            "id": "night",
            "name": "Night",
            "startTime": "10:00 PM",
            "endTime": "06:00 AM",
            "lateMarkAfter": 0,
            "officeDays": ["Monday"],
            "isDefault": false
        },
        {
            "id": "day",
            "name": "Day",
            "startTime": "09:00 AM",
            "endTime": "06:30 PM",
            "lateMarkAfter": 15,
            "officeDays": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"],
            "isDefault": true
        },
        {
            "id": "late",
            "name": "Late",
            "startTime": "12:00 PM",
            "endTime": "09:00 PM",
            "lateMarkAfter": 0,
            "officeDays": ["Monday"],
            "isDefault": true
        }
    ]))
    .unwrap()
}

fn roster() -> Vec<Employee> {
    serde_json::from_value(json!([
        {
            "id": "m1",
            "name": "Monthly Mia",
            "department": "Finance",
            "salaryStructure": {
                "payType": "Monthly",
                "monthlyRate": 27019.2,
                "allowances": 500.0,
                "deductions": 200.0
            }
        },
        {
            "id": "h1",
            "name": "Hourly Hasan",
            "salaryStructure": {"payType": "Hourly", "hourlyRate": 120.0, "overtimeRate": 180.0}
        },
        {
            "id": "x1",
            "name": "Contract Xu",
            "salaryStructure": {"payType": "Retainer", "monthlyRate": 9000.0}
        },
        {"id": "n1", "name": "No Salary Nia"}
    ]))
    .unwrap()
}

/// Local wall-clock check-in (and optional check-out) in the +06:00 offset.
fn record(
    employee_id: &str,
    day: u32,
    check_in: (u32, u32),
    check_out: Option<(u32, u32)>,
) -> AttendanceRecord {
    let at = |(hour, minute): (u32, u32)| {
        offset()
            .with_ymd_and_hms(2024, 7, day, hour, minute, 0)
            .unwrap()
            .timestamp_millis()
    };
    AttendanceRecord {
        id: format!("{employee_id}-{day}"),
        employee_id: employee_id.to_string(),
        check_in_time: at(check_in),
        check_out_time: check_out.map(at),
        location: None,
    }
}

// July 2024: the 1st is a Monday, the 7th a Sunday.
fn records() -> Vec<AttendanceRecord> {
    vec![
        record("m1", 1, (9, 15), Some((18, 30))),
        record("m1", 2, (9, 45), Some((18, 30))),
        record("m1", 3, (10, 15), Some((18, 30))),
        record("m1", 7, (12, 0), None),
        record("h1", 1, (9, 20), Some((20, 45))),
        record("h1", 2, (9, 0), None),
        record("x1", 1, (10, 15), Some((18, 30))),
        record("n1", 1, (11, 15), Some((18, 30))),
    ]
}

#[test]
fn monthly_stats_use_first_default_shift() {
    let roster = roster();
    let stats = compute_attendance_stats(&roster[0], &records(), &shifts(), 2024, 7, &offset());

    assert_eq!(stats.days_worked, 4);
    assert_eq!(stats.late_days, 2);
    assert_eq!(stats.total_lateness_minutes, 90);
    let per_minute = 27019.2 / MONTHLY_WORK_MINUTES;
    assert!((per_minute - 2.0).abs() < 1e-9);
    assert!((stats.lateness_deduction - 180.0).abs() < 1e-6);
}

#[test]
fn unknown_pay_type_deducts_nothing() {
    let roster = roster();
    let stats = compute_attendance_stats(&roster[2], &records(), &shifts(), 2024, 7, &offset());
    assert_eq!(stats.late_days, 1);
    assert_eq!(stats.total_lateness_minutes, 60);
    assert_eq!(stats.lateness_deduction, 0.0);
}

#[test]
fn no_salary_structure_means_no_deduction() {
    let roster = roster();
    let stats = compute_attendance_stats(&roster[3], &records(), &shifts(), 2024, 7, &offset());
    assert_eq!(stats, AttendanceStats::default());
    assert!(matches!(
        try_compute_attendance_stats(&roster[3], &records(), &shifts(), 2024, 7, &offset()),
        Err(AppError::MissingSalaryStructure { ref employee_id }) if employee_id == "n1"
    ));
}

#[test]
fn payroll_run_covers_the_roster() {
    let settings = ScoringSettings {
        utc_offset_minutes: 6 * 60,
        ..ScoringSettings::default()
    };
    let service = PayrollService::from_settings(&settings);
    let summaries = service.summarize_all(&roster(), &records(), &shifts(), 2024, 7);
    assert_eq!(summaries.len(), 4);

    let mia = &summaries[0];
    assert_eq!(mia.base_pay, 27019.2);
    // 09:15 -> 18:30 is 555 minutes against a 570 minute shift: no overtime
    assert_eq!(mia.overtime_hours, 0.0);
    assert!((mia.net_pay - (27019.2 + 500.0 - 200.0 - 180.0)).abs() < 1e-6);

    let hasan = &summaries[1];
    // 09:20 -> 20:45 is 685 minutes, 115 past the shift length
    assert!((hasan.hours_worked - 685.0 / 60.0).abs() < 1e-9);
    assert!((hasan.overtime_hours - 115.0 / 60.0).abs() < 1e-9);
    assert!((hasan.base_pay - 1370.0).abs() < 1e-9);
    assert!((hasan.overtime_pay - 345.0).abs() < 1e-9);
    assert_eq!(hasan.attendance.late_days, 1);
    assert!((hasan.lateness_deduction - 10.0).abs() < 1e-9);

    let xu = &summaries[2];
    assert_eq!(xu.base_pay, 0.0);
    assert_eq!(xu.lateness_deduction, 0.0);

    let nia = &summaries[3];
    assert_eq!(nia.net_pay, 0.0);
    assert_eq!(nia.attendance, AttendanceStats::default());
}

#[test]
fn strict_payroll_reports_missing_shift() {
    let service = PayrollService::new(offset());
    let roster = roster();
    let result = service.try_summarize(&roster[0], &records(), &[], 2024, 7);
    assert!(matches!(result, Err(AppError::MissingDefaultShift)));
}
