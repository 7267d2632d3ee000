//! End-to-end performance scoring: raw records -> automatic scores -> overall score -> bonus.

use bizdash_core_lib::models::attendance::{AttendanceRecord, AttendanceShift};
use bizdash_core_lib::models::employee::Employee;
use bizdash_core_lib::models::kpi::{
    KpiDefinition, ManualKpiScores, KPI_EFFICIENCY, KPI_PRODUCTIVITY, KPI_PUNCTUALITY,
};
use bizdash_core_lib::models::performance::{PerformanceInputs, PerformanceRating};
use bizdash_core_lib::models::settings::ScoringSettings;
use bizdash_core_lib::models::task::{TaskRecord, TaskStatus};
use bizdash_core_lib::services::performance_score_service::compute_automatic_scores;
use bizdash_core_lib::{PerformanceScoreService, ScoringWindow};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 20, 15, 0, 0).unwrap()
}

fn employees() -> Vec<Employee> {
    vec![
        Employee::new("e1", "Amara"),
        Employee::new("e2", "Bilal"),
        Employee::new("e3", "Chen"),
    ]
}

fn default_shift() -> AttendanceShift {
    AttendanceShift {
        id: "day".to_string(),
        name: "Day shift".to_string(),
        start_time: "09:00 AM".to_string(),
        end_time: "06:00 PM".to_string(),
        late_mark_after: 10,
        office_days: vec!["Monday".to_string(), "Friday".to_string()],
        is_default: true,
    }
}

fn check_in(employee_id: &str, days_ago: i64, hour: u32, minute: u32) -> AttendanceRecord {
    let day = (now() - Duration::days(days_ago)).date_naive();
    let at = day.and_hms_opt(hour, minute, 0).unwrap().and_utc();
    AttendanceRecord {
        id: format!("{employee_id}-{days_ago}"),
        employee_id: employee_id.to_string(),
        check_in_time: at.timestamp_millis(),
        check_out_time: None,
        location: None,
    }
}

fn task(id: &str, assignee: &str, status: TaskStatus, days_ago: i64, est: &str, logged: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        title: format!("Task {id}"),
        status,
        assignee_ids: vec![assignee.to_string()],
        completed_on: Some((now() - Duration::days(days_ago)).date_naive()),
        estimated_time: Some(est.to_string()),
        hours_logged: Some(logged.to_string()),
    }
}

fn fixtures() -> (Vec<Employee>, Vec<TaskRecord>, Vec<AttendanceRecord>) {
    let tasks = vec![
        task("1", "e1", TaskStatus::Done, 2, "4h", "4h"),
        task("2", "e1", TaskStatus::Done, 5, "2h 30m", "2h 30m"),
        task("3", "e2", TaskStatus::Done, 3, "1h", "2h"),
        task("4", "e2", TaskStatus::InProgress, 1, "8h", "1h"),
        task("5", "e3", TaskStatus::Done, 60, "3h", "1h"),
    ];
    let attendance = vec![
        check_in("e1", 1, 9, 0),
        check_in("e1", 2, 9, 5),
        check_in("e2", 1, 9, 30),
        check_in("e2", 2, 9, 30),
    ];
    (employees(), tasks, attendance)
}

#[test]
fn automatic_scores_follow_each_rule() {
    let (employees, tasks, attendance) = fixtures();
    let shifts = vec![default_shift()];
    let manual = ManualKpiScores::new();
    let inputs = PerformanceInputs {
        employees: &employees,
        tasks: &tasks,
        attendance: &attendance,
        shifts: &shifts,
        manual_scores: &manual,
    };
    let offset = FixedOffset::east_opt(0).unwrap();
    let window = ScoringWindow::last_30_days(now().with_timezone(&offset));

    let e1 = compute_automatic_scores(&employees[0], &inputs, &window);
    assert_eq!(e1.punctuality, 5.0);
    assert_eq!(e1.efficiency, 5.0);
    assert_eq!(e1.productivity, 5.0);

    let e2 = compute_automatic_scores(&employees[1], &inputs, &window);
    // 20 minutes late on average past the 09:10 mark
    assert!((e2.punctuality - 3.0).abs() < 1e-9);
    assert!((e2.efficiency - 2.5).abs() < 1e-9);
    assert!((e2.productivity - 2.5).abs() < 1e-9);

    // completed two months ago: counts for efficiency, not for productivity
    let e3 = compute_automatic_scores(&employees[2], &inputs, &window);
    assert_eq!(e3.punctuality, 5.0);
    assert_eq!(e3.efficiency, 5.0);
    assert_eq!(e3.productivity, 0.0);
}

#[test]
fn report_distributes_the_whole_pool() {
    let (employees, tasks, attendance) = fixtures();
    let shifts = vec![default_shift()];
    let mut manual = ManualKpiScores::new();
    manual.set_score("e1", "kpi_teamwork", 4.0).unwrap();
    manual.set_score("e2", "kpi_teamwork", 9.0).unwrap();

    let inputs = PerformanceInputs {
        employees: &employees,
        tasks: &tasks,
        attendance: &attendance,
        shifts: &shifts,
        manual_scores: &manual,
    };
    let settings = ScoringSettings {
        bonus_pool: 10_000.0,
        ..ScoringSettings::default()
    };
    let report = PerformanceScoreService::new(settings)
        .expect("valid settings")
        .evaluate(&inputs, now());

    assert_eq!(report.entries.len(), 3);
    assert!((report.total_distributed() - 10_000.0).abs() < 1e-6);

    // 5*30 + 5*30 + 5*20 + 4*20 over 100
    let e1 = report.entry("e1").unwrap();
    assert!((e1.overall_score - 4.8).abs() < 1e-9);
    assert_eq!(e1.rating, PerformanceRating::Excellent);

    // manual score clamped to 5
    let e2 = report.entry("e2").unwrap();
    let expected_e2 = (3.0 * 30.0 + 2.5 * 30.0 + 2.5 * 20.0 + 5.0 * 20.0) / 100.0;
    assert!((e2.overall_score - expected_e2).abs() < 1e-9);

    let share = e1.incentive_bonus / e2.incentive_bonus;
    assert!((share - e1.overall_score / e2.overall_score).abs() < 1e-9);
}

#[test]
fn all_zero_scores_leave_the_pool_untouched() {
    let employees = employees();
    let manual = ManualKpiScores::new();
    let inputs = PerformanceInputs {
        employees: &employees,
        tasks: &[],
        attendance: &[],
        shifts: &[],
        manual_scores: &manual,
    };
    let settings = ScoringSettings {
        bonus_pool: 5_000.0,
        kpis: vec![KpiDefinition::automatic(KPI_PRODUCTIVITY, "kpi.productivity", 100.0)],
        ..ScoringSettings::default()
    };
    let report = PerformanceScoreService::new(settings)
        .expect("valid settings")
        .evaluate(&inputs, now());

    assert!(report.entries.iter().all(|entry| entry.overall_score == 0.0));
    assert!(report.entries.iter().all(|entry| entry.incentive_bonus == 0.0));
    assert_eq!(report.total_distributed(), 0.0);
}

#[test]
fn offset_moves_check_ins_across_the_grace_mark() {
    let employees = vec![Employee::new("e1", "Amara")];
    // 03:30 UTC is 09:00 in UTC+05:30 and 03:30 in UTC
    let attendance = vec![check_in("e1", 1, 3, 30)];
    let shifts = vec![default_shift()];
    let manual = ManualKpiScores::new();
    let inputs = PerformanceInputs {
        employees: &employees,
        tasks: &[],
        attendance: &attendance,
        shifts: &shifts,
        manual_scores: &manual,
    };
    let kpis = vec![
        KpiDefinition::automatic(KPI_PUNCTUALITY, "kpi.punctuality", 1.0),
        KpiDefinition::automatic(KPI_EFFICIENCY, "kpi.efficiency", 0.0),
    ];

    let late_offset = ScoringSettings {
        utc_offset_minutes: 7 * 60,
        kpis: kpis.clone(),
        ..ScoringSettings::default()
    };
    // 10:30 local => 80 minutes past 09:10
    let report = PerformanceScoreService::new(late_offset)
        .expect("valid settings")
        .evaluate(&inputs, now());
    assert_eq!(report.entries[0].automatic_scores.punctuality, 0.0);

    let on_time_offset = ScoringSettings {
        utc_offset_minutes: 5 * 60 + 30,
        kpis,
        ..ScoringSettings::default()
    };
    let report = PerformanceScoreService::new(on_time_offset)
        .expect("valid settings")
        .evaluate(&inputs, now());
    assert_eq!(report.entries[0].automatic_scores.punctuality, 5.0);
    assert_eq!(report.generated_at.offset().local_minus_utc(), 330 * 60);
}
