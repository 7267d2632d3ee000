use std::collections::HashMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::attendance::{find_default_shift, AttendanceRecord, AttendanceShift};
use crate::models::employee::Employee;
use crate::models::kpi::{AutomaticScores, KpiDefinition, KpiType, MAX_KPI_SCORE};
use crate::models::performance::{
    EmployeeScore, PerformanceEntry, PerformanceInputs, PerformanceRating, PerformanceReport,
};
use crate::models::settings::{ScoringSettings, DEFAULT_SCORING_WINDOW_DAYS};
use crate::models::task::TaskRecord;
use crate::services::incentive_service::distribute_incentives;
use crate::services::settings_service::validate_settings;
use crate::utils::duration::parse_optional_duration;
use crate::utils::shift_time::{parse_shift_start, try_parse_shift_start};

/// Score given when there is nothing to hold against the employee.
pub const PERFECT_PUNCTUALITY: f64 = MAX_KPI_SCORE;
/// Efficiency when no completed task carries any time information.
pub const NEUTRAL_EFFICIENCY: f64 = 2.5;
/// Each this many minutes of average lateness costs one point.
const LATENESS_MINUTES_PER_POINT: f64 = 10.0;

/// Trailing window ending at an injected `now`.
#[derive(Debug, Clone, Copy)]
pub struct ScoringWindow {
    now: DateTime<FixedOffset>,
    days: i64,
}

impl ScoringWindow {
    pub fn trailing_days(now: DateTime<FixedOffset>, days: i64) -> Self {
        Self { now, days }
    }

    pub fn last_30_days(now: DateTime<FixedOffset>) -> Self {
        Self::trailing_days(now, DEFAULT_SCORING_WINDOW_DAYS)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn offset(&self) -> FixedOffset {
        *self.now.offset()
    }

    pub fn cutoff(&self) -> DateTime<FixedOffset> {
        self.now - Duration::days(self.days)
    }

    /// No upper bound: anything at or after the cutoff qualifies.
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        instant >= self.cutoff()
    }

    /// A calendar date qualifies when its local midnight is inside the window.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.and_hms_opt(0, 0, 0)
            .and_then(|midnight| midnight.and_local_timezone(self.offset()).single())
            .is_some_and(|midnight| self.contains(midnight))
    }
}

pub(crate) fn minutes_of_day(instant: &DateTime<FixedOffset>) -> i64 {
    i64::from(instant.hour()) * 60 + i64::from(instant.minute())
}

/// 0–5 punctuality over the window; 5.0 when no default shift exists or nothing was recorded.
pub fn score_punctuality(
    employee: &Employee,
    records: &[AttendanceRecord],
    shifts: &[AttendanceShift],
    window: &ScoringWindow,
) -> f64 {
    let Some(shift) = find_default_shift(shifts) else {
        debug!(
            target: "app::performance",
            employee_id = %employee.id,
            "no default shift, punctuality defaults to perfect"
        );
        return PERFECT_PUNCTUALITY;
    };

    let shift_start = parse_shift_start(&shift.start_time, shift.late_mark_after);
    punctuality_against(employee, records, shift_start, window)
}

/// Like [`score_punctuality`] but reports a missing default shift or unreadable start time.
pub fn try_score_punctuality(
    employee: &Employee,
    records: &[AttendanceRecord],
    shifts: &[AttendanceShift],
    window: &ScoringWindow,
) -> AppResult<f64> {
    let shift = find_default_shift(shifts).ok_or_else(AppError::missing_default_shift)?;
    let shift_start = try_parse_shift_start(&shift.start_time, shift.late_mark_after)?;
    Ok(punctuality_against(employee, records, shift_start, window))
}

fn punctuality_against(
    employee: &Employee,
    records: &[AttendanceRecord],
    shift_start_minutes: i64,
    window: &ScoringWindow,
) -> f64 {
    let offset = window.offset();
    let lateness: Vec<i64> = records
        .iter()
        .filter(|record| record.employee_id == employee.id)
        .filter_map(|record| record.check_in_at(&offset))
        .filter(|check_in| window.contains(*check_in))
        .map(|check_in| (minutes_of_day(&check_in) - shift_start_minutes).max(0))
        .collect();

    if lateness.is_empty() {
        return PERFECT_PUNCTUALITY;
    }

    let average = lateness.iter().sum::<i64>() as f64 / lateness.len() as f64;
    (PERFECT_PUNCTUALITY - average / LATENESS_MINUTES_PER_POINT).max(0.0)
}

/// Estimated-vs-logged ratio over every completed task, capped at 5.
///
/// Unlike productivity, this looks at all completed tasks regardless of when they
/// were completed.
pub fn score_efficiency(employee: &Employee, tasks: &[TaskRecord]) -> f64 {
    let (total_estimated, total_logged) = tasks
        .iter()
        .filter(|task| task.is_done_by(&employee.id))
        .fold((0_i64, 0_i64), |(estimated, logged), task| {
            (
                estimated + parse_optional_duration(task.estimated_time.as_deref()),
                logged + parse_optional_duration(task.hours_logged.as_deref()),
            )
        });

    if total_logged > 0 {
        (total_estimated as f64 / total_logged as f64 * MAX_KPI_SCORE).min(MAX_KPI_SCORE)
    } else if total_estimated > 0 {
        0.0
    } else {
        NEUTRAL_EFFICIENCY
    }
}

fn completed_in_window(employee_id: &str, tasks: &[TaskRecord], window: &ScoringWindow) -> usize {
    tasks
        .iter()
        .filter(|task| task.is_done_by(employee_id))
        .filter(|task| {
            task.completed_on
                .is_some_and(|completed_on| window.contains_date(completed_on))
        })
        .count()
}

/// Completed-task count relative to the best peer; the top producer scores 5.
pub fn score_productivity(
    employee: &Employee,
    employees: &[Employee],
    tasks: &[TaskRecord],
    window: &ScoringWindow,
) -> f64 {
    let max_productivity = employees
        .iter()
        .map(|peer| completed_in_window(&peer.id, tasks, window))
        .max()
        .unwrap_or(0)
        .max(1);

    let own = completed_in_window(&employee.id, tasks, window);
    own as f64 / max_productivity as f64 * MAX_KPI_SCORE
}

pub fn compute_automatic_scores(
    employee: &Employee,
    inputs: &PerformanceInputs<'_>,
    window: &ScoringWindow,
) -> AutomaticScores {
    AutomaticScores {
        punctuality: score_punctuality(employee, inputs.attendance, inputs.shifts, window),
        efficiency: score_efficiency(employee, inputs.tasks),
        productivity: score_productivity(employee, inputs.employees, inputs.tasks, window),
    }
}

/// Weighted average of KPI scores; 0 when the weights sum to zero.
pub fn aggregate_kpis(
    automatic: &AutomaticScores,
    manual: Option<&HashMap<String, f64>>,
    kpis: &[KpiDefinition],
) -> f64 {
    let (weighted, total_weight) =
        kpis.iter()
            .fold((0.0_f64, 0.0_f64), |(weighted, total_weight), kpi| {
                let score = match kpi.kpi_type {
                    KpiType::Automatic => automatic.get(&kpi.id),
                    KpiType::Manual => manual.and_then(|scores| scores.get(&kpi.id).copied()),
                }
                .unwrap_or(0.0);
                (weighted + score * kpi.weight, total_weight + kpi.weight)
            });

    if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    }
}

/// Scores every employee against the configured KPIs and splits the bonus pool.
pub struct PerformanceScoreService {
    settings: ScoringSettings,
}

impl PerformanceScoreService {
    /// Rejects settings that `validate_settings` would refuse.
    pub fn new(settings: ScoringSettings) -> AppResult<Self> {
        validate_settings(&settings)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    pub fn window_at(&self, now: DateTime<Utc>) -> ScoringWindow {
        let offset = self.settings.offset().unwrap_or_else(|| {
            warn!(
                target: "app::performance",
                utc_offset_minutes = self.settings.utc_offset_minutes,
                "utc offset out of range, using UTC"
            );
            Utc.fix()
        });
        ScoringWindow::trailing_days(now.with_timezone(&offset), self.settings.scoring_window_days)
    }

    pub fn evaluate(&self, inputs: &PerformanceInputs<'_>, now: DateTime<Utc>) -> PerformanceReport {
        let window = self.window_at(now);

        let scored: Vec<(&Employee, AutomaticScores, f64)> = inputs
            .employees
            .iter()
            .map(|employee| {
                let automatic = compute_automatic_scores(employee, inputs, &window);
                let overall = aggregate_kpis(
                    &automatic,
                    inputs.manual_scores.scores_for(&employee.id),
                    &self.settings.kpis,
                );
                (employee, automatic, overall)
            })
            .collect();

        let overall_scores: Vec<EmployeeScore> = scored
            .iter()
            .map(|(employee, _, overall)| EmployeeScore {
                employee_id: employee.id.clone(),
                overall_score: *overall,
            })
            .collect();
        let bonuses = distribute_incentives(&overall_scores, self.settings.bonus_pool);

        let entries: Vec<PerformanceEntry> = scored
            .into_iter()
            .map(|(employee, automatic_scores, overall_score)| PerformanceEntry {
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                automatic_scores,
                overall_score,
                incentive_bonus: bonuses.get(&employee.id).copied().unwrap_or(0.0),
                rating: PerformanceRating::from_score(overall_score),
            })
            .collect();

        let total_score: f64 = entries.iter().map(|entry| entry.overall_score).sum();
        debug!(
            target: "app::performance",
            employees = entries.len(),
            total_score,
            bonus_pool = self.settings.bonus_pool,
            "performance evaluation complete"
        );

        PerformanceReport {
            generated_at: window.now(),
            bonus_pool: self.settings.bonus_pool,
            total_score,
            entries,
        }
    }
}
