use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::attendance::{AttendanceRecord, AttendanceShift};
use crate::models::employee::Employee;
use crate::models::kpi::{AutomaticScores, ManualKpiScores};
use crate::models::task::TaskRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl PerformanceRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            PerformanceRating::Excellent
        } else if score >= 3.0 {
            PerformanceRating::Good
        } else if score >= 2.0 {
            PerformanceRating::Fair
        } else {
            PerformanceRating::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "excellent",
            PerformanceRating::Good => "good",
            PerformanceRating::Fair => "fair",
            PerformanceRating::NeedsImprovement => "needs_improvement",
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collections a performance evaluation reads; borrowed from the caller's state.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceInputs<'a> {
    pub employees: &'a [Employee],
    pub tasks: &'a [TaskRecord],
    pub attendance: &'a [AttendanceRecord],
    pub shifts: &'a [AttendanceShift],
    pub manual_scores: &'a ManualKpiScores,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeScore {
    pub employee_id: String,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    pub employee_id: String,
    pub employee_name: String,
    pub automatic_scores: AutomaticScores,
    pub overall_score: f64,
    pub incentive_bonus: f64,
    pub rating: PerformanceRating,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub generated_at: DateTime<FixedOffset>,
    pub bonus_pool: f64,
    pub total_score: f64,
    pub entries: Vec<PerformanceEntry>,
}

impl PerformanceReport {
    pub fn entry(&self, employee_id: &str) -> Option<&PerformanceEntry> {
        self.entries
            .iter()
            .find(|entry| entry.employee_id == employee_id)
    }

    pub fn total_distributed(&self) -> f64 {
        self.entries.iter().map(|entry| entry.incentive_bonus).sum()
    }
}
