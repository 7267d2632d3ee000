use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub const KPI_PUNCTUALITY: &str = "kpi_punctuality";
pub const KPI_EFFICIENCY: &str = "kpi_efficiency";
pub const KPI_PRODUCTIVITY: &str = "kpi_productivity";

pub const MIN_KPI_SCORE: f64 = 0.0;
pub const MAX_KPI_SCORE: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KpiType {
    Automatic,
    Manual,
}

impl KpiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiType::Automatic => "automatic",
            KpiType::Manual => "manual",
        }
    }
}

impl fmt::Display for KpiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiDefinition {
    pub id: String,
    pub name_key: String,
    #[serde(rename = "type")]
    pub kpi_type: KpiType,
    /// Percentage-like; weights are not required to sum to 100.
    pub weight: f64,
}

impl KpiDefinition {
    pub fn automatic(id: impl Into<String>, name_key: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name_key: name_key.into(),
            kpi_type: KpiType::Automatic,
            weight,
        }
    }

    pub fn manual(id: impl Into<String>, name_key: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name_key: name_key.into(),
            kpi_type: KpiType::Manual,
            weight,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutomaticScores {
    pub punctuality: f64,
    pub efficiency: f64,
    pub productivity: f64,
}

impl AutomaticScores {
    /// Looks up a score by KPI id; ids other than the three automatic ones yield `None`.
    pub fn get(&self, kpi_id: &str) -> Option<f64> {
        match kpi_id {
            KPI_PUNCTUALITY => Some(self.punctuality),
            KPI_EFFICIENCY => Some(self.efficiency),
            KPI_PRODUCTIVITY => Some(self.productivity),
            _ => None,
        }
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        HashMap::from([
            (KPI_PUNCTUALITY.to_string(), self.punctuality),
            (KPI_EFFICIENCY.to_string(), self.efficiency),
            (KPI_PRODUCTIVITY.to_string(), self.productivity),
        ])
    }
}

/// Manually entered KPI scores, keyed by employee id then KPI id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ManualKpiScores {
    scores: HashMap<String, HashMap<String, f64>>,
}

impl ManualKpiScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a score clamped into `[0, 5]` and returns the stored value.
    pub fn set_score(&mut self, employee_id: &str, kpi_id: &str, score: f64) -> AppResult<f64> {
        if !score.is_finite() {
            return Err(AppError::validation_with_details(
                "manual KPI score must be a finite number",
                json!({"employeeId": employee_id, "kpiId": kpi_id}),
            ));
        }
        let clamped = score.clamp(MIN_KPI_SCORE, MAX_KPI_SCORE);
        self.scores
            .entry(employee_id.to_string())
            .or_default()
            .insert(kpi_id.to_string(), clamped);
        Ok(clamped)
    }

    pub fn score(&self, employee_id: &str, kpi_id: &str) -> Option<f64> {
        self.scores
            .get(employee_id)
            .and_then(|per_kpi| per_kpi.get(kpi_id))
            .copied()
    }

    pub fn scores_for(&self, employee_id: &str) -> Option<&HashMap<String, f64>> {
        self.scores.get(employee_id)
    }

    pub fn remove_employee(&mut self, employee_id: &str) -> bool {
        self.scores.remove(employee_id).is_some()
    }
}
