use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::models::kpi::{KpiDefinition, KPI_EFFICIENCY, KPI_PRODUCTIVITY, KPI_PUNCTUALITY};

pub const DEFAULT_SCORING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSettings {
    #[serde(default = "default_window_days")]
    pub scoring_window_days: i64,
    #[serde(default)]
    pub bonus_pool: f64,
    /// Offset used to read check-in timestamps as local wall-clock time.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_kpis")]
    pub kpis: Vec<KpiDefinition>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            scoring_window_days: DEFAULT_SCORING_WINDOW_DAYS,
            bonus_pool: 0.0,
            utc_offset_minutes: 0,
            kpis: default_kpis(),
        }
    }
}

impl ScoringSettings {
    /// `None` when the configured minutes do not form a valid offset.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

fn default_window_days() -> i64 {
    DEFAULT_SCORING_WINDOW_DAYS
}

pub fn default_kpis() -> Vec<KpiDefinition> {
    vec![
        KpiDefinition::automatic(KPI_PUNCTUALITY, "kpi.punctuality", 30.0),
        KpiDefinition::automatic(KPI_EFFICIENCY, "kpi.efficiency", 30.0),
        KpiDefinition::automatic(KPI_PRODUCTIVITY, "kpi.productivity", 20.0),
        KpiDefinition::manual("kpi_teamwork", "kpi.teamwork", 20.0),
    ]
}
