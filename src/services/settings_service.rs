use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::json;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::kpi::KpiDefinition;
use crate::models::settings::ScoringSettings;

const MAX_UTC_OFFSET_MINUTES: u32 = 14 * 60;

#[derive(Debug, Default, Clone)]
pub struct SettingsUpdateInput {
    pub scoring_window_days: Option<i64>,
    pub bonus_pool: Option<f64>,
    pub utc_offset_minutes: Option<i32>,
    pub kpis: Option<Vec<KpiDefinition>>,
}

/// Holds the active scoring settings, optionally backed by a YAML file.
pub struct SettingsService {
    path: Option<PathBuf>,
    current: RwLock<ScoringSettings>,
}

impl SettingsService {
    pub fn new(settings: ScoringSettings) -> AppResult<Self> {
        validate_settings(&settings)?;
        Ok(Self {
            path: None,
            current: RwLock::new(settings),
        })
    }

    pub fn from_yaml_str(source: &str) -> AppResult<Self> {
        Self::new(parse_settings(source)?)
    }

    /// Loads settings from `path`; a missing file starts from defaults and is created on save.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let settings = if path.exists() {
            let source = std::fs::read_to_string(&path)?;
            parse_settings(&source)?
        } else {
            warn!(
                target: "app::settings",
                path = %path.display(),
                "settings file not found, using defaults"
            );
            ScoringSettings::default()
        };

        validate_settings(&settings)?;
        info!(target: "app::settings", path = %path.display(), "scoring settings loaded");
        Ok(Self {
            path: Some(path),
            current: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> AppResult<ScoringSettings> {
        self.current
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| AppError::other("settings lock poisoned"))
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<ScoringSettings> {
        let mut next = self.get()?;

        if let Some(days) = input.scoring_window_days {
            next.scoring_window_days = days;
        }
        if let Some(pool) = input.bonus_pool {
            next.bonus_pool = pool;
        }
        if let Some(offset) = input.utc_offset_minutes {
            next.utc_offset_minutes = offset;
        }
        if let Some(kpis) = input.kpis {
            next.kpis = kpis;
        }

        validate_settings(&next)?;

        let mut guard = self
            .current
            .write()
            .map_err(|_| AppError::other("settings lock poisoned"))?;
        *guard = next.clone();
        Ok(next)
    }

    /// Writes the current settings back to the file they were loaded from.
    pub fn save(&self) -> AppResult<()> {
        let Some(path) = self.path.as_ref() else {
            return Err(AppError::other("settings are not backed by a file"));
        };
        let settings = self.get()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(&settings)?)?;
        info!(target: "app::settings", path = %path.display(), "scoring settings saved");
        Ok(())
    }
}

fn parse_settings(source: &str) -> AppResult<ScoringSettings> {
    if source.trim().is_empty() {
        return Ok(ScoringSettings::default());
    }
    Ok(serde_yaml::from_str(source)?)
}

pub fn validate_settings(settings: &ScoringSettings) -> AppResult<()> {
    if settings.scoring_window_days <= 0 {
        return Err(AppError::validation_with_details(
            "scoring window must be at least one day",
            json!({"scoringWindowDays": settings.scoring_window_days}),
        ));
    }

    if !settings.bonus_pool.is_finite() || settings.bonus_pool < 0.0 {
        return Err(AppError::validation_with_details(
            "bonus pool must be a non-negative amount",
            json!({"bonusPool": settings.bonus_pool.to_string()}),
        ));
    }

    if settings.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(AppError::validation_with_details(
            "utc offset out of range",
            json!({"utcOffsetMinutes": settings.utc_offset_minutes}),
        ));
    }

    let mut seen = HashSet::new();
    for kpi in &settings.kpis {
        if kpi.id.trim().is_empty() {
            return Err(AppError::validation("KPI id must not be empty"));
        }
        if !seen.insert(kpi.id.as_str()) {
            return Err(AppError::validation_with_details(
                "duplicate KPI id",
                json!({"kpiId": kpi.id}),
            ));
        }
        if !kpi.weight.is_finite() || kpi.weight < 0.0 {
            return Err(AppError::validation_with_details(
                "KPI weight must be a non-negative number",
                json!({"kpiId": kpi.id, "weight": kpi.weight.to_string()}),
            ));
        }
    }

    Ok(())
}
