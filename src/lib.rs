//! Performance scoring and payroll lateness calculations for the bizdash dashboard.
//!
//! Every calculation is a pure function over caller-supplied collections with an
//! injected `now`; nothing here holds application state between calls.

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, AppResult};
pub use services::attendance_stats_service::{compute_attendance_stats, try_compute_attendance_stats};
pub use services::incentive_service::distribute_incentives;
pub use services::payroll_service::PayrollService;
pub use services::performance_score_service::{
    aggregate_kpis, score_efficiency, score_productivity, score_punctuality,
    try_score_punctuality, PerformanceScoreService, ScoringWindow,
};
pub use services::settings_service::SettingsService;
pub use utils::duration::parse_duration;
pub use utils::shift_time::{parse_shift_start, parse_shift_time};
