pub mod attendance_stats_service;
pub mod incentive_service;
pub mod payroll_service;
pub mod performance_score_service;
pub mod settings_service;
