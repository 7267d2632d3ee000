pub mod attendance;
pub mod employee;
pub mod kpi;
pub mod payroll;
pub mod performance;
pub mod settings;
pub mod task;
