use serde::{Deserialize, Serialize};

/// Monthly attendance figures for one employee.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub days_worked: u32,
    pub late_days: u32,
    pub total_lateness_minutes: i64,
    pub lateness_deduction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub employee_id: String,
    pub year: i32,
    pub month: u32,
    pub attendance: AttendanceStats,
    pub hours_worked: f64,
    pub overtime_hours: f64,
    pub base_pay: f64,
    pub overtime_pay: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub lateness_deduction: f64,
    pub net_pay: f64,
}

impl PayrollSummary {
    pub fn empty(employee_id: impl Into<String>, year: i32, month: u32) -> Self {
        Self {
            employee_id: employee_id.into(),
            year,
            month,
            attendance: AttendanceStats::default(),
            hours_worked: 0.0,
            overtime_hours: 0.0,
            base_pay: 0.0,
            overtime_pay: 0.0,
            allowances: 0.0,
            deductions: 0.0,
            lateness_deduction: 0.0,
            net_pay: 0.0,
        }
    }
}
