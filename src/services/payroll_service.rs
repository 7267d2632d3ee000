use chrono::{FixedOffset, Offset, Utc};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::attendance::{find_default_shift, AttendanceRecord, AttendanceShift};
use crate::models::employee::{Employee, PayType, SalaryStructure};
use crate::models::payroll::{AttendanceStats, PayrollSummary};
use crate::models::settings::ScoringSettings;
use crate::services::attendance_stats_service::{
    compute_attendance_stats, records_in_month, try_compute_attendance_stats,
};
use crate::utils::shift_time::{parse_shift_time, MINUTES_PER_DAY};

/// Monthly pay figures derived from attendance and the employee's salary structure.
pub struct PayrollService {
    offset: FixedOffset,
}

impl PayrollService {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_settings(settings: &ScoringSettings) -> Self {
        let offset = settings.offset().unwrap_or_else(|| {
            warn!(
                target: "app::payroll",
                utc_offset_minutes = settings.utc_offset_minutes,
                "utc offset out of range, using UTC"
            );
            Utc.fix()
        });
        Self::new(offset)
    }

    pub fn offset(&self) -> &FixedOffset {
        &self.offset
    }

    pub fn attendance_stats(
        &self,
        employee: &Employee,
        records: &[AttendanceRecord],
        shifts: &[AttendanceShift],
        year: i32,
        month: u32,
    ) -> AttendanceStats {
        compute_attendance_stats(employee, records, shifts, year, month, &self.offset)
    }

    /// Without a salary structure every amount is zero. Without a default shift
    /// lateness and overtime are zero but base pay is still computed.
    pub fn summarize(
        &self,
        employee: &Employee,
        records: &[AttendanceRecord],
        shifts: &[AttendanceShift],
        year: i32,
        month: u32,
    ) -> PayrollSummary {
        let Some(salary) = employee.salary_structure.as_ref() else {
            debug!(target: "app::payroll", employee_id = %employee.id, "no salary structure, empty payroll");
            return PayrollSummary::empty(&employee.id, year, month);
        };

        let attendance = self.attendance_stats(employee, records, shifts, year, month);
        self.build_summary(employee, salary, attendance, records, shifts, year, month)
    }

    pub fn try_summarize(
        &self,
        employee: &Employee,
        records: &[AttendanceRecord],
        shifts: &[AttendanceShift],
        year: i32,
        month: u32,
    ) -> AppResult<PayrollSummary> {
        let attendance =
            try_compute_attendance_stats(employee, records, shifts, year, month, &self.offset)?;
        let salary = employee
            .salary_structure
            .as_ref()
            .ok_or_else(|| AppError::missing_salary_structure(&employee.id))?;
        Ok(self.build_summary(employee, salary, attendance, records, shifts, year, month))
    }

    pub fn summarize_all(
        &self,
        employees: &[Employee],
        records: &[AttendanceRecord],
        shifts: &[AttendanceShift],
        year: i32,
        month: u32,
    ) -> Vec<PayrollSummary> {
        let summaries: Vec<PayrollSummary> = employees
            .iter()
            .map(|employee| self.summarize(employee, records, shifts, year, month))
            .collect();

        let unpaid = summaries
            .iter()
            .filter(|summary| summary.net_pay < 0.0)
            .count();
        if unpaid > 0 {
            warn!(target: "app::payroll", year, month, unpaid, "payroll run has negative net pay");
        }
        summaries
    }

    #[allow(clippy::too_many_arguments)]
    fn build_summary(
        &self,
        employee: &Employee,
        salary: &SalaryStructure,
        attendance: AttendanceStats,
        records: &[AttendanceRecord],
        shifts: &[AttendanceShift],
        year: i32,
        month: u32,
    ) -> PayrollSummary {
        let shift_minutes = find_default_shift(shifts).map(shift_length_minutes);

        let mut worked_minutes = 0_i64;
        let mut overtime_minutes = 0_i64;
        for (record, _) in records_in_month(&employee.id, records, year, month, &self.offset) {
            let Some(worked) = record.worked_minutes() else {
                continue;
            };
            worked_minutes += worked;
            if let Some(shift_minutes) = shift_minutes {
                overtime_minutes += (worked - shift_minutes).max(0);
            }
        }

        let hours_worked = worked_minutes as f64 / 60.0;
        let overtime_hours = overtime_minutes as f64 / 60.0;

        let base_pay = match salary.pay_type {
            Some(PayType::Monthly) => salary.monthly_rate.unwrap_or(0.0),
            Some(PayType::Hourly) => salary.hourly_rate.unwrap_or(0.0) * hours_worked,
            None => 0.0,
        };
        let overtime_pay = salary.overtime_rate.unwrap_or(0.0) * overtime_hours;
        let allowances = salary.allowances.unwrap_or(0.0);
        let deductions = salary.deductions.unwrap_or(0.0);
        let lateness_deduction = attendance.lateness_deduction;
        let net_pay = base_pay + overtime_pay + allowances - deductions - lateness_deduction;

        debug!(
            target: "app::payroll",
            employee_id = %employee.id,
            year,
            month,
            base_pay,
            overtime_pay,
            lateness_deduction,
            net_pay,
            "payroll summary computed"
        );

        PayrollSummary {
            employee_id: employee.id.clone(),
            year,
            month,
            attendance,
            hours_worked,
            overtime_hours,
            base_pay,
            overtime_pay,
            allowances,
            deductions,
            lateness_deduction,
            net_pay,
        }
    }
}

/// Scheduled length of a shift; shifts ending at or before their start run past midnight.
pub fn shift_length_minutes(shift: &AttendanceShift) -> i64 {
    let start = parse_shift_time(&shift.start_time);
    let end = parse_shift_time(&shift.end_time);
    let length = end - start;
    if length <= 0 {
        length + MINUTES_PER_DAY
    } else {
        length
    }
}
