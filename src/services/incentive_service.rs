use std::collections::HashMap;

use tracing::{debug, warn};

use crate::models::performance::EmployeeScore;

/// Splits `pool` across employees in proportion to their overall score.
///
/// When every score is zero nothing is paid out; the pool is not split evenly.
/// A NaN total is treated the same way.
pub fn distribute_incentives(scores: &[EmployeeScore], pool: f64) -> HashMap<String, f64> {
    let total_score: f64 = scores.iter().map(|entry| entry.overall_score).sum();

    if total_score.is_nan() || total_score <= 0.0 {
        if pool > 0.0 && !scores.is_empty() {
            warn!(
                target: "app::incentive",
                pool,
                employees = scores.len(),
                "total score is zero, bonus pool left undistributed"
            );
        }
        return scores
            .iter()
            .map(|entry| (entry.employee_id.clone(), 0.0))
            .collect();
    }

    debug!(target: "app::incentive", pool, total_score, "distributing bonus pool");
    scores
        .iter()
        .map(|entry| {
            let share = entry.overall_score / total_score * pool;
            (entry.employee_id.clone(), share)
        })
        .collect()
}
