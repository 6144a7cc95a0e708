//! Manual (user-approved) distribution.

use crate::error::AssignmentError;
use crate::models::{AssignmentVector, CapacityPlan, PointSet};
use crate::validation::require_exact;

/// Applies a distribution as contiguous blocks in point order.
///
/// Day 0 takes the first `plan[0]` points, day 1 the next `plan[1]`, and so
/// on. Re-applying the same distribution to the same point order yields the
/// same assignment.
///
/// # Errors
///
/// [`AssignmentError::InfeasibleExactAssignment`] if the plan total differs
/// from the number of points.
///
/// # Examples
///
/// ```
/// use u_dayplan::constructive::{manual_assign, suggest_distribution};
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new((0..5).map(|i| Point::new(i, 0.0, 0.0)).collect()).unwrap();
/// let plan = CapacityPlan::new(suggest_distribution(points.len(), 2)).unwrap();
/// let a = manual_assign(&points, &plan).unwrap();
/// assert_eq!(a.labels(), vec![0, 0, 0, 1, 1]);
/// ```
pub fn manual_assign(
    points: &PointSet,
    plan: &CapacityPlan,
) -> Result<AssignmentVector, AssignmentError> {
    require_exact(points, plan)?;

    let days = plan
        .counts()
        .iter()
        .enumerate()
        .flat_map(|(day, &count)| std::iter::repeat(Some(day)).take(count))
        .collect();
    Ok(AssignmentVector::new(points, days, plan.n_days()))
}

/// Splits `total` points over `n_days` days as evenly as possible.
///
/// Every day gets `total / n_days`; the first `total % n_days` days get one
/// more. Returns an empty vector when `n_days == 0`.
///
/// # Examples
///
/// ```
/// use u_dayplan::constructive::suggest_distribution;
///
/// assert_eq!(suggest_distribution(10, 3), vec![4, 3, 3]);
/// assert_eq!(suggest_distribution(2, 4), vec![1, 1, 0, 0]);
/// ```
pub fn suggest_distribution(total: usize, n_days: usize) -> Vec<usize> {
    if n_days == 0 {
        return Vec::new();
    }
    let base = total / n_days;
    let extra = total % n_days;
    (0..n_days).map(|d| base + usize::from(d < extra)).collect()
}
