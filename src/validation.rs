//! Request validation.
//!
//! Checks run before any assignment work starts:
//! - Declared day count matches the plan length
//! - Exact strategies receive a plan whose total equals the point count
//! - Search parameters lie in their valid ranges
//!
//! Point-level checks (finite coordinates, unique IDs) happen when the
//! [`PointSet`] is built.

use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};
use crate::models::{CapacityPlan, PointSet};

/// Checks the plan against an optional declared day count.
pub fn validate_plan(plan: &CapacityPlan, declared_days: Option<usize>) -> Result<(), AssignmentError> {
    if let Some(n_days) = declared_days {
        if n_days != plan.n_days() {
            return Err(ValidationError::new(
                ValidationErrorKind::PlanLengthMismatch,
                format!(
                    "Plan covers {} days but {} were declared",
                    plan.n_days(),
                    n_days
                ),
            )
            .into());
        }
    }
    Ok(())
}

/// Checks that an exact strategy can place every point.
///
/// # Examples
///
/// ```
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
/// use u_dayplan::validation::require_exact;
///
/// let points = PointSet::new(vec![Point::new(1, 0.0, 0.0), Point::new(2, 0.0, 1.0)]).unwrap();
/// assert!(require_exact(&points, &CapacityPlan::new(vec![1, 1]).unwrap()).is_ok());
/// assert!(require_exact(&points, &CapacityPlan::new(vec![3]).unwrap()).is_err());
/// ```
pub fn require_exact(points: &PointSet, plan: &CapacityPlan) -> Result<(), AssignmentError> {
    if plan.total() != points.len() {
        return Err(AssignmentError::InfeasibleExactAssignment {
            planned: plan.total(),
            points: points.len(),
        });
    }
    Ok(())
}

/// Checks that `value` lies in `[0, 1]`.
pub(crate) fn require_unit_interval(name: &str, value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!("{name} must be within [0, 1], got {value}"),
        ));
    }
    Ok(())
}

/// Checks that `value` is at least one.
pub(crate) fn require_positive(name: &str, value: usize) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!("{name} must be greater than zero"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    #[test]
    fn test_plan_length_mismatch() {
        let plan = CapacityPlan::new(vec![1, 2]).expect("valid");
        assert!(validate_plan(&plan, None).is_ok());
        assert!(validate_plan(&plan, Some(2)).is_ok());
        let err = validate_plan(&plan, Some(3)).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::PlanLengthMismatch));
    }

    #[test]
    fn test_require_exact() {
        let points = PointSet::new(vec![Point::new(1, 0.0, 0.0)]).expect("valid");
        let plan = CapacityPlan::new(vec![0, 2]).expect("valid");
        assert_eq!(
            require_exact(&points, &plan),
            Err(AssignmentError::InfeasibleExactAssignment {
                planned: 2,
                points: 1
            })
        );
    }

    #[test]
    fn test_ranges() {
        assert!(require_unit_interval("rate", 0.0).is_ok());
        assert!(require_unit_interval("rate", 1.0).is_ok());
        assert!(require_unit_interval("rate", 1.5).is_err());
        assert!(require_unit_interval("rate", f64::NAN).is_err());
        assert!(require_positive("size", 1).is_ok());
        assert!(require_positive("size", 0).is_err());
    }
}
