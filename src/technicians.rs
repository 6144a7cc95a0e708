//! Second-stage assignment of one day's points to technicians.

use crate::constructive::suggest_distribution;
use crate::dispatch::{assign, StrategyParams};
use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};
use crate::models::{AssignmentVector, CapacityPlan, PointSet};
use crate::validation::require_positive;

/// Splits the points of `day` among `n_technicians` with the named strategy.
///
/// The day's points are planned as evenly as possible with
/// [`suggest_distribution`]. The returned vector covers every point of
/// `points`; members of `day` carry a technician index in
/// `0..n_technicians`, all other points are unassigned.
///
/// # Errors
///
/// - `ValidationError(InvalidParameter)` if `n_technicians` is zero, `day`
///   is outside the assignment's days, or `assignment` was built for a
///   different point set
/// - any error [`assign`] returns for the sub-problem
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatch::StrategyParams;
/// use u_dayplan::models::{AssignmentVector, Point, PointSet};
/// use u_dayplan::technicians::assign_technicians;
///
/// let points = PointSet::new((0..6).map(|i| Point::new(i, i as f64, 0.0)).collect()).unwrap();
/// let days = AssignmentVector::new(
///     &points,
///     vec![Some(0), Some(0), Some(0), Some(0), Some(1), Some(1)],
///     2,
/// );
/// let techs = assign_technicians(&points, &days, 0, 2, "sweep", &StrategyParams::default()).unwrap();
/// assert_eq!(techs.day_counts(), vec![2, 2]);
/// assert_eq!(techs.unassigned_count(), 2);
/// ```
pub fn assign_technicians(
    points: &PointSet,
    assignment: &AssignmentVector,
    day: usize,
    n_technicians: usize,
    strategy: &str,
    params: &StrategyParams,
) -> Result<AssignmentVector, AssignmentError> {
    require_positive("n_technicians", n_technicians)?;
    if assignment.ids() != points.ids().as_slice() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            "Assignment does not belong to this point set",
        )
        .into());
    }
    if day >= assignment.n_days() {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidParameter,
            format!("Day {day} is outside 0..{}", assignment.n_days()),
        )
        .into());
    }

    let members = assignment.members_of(day);
    let day_points = points.subset(&members);
    let plan = CapacityPlan::new(suggest_distribution(members.len(), n_technicians))?;
    let sub_params = StrategyParams {
        n_days: None,
        ..params.clone()
    };
    let result = assign(&day_points, &plan, strategy, &sub_params)?;

    let mut technicians = vec![None; points.len()];
    for (local, &global) in members.iter().enumerate() {
        technicians[global] = result.assignment.day_at(local);
    }
    tracing::debug!(
        day,
        n_technicians,
        points = members.len(),
        unassigned = result.unassigned_count,
        "technicians assigned"
    );
    Ok(AssignmentVector::new(points, technicians, n_technicians))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn setup() -> (PointSet, AssignmentVector) {
        let points = PointSet::new(vec![
            Point::new(10, 0.0, 0.0),
            Point::new(11, 9.0, 9.0),
            Point::new(12, 0.0, 0.1),
            Point::new(13, 5.0, 5.0),
            Point::new(14, 5.0, 5.1),
        ])
        .expect("valid");
        let days = AssignmentVector::new(
            &points,
            vec![Some(0), Some(1), Some(0), Some(0), Some(0)],
            2,
        );
        (points, days)
    }

    #[test]
    fn test_only_day_members_labeled() {
        let (points, days) = setup();
        let techs = assign_technicians(&points, &days, 0, 2, "balanced-precise", &StrategyParams::default())
            .expect("valid");
        assert_eq!(techs.len(), 5);
        assert_eq!(techs.day_of(11), Some(None));
        assert_eq!(techs.day_counts(), vec![2, 2]);
        assert_eq!(techs.day_of(10), techs.day_of(12));
        assert_eq!(techs.day_of(13), techs.day_of(14));
        assert_ne!(techs.day_of(10), techs.day_of(13));
    }

    #[test]
    fn test_empty_day() {
        let (points, _) = setup();
        let days = AssignmentVector::new(&points, vec![Some(0); 5], 3);
        let techs = assign_technicians(&points, &days, 2, 3, "manual", &StrategyParams::default())
            .expect("valid");
        assert_eq!(techs.unassigned_count(), 5);
    }

    #[test]
    fn test_rejects_zero_technicians() {
        let (points, days) = setup();
        let err = assign_technicians(&points, &days, 0, 0, "sweep", &StrategyParams::default())
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::InvalidParameter));
    }

    #[test]
    fn test_rejects_day_out_of_range() {
        let (points, days) = setup();
        let err = assign_technicians(&points, &days, 2, 1, "sweep", &StrategyParams::default())
            .unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationErrorKind::InvalidParameter));
    }

    #[test]
    fn test_propagates_unknown_strategy() {
        let (points, days) = setup();
        let err = assign_technicians(&points, &days, 0, 2, "nope", &StrategyParams::default())
            .unwrap_err();
        assert!(matches!(err, AssignmentError::UnknownStrategy(_)));
    }
}
