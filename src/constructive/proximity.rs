//! Proximity constructive heuristic.
//!
//! # Algorithm
//!
//! Picks one seed per day by farthest-point sampling, starting from the point
//! with the smallest ID, so the seeds are spread over the whole area. Then
//! grows the days greedily: the unassigned point nearest to any non-full
//! day's centroid joins that day and the centroid is updated.
//!
//! # Complexity
//!
//! O(n·k) seeding and O(n²·k) growth, where n = number of points and k =
//! number of days.

use crate::distance::{farthest_points, DistanceMetric};
use crate::models::{AssignmentVector, CapacityPlan, PointSet};

use super::greedy::grow;

/// Assigns points by nearest growth from spread-out seeds.
///
/// Days never exceed their planned count; when every day is full the
/// remaining points stay unassigned.
///
/// # Examples
///
/// ```
/// use u_dayplan::constructive::proximity_assign;
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new(vec![
///     Point::new(1, 0.0, 0.0),
///     Point::new(2, 0.0, 0.1),
///     Point::new(3, 5.0, 5.0),
///     Point::new(4, 5.0, 5.1),
/// ]).unwrap();
/// let plan = CapacityPlan::new(vec![2, 2]).unwrap();
/// let a = proximity_assign(&points, &plan, DistanceMetric::Euclidean);
/// assert_eq!(a.day_at(0), a.day_at(1));
/// assert_eq!(a.day_at(2), a.day_at(3));
/// assert_ne!(a.day_at(0), a.day_at(2));
/// ```
pub fn proximity_assign(
    points: &PointSet,
    plan: &CapacityPlan,
    metric: DistanceMetric,
) -> AssignmentVector {
    let k = plan.n_days();
    let mut days = vec![None; points.len()];
    let Some(start) = points
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| p.id())
        .map(|(i, _)| i)
    else {
        return AssignmentVector::new(points, days, k);
    };

    let coords = points.coords();
    let seeds = farthest_points(&coords, start, k, metric);

    let mut anchors = vec![None; k];
    for (d, &seed) in seeds.iter().enumerate() {
        anchors[d] = Some(coords[seed]);
        if plan.target(d) > 0 {
            days[seed] = Some(d);
        }
    }

    let placed = grow(&coords, plan.counts(), &anchors, &mut days, metric);
    tracing::debug!(seeds = seeds.len(), placed, "proximity growth finished");
    AssignmentVector::new(points, days, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn line(n: u64) -> PointSet {
        PointSet::new((0..n).map(|i| Point::new(i, i as f64, 0.0)).collect()).expect("valid")
    }

    #[test]
    fn test_seeds_at_extremes() {
        let points = line(6);
        let plan = CapacityPlan::new(vec![3, 3]).expect("valid");
        let a = proximity_assign(&points, &plan, DistanceMetric::Euclidean);
        assert_eq!(
            a.days(),
            &[Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn test_start_from_min_id() {
        // Min ID sits at the far right end, so it seeds day 0.
        let points = PointSet::new(vec![
            Point::new(5, 0.0, 0.0),
            Point::new(9, 1.0, 0.0),
            Point::new(1, 10.0, 0.0),
        ])
        .expect("valid");
        let plan = CapacityPlan::new(vec![1, 2]).expect("valid");
        let a = proximity_assign(&points, &plan, DistanceMetric::Euclidean);
        assert_eq!(a.day_of(1), Some(Some(0)));
        assert_eq!(a.day_of(5), Some(Some(1)));
        assert_eq!(a.day_of(9), Some(Some(1)));
    }

    #[test]
    fn test_saturation_leaves_remainder() {
        let points = line(5);
        let plan = CapacityPlan::new(vec![1, 2]).expect("valid");
        let a = proximity_assign(&points, &plan, DistanceMetric::Euclidean);
        assert_eq!(a.day_counts(), vec![1, 2]);
        assert_eq!(a.unassigned_count(), 2);
    }

    #[test]
    fn test_zero_capacity_day_gets_nothing() {
        let points = line(3);
        let plan = CapacityPlan::new(vec![0, 3]).expect("valid");
        let a = proximity_assign(&points, &plan, DistanceMetric::Euclidean);
        assert_eq!(a.day_counts(), vec![0, 3]);
    }

    #[test]
    fn test_empty() {
        let plan = CapacityPlan::new(vec![2]).expect("valid");
        let a = proximity_assign(&PointSet::empty(), &plan, DistanceMetric::Euclidean);
        assert!(a.is_empty());
    }
}
