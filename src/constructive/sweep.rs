//! Sweep constructive heuristic.
//!
//! # Algorithm
//!
//! Sorts points by polar angle around the overall centroid, then fills the
//! days in order: day 0 takes points until it reaches its planned count,
//! then day 1, and so on. Nearby points tend to have similar angles, so each
//! day receives an angular sector.
//!
//! # Complexity
//!
//! O(n log n) where n = number of points (dominated by angle sorting).
//!
//! # Reference
//!
//! Gillett, B.E. & Miller, L.R. (1974). "A Heuristic Algorithm for the
//! Vehicle-Dispatch Problem", *Operations Research* 22(2), 340-349.

use crate::distance::{overall_centroid, DistanceMetric};
use crate::models::{AssignmentVector, CapacityPlan, PointSet};

/// Assigns points to days by angular sweep.
///
/// Angles are `atan2(lat − c_lat, lon − c_lon)`; equal angles are ordered by
/// distance to the centroid, then by point order. Points beyond the plan
/// total stay unassigned. Fully deterministic.
///
/// # Examples
///
/// ```
/// use u_dayplan::constructive::sweep_assign;
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new(vec![
///     Point::new(1, 1.0, 1.0),
///     Point::new(2, 1.5, 1.5),
///     Point::new(3, -1.0, -1.0),
///     Point::new(4, -1.5, -1.5),
/// ]).unwrap();
/// let plan = CapacityPlan::new(vec![2, 2]).unwrap();
/// let a = sweep_assign(&points, &plan, DistanceMetric::Euclidean);
/// assert_eq!(a.day_counts(), vec![2, 2]);
/// assert_eq!(a.day_at(0), a.day_at(1));
/// assert_eq!(a.day_at(2), a.day_at(3));
/// ```
pub fn sweep_assign(
    points: &PointSet,
    plan: &CapacityPlan,
    metric: DistanceMetric,
) -> AssignmentVector {
    let k = plan.n_days();
    let coords = points.coords();
    let mut days = vec![None; points.len()];
    let Some(center) = overall_centroid(&coords) else {
        return AssignmentVector::new(points, days, k);
    };

    let mut angle_order: Vec<(usize, f64, f64)> = coords
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let angle = (c.0 - center.0).atan2(c.1 - center.1);
            (i, angle, metric.distance(center, c))
        })
        .collect();

    angle_order.sort_by(|a, b| {
        a.1.total_cmp(&b.1)
            .then(a.2.total_cmp(&b.2))
            .then(a.0.cmp(&b.0))
    });

    let mut day = 0;
    let mut filled = 0;
    for &(i, _, _) in &angle_order {
        while day < k && filled >= plan.target(day) {
            day += 1;
            filled = 0;
        }
        if day >= k {
            break;
        }
        days[i] = Some(day);
        filled += 1;
    }

    AssignmentVector::new(points, days, k)
}
