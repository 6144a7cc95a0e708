//! Capacitated greedy assignment.
//!
//! # Algorithm
//!
//! Day centroids start at the k-means centroids. The unassigned point
//! nearest to any non-full day's centroid is placed on that day, and the
//! day's centroid becomes the mean of its members. Plan counts are hard
//! ceilings: once every day is full, the remaining points stay unassigned.
//!
//! # Complexity
//!
//! O(n²·k) after clustering.

use rand::Rng;

use crate::clustering::{kmeans, KMeansConfig};
use crate::distance::DistanceMetric;
use crate::error::AssignmentError;
use crate::models::{AssignmentVector, CapacityPlan, PointSet};

use super::greedy::grow;

/// Assigns points greedily without ever exceeding a day's planned count.
///
/// # Errors
///
/// Propagates k-means configuration errors.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_dayplan::clustering::KMeansConfig;
/// use u_dayplan::constructive::capacitated_assign;
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new((0..5).map(|i| Point::new(i, i as f64, 0.0)).collect()).unwrap();
/// let plan = CapacityPlan::new(vec![2, 1]).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let a = capacitated_assign(&points, &plan, &KMeansConfig::default(), DistanceMetric::Euclidean, &mut rng).unwrap();
/// assert!(a.day_counts()[0] <= 2 && a.day_counts()[1] <= 1);
/// assert_eq!(a.unassigned_count(), 2);
/// ```
pub fn capacitated_assign<R: Rng>(
    points: &PointSet,
    plan: &CapacityPlan,
    config: &KMeansConfig,
    metric: DistanceMetric,
    rng: &mut R,
) -> Result<AssignmentVector, AssignmentError> {
    let k = plan.n_days();
    let mut days = vec![None; points.len()];
    if points.is_empty() {
        return Ok(AssignmentVector::new(points, days, k));
    }

    let coords = points.coords();
    let anchors: Vec<Option<(f64, f64)>> = kmeans(&coords, k, config, rng)?
        .centroids
        .into_iter()
        .map(Some)
        .collect();

    let placed = grow(&coords, plan.counts(), &anchors, &mut days, metric);
    tracing::debug!(
        placed,
        unassigned = points.len() - placed,
        "capacitated placement finished"
    );
    Ok(AssignmentVector::new(points, days, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(points: &PointSet, plan: &[usize]) -> AssignmentVector {
        let plan = CapacityPlan::new(plan.to_vec()).expect("valid");
        let mut rng = StdRng::seed_from_u64(42);
        capacitated_assign(
            points,
            &plan,
            &KMeansConfig::default(),
            DistanceMetric::Euclidean,
            &mut rng,
        )
        .expect("valid config")
    }

    #[test]
    fn test_overflow_left_unassigned() {
        // Three points clustered near the origin, two outliers.
        let points = PointSet::new(vec![
            Point::new(1, 0.0, 0.0),
            Point::new(2, 5.0, 5.0),
            Point::new(3, 0.1, 0.0),
            Point::new(4, 6.0, 6.0),
            Point::new(5, 0.0, 0.1),
        ])
        .expect("valid");
        let a = run(&points, &[3]);
        assert_eq!(a.day_counts(), vec![3]);
        assert_eq!(a.unassigned_count(), 2);
        assert_eq!(a.day_of(2), Some(None));
        assert_eq!(a.day_of(4), Some(None));
    }

    #[test]
    fn test_never_exceeds_ceiling() {
        let points =
            PointSet::new((0..20).map(|i| Point::new(i, (i % 5) as f64, (i / 5) as f64)).collect())
                .expect("valid");
        let plan = [3, 0, 7, 4];
        let a = run(&points, &plan);
        for (count, cap) in a.day_counts().iter().zip(plan) {
            assert!(*count <= cap);
        }
        assert_eq!(a.unassigned_count(), 6);
    }

    #[test]
    fn test_room_for_all() {
        let points =
            PointSet::new((0..6).map(|i| Point::new(i, i as f64, 0.0)).collect()).expect("valid");
        let a = run(&points, &[10, 10]);
        assert_eq!(a.unassigned_count(), 0);
    }

    #[test]
    fn test_empty() {
        let a = run(&PointSet::empty(), &[1]);
        assert!(a.is_empty());
    }
}
