//! Balanced-precise assignment: k-means followed by count repair.
//!
//! # Algorithm
//!
//! Starts from the k-means labeling, then moves one point at a time from a
//! day above its target to a day below it. Each candidate move `p: d → r`
//! is scored by its exact change in total dispersion
//!
//! ```text
//! Δ = |r|/(|r|+1) · dist(p, c_r)²  −  |d|/(|d|−1) · dist(p, c_d)²
//! ```
//!
//! and the move with the smallest `Δ` is applied. Every move lowers the total
//! excess by one, so the loop ends after at most `n` moves with every day at
//! exactly its target. Greedy local search, not a global optimum.

use rand::Rng;

use super::{kmeans, KMeansConfig};
use crate::distance::DistanceMetric;
use crate::error::AssignmentError;
use crate::models::{AssignmentVector, CapacityPlan, PointSet};
use crate::validation::require_exact;

#[derive(Debug, Clone, Copy)]
struct Transfer {
    point: usize,
    to: usize,
    delta: f64,
}

/// Assigns points so that every day ends with exactly its planned count.
///
/// # Errors
///
/// [`AssignmentError::InfeasibleExactAssignment`] if the plan total differs
/// from the number of points; k-means errors are propagated.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_dayplan::clustering::{balanced_precise_assign, KMeansConfig};
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new((0..6).map(|i| Point::new(i, i as f64, 0.0)).collect()).unwrap();
/// let plan = CapacityPlan::new(vec![1, 5]).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let a = balanced_precise_assign(&points, &plan, &KMeansConfig::default(), DistanceMetric::Euclidean, &mut rng).unwrap();
/// assert_eq!(a.day_counts(), vec![1, 5]);
/// ```
pub fn balanced_precise_assign<R: Rng>(
    points: &PointSet,
    plan: &CapacityPlan,
    config: &KMeansConfig,
    metric: DistanceMetric,
    rng: &mut R,
) -> Result<AssignmentVector, AssignmentError> {
    require_exact(points, plan)?;

    let coords = points.coords();
    let k = plan.n_days();
    let mut labels = kmeans(&coords, k, config, rng)?.labels;

    let mut counts = vec![0usize; k];
    let mut sums = vec![(0.0f64, 0.0f64); k];
    for (i, &d) in labels.iter().enumerate() {
        counts[d] += 1;
        sums[d].0 += coords[i].0;
        sums[d].1 += coords[i].1;
    }

    let mut moves = 0usize;
    while moves <= coords.len() {
        let under: Vec<usize> = (0..k).filter(|&d| counts[d] < plan.target(d)).collect();
        if under.is_empty() {
            break;
        }

        let centroid = |d: usize| -> Option<(f64, f64)> {
            (counts[d] > 0).then(|| (sums[d].0 / counts[d] as f64, sums[d].1 / counts[d] as f64))
        };

        let mut best: Option<Transfer> = None;
        for (p, &d) in labels.iter().enumerate() {
            if counts[d] <= plan.target(d) {
                continue;
            }
            let m = counts[d] as f64;
            let removal = match centroid(d) {
                Some(c) if counts[d] > 1 => m / (m - 1.0) * metric.squared(coords[p], c),
                _ => 0.0,
            };
            for &r in &under {
                let mr = counts[r] as f64;
                let addition = match centroid(r) {
                    Some(c) => mr / (mr + 1.0) * metric.squared(coords[p], c),
                    None => 0.0,
                };
                let delta = addition - removal;
                if best.map_or(true, |b| delta < b.delta) {
                    best = Some(Transfer { point: p, to: r, delta });
                }
            }
        }

        let Some(t) = best else { break };
        let from = labels[t.point];
        counts[from] -= 1;
        sums[from].0 -= coords[t.point].0;
        sums[from].1 -= coords[t.point].1;
        counts[t.to] += 1;
        sums[t.to].0 += coords[t.point].0;
        sums[t.to].1 += coords[t.point].1;
        labels[t.point] = t.to;
        moves += 1;
    }

    tracing::debug!(moves, days = k, "balanced-precise transfers applied");
    let days = labels.into_iter().map(Some).collect();
    Ok(AssignmentVector::new(points, days, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(points: &PointSet, plan: &[usize]) -> Result<AssignmentVector, AssignmentError> {
        let plan = CapacityPlan::new(plan.to_vec()).expect("valid");
        let mut rng = StdRng::seed_from_u64(42);
        balanced_precise_assign(
            points,
            &plan,
            &KMeansConfig::default(),
            DistanceMetric::Euclidean,
            &mut rng,
        )
    }

    #[test]
    fn test_identical_points_split_evenly() {
        let points =
            PointSet::new((0..10).map(|i| Point::new(i, 4.0, 4.0)).collect()).expect("valid");
        let a = run(&points, &[5, 5]).expect("feasible");
        assert_eq!(a.day_counts(), vec![5, 5]);
        assert_eq!(a.unassigned_count(), 0);
    }

    #[test]
    fn test_uneven_blobs_rebalanced() {
        // 6 points near the origin, 2 far away; plan wants 4/4.
        let mut pts: Vec<Point> = (0..6).map(|i| Point::new(i, i as f64 * 0.1, 0.0)).collect();
        pts.push(Point::new(6, 10.0, 10.0));
        pts.push(Point::new(7, 10.1, 10.0));
        let points = PointSet::new(pts).expect("valid");
        let a = run(&points, &[4, 4]).expect("feasible");
        assert_eq!(a.day_counts(), vec![4, 4]);
        // The far blob stays together.
        assert_eq!(a.day_at(6), a.day_at(7));
        // The two points moved are the ones closest to the receiving blob.
        assert_eq!(a.day_at(4), a.day_at(6));
        assert_eq!(a.day_at(5), a.day_at(6));
    }

    #[test]
    fn test_zero_target_day() {
        let points =
            PointSet::new((0..4).map(|i| Point::new(i, i as f64, 0.0)).collect()).expect("valid");
        let a = run(&points, &[0, 4, 0]).expect("feasible");
        assert_eq!(a.day_counts(), vec![0, 4, 0]);
    }

    #[test]
    fn test_infeasible_total() {
        let points =
            PointSet::new((0..3).map(|i| Point::new(i, i as f64, 0.0)).collect()).expect("valid");
        assert!(matches!(
            run(&points, &[1, 1]),
            Err(AssignmentError::InfeasibleExactAssignment { planned: 2, points: 3 })
        ));
    }

    #[test]
    fn test_empty_points() {
        let a = run(&PointSet::empty(), &[0, 0]).expect("feasible");
        assert!(a.is_empty());
    }
}
