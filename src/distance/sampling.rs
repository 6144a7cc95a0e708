//! Farthest-point sampling over coordinates.

use super::DistanceMetric;

/// Picks up to `k` mutually distant points by farthest-point sampling.
///
/// Starts at `start`; each next pick maximizes its minimum distance to the
/// points already picked, ties going to the lower index. Keeps one running
/// minimum per point, so memory stays linear in the number of points.
///
/// # Panics
///
/// Panics if `start` is out of bounds for a non-empty `coords`.
///
/// # Examples
///
/// ```
/// use u_dayplan::distance::{farthest_points, DistanceMetric};
///
/// let coords = vec![(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (5.0, 0.0)];
/// assert_eq!(farthest_points(&coords, 0, 3, DistanceMetric::Euclidean), vec![0, 2, 3]);
/// ```
pub fn farthest_points(
    coords: &[(f64, f64)],
    start: usize,
    k: usize,
    metric: DistanceMetric,
) -> Vec<usize> {
    let n = coords.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    let mut picked = vec![start];
    let mut min_dist: Vec<f64> = coords
        .iter()
        .map(|&c| metric.distance(coords[start], c))
        .collect();
    let mut taken = vec![false; n];
    taken[start] = true;

    while picked.len() < k.min(n) {
        let mut best: Option<(usize, f64)> = None;
        for j in (0..n).filter(|&j| !taken[j]) {
            if best.map_or(true, |(_, d)| min_dist[j] > d) {
                best = Some((j, min_dist[j]));
            }
        }
        let Some((next, _)) = best else { break };
        taken[next] = true;
        picked.push(next);
        for (j, &c) in coords.iter().enumerate() {
            min_dist[j] = min_dist[j].min(metric.distance(coords[next], c));
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farthest_points() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (10.0, 0.0), (5.0, 0.0)];
        let m = DistanceMetric::Euclidean;
        assert_eq!(farthest_points(&coords, 0, 3, m), vec![0, 2, 3]);
        assert_eq!(farthest_points(&coords, 0, 10, m).len(), 4);
        assert!(farthest_points(&coords, 0, 0, m).is_empty());
        assert!(farthest_points(&[], 0, 3, m).is_empty());
    }

    #[test]
    fn test_farthest_points_ties_lower_index() {
        let coords = vec![(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        assert_eq!(
            farthest_points(&coords, 0, 3, DistanceMetric::Euclidean),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_farthest_points_other_start() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (10.0, 0.0)];
        assert_eq!(
            farthest_points(&coords, 1, 2, DistanceMetric::Haversine),
            vec![1, 2]
        );
    }
}
