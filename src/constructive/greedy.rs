//! Centroid-driven greedy growth shared by the proximity and capacitated
//! strategies.

use crate::distance::{DistanceMetric, RunningCentroid};

/// Grows days from their anchors until every point is placed or every day
/// is full.
///
/// At each step the globally closest `(unassigned point, non-full day)` pair
/// is committed, where a day is located at the mean of its members, or at its
/// anchor while it has none. Ties go to the lower point index, then the lower
/// day index. `days` may arrive partially filled; those members count toward
/// both capacity and centroid.
pub(crate) fn grow(
    coords: &[(f64, f64)],
    capacities: &[usize],
    anchors: &[Option<(f64, f64)>],
    days: &mut [Option<usize>],
    metric: DistanceMetric,
) -> usize {
    let k = capacities.len();
    let mut counts = vec![0usize; k];
    let mut centroids = vec![RunningCentroid::default(); k];
    for (i, day) in days.iter().enumerate() {
        if let Some(d) = *day {
            counts[d] += 1;
            centroids[d].add(coords[i]);
        }
    }

    let mut placed = 0;
    loop {
        let locations: Vec<Option<(f64, f64)>> = (0..k)
            .map(|d| {
                if counts[d] >= capacities[d] {
                    None
                } else {
                    centroids[d].get().or(anchors[d])
                }
            })
            .collect();
        if locations.iter().all(Option::is_none) {
            break;
        }

        let mut best: Option<(usize, usize, f64)> = None;
        for (i, day) in days.iter().enumerate() {
            if day.is_some() {
                continue;
            }
            for (d, loc) in locations.iter().enumerate() {
                let Some(loc) = loc else { continue };
                let dist = metric.distance(coords[i], *loc);
                if best.map_or(true, |(_, _, b)| dist < b) {
                    best = Some((i, d, dist));
                }
            }
        }

        let Some((i, d, _)) = best else { break };
        days[i] = Some(d);
        counts[d] += 1;
        centroids[d].add(coords[i]);
        placed += 1;
    }
    placed
}
