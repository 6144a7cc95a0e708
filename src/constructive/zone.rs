//! Zone-based assignment.
//!
//! # Algorithm
//!
//! Groups points by their `zone` label; points without one fall into a
//! coarse grid cell built from coordinate quantiles (`⌈√k⌉` bins per axis).
//! Zones are handed out whole, largest first (ties by zone key ascending),
//! each to the day with the most remaining capacity (ties by lower day).
//!
//! # Complexity
//!
//! O(n log n + z·k) where z = number of zones.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{AssignmentVector, CapacityPlan, PointSet};

/// Grouping key of a point: its own zone label or a grid cell.
///
/// Labels order before grid cells, so labeled zones win size ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ZoneKey {
    Label(String),
    Grid(usize, usize),
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKey::Label(label) => f.write_str(label),
            ZoneKey::Grid(row, col) => write!(f, "grid({row}, {col})"),
        }
    }
}

/// Assigns whole zones to days.
///
/// Every point receives a day; a day may end above its planned count when a
/// zone does not fit anywhere.
///
/// # Examples
///
/// ```
/// use u_dayplan::constructive::zone_assign;
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new(vec![
///     Point::new(1, 0.0, 0.0).with_zone("a"),
///     Point::new(2, 0.0, 0.0).with_zone("b"),
///     Point::new(3, 0.0, 0.0).with_zone("b"),
/// ]).unwrap();
/// let plan = CapacityPlan::new(vec![1, 2]).unwrap();
/// let a = zone_assign(&points, &plan);
/// // Zone "b" (2 points) goes first, to day 1 which has the most room.
/// assert_eq!(a.labels(), vec![0, 1, 1]);
/// ```
pub fn zone_assign(points: &PointSet, plan: &CapacityPlan) -> AssignmentVector {
    let k = plan.n_days();
    let keys = zone_keys(points, k);

    let mut zones: BTreeMap<ZoneKey, Vec<usize>> = BTreeMap::new();
    for (i, key) in keys.into_iter().enumerate() {
        zones.entry(key).or_default().push(i);
    }

    // BTreeMap iteration is key-ascending; the stable sort keeps that for ties.
    let mut ordered: Vec<(ZoneKey, Vec<usize>)> = zones.into_iter().collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut remaining: Vec<i64> = plan.counts().iter().map(|&c| c as i64).collect();
    let mut days = vec![None; points.len()];
    for (key, members) in &ordered {
        let mut day = 0;
        for d in 1..k {
            if remaining[d] > remaining[day] {
                day = d;
            }
        }
        for &i in members {
            days[i] = Some(day);
        }
        remaining[day] -= members.len() as i64;
        tracing::trace!(zone = %key, size = members.len(), day, "zone placed");
    }

    AssignmentVector::new(points, days, k)
}

/// Zone key per point: its label, or a quantile grid cell when absent.
fn zone_keys(points: &PointSet, n_days: usize) -> Vec<ZoneKey> {
    let unlabeled: Vec<usize> = (0..points.len())
        .filter(|&i| points.get(i).zone().is_none())
        .collect();

    let bins = (n_days as f64).sqrt().ceil().max(1.0) as usize;
    let lat_cuts = quantile_cuts(
        unlabeled.iter().map(|&i| points.get(i).latitude()).collect(),
        bins,
    );
    let lon_cuts = quantile_cuts(
        unlabeled.iter().map(|&i| points.get(i).longitude()).collect(),
        bins,
    );

    points
        .iter()
        .map(|p| match p.zone() {
            Some(z) => ZoneKey::Label(z.to_string()),
            None => ZoneKey::Grid(
                bin_of(p.latitude(), &lat_cuts),
                bin_of(p.longitude(), &lon_cuts),
            ),
        })
        .collect()
}

/// Interior cut points splitting `values` into `bins` equal-count groups.
fn quantile_cuts(mut values: Vec<f64>, bins: usize) -> Vec<f64> {
    if values.is_empty() || bins <= 1 {
        return Vec::new();
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    (1..bins).map(|j| values[(j * n / bins).min(n - 1)]).collect()
}

fn bin_of(value: f64, cuts: &[f64]) -> usize {
    cuts.iter().filter(|&&c| value >= c).count()
}
