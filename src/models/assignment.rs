//! Assignment vector, diagnostics and result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use super::PointSet;

/// Sentinel label for a point that received no day.
pub const UNASSIGNED: i64 = -1;

/// Point-to-day mapping produced by every strategy.
///
/// Entries follow the order of the [`PointSet`] the vector was built from.
/// Internally an unassigned point is `None`; the external label form
/// ([`labels`](Self::labels), [`label`](Self::label), serde) renders it as
/// [`UNASSIGNED`].
///
/// # Examples
///
/// ```
/// use u_dayplan::models::{AssignmentVector, Point, PointSet, UNASSIGNED};
///
/// let points = PointSet::new(vec![
///     Point::new(1, 0.0, 0.0),
///     Point::new(2, 1.0, 0.0),
///     Point::new(3, 2.0, 0.0),
/// ]).unwrap();
/// let a = AssignmentVector::new(&points, vec![Some(0), None, Some(1)], 2);
/// assert_eq!(a.labels(), vec![0, UNASSIGNED, 1]);
/// assert_eq!(a.label(2), Some(UNASSIGNED));
/// assert_eq!(a.day_counts(), vec![1, 1]);
/// assert_eq!(a.unassigned_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentVector {
    ids: Vec<u64>,
    days: Vec<Option<usize>>,
    n_days: usize,
}

/// One `(id, day label)` entry of an [`AssignmentVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// Point ID.
    pub id: u64,
    /// Day index, or [`UNASSIGNED`].
    pub day: i64,
}

impl AssignmentVector {
    /// Creates an assignment for `points` with one entry per point.
    ///
    /// # Panics
    ///
    /// Panics if `days.len() != points.len()`.
    pub fn new(points: &PointSet, days: Vec<Option<usize>>, n_days: usize) -> Self {
        assert_eq!(
            points.len(),
            days.len(),
            "assignment length must match point count"
        );
        Self {
            ids: points.ids(),
            days,
            n_days,
        }
    }

    /// Assignment with every point unassigned.
    pub fn unassigned(points: &PointSet, n_days: usize) -> Self {
        Self::new(points, vec![None; points.len()], n_days)
    }

    /// Number of entries (equals the point count).
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days the assignment was produced for.
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Point IDs in order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Day per point, in point order.
    pub fn days(&self) -> &[Option<usize>] {
        &self.days
    }

    /// Day of the point at `index`.
    pub fn day_at(&self, index: usize) -> Option<usize> {
        self.days[index]
    }

    /// Day of the point with the given ID. `None` if the ID is unknown.
    pub fn day_of(&self, id: u64) -> Option<Option<usize>> {
        self.ids.iter().position(|&x| x == id).map(|i| self.days[i])
    }

    /// External label of the point with the given ID.
    pub fn label(&self, id: u64) -> Option<i64> {
        self.day_of(id).map(to_label)
    }

    /// External labels in point order.
    pub fn labels(&self) -> Vec<i64> {
        self.days.iter().copied().map(to_label).collect()
    }

    /// `(id, label)` entries in point order.
    pub fn entries(&self) -> Vec<LabeledPoint> {
        self.ids
            .iter()
            .zip(&self.days)
            .map(|(&id, &day)| LabeledPoint {
                id,
                day: to_label(day),
            })
            .collect()
    }

    /// Number of points on each day `0..n_days`.
    ///
    /// Labels outside that range are not counted.
    pub fn day_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_days];
        for d in self.days.iter().flatten() {
            if let Some(c) = counts.get_mut(*d) {
                *c += 1;
            }
        }
        counts
    }

    /// Number of unassigned points.
    pub fn unassigned_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_none()).count()
    }

    /// Label → count aggregation, including the unassigned label when present.
    pub fn summary(&self) -> BTreeMap<i64, usize> {
        let mut summary = BTreeMap::new();
        for &day in &self.days {
            *summary.entry(to_label(day)).or_insert(0) += 1;
        }
        summary
    }

    /// Indices of the points assigned to `day`.
    pub fn members_of(&self, day: usize) -> Vec<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == Some(day))
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn set_day_at(&mut self, index: usize, day: Option<usize>) {
        self.days[index] = day;
    }
}

impl Serialize for AssignmentVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}

fn to_label(day: Option<usize>) -> i64 {
    day.map_or(UNASSIGNED, |d| d as i64)
}

/// Search diagnostics reported by the evolutionary strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Cost of the returned assignment.
    pub best_cost: f64,
    /// Best-so-far cost after each generation (non-increasing).
    pub cost_history: Vec<f64>,
    /// Generations actually evaluated.
    pub generations: usize,
    /// `true` if the run stopped early on cancellation or deadline.
    pub truncated: bool,
}

/// Output of [`assign`](crate::dispatch::assign).
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResult {
    /// Day per point.
    pub assignment: AssignmentVector,
    /// Points left without a day.
    pub unassigned_count: usize,
    /// Present only for strategies that run a search.
    pub diagnostics: Option<Diagnostics>,
}

impl AssignmentResult {
    /// Wraps an assignment without diagnostics.
    pub fn new(assignment: AssignmentVector) -> Self {
        let unassigned_count = assignment.unassigned_count();
        Self {
            assignment,
            unassigned_count,
            diagnostics: None,
        }
    }

    /// Attaches diagnostics.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}
