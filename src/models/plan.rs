//! Per-day capacity plan.

use serde::{Deserialize, Serialize};

use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};

/// Target (or ceiling) point count for each day.
///
/// Exact strategies read `counts[d]` as the number of points day `d` must end
/// with; capacitated strategies read it as a hard maximum.
///
/// # Examples
///
/// ```
/// use u_dayplan::models::CapacityPlan;
///
/// let plan = CapacityPlan::new(vec![4, 3, 3]).unwrap();
/// assert_eq!(plan.n_days(), 3);
/// assert_eq!(plan.total(), 10);
/// assert_eq!(plan.target(0), 4);
/// assert!(CapacityPlan::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct CapacityPlan {
    counts: Vec<usize>,
}

impl CapacityPlan {
    /// Creates a plan with one count per day.
    ///
    /// Returns a validation error if `counts` is empty.
    pub fn new(counts: Vec<usize>) -> Result<Self, AssignmentError> {
        if counts.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::EmptyPlan,
                "Capacity plan must cover at least one day",
            )
            .into());
        }
        Ok(Self { counts })
    }

    /// Number of days.
    pub fn n_days(&self) -> usize {
        self.counts.len()
    }

    /// Count for day `day`.
    ///
    /// # Panics
    ///
    /// Panics if `day` is out of bounds.
    pub fn target(&self, day: usize) -> usize {
        self.counts[day]
    }

    /// All counts in day order.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl TryFrom<Vec<usize>> for CapacityPlan {
    type Error = AssignmentError;

    fn try_from(counts: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(counts)
    }
}

impl From<CapacityPlan> for Vec<usize> {
    fn from(plan: CapacityPlan) -> Self {
        plan.counts
    }
}
