//! Weighted assignment cost.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::error::{ValidationError, ValidationErrorKind};

/// Weights of the three cost terms.
///
/// - `alpha` — per point of deviation from the planned day counts
/// - `beta` — per unit of intra-day dispersion (squared distance to centroid)
/// - `gamma` — per unassigned point
///
/// # Examples
///
/// ```
/// use u_dayplan::evaluation::CostWeights;
///
/// let w = CostWeights::default();
/// assert_eq!((w.alpha, w.beta, w.gamma), (1.0, 3.0, 2.0));
/// assert!(CostWeights::new(1.0, -1.0, 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Count-imbalance weight.
    pub alpha: f64,
    /// Dispersion weight.
    pub beta: f64,
    /// Unassigned-point weight.
    pub gamma: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 3.0,
            gamma: 2.0,
        }
    }
}

impl CostWeights {
    /// Creates a weight set.
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Rejects negative or non-finite weights.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, w) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if !w.is_finite() || w < 0.0 {
                return Err(ValidationError::new(
                    ValidationErrorKind::InvalidWeight,
                    format!("Weight {name} must be finite and non-negative, got {w}"),
                ));
            }
        }
        Ok(())
    }
}

/// Breakdown of a candidate's cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentCost {
    /// `Σ_d |count_d − plan[d]|`.
    pub imbalance: f64,
    /// `Σ_d Σ_{p∈d} dist(p, c_d)²`.
    pub dispersion: f64,
    /// Number of unassigned points.
    pub unassigned: f64,
    /// Weighted total.
    pub total: f64,
}

/// Computes the weighted cost of a day-per-point vector.
///
/// Labels outside `0..plan.len()` count as unassigned.
///
/// # Examples
///
/// ```
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::evaluation::{cost, CostWeights};
///
/// let coords = vec![(0.0, 0.0), (2.0, 0.0), (9.0, 9.0)];
/// let days = vec![Some(0), Some(0), None];
/// let c = cost(&coords, &days, &[2, 1], &CostWeights::new(1.0, 1.0, 1.0), DistanceMetric::Euclidean);
/// assert_eq!(c.imbalance, 1.0);  // day 1 is one short
/// assert_eq!(c.dispersion, 2.0); // two points 1.0 from their centroid
/// assert_eq!(c.unassigned, 1.0);
/// assert_eq!(c.total, 4.0);
/// ```
pub fn cost(
    coords: &[(f64, f64)],
    days: &[Option<usize>],
    plan: &[usize],
    weights: &CostWeights,
    metric: DistanceMetric,
) -> AssignmentCost {
    let k = plan.len();
    let mut counts = vec![0usize; k];
    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut unassigned = 0usize;

    for (i, day) in days.iter().enumerate() {
        match day {
            Some(d) if *d < k => {
                counts[*d] += 1;
                sums[*d].0 += coords[i].0;
                sums[*d].1 += coords[i].1;
            }
            _ => unassigned += 1,
        }
    }

    let centroids: Vec<(f64, f64)> = sums
        .iter()
        .zip(&counts)
        .map(|(&(a, b), &c)| {
            if c == 0 {
                (0.0, 0.0)
            } else {
                (a / c as f64, b / c as f64)
            }
        })
        .collect();

    let mut dispersion = 0.0;
    for (i, day) in days.iter().enumerate() {
        if let Some(d) = day.filter(|d| *d < k) {
            dispersion += metric.squared(coords[i], centroids[d]);
        }
    }

    let imbalance: f64 = counts
        .iter()
        .zip(plan)
        .map(|(&c, &p)| (c as f64 - p as f64).abs())
        .sum();
    let unassigned = unassigned as f64;
    let total = weights.alpha * imbalance + weights.beta * dispersion + weights.gamma * unassigned;

    AssignmentCost {
        imbalance,
        dispersion,
        unassigned,
        total,
    }
}
