//! Strategy selection and the single assignment entry point.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::clustering::{balanced_precise_assign, kmeans_assign, KMeansConfig};
use crate::constructive::{
    capacitated_assign, manual_assign, proximity_assign, sweep_assign, zone_assign,
};
use crate::distance::DistanceMetric;
use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};
use crate::evaluation::CostWeights;
use crate::ga::{optimize_hybrid, GaConfig};
use crate::models::{AssignmentResult, AssignmentVector, CapacityPlan, PointSet};
use crate::validation::validate_plan;

/// Seed used for k-means initialization when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Assignment strategies.
///
/// Parses from the canonical kebab-case name or from the labels of the
/// planning application (case-insensitive).
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatch::StrategyId;
///
/// let s: StrategyId = "Balanceado Preciso".parse().unwrap();
/// assert_eq!(s, StrategyId::BalancedPrecise);
/// assert_eq!(s.to_string(), "balanced-precise");
/// assert!(s.is_exact());
/// assert!("teleport".parse::<StrategyId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    /// Whole zones to the day with the most room.
    Zone,
    /// Farthest-point seeds plus nearest growth.
    Proximity,
    /// K-means followed by exact-count rebalancing.
    BalancedPrecise,
    /// Nearest growth from k-means centroids under hard ceilings.
    Capacitated,
    /// Polar-angle sweep around the centroid.
    Sweep,
    /// Contiguous blocks of a user-approved distribution.
    Manual,
    /// Plain k-means labels, ignoring counts.
    KMeans,
    /// K-means seed refined by the genetic algorithm.
    KMeansEvolutionary,
}

impl StrategyId {
    /// Every strategy, in menu order.
    pub const ALL: [StrategyId; 8] = [
        StrategyId::Zone,
        StrategyId::Proximity,
        StrategyId::BalancedPrecise,
        StrategyId::Capacitated,
        StrategyId::Sweep,
        StrategyId::Manual,
        StrategyId::KMeans,
        StrategyId::KMeansEvolutionary,
    ];

    /// Canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::Zone => "zone",
            StrategyId::Proximity => "proximity",
            StrategyId::BalancedPrecise => "balanced-precise",
            StrategyId::Capacitated => "capacitated",
            StrategyId::Sweep => "sweep",
            StrategyId::Manual => "manual",
            StrategyId::KMeans => "kmeans",
            StrategyId::KMeansEvolutionary => "kmeans-evolutionary",
        }
    }

    /// Strategies that require `plan.total() == points.len()`.
    pub fn is_exact(&self) -> bool {
        matches!(self, StrategyId::BalancedPrecise | StrategyId::Manual)
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyId {
    type Err = AssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ValidationError::new(
                ValidationErrorKind::EmptyStrategyName,
                "Strategy name must not be empty",
            )
            .into());
        }
        let id = match name.to_lowercase().as_str() {
            "zone" | "por zona" => StrategyId::Zone,
            "proximity" | "por proximidad" => StrategyId::Proximity,
            "balanced-precise" | "balanceado preciso" => StrategyId::BalancedPrecise,
            "capacitated" | "capacitado" => StrategyId::Capacitated,
            "sweep" => StrategyId::Sweep,
            "manual" => StrategyId::Manual,
            "kmeans" | "k-means" | "kms" => StrategyId::KMeans,
            "kmeans-evolutionary" | "kms-evolutivo" => StrategyId::KMeansEvolutionary,
            _ => return Err(AssignmentError::UnknownStrategy(name.to_string())),
        };
        Ok(id)
    }
}

/// Per-call tuning shared by all strategies.
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatch::StrategyParams;
/// use u_dayplan::distance::DistanceMetric;
///
/// let params = StrategyParams::default()
///     .with_n_days(3)
///     .with_seed(7)
///     .with_metric(DistanceMetric::Haversine);
/// assert_eq!(params.n_days, Some(3));
/// assert_eq!(params.kmeans_seed(), 7);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Declared day count; must equal the plan length when given.
    pub n_days: Option<usize>,
    /// Seed for k-means initialization and, unless `ga.seed` is set, the GA.
    pub seed: Option<u64>,
    /// Distance used by distance-based strategies.
    pub metric: DistanceMetric,
    /// Cost weights for the evolutionary strategy.
    pub weights: CostWeights,
    /// Evolutionary strategy settings.
    pub ga: GaConfig,
    /// K-means settings.
    pub kmeans: KMeansConfig,
}

impl StrategyParams {
    /// Declares the expected number of days.
    pub fn with_n_days(mut self, n_days: usize) -> Self {
        self.n_days = Some(n_days);
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the cost weights.
    pub fn with_weights(mut self, weights: CostWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the GA configuration.
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    /// Sets the k-means configuration.
    pub fn with_kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Seed for k-means initialization.
    pub fn kmeans_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    fn effective_ga(&self) -> GaConfig {
        let mut ga = self.ga.clone();
        if ga.seed.is_none() {
            ga.seed = self.seed;
        }
        ga
    }
}

/// Assigns every point a day (or leaves it unassigned) with the named
/// strategy.
///
/// # Errors
///
/// - `ValidationError(EmptyStrategyName)` for a blank name
/// - [`AssignmentError::UnknownStrategy`] for an unrecognized name
/// - `ValidationError(PlanLengthMismatch)` if `params.n_days` differs from
///   the plan length
/// - [`AssignmentError::InfeasibleExactAssignment`] for `balanced-precise`
///   and `manual` when the plan total differs from the point count
/// - `ValidationError` for invalid weights or k-means / GA parameters
///
/// An empty point set yields an empty assignment for every strategy.
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatch::{assign, StrategyParams};
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new(vec![
///     Point::new(1, 0.0, 0.0),
///     Point::new(2, 0.0, 0.1),
///     Point::new(3, 5.0, 5.0),
///     Point::new(4, 5.0, 5.1),
/// ]).unwrap();
/// let plan = CapacityPlan::new(vec![2, 2]).unwrap();
///
/// let result = assign(&points, &plan, "capacitated", &StrategyParams::default()).unwrap();
/// assert_eq!(result.unassigned_count, 0);
/// assert_eq!(result.assignment.day_counts(), vec![2, 2]);
/// assert!(result.diagnostics.is_none());
/// ```
pub fn assign(
    points: &PointSet,
    plan: &CapacityPlan,
    strategy: &str,
    params: &StrategyParams,
) -> Result<AssignmentResult, AssignmentError> {
    let id: StrategyId = strategy.parse()?;
    assign_with(points, plan, id, params)
}

/// Same as [`assign`] with an already-parsed strategy.
pub fn assign_with(
    points: &PointSet,
    plan: &CapacityPlan,
    strategy: StrategyId,
    params: &StrategyParams,
) -> Result<AssignmentResult, AssignmentError> {
    validate_plan(plan, params.n_days)?;
    params.weights.validate()?;
    params.kmeans.validate()?;

    let k = plan.n_days();
    if points.is_empty() && strategy != StrategyId::KMeansEvolutionary {
        tracing::debug!(strategy = %strategy, "no points to assign");
        return Ok(AssignmentResult::new(AssignmentVector::unassigned(points, k)));
    }

    let mut rng = StdRng::seed_from_u64(params.kmeans_seed());
    let mut diagnostics = None;
    let assignment = match strategy {
        StrategyId::Zone => zone_assign(points, plan),
        StrategyId::Proximity => proximity_assign(points, plan, params.metric),
        StrategyId::BalancedPrecise => {
            balanced_precise_assign(points, plan, &params.kmeans, params.metric, &mut rng)?
        }
        StrategyId::Capacitated => {
            capacitated_assign(points, plan, &params.kmeans, params.metric, &mut rng)?
        }
        StrategyId::Sweep => sweep_assign(points, plan, params.metric),
        StrategyId::Manual => manual_assign(points, plan)?,
        StrategyId::KMeans => kmeans_assign(points, plan, &params.kmeans, &mut rng)?,
        StrategyId::KMeansEvolutionary => {
            let (assignment, diag) = optimize_hybrid(
                points,
                plan,
                &params.weights,
                params.metric,
                &params.effective_ga(),
                &params.kmeans,
            )?;
            diagnostics = Some(diag);
            assignment
        }
    };

    let assignment = normalize_labels(assignment);
    let mut result = AssignmentResult::new(assignment);
    if let Some(diag) = diagnostics {
        result = result.with_diagnostics(diag);
    }

    tracing::info!(
        strategy = %strategy,
        points = points.len(),
        days = k,
        unassigned = result.unassigned_count,
        "assignment complete"
    );
    Ok(result)
}

/// Turns any day label outside `0..n_days` into unassigned.
fn normalize_labels(mut assignment: AssignmentVector) -> AssignmentVector {
    let k = assignment.n_days();
    for i in 0..assignment.len() {
        if let Some(day) = assignment.day_at(i) {
            if day >= k {
                tracing::warn!(day, n_days = k, "out-of-range day label treated as unassigned");
                assignment.set_day_at(i, None);
            }
        }
    }
    assignment
}
