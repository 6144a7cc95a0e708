//! K-means seeded evolutionary refinement.

use rand::Rng;
use u_metaheur::ga::GaRunner;

use crate::clustering::{kmeans_assign, KMeansConfig};
use crate::distance::DistanceMetric;
use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};
use crate::evaluation::{cost, CostWeights};
use crate::models::{AssignmentVector, CapacityPlan, Diagnostics, PointSet};

use super::config::GaConfig;
use super::problem::DayAssignmentProblem;

/// Refines a k-means assignment with the GA, minimizing the weighted cost.
///
/// The k-means labels seed the population; the best individual over all
/// generations is returned together with its cost and the best-so-far
/// history, whose first entry covers the initial population.
/// `diagnostics.best_cost` equals the cost of the returned assignment. With a
/// fixed `config.seed` the result is reproducible.
///
/// An empty point set skips the search and reports the cost of the empty
/// assignment with zero generations.
///
/// # Errors
///
/// Returns a validation error for negative or non-finite weights and for
/// out-of-range GA or k-means parameters.
///
/// # Examples
///
/// ```
/// use u_dayplan::clustering::KMeansConfig;
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::evaluation::CostWeights;
/// use u_dayplan::ga::{optimize_hybrid, GaConfig};
/// use u_dayplan::models::{CapacityPlan, Point, PointSet};
///
/// let points = PointSet::new(
///     (0..8).map(|i| Point::new(i, (i / 4) as f64 * 10.0, (i % 4) as f64 * 0.1)).collect(),
/// ).unwrap();
/// let plan = CapacityPlan::new(vec![4, 4]).unwrap();
/// let (assignment, diagnostics) = optimize_hybrid(
///     &points,
///     &plan,
///     &CostWeights::default(),
///     DistanceMetric::Euclidean,
///     &GaConfig::default().with_seed(42),
///     &KMeansConfig::default(),
/// ).unwrap();
/// assert_eq!(assignment.len(), 8);
/// assert_eq!(diagnostics.cost_history.len(), diagnostics.generations + 1);
/// ```
pub fn optimize_hybrid(
    points: &PointSet,
    plan: &CapacityPlan,
    weights: &CostWeights,
    metric: DistanceMetric,
    config: &GaConfig,
    kmeans_config: &KMeansConfig,
) -> Result<(AssignmentVector, Diagnostics), AssignmentError> {
    weights.validate()?;
    config.validate()?;
    kmeans_config.validate()?;

    let k = plan.n_days();
    if points.is_empty() {
        let best_cost = cost(&[], &[], plan.counts(), weights, metric).total;
        let diagnostics = Diagnostics {
            best_cost,
            cost_history: vec![best_cost],
            generations: 0,
            truncated: false,
        };
        return Ok((AssignmentVector::unassigned(points, k), diagnostics));
    }

    let mut rng = config.rng();
    let seed = kmeans_assign(points, plan, kmeans_config, &mut rng)?;

    let problem = DayAssignmentProblem::new(
        points.coords(),
        plan.counts().to_vec(),
        seed.days().to_vec(),
        *weights,
        metric,
        config,
    );
    let (runner_config, stop) = config.run_settings(rng.random());
    let result = GaRunner::run_with_cancel(&problem, &runner_config, stop).map_err(|message| {
        ValidationError::new(ValidationErrorKind::InvalidParameter, message)
    })?;

    let truncated = result.cancelled || result.timed_out;
    if truncated {
        tracing::warn!(
            generations = result.generations,
            cancelled = result.cancelled,
            timed_out = result.timed_out,
            "evolutionary refinement stopped early"
        );
    }
    tracing::info!(
        points = points.len(),
        days = k,
        generations = result.generations,
        best_cost = result.best_fitness,
        truncated,
        "evolutionary refinement finished"
    );

    let diagnostics = Diagnostics {
        best_cost: result.best_fitness,
        cost_history: result.fitness_history,
        generations: result.generations,
        truncated,
    };
    let assignment = AssignmentVector::new(points, result.best.into_days(), k);
    Ok((assignment, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::CancellationToken;
    use crate::models::Point;

    fn two_clusters() -> PointSet {
        let mut pts = Vec::new();
        for i in 0..6 {
            pts.push(Point::new(i, 0.0 + i as f64 * 0.01, 0.0));
        }
        for i in 6..12 {
            pts.push(Point::new(i, 10.0 + i as f64 * 0.01, 10.0));
        }
        PointSet::new(pts).expect("valid")
    }

    fn run(points: &PointSet, plan: &CapacityPlan, config: &GaConfig) -> (AssignmentVector, Diagnostics) {
        optimize_hybrid(
            points,
            plan,
            &CostWeights::default(),
            DistanceMetric::Euclidean,
            config,
            &KMeansConfig::default(),
        )
        .expect("valid input")
    }

    #[test]
    fn test_best_cost_matches_assignment() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![5, 7]).expect("valid");
        let (a, d) = run(&points, &plan, &GaConfig::default().with_seed(42));
        let recomputed = cost(
            &points.coords(),
            a.days(),
            plan.counts(),
            &CostWeights::default(),
            DistanceMetric::Euclidean,
        )
        .total;
        assert_eq!(d.best_cost, recomputed);
        assert_eq!(d.best_cost, *d.cost_history.last().expect("history"));
    }

    #[test]
    fn test_history_non_increasing() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let (_, d) = run(&points, &plan, &GaConfig::default().with_seed(3));
        assert_eq!(d.cost_history.len(), 51);
        assert_eq!(d.generations, 50);
        assert!(!d.truncated);
        for w in d.cost_history.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![4, 8]).expect("valid");
        let config = GaConfig::default().with_seed(17).with_max_generations(20);
        let (a1, d1) = run(&points, &plan, &config);
        let (a2, d2) = run(&points, &plan, &config);
        assert_eq!(a1, a2);
        assert_eq!(d1, d2);
    }

    #[test]
    fn test_never_worse_than_kmeans_seed() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let (_, d) = run(&points, &plan, &GaConfig::default().with_seed(42));
        // The separated clusters already match the plan exactly.
        assert!(d.best_cost < 1.0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let token = CancellationToken::new();
        token.cancel();
        let config = GaConfig::default().with_seed(1).with_cancellation(token);
        let (a, d) = run(&points, &plan, &config);
        assert!(d.truncated);
        assert_eq!(d.generations, 0);
        assert_eq!(d.cost_history.len(), 1);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_past_deadline_keeps_seed_quality() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let config = GaConfig::default()
            .with_seed(2)
            .with_deadline(std::time::Instant::now());
        let (a, d) = run(&points, &plan, &config);
        assert!(d.truncated);
        assert_eq!(d.generations, 0);
        assert_eq!(a.unassigned_count(), 0);
        assert_eq!(a.day_counts(), vec![6, 6]);
    }

    #[test]
    fn test_rejects_single_individual_population() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let err = optimize_hybrid(
            &points,
            &plan,
            &CostWeights::default(),
            DistanceMetric::Euclidean,
            &GaConfig::default().with_population_size(1),
            &KMeansConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.validation_kind(),
            Some(crate::error::ValidationErrorKind::InvalidParameter)
        );
    }

    #[test]
    fn test_rejects_negative_weight() {
        let points = two_clusters();
        let plan = CapacityPlan::new(vec![6, 6]).expect("valid");
        let err = optimize_hybrid(
            &points,
            &plan,
            &CostWeights::new(-1.0, 1.0, 1.0),
            DistanceMetric::Euclidean,
            &GaConfig::default(),
            &KMeansConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.validation_kind(),
            Some(crate::error::ValidationErrorKind::InvalidWeight)
        );
    }

    #[test]
    fn test_empty_points() {
        let plan = CapacityPlan::new(vec![2]).expect("valid");
        let (a, d) = run(&PointSet::empty(), &plan, &GaConfig::default());
        assert!(a.is_empty());
        assert_eq!(d.generations, 0);
        // Two planned slots stay empty under alpha = 1.
        assert_eq!(d.best_cost, 2.0);
        assert_eq!(d.cost_history, vec![2.0]);
        assert!(!d.truncated);
    }
}
