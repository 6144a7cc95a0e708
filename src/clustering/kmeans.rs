//! K-means clustering and the k-means assignment strategy.
//!
//! # Algorithm
//!
//! Fitting is delegated to `linfa-clustering` (k-means++ initialization,
//! Lloyd iterations, `n_init` restarts keeping the lowest inertia). Cluster
//! labels are then renamed by descending cluster size so that day 0 receives
//! the largest cluster.
//!
//! Inputs with no more distinct locations than clusters are split locally,
//! one location per cluster.
//!
//! Clustering is always planar on `(latitude, longitude)`.
//!
//! # Complexity
//!
//! O(n_init × iterations × n × k).

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};

use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};
use crate::models::{AssignmentVector, CapacityPlan, PointSet};
use crate::validation::require_positive;

/// K-means parameters.
///
/// # Examples
///
/// ```
/// use u_dayplan::clustering::KMeansConfig;
///
/// let cfg = KMeansConfig::default().with_n_init(3).with_max_iterations(50);
/// assert_eq!(cfg.n_init, 3);
/// assert_eq!(cfg.max_iterations, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Lloyd iterations per restart.
    pub max_iterations: usize,
    /// Convergence tolerance on the inertia change between iterations.
    pub tolerance: f64,
    /// Number of restarts.
    pub n_init: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 1e-4,
            n_init: 10,
        }
    }
}

impl KMeansConfig {
    /// Sets the iteration limit per restart.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the number of restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Rejects zero restarts or iterations and a non-positive tolerance.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("kmeans.n_init", self.n_init)?;
        require_positive("kmeans.max_iterations", self.max_iterations)?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                format!("kmeans.tolerance must be finite and positive, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Outcome of [`kmeans`].
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Cluster per point, renamed so cluster 0 is the largest.
    pub labels: Vec<usize>,
    /// Centroid per cluster, in label order.
    pub centroids: Vec<(f64, f64)>,
    /// Sum of squared distances to the assigned centroid.
    pub inertia: f64,
}

/// Clusters coordinates into `k` groups.
///
/// When there are no more distinct locations than `k`, each location forms
/// its own cluster. The linfa random source is seeded from `rng`, so a
/// seeded `rng` gives reproducible labels.
///
/// # Errors
///
/// `ValidationError(InvalidParameter)` if `config` is invalid or the fit
/// fails.
///
/// # Panics
///
/// Panics if `k == 0`.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_dayplan::clustering::{kmeans, KMeansConfig};
///
/// let coords = vec![(0.0, 0.0), (0.1, 0.0), (0.0, 0.1), (10.0, 10.0), (10.1, 10.0)];
/// let mut rng = StdRng::seed_from_u64(42);
/// let result = kmeans(&coords, 2, &KMeansConfig::default(), &mut rng).unwrap();
/// assert_eq!(result.labels, vec![0, 0, 0, 1, 1]);
/// ```
pub fn kmeans<R: Rng>(
    coords: &[(f64, f64)],
    k: usize,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<KMeansResult, AssignmentError> {
    assert!(k > 0, "k-means needs at least one cluster");
    config.validate()?;

    if let Some(result) = split_distinct(coords, k) {
        return Ok(result);
    }

    let n = coords.len();
    let observations = Array2::from_shape_vec(
        (n, 2),
        coords.iter().flat_map(|&(lat, lon)| [lat, lon]).collect(),
    )
    .map_err(|e| fit_error(e.to_string()))?;
    let dataset = DatasetBase::from(observations);

    let model = KMeans::params_with_rng(k, Xoshiro256Plus::seed_from_u64(rng.random()))
        .n_runs(config.n_init)
        .max_n_iterations(config.max_iterations as u64)
        .tolerance(config.tolerance)
        .fit(&dataset)
        .map_err(|e| fit_error(e.to_string()))?;

    let predicted: Array1<usize> = model.predict(dataset.records());
    let labels: Vec<usize> = predicted.to_vec();
    let centroids: Vec<(f64, f64)> = model
        .centroids()
        .outer_iter()
        .map(|row| (row[0], row[1]))
        .collect();
    let inertia = model.inertia();

    let (labels, centroids) = relabel_by_size(&labels, &centroids);
    tracing::trace!(k, n, inertia, "k-means fitted");
    Ok(KMeansResult {
        labels,
        centroids,
        inertia,
    })
}

/// Assigns each point to the day of its k-means cluster (`k = n_days`).
///
/// Ignores the plan counts; every point receives a day.
///
/// # Errors
///
/// Propagates [`kmeans`] errors.
pub fn kmeans_assign<R: Rng>(
    points: &PointSet,
    plan: &CapacityPlan,
    config: &KMeansConfig,
    rng: &mut R,
) -> Result<AssignmentVector, AssignmentError> {
    let result = kmeans(&points.coords(), plan.n_days(), config, rng)?;
    let days = result.labels.into_iter().map(Some).collect();
    Ok(AssignmentVector::new(points, days, plan.n_days()))
}

fn fit_error(message: String) -> AssignmentError {
    ValidationError::new(
        ValidationErrorKind::InvalidParameter,
        format!("k-means fit failed: {message}"),
    )
    .into()
}

/// One cluster per distinct location when there are at most `k` of them.
fn split_distinct(coords: &[(f64, f64)], k: usize) -> Option<KMeansResult> {
    let mut distinct: Vec<(f64, f64)> = Vec::new();
    let mut labels = Vec::with_capacity(coords.len());
    for &c in coords {
        let label = match distinct.iter().position(|&d| d == c) {
            Some(label) => label,
            None => {
                if distinct.len() == k {
                    return None;
                }
                distinct.push(c);
                distinct.len() - 1
            }
        };
        labels.push(label);
    }

    let centroids: Vec<(f64, f64)> = (0..k)
        .map(|c| distinct.get(c).or(distinct.first()).copied().unwrap_or((0.0, 0.0)))
        .collect();
    let (labels, centroids) = relabel_by_size(&labels, &centroids);
    Some(KMeansResult {
        labels,
        centroids,
        inertia: 0.0,
    })
}

/// Renames clusters by descending size, ties by original index.
fn relabel_by_size(labels: &[usize], centroids: &[(f64, f64)]) -> (Vec<usize>, Vec<(f64, f64)>) {
    let k = centroids.len();
    let mut sizes = vec![0usize; k];
    for &c in labels {
        sizes[c] += 1;
    }
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]).then(a.cmp(&b)));

    let mut rename = vec![0usize; k];
    for (new, &old) in order.iter().enumerate() {
        rename[old] = new;
    }
    let labels = labels.iter().map(|&c| rename[c]).collect();
    let centroids = order.iter().map(|&old| centroids[old]).collect();
    (labels, centroids)
}
