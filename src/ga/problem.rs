//! GA problem definition for day assignment.
//!
//! # Operators
//!
//! Implements [`GaProblem`](u_metaheur::ga::GaProblem) over one day label
//! per point.
//!
//! - **Initialization**: the first individual is the seed assignment itself;
//!   later ones reassign each gene to a random day with probability
//!   `perturbation_rate`
//! - **Crossover**: uniform, producing two complementary children
//! - **Mutation**: each gene reassigned to a random day with probability
//!   `mutation_rate`, followed by repair
//! - **Repair**: sheds the points farthest from an over-full day's centroid
//!   to the nearest day with room (or leaves them unassigned), then places
//!   unassigned points on the nearest day with room
//! - **Evaluation**: [`cost`](crate::evaluation::cost) total

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;
use u_metaheur::ga::GaProblem;

use crate::distance::{centroid, overall_centroid, DistanceMetric};
use crate::evaluation::{cost, CostWeights};

use super::chromosome::DayChromosome;
use super::config::GaConfig;

/// GA problem over day labels.
///
/// The first individual a problem creates is the unperturbed seed, so each
/// run needs a fresh problem.
///
/// # Examples
///
/// ```
/// use u_dayplan::distance::DistanceMetric;
/// use u_dayplan::evaluation::CostWeights;
/// use u_dayplan::ga::{DayAssignmentProblem, GaConfig};
/// use u_metaheur::ga::GaRunner;
///
/// let coords = vec![(0.0, 0.0), (0.1, 0.0), (5.0, 5.0), (5.1, 5.0)];
/// let seed = vec![Some(0), Some(1), Some(0), Some(1)];
/// let config = GaConfig::default().with_max_generations(30);
/// let problem = DayAssignmentProblem::new(
///     coords, vec![2, 2], seed, CostWeights::default(), DistanceMetric::Euclidean, &config,
/// );
///
/// let result = GaRunner::run(&problem, &config.runner_config(42)).unwrap();
/// assert!(result.best_fitness <= problem.cost_of(&[Some(0), Some(1), Some(0), Some(1)]));
/// ```
pub struct DayAssignmentProblem {
    coords: Vec<(f64, f64)>,
    plan: Vec<usize>,
    seed: Vec<Option<usize>>,
    weights: CostWeights,
    metric: DistanceMetric,
    center: (f64, f64),
    mutation_rate: f64,
    perturbation_rate: f64,
    repair: bool,
    issued: AtomicUsize,
}

impl DayAssignmentProblem {
    /// Creates a problem seeded with an initial assignment.
    ///
    /// # Panics
    ///
    /// Panics if `plan` is empty or `seed` and `coords` differ in length.
    pub fn new(
        coords: Vec<(f64, f64)>,
        plan: Vec<usize>,
        seed: Vec<Option<usize>>,
        weights: CostWeights,
        metric: DistanceMetric,
        config: &GaConfig,
    ) -> Self {
        assert!(!plan.is_empty(), "plan must have at least one day");
        assert_eq!(coords.len(), seed.len(), "one seed label per point");
        let center = overall_centroid(&coords).unwrap_or((0.0, 0.0));
        Self {
            coords,
            plan,
            seed,
            weights,
            metric,
            center,
            mutation_rate: config.mutation_rate,
            perturbation_rate: config.perturbation_rate,
            repair: config.repair,
            issued: AtomicUsize::new(0),
        }
    }

    /// Number of days.
    pub fn n_days(&self) -> usize {
        self.plan.len()
    }

    /// Cost of an arbitrary label vector under this problem's weights.
    pub fn cost_of(&self, days: &[Option<usize>]) -> f64 {
        cost(&self.coords, days, &self.plan, &self.weights, self.metric).total
    }

    /// Brings every day to at most its planned count and fills open slots
    /// with unassigned points. Out-of-range labels become unassigned first.
    pub fn repair_days(&self, days: &mut [Option<usize>]) {
        let k = self.plan.len();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (i, day) in days.iter_mut().enumerate() {
            match *day {
                Some(d) if d < k => members[d].push(i),
                Some(_) => *day = None,
                None => {}
            }
        }

        let anchors: Vec<(f64, f64)> = members
            .iter()
            .map(|m| centroid(&self.coords, m).unwrap_or(self.center))
            .collect();
        let mut counts: Vec<usize> = members.iter().map(Vec::len).collect();

        for d in 0..k {
            if counts[d] <= self.plan[d] {
                continue;
            }
            let excess = counts[d] - self.plan[d];
            let anchor = anchors[d];
            let mut ranked = members[d].clone();
            ranked.sort_by(|&a, &b| {
                let da = self.metric.squared(self.coords[a], anchor);
                let db = self.metric.squared(self.coords[b], anchor);
                db.total_cmp(&da).then(a.cmp(&b))
            });
            for &i in ranked.iter().take(excess) {
                counts[d] -= 1;
                days[i] = self.nearest_open_day(self.coords[i], &anchors, &counts);
                if let Some(r) = days[i] {
                    counts[r] += 1;
                }
            }
        }

        for i in 0..days.len() {
            if days[i].is_some() {
                continue;
            }
            match self.nearest_open_day(self.coords[i], &anchors, &counts) {
                Some(r) => {
                    days[i] = Some(r);
                    counts[r] += 1;
                }
                None => break,
            }
        }
    }

    fn nearest_open_day(
        &self,
        coord: (f64, f64),
        anchors: &[(f64, f64)],
        counts: &[usize],
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (d, &anchor) in anchors.iter().enumerate() {
            if counts[d] >= self.plan[d] {
                continue;
            }
            let dist = self.metric.squared(coord, anchor);
            if best.map_or(true, |(_, b)| dist < b) {
                best = Some((d, dist));
            }
        }
        best.map(|(d, _)| d)
    }

    fn reassign_genes<R: Rng>(&self, days: &mut [Option<usize>], rate: f64, rng: &mut R) {
        let k = self.plan.len();
        for day in days.iter_mut() {
            if rng.random_bool(rate) {
                *day = Some(rng.random_range(0..k));
            }
        }
    }
}

impl GaProblem for DayAssignmentProblem {
    type Individual = DayChromosome;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> DayChromosome {
        let mut days = self.seed.clone();
        if self.issued.fetch_add(1, Ordering::Relaxed) > 0 {
            self.reassign_genes(&mut days, self.perturbation_rate, rng);
            if self.repair {
                self.repair_days(&mut days);
            }
        }
        DayChromosome::new(days)
    }

    fn evaluate(&self, individual: &DayChromosome) -> f64 {
        self.cost_of(individual.days())
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &DayChromosome,
        parent2: &DayChromosome,
        rng: &mut R,
    ) -> Vec<DayChromosome> {
        let n = parent1.len();
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for (&x, &y) in parent1.days().iter().zip(parent2.days()) {
            if rng.random_bool(0.5) {
                a.push(x);
                b.push(y);
            } else {
                a.push(y);
                b.push(x);
            }
        }
        vec![DayChromosome::new(a), DayChromosome::new(b)]
    }

    fn mutate<R: Rng>(&self, individual: &mut DayChromosome, rng: &mut R) {
        self.reassign_genes(individual.days_mut(), self.mutation_rate, rng);
        if self.repair {
            self.repair_days(individual.days_mut());
        }
    }

    fn on_generation(&self, generation: usize, best_fitness: f64) {
        tracing::debug!(generation, best_fitness, "generation finished");
    }
}
