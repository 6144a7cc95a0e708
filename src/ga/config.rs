//! GA parameters, stop signals and their mapping onto the
//! `u-metaheur` runner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use u_metaheur::ga::GaConfig as RunnerConfig;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::validation::{require_positive, require_unit_interval};

/// Shared flag an external caller sets to stop a run between generations.
///
/// # Examples
///
/// ```
/// use u_dayplan::ga::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// GA parameters.
///
/// Offspring always go through crossover, then per-gene mutation and repair;
/// parents are picked by tournament.
///
/// # Examples
///
/// ```
/// use u_dayplan::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_max_generations(80)
///     .with_seed(7);
/// assert_eq!(config.population_size, 30);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation (at least two).
    pub population_size: usize,
    /// Generations to run after the initial population.
    pub max_generations: usize,
    /// Fraction of the population copied unchanged, rounded and kept
    /// between one and `population_size - 1`.
    pub elite_ratio: f64,
    /// Contestants per tournament when picking a parent.
    pub tournament_size: usize,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
    /// Per-gene reassignment probability when perturbing the seed.
    pub perturbation_rate: f64,
    /// Apply the capacity repair to perturbed and mutated individuals.
    pub repair: bool,
    /// Evaluate the population on the rayon pool.
    pub parallel: bool,
    /// Random seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Wall-clock limit, checked between generations.
    #[serde(skip)]
    pub deadline: Option<Instant>,
    /// External stop signal, checked between generations.
    #[serde(skip)]
    pub cancel: Option<CancellationToken>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            max_generations: 50,
            elite_ratio: 0.1,
            tournament_size: 3,
            mutation_rate: 0.02,
            perturbation_rate: 0.1,
            repair: true,
            parallel: true,
            seed: None,
            deadline: None,
            cancel: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the elite fraction.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the per-gene perturbation probability for the initial population.
    pub fn with_perturbation_rate(mut self, rate: f64) -> Self {
        self.perturbation_rate = rate;
        self
    }

    /// Enables or disables repair.
    pub fn with_repair(mut self, repair: bool) -> Self {
        self.repair = repair;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Stops the run at the given instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops the run once `limit` has elapsed from now.
    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// Attaches a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Rejects populations below two, zero generations or tournament size
    /// and rates outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.population_size < 2 {
            return Err(ValidationError::new(
                ValidationErrorKind::InvalidParameter,
                format!(
                    "population_size must be at least 2, got {}",
                    self.population_size
                ),
            ));
        }
        require_positive("max_generations", self.max_generations)?;
        require_positive("tournament_size", self.tournament_size)?;
        require_unit_interval("elite_ratio", self.elite_ratio)?;
        require_unit_interval("mutation_rate", self.mutation_rate)?;
        require_unit_interval("perturbation_rate", self.perturbation_rate)
    }

    /// Creates the run's random source from the seed.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Number of individuals copied unchanged into each generation.
    pub fn elite_count(&self) -> usize {
        let pop = self.population_size;
        ((pop as f64 * self.elite_ratio).round() as usize)
            .min(pop.saturating_sub(1))
            .max(1)
    }

    /// Runner parameters seeded with `seed`, without deadline or
    /// cancellation.
    ///
    /// Crossover and mutation are applied to every offspring; the per-gene
    /// rates live in the problem's operators.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dayplan::ga::GaConfig;
    ///
    /// let runner = GaConfig::default().runner_config(7);
    /// assert_eq!(runner.population_size, 20);
    /// assert_eq!(runner.mutation_rate, 1.0);
    /// assert_eq!(runner.stagnation_limit, 0);
    /// assert!(runner.validate().is_ok());
    /// ```
    pub fn runner_config(&self, seed: u64) -> RunnerConfig {
        let pop = self.population_size.max(1);
        // The runner truncates `pop * elite_ratio`; aim mid-way above the count.
        let elite_ratio = (self.elite_count() as f64 + 0.5) / pop as f64;
        RunnerConfig::default()
            .with_population_size(self.population_size)
            .with_max_generations(self.max_generations)
            .with_tournament_size(self.tournament_size)
            .with_elite_ratio(elite_ratio)
            .with_crossover_rate(1.0)
            .with_mutation_rate(1.0)
            .with_stagnation_limit(0)
            .with_parallel(self.parallel)
            .with_seed(seed)
    }

    /// Runner parameters plus the stop flag, with the deadline resolved
    /// against the current time.
    ///
    /// A deadline already in the past yields a raised flag, so the run stops
    /// after evaluating its initial population.
    pub(crate) fn run_settings(&self, seed: u64) -> (RunnerConfig, Option<Arc<AtomicBool>>) {
        let mut config = self.runner_config(seed);
        if let Some(deadline) = self.deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return (config, Some(Arc::new(AtomicBool::new(true))));
            }
            let ms = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
            config = config.with_time_limit_ms(ms.max(1));
        }
        (config, self.cancel.as_ref().map(CancellationToken::flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GaConfig::default();
        assert_eq!(c.population_size, 20);
        assert_eq!(c.max_generations, 50);
        assert_eq!(c.tournament_size, 3);
        assert!(c.repair);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects() {
        assert!(GaConfig::default().with_population_size(1).validate().is_err());
        assert!(GaConfig::default().with_max_generations(0).validate().is_err());
        assert!(GaConfig::default().with_tournament_size(0).validate().is_err());
        assert!(GaConfig::default().with_mutation_rate(1.5).validate().is_err());
        assert!(GaConfig::default().with_elite_ratio(-0.1).validate().is_err());
        assert!(GaConfig::default().with_perturbation_rate(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_elite_count_bounds() {
        assert_eq!(GaConfig::default().elite_count(), 2);
        assert_eq!(GaConfig::default().with_population_size(8).elite_count(), 1);
        assert_eq!(GaConfig::default().with_elite_ratio(0.0).elite_count(), 1);
        assert_eq!(GaConfig::default().with_elite_ratio(1.0).elite_count(), 19);
        assert_eq!(
            GaConfig::default().with_population_size(2).with_elite_ratio(1.0).elite_count(),
            1
        );
    }

    #[test]
    fn test_runner_config_keeps_elite_count() {
        for pop in [2usize, 3, 7, 8, 20, 33, 100] {
            for ratio in [0.0, 0.05, 0.1, 0.25, 0.5, 0.9, 1.0] {
                let ours = GaConfig::default()
                    .with_population_size(pop)
                    .with_elite_ratio(ratio);
                let runner = ours.runner_config(0);
                let truncated = (pop as f64 * runner.elite_ratio) as usize;
                assert_eq!(truncated, ours.elite_count(), "pop {pop} ratio {ratio}");
                assert!(runner.validate().is_ok(), "pop {pop} ratio {ratio}");
            }
        }
    }

    #[test]
    fn test_run_settings_past_deadline_raises_flag() {
        let config = GaConfig::default().with_deadline(Instant::now());
        let (runner, flag) = config.run_settings(1);
        assert!(runner.time_limit_ms.is_none());
        assert!(flag.expect("flag").load(Ordering::Relaxed));
    }

    #[test]
    fn test_run_settings_future_deadline_sets_limit() {
        let config = GaConfig::default().with_time_limit(Duration::from_secs(60));
        let (runner, flag) = config.run_settings(1);
        let limit = runner.time_limit_ms.expect("limit");
        assert!(limit > 0 && limit <= 60_000);
        assert!(flag.is_none());
    }

    #[test]
    fn test_run_settings_shares_token() {
        let token = CancellationToken::new();
        let config = GaConfig::default().with_cancellation(token.clone());
        let (_, flag) = config.run_settings(1);
        let flag = flag.expect("flag");
        assert!(!flag.load(Ordering::Relaxed));
        token.cancel();
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_serde_skips_stop_signals() {
        let json = r#"{"population_size": 12, "tournament_size": 2, "seed": 5}"#;
        let config: GaConfig = serde_json::from_str(json).expect("valid json");
        assert_eq!(config.population_size, 12);
        assert_eq!(config.tournament_size, 2);
        assert_eq!(config.seed, Some(5));
        assert!(config.deadline.is_none());
        assert!(config.cancel.is_none());
    }
}
