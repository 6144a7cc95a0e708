//! Day-label chromosome.
//!
//! One gene per point, holding its day index or `None` for unassigned.

use u_metaheur::ga::Individual;

/// A candidate assignment: one day label per point.
///
/// Lower fitness is better; a fresh chromosome has infinite fitness until
/// evaluated.
///
/// # Examples
///
/// ```
/// use u_dayplan::ga::DayChromosome;
/// use u_metaheur::ga::Individual;
///
/// let c = DayChromosome::new(vec![Some(0), None, Some(1)]);
/// assert_eq!(c.days(), &[Some(0), None, Some(1)]);
/// assert_eq!(c.fitness(), f64::INFINITY);
/// ```
#[derive(Debug, Clone)]
pub struct DayChromosome {
    days: Vec<Option<usize>>,
    fitness: f64,
}

impl DayChromosome {
    /// Creates an unevaluated chromosome.
    pub fn new(days: Vec<Option<usize>>) -> Self {
        Self {
            days,
            fitness: f64::INFINITY,
        }
    }

    /// Day per point.
    pub fn days(&self) -> &[Option<usize>] {
        &self.days
    }

    /// Mutable genes. Callers must reset fitness through re-evaluation.
    pub fn days_mut(&mut self) -> &mut Vec<Option<usize>> {
        &mut self.days
    }

    /// Consumes the chromosome, returning its genes.
    pub fn into_days(self) -> Vec<Option<usize>> {
        self.days
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if there are no genes.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl Individual for DayChromosome {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}
