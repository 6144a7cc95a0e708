//! Genetic algorithm refinement of day assignments, run on the
//! `u-metaheur` GA engine.
//!
//! - [`GaConfig`] — population, operator rates and stop signals
//! - [`DayChromosome`] — one day label per point
//! - [`DayAssignmentProblem`] — [`GaProblem`](u_metaheur::ga::GaProblem) implementation with capacity repair
//! - [`optimize_hybrid`] — k-means seed followed by GA refinement

mod chromosome;
mod config;
mod hybrid;
mod problem;

pub use chromosome::DayChromosome;
pub use config::{CancellationToken, GaConfig};
pub use hybrid::optimize_hybrid;
pub use problem::DayAssignmentProblem;
