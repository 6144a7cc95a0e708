//! Assignment cost evaluation.

mod cost;

pub use cost::{cost, AssignmentCost, CostWeights};
