//! Domain model types for point-to-day assignment.
//!
//! Provides the core data: geo-located points, the per-day capacity plan,
//! the assignment vector every strategy produces, and the explicit column
//! mapping used to load points from tabular input.

mod assignment;
mod plan;
mod point;
mod schema;

pub use assignment::{AssignmentResult, AssignmentVector, Diagnostics, LabeledPoint, UNASSIGNED};
pub use plan::CapacityPlan;
pub use point::{Point, PointSet};
pub use schema::ColumnMapping;
