//! # u-dayplan
//!
//! Point-to-day assignment engine: distributes geo-located work items over a
//! fixed number of days under per-day counts, with interchangeable
//! constructive, clustering and evolutionary strategies.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Point, PointSet, CapacityPlan, AssignmentVector)
//! - [`distance`] — Euclidean / haversine metrics, centroids, farthest-point sampling
//! - [`evaluation`] — Weighted assignment cost (imbalance, dispersion, unassigned)
//! - [`clustering`] — K-means and exact-count balanced k-means
//! - [`constructive`] — Zone, proximity, capacitated, sweep and manual heuristics
//! - [`ga`] — K-means seeded genetic refinement
//! - [`dispatch`] — Strategy selection by name and the [`assign`] entry point
//! - [`technicians`] — Splitting one day's points among technicians
//! - [`session`] — Caller-owned planning state with pure transitions
//!
//! ## Example
//!
//! ```
//! use u_dayplan::{assign, suggest_distribution};
//! use u_dayplan::dispatch::StrategyParams;
//! use u_dayplan::models::{CapacityPlan, Point, PointSet};
//!
//! let points = PointSet::new(vec![
//!     Point::new(1, 40.41, -3.70),
//!     Point::new(2, 40.42, -3.71),
//!     Point::new(3, 40.48, -3.60),
//!     Point::new(4, 40.49, -3.61),
//!     Point::new(5, 40.47, -3.62),
//! ]).unwrap();
//! let plan = CapacityPlan::new(suggest_distribution(points.len(), 2)).unwrap();
//!
//! let result = assign(&points, &plan, "balanced-precise", &StrategyParams::default()).unwrap();
//! assert_eq!(result.assignment.day_counts(), vec![3, 2]);
//! ```

pub mod clustering;
pub mod constructive;
pub mod dispatch;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod models;
pub mod session;
pub mod technicians;
pub mod validation;

pub use constructive::suggest_distribution;
pub use dispatch::assign;
pub use error::{AssignmentError, ValidationError, ValidationErrorKind};
