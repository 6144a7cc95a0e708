//! Constructive heuristics for building day assignments.
//!
//! - [`zone_assign`] — whole zones to the day with the most room, O(n log n)
//! - [`proximity_assign`] — farthest-point seeds plus nearest growth, O(n²k)
//! - [`capacitated_assign`] — nearest growth from k-means centroids under hard ceilings, O(n²k)
//! - [`sweep_assign`] — polar-angle sweep around the centroid (Gillett & Miller, 1974), O(n log n)
//! - [`manual_assign`] — contiguous blocks of a user-approved distribution, O(n)

mod capacitated;
mod greedy;
mod manual;
mod proximity;
mod sweep;
mod zone;

pub use capacitated::capacitated_assign;
pub use manual::{manual_assign, suggest_distribution};
pub use proximity::proximity_assign;
pub use sweep::sweep_assign;
pub use zone::zone_assign;
