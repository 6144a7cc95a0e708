//! Distance metrics, centroids and dispersion shared by all strategies.

mod metric;
mod sampling;

pub(crate) use metric::RunningCentroid;
pub use metric::{centroid, dispersion, overall_centroid, DistanceMetric};
pub use sampling::farthest_points;
