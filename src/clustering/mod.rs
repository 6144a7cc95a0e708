//! Clustering-based strategies.
//!
//! - [`kmeans`] — k-means fitted by `linfa-clustering`, labels ordered by cluster size
//! - [`kmeans_assign`] — one day per cluster, largest cluster first
//! - [`balanced_precise_assign`] — k-means followed by dispersion-aware count repair

mod balanced;
mod kmeans;

pub use balanced::balanced_precise_assign;
pub use kmeans::{kmeans, kmeans_assign, KMeansConfig, KMeansResult};
