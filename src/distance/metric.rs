//! Point-to-point metrics, centroids and dispersion.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// How the distance between two `(latitude, longitude)` pairs is measured.
///
/// # Examples
///
/// ```
/// use u_dayplan::distance::DistanceMetric;
///
/// let d = DistanceMetric::Euclidean.distance((0.0, 0.0), (3.0, 4.0));
/// assert!((d - 5.0).abs() < 1e-10);
///
/// // Las Vegas to Los Angeles is roughly 370 km.
/// let km = DistanceMetric::Haversine.distance((36.17, -115.14), (34.05, -118.24));
/// assert!(km > 350.0 && km < 400.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Planar distance on raw degree coordinates.
    #[default]
    Euclidean,
    /// Great-circle distance in kilometers.
    Haversine,
}

impl DistanceMetric {
    /// Distance between two `(latitude, longitude)` pairs.
    pub fn distance(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        match self {
            DistanceMetric::Euclidean => {
                let dx = from.0 - to.0;
                let dy = from.1 - to.1;
                (dx * dx + dy * dy).sqrt()
            }
            DistanceMetric::Haversine => haversine_km(from, to),
        }
    }

    /// Squared distance. Avoids the square root for the Euclidean metric.
    pub fn squared(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        match self {
            DistanceMetric::Euclidean => {
                let dx = from.0 - to.0;
                let dy = from.1 - to.1;
                dx * dx + dy * dy
            }
            DistanceMetric::Haversine => haversine_km(from, to).powi(2),
        }
    }
}

fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Mean coordinate of the given members. `None` if `members` is empty.
///
/// # Examples
///
/// ```
/// use u_dayplan::distance::centroid;
///
/// let coords = vec![(0.0, 0.0), (2.0, 0.0), (5.0, 5.0)];
/// assert_eq!(centroid(&coords, &[0, 1]), Some((1.0, 0.0)));
/// assert_eq!(centroid(&coords, &[]), None);
/// ```
pub fn centroid(coords: &[(f64, f64)], members: &[usize]) -> Option<(f64, f64)> {
    if members.is_empty() {
        return None;
    }
    let (sum_lat, sum_lon) = members.iter().fold((0.0, 0.0), |(a, b), &i| {
        (a + coords[i].0, b + coords[i].1)
    });
    let n = members.len() as f64;
    Some((sum_lat / n, sum_lon / n))
}

/// Mean of all coordinates. `None` if `coords` is empty.
pub fn overall_centroid(coords: &[(f64, f64)]) -> Option<(f64, f64)> {
    if coords.is_empty() {
        return None;
    }
    let n = coords.len() as f64;
    let (a, b) = coords
        .iter()
        .fold((0.0, 0.0), |(a, b), &(lat, lon)| (a + lat, b + lon));
    Some((a / n, b / n))
}

/// Sum of squared distances of the members to their centroid.
pub fn dispersion(coords: &[(f64, f64)], members: &[usize], metric: DistanceMetric) -> f64 {
    match centroid(coords, members) {
        Some(c) => members.iter().map(|&i| metric.squared(coords[i], c)).sum(),
        None => 0.0,
    }
}

/// Running mean of a growing member set.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunningCentroid {
    sum_lat: f64,
    sum_lon: f64,
    count: usize,
}

impl RunningCentroid {
    pub(crate) fn add(&mut self, coord: (f64, f64)) {
        self.sum_lat += coord.0;
        self.sum_lon += coord.1;
        self.count += 1;
    }

    pub(crate) fn get(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum_lat / n, self.sum_lon / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_squared_matches() {
        let m = DistanceMetric::Euclidean;
        let d = m.distance((1.0, 2.0), (4.0, 6.0));
        assert!((d - 5.0).abs() < 1e-10);
        assert!((m.squared((1.0, 2.0), (4.0, 6.0)) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_haversine_same_point() {
        let d = DistanceMetric::Haversine.distance((36.1, -115.1), (36.1, -115.1));
        assert!(d < 0.001);
    }

    #[test]
    fn test_haversine_symmetric() {
        let m = DistanceMetric::Haversine;
        let a = (-33.45, -70.66);
        let b = (-33.50, -70.60);
        assert!((m.distance(a, b) - m.distance(b, a)).abs() < 1e-10);
    }

    #[test]
    fn test_overall_centroid() {
        assert_eq!(overall_centroid(&[]), None);
        assert_eq!(overall_centroid(&[(1.0, 1.0), (3.0, 5.0)]), Some((2.0, 3.0)));
    }

    #[test]
    fn test_dispersion() {
        let coords = vec![(0.0, 0.0), (2.0, 0.0)];
        let d = dispersion(&coords, &[0, 1], DistanceMetric::Euclidean);
        assert!((d - 2.0).abs() < 1e-10);
        assert_eq!(dispersion(&coords, &[], DistanceMetric::Euclidean), 0.0);
    }

    #[test]
    fn test_running_centroid() {
        let mut rc = RunningCentroid::default();
        assert!(rc.get().is_none());
        rc.add((0.0, 0.0));
        rc.add((2.0, 4.0));
        assert_eq!(rc.get(), Some((1.0, 2.0)));
    }
}
