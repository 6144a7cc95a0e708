//! Point and point-set types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};

/// A geo-located work item.
///
/// Coordinates are stored as given; [`PointSet::new`] rejects non-finite
/// values.
///
/// # Examples
///
/// ```
/// use u_dayplan::models::Point;
///
/// let p = Point::new(7, -33.45, -70.66).with_zone("centro");
/// assert_eq!(p.id(), 7);
/// assert_eq!(p.zone(), Some("centro"));
/// assert!(p.contract_ref().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    id: u64,
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contract_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zone: Option<String>,
}

impl Point {
    /// Creates a point without contract or zone metadata.
    pub fn new(id: u64, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
            contract_ref: None,
            zone: None,
        }
    }

    /// Attaches a contract reference.
    pub fn with_contract_ref(mut self, contract_ref: impl Into<String>) -> Self {
        self.contract_ref = Some(contract_ref.into());
        self
    }

    /// Attaches a categorical zone.
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Point ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `(latitude, longitude)` pair.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Contract reference, if known.
    pub fn contract_ref(&self) -> Option<&str> {
        self.contract_ref.as_deref()
    }

    /// Zone label, if known.
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Returns `true` if both coordinates are finite.
    pub fn has_finite_coords(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// An ordered collection of points with unique IDs.
///
/// The order is significant: it is the "existing relative order" used by the
/// manual strategy and the index space of every
/// [`AssignmentVector`](super::AssignmentVector).
///
/// # Examples
///
/// ```
/// use u_dayplan::models::{Point, PointSet};
///
/// let set = PointSet::new(vec![Point::new(1, 0.0, 0.0), Point::new(2, 1.0, 1.0)]).unwrap();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.index_of(2), Some(1));
///
/// let dup = PointSet::new(vec![Point::new(1, 0.0, 0.0), Point::new(1, 1.0, 1.0)]);
/// assert!(dup.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Builds a point set, rejecting duplicate IDs and non-finite coordinates.
    pub fn new(points: Vec<Point>) -> Result<Self, AssignmentError> {
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !p.has_finite_coords() {
                return Err(ValidationError::new(
                    ValidationErrorKind::NonFiniteCoordinate,
                    format!("Point {} has non-finite coordinates", p.id),
                )
                .into());
            }
            if !seen.insert(p.id) {
                return Err(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate point ID: {}", p.id),
                )
                .into());
            }
        }
        Ok(Self { points })
    }

    /// An empty point set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the points in order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> &Point {
        &self.points[index]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point IDs in order.
    pub fn ids(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.id).collect()
    }

    /// Coordinates in order.
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(Point::coords).collect()
    }

    /// Position of the point with the given ID.
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    /// Builds a new set from the points at the given indices, keeping their
    /// relative order.
    pub fn subset(&self, indices: &[usize]) -> PointSet {
        PointSet {
            points: indices.iter().map(|&i| self.points[i].clone()).collect(),
        }
    }

    /// Iterates over the points.
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }
}

impl<'de> Deserialize<'de> for PointSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Point>::deserialize(deserializer)?;
        PointSet::new(points).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
