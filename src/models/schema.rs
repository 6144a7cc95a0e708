//! Explicit column mapping for tabular point input.

use serde::{Deserialize, Serialize};

use super::{Point, PointSet};
use crate::error::{AssignmentError, ValidationError, ValidationErrorKind};

/// Header names of the columns that carry point fields.
///
/// The caller states which column holds what; headers are matched exactly.
/// Contract and zone columns are optional.
///
/// # Examples
///
/// ```
/// use u_dayplan::models::{ColumnMapping, PointSet};
///
/// let headers = vec!["Id".to_string(), "Latitud".to_string(), "Longitud".to_string()];
/// let rows = vec![vec!["1".to_string(), "-33.4".to_string(), "-70.6".to_string()]];
/// let set = PointSet::from_table(&headers, &rows, &ColumnMapping::default()).unwrap();
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.get(0).latitude(), -33.4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Column holding the point ID.
    pub id: String,
    /// Column holding the latitude.
    pub latitude: String,
    /// Column holding the longitude.
    pub longitude: String,
    /// Column holding the contract reference.
    pub contract: Option<String>,
    /// Column holding the zone label.
    pub zone: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "Id".to_string(),
            latitude: "Latitud".to_string(),
            longitude: "Longitud".to_string(),
            contract: Some("Contrato".to_string()),
            zone: Some("Zona".to_string()),
        }
    }
}

impl ColumnMapping {
    fn required(headers: &[String], name: &str) -> Result<usize, AssignmentError> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::MissingColumn,
                format!("Missing column '{name}'"),
            )
            .into()
        })
    }

    fn optional(headers: &[String], name: Option<&String>) -> Option<usize> {
        name.and_then(|n| headers.iter().position(|h| h == n))
    }
}

impl PointSet {
    /// Builds a validated point set from string rows.
    ///
    /// Blank contract/zone cells are treated as absent. Optional columns that
    /// are not in `headers` are ignored.
    pub fn from_table(
        headers: &[String],
        rows: &[Vec<String>],
        mapping: &ColumnMapping,
    ) -> Result<PointSet, AssignmentError> {
        let id_col = ColumnMapping::required(headers, &mapping.id)?;
        let lat_col = ColumnMapping::required(headers, &mapping.latitude)?;
        let lon_col = ColumnMapping::required(headers, &mapping.longitude)?;
        let contract_col = ColumnMapping::optional(headers, mapping.contract.as_ref());
        let zone_col = ColumnMapping::optional(headers, mapping.zone.as_ref());

        let mut points = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let id: u64 = parse_cell(row, id_col, row_idx, &mapping.id)?;
            let lat: f64 = parse_cell(row, lat_col, row_idx, &mapping.latitude)?;
            let lon: f64 = parse_cell(row, lon_col, row_idx, &mapping.longitude)?;

            let mut point = Point::new(id, lat, lon);
            if let Some(text) = contract_col.and_then(|c| non_blank(row, c)) {
                point = point.with_contract_ref(text);
            }
            if let Some(text) = zone_col.and_then(|c| non_blank(row, c)) {
                point = point.with_zone(text);
            }
            points.push(point);
        }

        PointSet::new(points)
    }
}

fn parse_cell<T: std::str::FromStr>(
    row: &[String],
    col: usize,
    row_idx: usize,
    name: &str,
) -> Result<T, AssignmentError> {
    row.get(col)
        .and_then(|cell| cell.trim().parse().ok())
        .ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::InvalidCell,
                format!("Row {row_idx}: cannot parse column '{name}'"),
            )
            .into()
        })
}

fn non_blank(row: &[String], col: usize) -> Option<&str> {
    row.get(col).map(|s| s.trim()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_table_with_metadata() {
        let headers = strings(&["Id", "Latitud", "Longitud", "Contrato", "Zona"]);
        let rows = vec![
            strings(&["1", "1.0", "2.0", "C-1", "norte"]),
            strings(&["2", "3.0", "4.0", " ", ""]),
        ];
        let set = PointSet::from_table(&headers, &rows, &ColumnMapping::default()).expect("valid");
        assert_eq!(set.get(0).contract_ref(), Some("C-1"));
        assert_eq!(set.get(0).zone(), Some("norte"));
        assert!(set.get(1).contract_ref().is_none());
        assert!(set.get(1).zone().is_none());
    }

    #[test]
    fn test_custom_mapping() {
        let headers = strings(&["code", "lat", "lng", "Número de Contrato"]);
        let rows = vec![strings(&["9", "0.5", "0.25", "X"])];
        let mapping = ColumnMapping {
            id: "code".into(),
            latitude: "lat".into(),
            longitude: "lng".into(),
            contract: Some("Número de Contrato".into()),
            zone: None,
        };
        let set = PointSet::from_table(&headers, &rows, &mapping).expect("valid");
        assert_eq!(set.get(0).id(), 9);
        assert_eq!(set.get(0).contract_ref(), Some("X"));
    }

    #[test]
    fn test_missing_column() {
        let headers = strings(&["Id", "Latitud"]);
        match PointSet::from_table(&headers, &[], &ColumnMapping::default()) {
            Err(AssignmentError::Validation(v)) => {
                assert_eq!(v.kind, ValidationErrorKind::MissingColumn)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_cell() {
        let headers = strings(&["Id", "Latitud", "Longitud"]);
        let rows = vec![strings(&["1", "north", "2.0"])];
        match PointSet::from_table(&headers, &rows, &ColumnMapping::default()) {
            Err(AssignmentError::Validation(v)) => assert_eq!(v.kind, ValidationErrorKind::InvalidCell),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_mapping_deserialize_defaults() {
        let mapping: ColumnMapping = serde_json::from_str(r#"{"id":"code"}"#).expect("valid");
        assert_eq!(mapping.id, "code");
        assert_eq!(mapping.latitude, "Latitud");
    }
}
