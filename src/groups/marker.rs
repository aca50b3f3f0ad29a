//! Marker trajectory: per-frame position and residual of one tracked point.

use serde::{Deserialize, Serialize};

use crate::core::{Column, Table};
use crate::util::{nan_to_none, vec3_or_nan, DVec3, Error, Result};

/// Required columns of a marker table.
pub const MARKER_COLUMNS: [&str; 4] = ["x", "y", "z", "residual"];

/// Position + residual history of one marker.
///
/// A missing coordinate is `None`. Residuals are stored as given; a negative
/// residual conventionally marks a reconstruction failure but that is left
/// to callers to interpret.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkerRepr")]
pub struct MarkerTrajectory {
    x: Vec<Option<f64>>,
    y: Vec<Option<f64>>,
    z: Vec<Option<f64>>,
    residual: Vec<Option<f64>>,
    description: String,
}

#[derive(Deserialize)]
pub(crate) struct MarkerRepr {
    x: Vec<Option<f64>>,
    y: Vec<Option<f64>>,
    z: Vec<Option<f64>>,
    residual: Vec<Option<f64>>,
    #[serde(default)]
    description: String,
}

impl TryFrom<MarkerRepr> for MarkerTrajectory {
    type Error = Error;

    fn try_from(r: MarkerRepr) -> Result<Self> {
        Self::from_columns(r.x, r.y, r.z, r.residual, r.description)
    }
}

impl MarkerTrajectory {
    /// Build from four parallel nullable sequences of equal length.
    pub fn from_columns(
        x: Vec<Option<f64>>,
        y: Vec<Option<f64>>,
        z: Vec<Option<f64>>,
        residual: Vec<Option<f64>>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let n = x.len();
        for (name, len) in [("y", y.len()), ("z", z.len()), ("residual", residual.len())] {
            if len != n {
                return Err(Error::length(format!("Marker column '{name}'"), n, len));
            }
        }
        Ok(Self {
            x,
            y,
            z,
            residual,
            description: description.into(),
        })
    }

    /// Build from plain doubles; NaN marks a missing sample.
    pub fn from_values(
        x: &[f64],
        y: &[f64],
        z: &[f64],
        residual: &[f64],
        description: impl Into<String>,
    ) -> Result<Self> {
        let cast = |v: &[f64]| v.iter().copied().map(nan_to_none).collect::<Vec<_>>();
        Self::from_columns(cast(x), cast(y), cast(z), cast(residual), description)
    }

    /// Build from a table holding at least `x, y, z, residual`.
    pub fn from_table(table: &Table, description: impl Into<String>) -> Result<Self> {
        table.require_columns("Marker table", &MARKER_COLUMNS)?;
        let col = |name: &str| {
            table
                .column(name)
                .map(|c| c.values().to_vec())
                .unwrap_or_default()
        };
        Self::from_columns(col("x"), col("y"), col("z"), col("residual"), description)
    }

    /// Number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn x(&self) -> &[Option<f64>] {
        &self.x
    }

    pub fn y(&self) -> &[Option<f64>] {
        &self.y
    }

    pub fn z(&self) -> &[Option<f64>] {
        &self.z
    }

    /// Position at a row; missing components are NaN.
    pub fn coord(&self, row: usize) -> Option<DVec3> {
        if row >= self.len() {
            return None;
        }
        Some(vec3_or_nan(self.x[row], self.y[row], self.z[row]))
    }

    /// All positions as an N×3 array; missing components are NaN.
    pub fn coords(&self) -> Vec<DVec3> {
        (0..self.len())
            .map(|i| vec3_or_nan(self.x[i], self.y[i], self.z[i]))
            .collect()
    }

    /// Residuals as an N array; missing residuals are NaN.
    pub fn residual(&self) -> Vec<f64> {
        self.residual.iter().map(|r| r.unwrap_or(f64::NAN)).collect()
    }

    /// True when x, y and z are all present at `row`.
    #[inline]
    pub fn is_full_at(&self, row: usize) -> bool {
        row < self.len() && self.x[row].is_some() && self.y[row].is_some() && self.z[row].is_some()
    }

    /// True when any coordinate is missing in `rows` (clamped to the data).
    pub fn has_gap_in(&self, rows: std::ops::Range<usize>) -> bool {
        let end = rows.end.min(self.len());
        let start = rows.start.min(end);
        [&self.x, &self.y, &self.z]
            .iter()
            .any(|col| col[start..end].iter().any(Option::is_none))
    }

    /// Columns renamed `{prefix}_x .. {prefix}_residual`, for wide tables.
    pub fn prefix_columns(&self, prefix: &str) -> Table {
        self.prefixed(prefix, true)
    }

    pub(crate) fn prefixed(&self, prefix: &str, include_residual: bool) -> Table {
        let mut columns = vec![
            Column::new(format!("{prefix}_x"), self.x.clone()),
            Column::new(format!("{prefix}_y"), self.y.clone()),
            Column::new(format!("{prefix}_z"), self.z.clone()),
        ];
        if include_residual {
            columns.push(Column::new(format!("{prefix}_residual"), self.residual.clone()));
        }
        // Columns share one length by construction.
        Table::from_columns(columns).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    fn sample() -> MarkerTrajectory {
        MarkerTrajectory::from_values(
            &[1.0, 2.0, f64::NAN],
            &[4.0, 5.0, 6.0],
            &[7.0, 8.0, 9.0],
            &[0.5, 0.5, -1.0],
            "left toe",
        )
        .unwrap()
    }

    #[test]
    fn test_views() {
        let m = sample();
        assert_eq!(m.len(), 3);
        let coords = m.coords();
        assert_eq!(coords[1], DVec3::new(2.0, 5.0, 8.0));
        assert!(coords[2].x.is_nan());
        assert_eq!(m.residual(), vec![0.5, 0.5, -1.0]);
        assert!(m.is_full_at(0));
        assert!(!m.is_full_at(2));
        assert!(!m.is_full_at(3));
        assert!(m.has_gap_in(0..3));
        assert!(!m.has_gap_in(0..2));
    }

    #[test]
    fn test_from_table_requires_columns() {
        let table = Table::from_columns(vec![
            Column::from_f64("x", &[1.0]),
            Column::from_f64("y", &[1.0]),
            Column::from_f64("z", &[1.0]),
        ])
        .unwrap();
        let err = MarkerTrajectory::from_table(&table, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("residual"));
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let err = MarkerTrajectory::from_values(&[1.0, 2.0], &[1.0], &[1.0, 2.0], &[0.0, 0.0], "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_prefix_columns() {
        let t = sample().prefix_columns("LTOE");
        let names: Vec<&str> = t.column_names().collect();
        assert_eq!(names, vec!["LTOE_x", "LTOE_y", "LTOE_z", "LTOE_residual"]);
        assert_eq!(t.height(), 3);
    }
}
