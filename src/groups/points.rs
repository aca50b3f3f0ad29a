//! Point group: named marker trajectories sharing one time base.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{Column, Sampled, SampledSeries, SeriesRepr, Table};
use crate::groups::marker::MarkerRepr;
use crate::groups::MarkerTrajectory;
use crate::util::{nan_to_none, DVec3, Error, Frame, Result};

/// Marker trajectories sampled on one [`SampledSeries`].
///
/// Every trajectory has exactly `total_frames` rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointsRepr")]
pub struct Points {
    series: SampledSeries,
    units: String,
    trajectories: BTreeMap<String, MarkerTrajectory>,
}

#[derive(Deserialize)]
pub(crate) struct PointsRepr {
    series: SeriesRepr,
    units: String,
    trajectories: BTreeMap<String, MarkerRepr>,
}

impl TryFrom<PointsRepr> for Points {
    type Error = Error;

    fn try_from(r: PointsRepr) -> Result<Self> {
        let trajectories = r
            .trajectories
            .into_iter()
            .map(|(name, marker)| MarkerTrajectory::try_from(marker).map(|m| (name, m)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Self::new(SampledSeries::try_from(r.series)?, r.units, trajectories)
    }
}

impl Points {
    /// Create a point group, checking every trajectory's length.
    pub fn new(
        series: SampledSeries,
        units: impl Into<String>,
        trajectories: BTreeMap<String, MarkerTrajectory>,
    ) -> Result<Self> {
        let expected = series.total_frames();
        for (name, trajectory) in &trajectories {
            if trajectory.len() != expected {
                return Err(Error::length(format!("Marker '{name}'"), expected, trajectory.len()));
            }
        }
        Ok(Self {
            series,
            units: units.into(),
            trajectories,
        })
    }

    /// Rebuild a point group from the wide table produced by [`to_table`].
    ///
    /// Every `{name}_x` column with `{name}_y` and `{name}_z` siblings becomes
    /// a marker; `{name}_residual` is optional and defaults to zeros. Other
    /// columns (such as `time`) are ignored.
    ///
    /// [`to_table`]: Self::to_table
    pub fn from_table(
        series: SampledSeries,
        units: impl Into<String>,
        table: &Table,
    ) -> Result<Self> {
        let mut trajectories = BTreeMap::new();
        for name in table.column_names() {
            let Some(marker) = name.strip_suffix("_x") else {
                continue;
            };
            let (Some(y), Some(z)) = (
                table.column(&format!("{marker}_y")),
                table.column(&format!("{marker}_z")),
            ) else {
                continue;
            };
            let x = table.column(name).map(|c| c.values().to_vec()).unwrap_or_default();
            let residual = match table.column(&format!("{marker}_residual")) {
                Some(r) => r.values().to_vec(),
                None => vec![Some(0.0); x.len()],
            };
            let trajectory = MarkerTrajectory::from_columns(
                x,
                y.values().to_vec(),
                z.values().to_vec(),
                residual,
                marker,
            )?;
            trajectories.insert(marker.to_string(), trajectory);
        }
        Self::new(series, units, trajectories)
    }

    /// Position unit label (e.g. "mm").
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn trajectories(&self) -> &BTreeMap<String, MarkerTrajectory> {
        &self.trajectories
    }

    pub fn marker_names(&self) -> impl Iterator<Item = &str> {
        self.trajectories.keys().map(String::as_str)
    }

    pub fn contains_marker(&self, name: &str) -> bool {
        self.trajectories.contains_key(name)
    }

    /// Look up a trajectory by name.
    pub fn marker(&self, name: &str) -> Result<&MarkerTrajectory> {
        self.trajectories
            .get(name)
            .ok_or_else(|| Error::MarkerNotFound(name.to_string()))
    }

    /// Whole trajectory of a marker as an N×3 array.
    pub fn marker_coords(&self, name: &str) -> Result<Vec<DVec3>> {
        Ok(self.marker(name)?.coords())
    }

    /// Position of a marker at an absolute frame.
    pub fn marker_coords_at(&self, name: &str, frame: Frame) -> Result<DVec3> {
        let marker = self.marker(name)?;
        let row = self.series.row_index(frame)?;
        marker.coord(row).ok_or(Error::FrameOutOfRange {
            frame,
            first: self.series.first_frame(),
            last: self.series.last_frame(),
        })
    }

    /// Add (or replace) a marker from plain coordinates.
    ///
    /// Only the new trajectory is validated. NaN marks a missing sample;
    /// a missing `residual` defaults to zeros.
    pub fn add_marker(
        &mut self,
        name: impl Into<String>,
        x: &[f64],
        y: &[f64],
        z: &[f64],
        residual: Option<&[f64]>,
        description: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        let n = self.series.total_frames();
        for (axis, len) in [("x", x.len()), ("y", y.len()), ("z", z.len())] {
            if len != n {
                return Err(Error::length(format!("Marker '{name}' {axis} coordinates"), n, len));
            }
        }
        let zeros;
        let residual = match residual {
            Some(r) => r,
            None => {
                zeros = vec![0.0; n];
                &zeros
            }
        };
        if residual.len() != n {
            return Err(Error::length(format!("Marker '{name}' residuals"), n, residual.len()));
        }
        let trajectory = MarkerTrajectory::from_values(x, y, z, residual, description)?;
        tracing::debug!(marker = %name, frames = n, "added marker");
        self.trajectories.insert(name, trajectory);
        Ok(())
    }

    /// Wide table: a `time` column followed by prefixed marker columns.
    pub fn to_table(&self, include_residual: bool) -> Result<Table> {
        if self.trajectories.is_empty() {
            return Ok(Table::new());
        }
        let time = Column::new("time", self.series.times().map(nan_to_none).collect());
        let mut tables = vec![Table::from_columns(vec![time])?];
        tables.extend(
            self.trajectories
                .iter()
                .map(|(name, t)| t.prefixed(name, include_residual)),
        );
        Table::hconcat(tables)
    }

    /// Per-marker rows of `[x, y, z]` or `[x, y, z, residual]`; missing values are NaN.
    pub fn to_dict(&self, include_residual: bool) -> BTreeMap<String, Vec<Vec<f64>>> {
        self.trajectories
            .iter()
            .map(|(name, t)| {
                let residual = t.residual();
                let rows = t
                    .coords()
                    .into_iter()
                    .zip(residual)
                    .map(|(p, r)| {
                        let mut row = p.to_array().to_vec();
                        if include_residual {
                            row.push(r);
                        }
                        row
                    })
                    .collect();
                (name.clone(), rows)
            })
            .collect()
    }
}

impl Sampled for Points {
    fn series(&self) -> &SampledSeries {
        &self.series
    }
}
