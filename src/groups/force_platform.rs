//! Force platform record: calibration geometry plus per-frame wrench data.

use serde::{Deserialize, Serialize};

use crate::core::{Column, Table, TableRepr};
use crate::util::{fixed_matrix, fixed_vector, vec3_or_nan, DVec3, Error, Result};

/// Columns every force platform table must carry.
pub const FORCE_PLATFORM_COLUMNS: [&str; 12] = [
    "force_x",
    "force_y",
    "force_z",
    "moment_x",
    "moment_y",
    "moment_z",
    "center_of_pressure_x",
    "center_of_pressure_y",
    "center_of_pressure_z",
    "free_moment_x",
    "free_moment_y",
    "free_moment_z",
];

/// 6x6 calibration matrix, row major.
pub type CalMatrix = [[f64; 6]; 6];

/// Four plate corners, one column per corner.
pub type Corners = [[f64; 4]; 3];

/// One force platform. Moments and centre of pressure are in global axes.
///
/// Built through [`ForcePlatform::builder`]; every shape is checked before
/// the record exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForcePlatformRepr", into = "ForcePlatformRepr")]
pub struct ForcePlatform {
    unit_force: String,
    unit_moment: String,
    unit_position: String,
    cal_matrix: CalMatrix,
    corners: Corners,
    origin: DVec3,
    data: Table,
}

/// Loose serialized form; shapes are validated on the way in.
#[derive(Serialize, Deserialize)]
pub(crate) struct ForcePlatformRepr {
    unit_force: String,
    unit_moment: String,
    unit_position: String,
    cal_matrix: Vec<Vec<f64>>,
    corners: Vec<Vec<f64>>,
    origin: Vec<f64>,
    data: TableRepr,
}

impl TryFrom<ForcePlatformRepr> for ForcePlatform {
    type Error = Error;

    fn try_from(r: ForcePlatformRepr) -> Result<Self> {
        ForcePlatform::builder()
            .unit_force(r.unit_force)
            .unit_moment(r.unit_moment)
            .unit_position(r.unit_position)
            .cal_matrix(r.cal_matrix)
            .corners(r.corners)
            .origin(r.origin)
            .data(Table::try_from(r.data)?)
            .build()
    }
}

impl From<ForcePlatform> for ForcePlatformRepr {
    fn from(fp: ForcePlatform) -> Self {
        Self {
            unit_force: fp.unit_force,
            unit_moment: fp.unit_moment,
            unit_position: fp.unit_position,
            cal_matrix: fp.cal_matrix.iter().map(|r| r.to_vec()).collect(),
            corners: fp.corners.iter().map(|r| r.to_vec()).collect(),
            origin: fp.origin.to_array().to_vec(),
            data: fp.data.into(),
        }
    }
}

/// Builder for [`ForcePlatform`].
#[derive(Clone, Debug)]
pub struct ForcePlatformBuilder {
    unit_force: String,
    unit_moment: String,
    unit_position: String,
    cal_matrix: Vec<Vec<f64>>,
    corners: Vec<Vec<f64>>,
    origin: Vec<f64>,
    data: Option<Table>,
}

impl Default for ForcePlatformBuilder {
    fn default() -> Self {
        let identity = (0..6)
            .map(|i| (0..6).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Self {
            unit_force: "N".into(),
            unit_moment: "Nm".into(),
            unit_position: "m".into(),
            cal_matrix: identity,
            corners: vec![vec![0.0; 4]; 3],
            origin: vec![0.0; 3],
            data: None,
        }
    }
}

impl ForcePlatformBuilder {
    pub fn unit_force(mut self, unit: impl Into<String>) -> Self {
        self.unit_force = unit.into();
        self
    }

    pub fn unit_moment(mut self, unit: impl Into<String>) -> Self {
        self.unit_moment = unit.into();
        self
    }

    pub fn unit_position(mut self, unit: impl Into<String>) -> Self {
        self.unit_position = unit.into();
        self
    }

    /// Calibration matrix as rows; must be 6x6.
    pub fn cal_matrix(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.cal_matrix = rows;
        self
    }

    /// Corner coordinates as rows; must be 3x4.
    pub fn corners(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.corners = rows;
        self
    }

    /// Plate origin; must have 3 entries.
    pub fn origin(mut self, origin: Vec<f64>) -> Self {
        self.origin = origin;
        self
    }

    /// Per-frame data table holding at least [`FORCE_PLATFORM_COLUMNS`].
    pub fn data(mut self, table: Table) -> Self {
        self.data = Some(table);
        self
    }

    /// Validate every field and build the record.
    pub fn build(self) -> Result<ForcePlatform> {
        let cal_matrix = fixed_matrix::<6, 6>("Calibration matrix", &self.cal_matrix)?;
        let corners = fixed_matrix::<3, 4>("Corners", &self.corners)?;
        let origin = DVec3::from_array(fixed_vector::<3>("Origin", &self.origin)?);
        let data = match self.data {
            Some(table) => table,
            None => empty_data()?,
        };
        data.require_columns("Force platform data", &FORCE_PLATFORM_COLUMNS)?;
        Ok(ForcePlatform {
            unit_force: self.unit_force,
            unit_moment: self.unit_moment,
            unit_position: self.unit_position,
            cal_matrix,
            corners,
            origin,
            data,
        })
    }
}

fn empty_data() -> Result<Table> {
    Table::from_columns(
        FORCE_PLATFORM_COLUMNS
            .iter()
            .map(|name| Column::new(*name, Vec::new()))
            .collect(),
    )
}

impl ForcePlatform {
    pub fn builder() -> ForcePlatformBuilder {
        ForcePlatformBuilder::default()
    }

    pub fn unit_force(&self) -> &str {
        &self.unit_force
    }

    pub fn unit_moment(&self) -> &str {
        &self.unit_moment
    }

    pub fn unit_position(&self) -> &str {
        &self.unit_position
    }

    pub fn cal_matrix(&self) -> &CalMatrix {
        &self.cal_matrix
    }

    pub fn corners(&self) -> &Corners {
        &self.corners
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Number of data rows.
    pub fn num_frames(&self) -> usize {
        self.data.height()
    }

    /// Ground reaction force, N x 3.
    pub fn force(&self) -> Vec<DVec3> {
        self.project("force")
    }

    /// Moment about the global origin, N x 3.
    pub fn moment(&self) -> Vec<DVec3> {
        self.project("moment")
    }

    /// Centre of pressure, N x 3.
    pub fn center_of_pressure(&self) -> Vec<DVec3> {
        self.project("center_of_pressure")
    }

    /// Free moment, N x 3.
    pub fn free_moment(&self) -> Vec<DVec3> {
        self.project("free_moment")
    }

    fn project(&self, quantity: &str) -> Vec<DVec3> {
        let axis = |a: &str| {
            self.data
                .column(&format!("{quantity}_{a}"))
                .map(Column::values)
                .unwrap_or_default()
        };
        let (x, y, z) = (axis("x"), axis("y"), axis("z"));
        (0..self.num_frames())
            .map(|i| {
                vec3_or_nan(
                    x.get(i).copied().flatten(),
                    y.get(i).copied().flatten(),
                    z.get(i).copied().flatten(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    fn data(rows: usize) -> Table {
        Table::from_columns(
            FORCE_PLATFORM_COLUMNS
                .iter()
                .enumerate()
                .map(|(i, name)| Column::from_f64(*name, &vec![i as f64; rows]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let fp = ForcePlatform::builder().build().unwrap();
        assert_eq!(fp.unit_force(), "N");
        assert_eq!(fp.unit_moment(), "Nm");
        assert_eq!(fp.unit_position(), "m");
        assert_eq!(fp.cal_matrix()[3][3], 1.0);
        assert_eq!(fp.cal_matrix()[3][2], 0.0);
        assert_eq!(fp.num_frames(), 0);
        assert!(fp.force().is_empty());
    }

    #[test]
    fn test_bad_cal_matrix() {
        let err = ForcePlatform::builder()
            .cal_matrix(vec![vec![0.0; 6]; 5])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("6x6"));
    }

    #[test]
    fn test_bad_corners_and_origin() {
        let err = ForcePlatform::builder()
            .corners(vec![vec![0.0; 3]; 4])
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);

        let err = ForcePlatform::builder().origin(vec![0.0; 2]).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_missing_columns() {
        let table = Table::from_columns(vec![Column::from_f64("force_x", &[1.0])]).unwrap();
        let err = ForcePlatform::builder().data(table).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
        assert!(err.to_string().contains("free_moment_z"));
    }

    #[test]
    fn test_projections() {
        let fp = ForcePlatform::builder().data(data(2)).build().unwrap();
        assert_eq!(fp.num_frames(), 2);
        assert_eq!(fp.force()[1], DVec3::new(0.0, 1.0, 2.0));
        assert_eq!(fp.moment()[0], DVec3::new(3.0, 4.0, 5.0));
        assert_eq!(fp.center_of_pressure()[0], DVec3::new(6.0, 7.0, 8.0));
        assert_eq!(fp.free_moment()[0], DVec3::new(9.0, 10.0, 11.0));
    }

    #[test]
    fn test_serde_revalidates() {
        let fp = ForcePlatform::builder().data(data(1)).build().unwrap();
        let mut json = serde_json::to_value(&fp).unwrap();
        let back: ForcePlatform = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, fp);

        json["cal_matrix"] = serde_json::json!([[1.0, 0.0], [0.0, 1.0]]);
        assert!(serde_json::from_value::<ForcePlatform>(json).is_err());
    }
}
