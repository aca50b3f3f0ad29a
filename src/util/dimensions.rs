//! Fixed-shape array checks.
//!
//! Dimensions describe the shape of small matrices and vectors that arrive
//! from capture adapters as nested row vectors (calibration matrices, plate
//! corners, origins).

use smallvec::SmallVec;
use std::fmt;

use super::{Error, Result};

/// Dimensions of a small multi-dimensional array.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Size of each dimension. Empty means scalar (rank 0).
    dims: SmallVec<[usize; 4]>,
}

impl Dimensions {
    /// Create 1D dimensions.
    pub fn d1(size: usize) -> Self {
        Self { dims: smallvec::smallvec![size] }
    }

    /// Create 2D dimensions.
    pub fn d2(rows: usize, cols: usize) -> Self {
        Self { dims: smallvec::smallvec![rows, cols] }
    }

    /// Shape of a row-major nested vector.
    ///
    /// Ragged input reports the length of the first row that differs from
    /// row 0, so the error message points at the offending row width.
    pub fn of_rows(rows: &[Vec<f64>]) -> Self {
        let Some(first) = rows.first() else {
            return Self::d2(0, 0);
        };
        let cols = rows
            .iter()
            .map(Vec::len)
            .find(|&len| len != first.len())
            .unwrap_or(first.len());
        Self::d2(rows.len(), cols)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", parts.join("x"))
    }
}

/// Check that `rows` is exactly `R x C` and copy it into a fixed array.
pub fn fixed_matrix<const R: usize, const C: usize>(
    what: &str,
    rows: &[Vec<f64>],
) -> Result<[[f64; C]; R]> {
    let ragged = rows.iter().any(|r| r.len() != C);
    if rows.len() != R || ragged {
        return Err(Error::DimensionMismatch {
            what: what.to_string(),
            expected: Dimensions::d2(R, C),
            actual: Dimensions::of_rows(rows),
        });
    }
    let mut out = [[0.0; C]; R];
    for (dst, src) in out.iter_mut().zip(rows) {
        dst.copy_from_slice(src);
    }
    Ok(out)
}

/// Check that `values` has exactly `N` entries and copy it into a fixed array.
pub fn fixed_vector<const N: usize>(what: &str, values: &[f64]) -> Result<[f64; N]> {
    <[f64; N]>::try_from(values).map_err(|_| Error::DimensionMismatch {
        what: what.to_string(),
        expected: Dimensions::d1(N),
        actual: Dimensions::d1(values.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::d2(3, 4).to_string(), "3x4");
        assert_eq!(Dimensions::d1(3).to_string(), "3");
    }

    #[test]
    fn test_of_rows_ragged() {
        let rows = vec![vec![0.0; 4], vec![0.0; 4], vec![0.0; 2]];
        assert_eq!(Dimensions::of_rows(&rows), Dimensions::d2(3, 2));
    }

    #[test]
    fn test_fixed_matrix() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let m: [[f64; 2]; 2] = fixed_matrix("m", &rows).unwrap();
        assert_eq!(m[1][0], 3.0);

        let err = fixed_matrix::<6, 6>("Calibration matrix", &vec![vec![0.0; 6]; 5]).unwrap_err();
        assert!(err.to_string().contains("6x6"));
        assert!(err.to_string().contains("5x6"));
    }

    #[test]
    fn test_fixed_vector() {
        assert_eq!(fixed_vector::<3>("origin", &[1.0, 2.0, 3.0]).unwrap(), [1.0, 2.0, 3.0]);
        assert!(fixed_vector::<3>("origin", &[1.0, 2.0]).is_err());
    }
}
