//! Math type re-exports and scalar aliases used across the data model.

// Re-export glam types
pub use glam::DVec3;

/// Chrono type - time value (seconds).
pub type Chrono = f64;

/// Absolute frame number within a capture.
pub type Frame = i64;

/// Build a vector from optional components; any missing component is NaN.
#[inline]
pub fn vec3_or_nan(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> DVec3 {
    DVec3::new(
        x.unwrap_or(f64::NAN),
        y.unwrap_or(f64::NAN),
        z.unwrap_or(f64::NAN),
    )
}

/// Treat NaN as a missing sample.
#[inline]
pub fn nan_to_none(v: f64) -> Option<f64> {
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_or_nan() {
        let v = vec3_or_nan(Some(1.0), None, Some(3.0));
        assert_eq!(v.x, 1.0);
        assert!(v.y.is_nan());
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_nan_to_none() {
        assert_eq!(nan_to_none(2.5), Some(2.5));
        assert_eq!(nan_to_none(f64::NAN), None);
    }
}
