//! Unit label conversion.
//!
//! Capture files label positions, forces and moments with short unit
//! strings. Only the labels seen in gait laboratories are understood.

use super::{Error, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dimension {
    Length,
    Force,
    Moment,
}

fn lookup(label: &str) -> Option<(Dimension, f64)> {
    let entry = match label.trim() {
        "mm" => (Dimension::Length, 1e-3),
        "cm" => (Dimension::Length, 1e-2),
        "m" => (Dimension::Length, 1.0),
        "N" => (Dimension::Force, 1.0),
        "kN" => (Dimension::Force, 1e3),
        "Nmm" | "N.mm" => (Dimension::Moment, 1e-3),
        "Nm" | "N.m" => (Dimension::Moment, 1.0),
        "kNm" => (Dimension::Moment, 1e3),
        _ => return None,
    };
    Some(entry)
}

/// Multiplicative factor converting values labelled `from` into `to`.
///
/// Identical labels always convert with factor 1.0, even when unknown.
pub fn conversion_factor(from: &str, to: &str) -> Result<f64> {
    if from == to {
        return Ok(1.0);
    }
    let err = || Error::UnknownUnit {
        from: from.to_string(),
        to: to.to_string(),
    };
    let (from_dim, from_scale) = lookup(from).ok_or_else(err)?;
    let (to_dim, to_scale) = lookup(to).ok_or_else(err)?;
    if from_dim != to_dim {
        return Err(err());
    }
    Ok(from_scale / to_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_factors() {
        assert!((conversion_factor("mm", "m").unwrap() - 1e-3).abs() < 1e-15);
        assert!((conversion_factor("m", "mm").unwrap() - 1e3).abs() < 1e-9);
        assert!((conversion_factor("cm", "mm").unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity_and_unknown() {
        assert_eq!(conversion_factor("furlong", "furlong").unwrap(), 1.0);
        assert!(conversion_factor("furlong", "m").is_err());
        assert!(conversion_factor("N", "m").is_err());
    }

    #[test]
    fn test_moment_factors() {
        assert!((conversion_factor("Nmm", "Nm").unwrap() - 1e-3).abs() < 1e-15);
        assert!((conversion_factor("kN", "N").unwrap() - 1e3).abs() < 1e-9);
    }
}
