//! Utility types and functions.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - [`Dimensions`] - Fixed-shape checks for matrices and vectors
//! - Math type re-exports from glam and scalar aliases
//! - [`units`] - Unit label conversion

mod error;
mod math;
mod dimensions;
pub mod units;

pub use error::*;
pub use math::*;
pub use dimensions::*;
