//! Sampled data groups of a trial.
//!
//! - [`Points`] / [`MarkerTrajectory`] - 3D marker positions with residuals
//! - [`Analogs`] / [`AnalogChannel`] - Raw scalar sensor channels
//! - [`ForcePlatform`] - Plate geometry plus force/moment/COP table

mod marker;
mod points;
mod analogs;
mod force_platform;

pub use marker::{MarkerTrajectory, MARKER_COLUMNS};
pub use points::Points;
pub use analogs::{AnalogChannel, Analogs};
pub use force_platform::{
    CalMatrix, Corners, ForcePlatform, ForcePlatformBuilder, FORCE_PLATFORM_COLUMNS,
};
pub(crate) use analogs::AnalogsRepr;
pub(crate) use force_platform::ForcePlatformRepr;
pub(crate) use points::PointsRepr;
