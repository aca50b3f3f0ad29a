//! # movedb
//!
//! In-memory data model for biomechanical capture trials.
//!
//! A trial bundles marker trajectories, analog channels, force platform
//! records and gait events, each on its own time base. Construction
//! validates every entity, orders the event stream and caches a marker
//! gap analysis; queries then extract gait phases, full-data frames and
//! spatiotemporal parameters.
//!
//! Reading capture files and writing musculoskeletal tool inputs are left to
//! adapters, which hand the core a [`trial::TrialRecord`] through
//! [`trial::CaptureSource`] and record their outputs with
//! [`trial::Trial::link_file`].
//!
//! ## Modules
//!
//! - [`util`] - Errors, scalar aliases, shape checks, unit conversion
//! - [`core`] - Time bases, numeric tables, events and enums
//! - [`groups`] - Points, analogs and force platforms
//! - [`trial`] - Trial aggregate, gaps, gait phases, STPs, persistence
//! - [`settings`] - Gait label vocabulary and marker naming
//! - [`logging`] - Tracing subscriber setup
//!
//! ## Example
//!
//! ```ignore
//! use movedb::prelude::*;
//!
//! let trial = Trial::from_record(record)?;
//! let gaps = trial.check_point_gaps(None, None);
//! let frames = trial.find_full_frames(Some(&["LTOE", "RTOE"]));
//! let cycles = trial.stance_swing_phases_with("Left", &Settings::load());
//! ```

pub mod util;
pub mod core;
pub mod groups;
pub mod trial;
pub mod settings;
pub mod logging;

// Re-export commonly used types
pub use util::{Error, ErrorKind, Result};
pub use trial::Trial;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Chrono, DVec3, Error, ErrorKind, Frame, Result};
    pub use crate::core::{
        Event, EventTiming, ImportMethod, OutputKind, Sampled, SampledSeries, Table,
    };
    pub use crate::groups::{AnalogChannel, Analogs, ForcePlatform, MarkerTrajectory, Points};
    pub use crate::trial::{CaptureSource, GaitCycle, GaitPhase, GapMap, Region, Trial, TrialRecord};
    pub use crate::settings::Settings;
}
