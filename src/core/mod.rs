//! Core layer - time bases, tables, events and shared enums.
//!
//! This module provides:
//! - [`SampledSeries`] / [`Sampled`] - Frame range + rate of a time base
//! - [`Table`] / [`Column`] - Flat numeric tables exchanged with adapters
//! - [`Event`] - Frame- or time-anchored trial events
//! - [`ImportMethod`] / [`OutputKind`] - Import provenance and link vocabulary
//! - [`LinkedFiles`] - Ordered key → path store

mod series;
mod table;
mod event;
mod enums;
mod linked_files;

pub use series::{SampledSeries, Sampled};
pub use table::{Column, Table};
pub use event::{Event, EventTiming};
pub(crate) use event::{cmp_keys, EventRepr};
pub(crate) use series::SeriesRepr;
pub(crate) use table::TableRepr;
pub use enums::{ImportMethod, OutputKind};
pub use linked_files::LinkedFiles;
