//! Marker gap analysis over frame regions.

use std::collections::BTreeMap;

use crate::core::{Sampled, SampledSeries};
use crate::groups::Points;
use crate::util::{Chrono, Frame};

/// Per-marker list of inclusive `(start, end)` frame regions containing a gap.
pub type GapMap = BTreeMap<String, Vec<(Frame, Frame)>>;

/// Inclusive region of a trial to scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    /// Absolute frame numbers.
    Frames(Frame, Frame),
    /// Seconds elapsed from the first frame.
    Times(Chrono, Chrono),
}

impl Region {
    /// Resolve to absolute frames; times truncate toward zero.
    pub fn to_frames(&self, series: &SampledSeries) -> (Frame, Frame) {
        match *self {
            Region::Frames(start, end) => (start, end),
            Region::Times(start, end) => {
                (series.frame_from_time(start), series.frame_from_time(end))
            }
        }
    }
}

impl From<(Frame, Frame)> for Region {
    fn from((start, end): (Frame, Frame)) -> Self {
        Region::Frames(start, end)
    }
}

impl From<(Chrono, Chrono)> for Region {
    fn from((start, end): (Chrono, Chrono)) -> Self {
        Region::Times(start, end)
    }
}

/// Row range of `[start, end]` clamped to the series.
fn clamp_rows(series: &SampledSeries, start: Frame, end: Frame) -> std::ops::Range<usize> {
    let total = series.total_frames() as Frame;
    let first = series.first_frame();
    let lo = start.saturating_sub(first).clamp(0, total);
    let hi = end.saturating_sub(first).saturating_add(1).clamp(lo, total);
    lo as usize..hi as usize
}

/// Scan `markers` (all when `None`) over `regions` (whole trial when `None`).
///
/// A region is recorded whole for a marker as soon as one of x/y/z is
/// missing anywhere inside it. An unknown marker is recorded for every region.
pub fn scan_gaps(points: &Points, markers: Option<&[&str]>, regions: Option<&[Region]>) -> GapMap {
    let series = points.series();
    let all_markers: Vec<&str>;
    let markers: &[&str] = match markers {
        Some(m) => m,
        None => {
            all_markers = points.marker_names().collect();
            &all_markers
        }
    };
    let whole = [Region::Frames(series.first_frame(), series.last_frame())];
    let regions = regions.unwrap_or(&whole);

    let mut gaps = GapMap::new();
    for region in regions {
        let (start, end) = region.to_frames(series);
        let rows = clamp_rows(series, start, end);
        for &name in markers {
            let missing = match points.trajectories().get(name) {
                Some(trajectory) => trajectory.has_gap_in(rows.clone()),
                None => true,
            };
            if missing {
                gaps.entry(name.to_string()).or_default().push((start, end));
            }
        }
    }
    gaps
}

/// Absolute frames where every marker in `markers` (all when `None`) has x, y and z.
///
/// Returns an empty list as soon as a requested marker does not exist.
pub fn full_frames(points: &Points, markers: Option<&[&str]>) -> Vec<Frame> {
    let mut full = vec![true; points.total_frames()];
    let names: Vec<&str> = match markers {
        Some(m) => m.to_vec(),
        None => points.marker_names().collect(),
    };
    for name in names {
        let Some(trajectory) = points.trajectories().get(name) else {
            return Vec::new();
        };
        for (row, keep) in full.iter_mut().enumerate() {
            *keep = *keep && trajectory.is_full_at(row);
        }
    }
    let first = points.first_frame();
    full.iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(row, _)| first + row as Frame)
        .collect()
}
