//! Sampled series: a frame range plus a sampling rate.
//!
//! Every time base in a trial (points, analogs) is a [`SampledSeries`].
//! Frames are absolute capture frame numbers; elapsed time is measured from
//! `first_frame`, so the first frame is always at time 0.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::util::{Chrono, Error, Frame, Result};

/// Frame range and sampling rate of one time base.
///
/// Immutable after construction; both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesRepr")]
pub struct SampledSeries {
    first_frame: Frame,
    last_frame: Frame,
    rate: Chrono,
}

/// Unchecked serialized form.
#[derive(Deserialize)]
pub(crate) struct SeriesRepr {
    first_frame: Frame,
    last_frame: Frame,
    rate: Chrono,
}

impl TryFrom<SeriesRepr> for SampledSeries {
    type Error = Error;

    fn try_from(raw: SeriesRepr) -> Result<Self> {
        Self::new(raw.first_frame, raw.last_frame, raw.rate)
    }
}

impl SampledSeries {
    /// Create a series, validating the frame range and rate.
    pub fn new(first_frame: Frame, last_frame: Frame, rate: Chrono) -> Result<Self> {
        if first_frame < 0 {
            return Err(Error::invariant(format!(
                "first_frame must be non-negative, got {first_frame}"
            )));
        }
        if first_frame >= last_frame {
            return Err(Error::invariant(format!(
                "first_frame ({first_frame}) must be less than last_frame ({last_frame})"
            )));
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::invariant(format!("rate must be positive, got {rate}")));
        }
        Ok(Self {
            first_frame,
            last_frame,
            rate,
        })
    }

    #[inline]
    pub fn first_frame(&self) -> Frame {
        self.first_frame
    }

    #[inline]
    pub fn last_frame(&self) -> Frame {
        self.last_frame
    }

    /// Sampling rate in Hz.
    #[inline]
    pub fn rate(&self) -> Chrono {
        self.rate
    }

    /// Number of frames in the inclusive range.
    #[inline]
    pub fn total_frames(&self) -> usize {
        (self.last_frame - self.first_frame + 1) as usize
    }

    /// Iterate every frame number in range.
    pub fn frames(&self) -> RangeInclusive<Frame> {
        self.first_frame..=self.last_frame
    }

    /// Check whether a frame lies inside the series.
    #[inline]
    pub fn contains(&self, frame: Frame) -> bool {
        (self.first_frame..=self.last_frame).contains(&frame)
    }

    /// Row index of an absolute frame in tables owned by this series.
    pub fn row_index(&self, frame: Frame) -> Result<usize> {
        if !self.contains(frame) {
            return Err(Error::FrameOutOfRange {
                frame,
                first: self.first_frame,
                last: self.last_frame,
            });
        }
        Ok((frame - self.first_frame) as usize)
    }

    /// Elapsed time of a frame, measured from `first_frame`.
    pub fn time_from_frame(&self, frame: Frame) -> Result<Chrono> {
        let row = self.row_index(frame)?;
        Ok(row as Chrono / self.rate)
    }

    /// Frame at an elapsed time, truncating toward zero.
    ///
    /// The result is not clamped to the series bounds. Infinite times
    /// saturate at the ends of the frame range.
    pub fn frame_from_time(&self, time: Chrono) -> Frame {
        self.first_frame.saturating_add((time * self.rate) as Frame)
    }

    /// Elapsed time of every frame, in order.
    pub fn times(&self) -> impl ExactSizeIterator<Item = Chrono> + '_ {
        (0..self.total_frames()).map(move |i| i as Chrono / self.rate)
    }

    /// Full time vector; length is always [`total_frames`](Self::total_frames).
    pub fn time(&self) -> Vec<Chrono> {
        self.times().collect()
    }
}

/// Anything that owns a [`SampledSeries`] and exposes its time base.
pub trait Sampled {
    /// The underlying time base.
    fn series(&self) -> &SampledSeries;

    fn first_frame(&self) -> Frame {
        self.series().first_frame()
    }

    fn last_frame(&self) -> Frame {
        self.series().last_frame()
    }

    fn rate(&self) -> Chrono {
        self.series().rate()
    }

    fn total_frames(&self) -> usize {
        self.series().total_frames()
    }

    fn time_from_frame(&self, frame: Frame) -> Result<Chrono> {
        self.series().time_from_frame(frame)
    }

    fn time(&self) -> Vec<Chrono> {
        self.series().time()
    }
}

impl Sampled for SampledSeries {
    fn series(&self) -> &SampledSeries {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    #[test]
    fn test_total_frames_and_origin() {
        for (first, last, rate) in [(0, 2, 100.0), (10, 250, 120.0), (1, 2, 0.5)] {
            let s = SampledSeries::new(first, last, rate).unwrap();
            assert_eq!(s.total_frames() as i64, last - first + 1);
            assert_eq!(s.time_from_frame(first).unwrap(), 0.0);
            assert_eq!(s.time().len(), s.total_frames());
        }
    }

    #[test]
    fn test_invalid_series() {
        let cases = [
            (5, 5, 100.0),
            (6, 5, 100.0),
            (-1, 5, 100.0),
            (0, 5, 0.0),
            (0, 5, f64::NAN),
        ];
        for (first, last, rate) in cases {
            let err = SampledSeries::new(first, last, rate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Invariant);
        }
    }

    #[test]
    fn test_time_from_frame_bounds() {
        let s = SampledSeries::new(10, 20, 100.0).unwrap();
        assert!((s.time_from_frame(15).unwrap() - 0.05).abs() < 1e-12);
        assert_eq!(s.time_from_frame(9).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(s.time_from_frame(21).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_time_vector() {
        let s = SampledSeries::new(0, 4, 2.0).unwrap();
        assert_eq!(s.time(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_frame_from_time() {
        let s = SampledSeries::new(0, 100, 100.0).unwrap();
        assert_eq!(s.frame_from_time(0.05), 5);
        assert_eq!(s.frame_from_time(0.0), 0);
        let offset = SampledSeries::new(10, 100, 100.0).unwrap();
        assert_eq!(offset.frame_from_time(0.1), 20);
        assert_eq!(offset.frame_from_time(f64::INFINITY), Frame::MAX);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SampledSeries =
            serde_json::from_str(r#"{"first_frame":0,"last_frame":9,"rate":100.0}"#).unwrap();
        assert_eq!(ok.total_frames(), 10);
        let bad = serde_json::from_str::<SampledSeries>(
            r#"{"first_frame":9,"last_frame":0,"rate":100.0}"#,
        );
        assert!(bad.is_err());
    }
}
