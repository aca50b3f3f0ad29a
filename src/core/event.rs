//! Discrete trial events (foot strikes, foot offs, ...).
//!
//! An event is anchored either at a frame or at a time, never both. The
//! other representation is derived on demand from a reference rate.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::util::{Chrono, Error, Frame, Result};

/// Where an event sits on the capture clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventTiming {
    /// Anchored at a frame number.
    Frame(Frame),
    /// Anchored at a time in seconds.
    Time(Chrono),
}

/// A labelled, context-tagged occurrence, e.g. "Foot Strike" on "Left".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRepr", into = "EventRepr")]
pub struct Event {
    label: String,
    context: String,
    timing: EventTiming,
    description: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct EventRepr {
    label: String,
    context: String,
    #[serde(default)]
    frame: Option<Frame>,
    #[serde(default)]
    time: Option<Chrono>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<EventRepr> for Event {
    type Error = Error;

    fn try_from(r: EventRepr) -> Result<Self> {
        Event::new(r.label, r.context, r.frame, r.time, r.description)
    }
}

impl From<Event> for EventRepr {
    fn from(e: Event) -> Self {
        EventRepr {
            frame: e.frame(),
            time: e.time(),
            label: e.label,
            context: e.context,
            description: e.description,
        }
    }
}

#[inline]
fn usable_rate(rate: Option<Chrono>) -> Option<Chrono> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
}

impl Event {
    /// Create an event from optional frame and time.
    ///
    /// Exactly one of `frame` / `time` must be given.
    pub fn new(
        label: impl Into<String>,
        context: impl Into<String>,
        frame: Option<Frame>,
        time: Option<Chrono>,
        description: Option<String>,
    ) -> Result<Self> {
        let timing = match (frame, time) {
            (Some(f), None) => EventTiming::Frame(f),
            (None, Some(t)) => EventTiming::Time(t),
            (None, None) => {
                return Err(Error::invariant("Either frame or time must be provided"));
            }
            (Some(_), Some(_)) => {
                return Err(Error::invariant("Only one of frame or time should be provided"));
            }
        };
        Ok(Self {
            label: label.into(),
            context: context.into(),
            timing,
            description,
        })
    }

    /// Event anchored at a frame.
    pub fn at_frame(label: impl Into<String>, context: impl Into<String>, frame: Frame) -> Self {
        Self {
            label: label.into(),
            context: context.into(),
            timing: EventTiming::Frame(frame),
            description: None,
        }
    }

    /// Event anchored at a time in seconds.
    pub fn at_time(label: impl Into<String>, context: impl Into<String>, time: Chrono) -> Self {
        Self {
            label: label.into(),
            context: context.into(),
            timing: EventTiming::Time(time),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn timing(&self) -> EventTiming {
        self.timing
    }

    /// Native frame, if the event is frame-anchored.
    pub fn frame(&self) -> Option<Frame> {
        match self.timing {
            EventTiming::Frame(f) => Some(f),
            EventTiming::Time(_) => None,
        }
    }

    /// Native time, if the event is time-anchored.
    pub fn time(&self) -> Option<Chrono> {
        match self.timing {
            EventTiming::Time(t) => Some(t),
            EventTiming::Frame(_) => None,
        }
    }

    /// Check label and context together.
    pub fn matches(&self, label: &str, context: &str) -> bool {
        self.label == label && self.context == context
    }

    /// Frame of the event; time-anchored events truncate `time * rate`.
    pub fn get_frame(&self, rate: Option<Chrono>) -> Result<Frame> {
        match (self.timing, usable_rate(rate)) {
            (EventTiming::Frame(f), _) => Ok(f),
            (EventTiming::Time(t), Some(rate)) => Ok((t * rate) as Frame),
            (EventTiming::Time(_), None) => Err(Error::Compute(format!(
                "frame of event '{}' without a usable point rate (got {rate:?})",
                self.label
            ))),
        }
    }

    /// Time of the event; frame-anchored events compute `frame / rate`.
    pub fn get_time(&self, rate: Option<Chrono>) -> Result<Chrono> {
        match (self.timing, usable_rate(rate)) {
            (EventTiming::Time(t), _) => Ok(t),
            (EventTiming::Frame(f), Some(rate)) => Ok(f as Chrono / rate),
            (EventTiming::Frame(_), None) => Err(Error::Compute(format!(
                "time of event '{}' without a usable point rate (got {rate:?})",
                self.label
            ))),
        }
    }

    /// Resolved `(frame, time)` ordering key against a reference rate.
    pub(crate) fn sort_key(&self, rate: Chrono) -> Result<(Frame, Chrono)> {
        Ok((self.get_frame(Some(rate))?, self.get_time(Some(rate))?))
    }
}

/// Total order on resolved `(frame, time)` keys.
pub(crate) fn cmp_keys(a: &(Frame, Chrono), b: &(Frame, Chrono)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ErrorKind;

    #[test]
    fn test_exactly_one_anchor() {
        let e = Event::new("Foot Strike", "Left", Some(100), None, None).unwrap();
        assert_eq!(e.frame(), Some(100));
        assert_eq!(e.time(), None);

        let e = Event::new("Foot Off", "Left", None, Some(1.25), None).unwrap();
        assert_eq!(e.frame(), None);
        assert_eq!(e.time(), Some(1.25));

        let both = Event::new("Foot Off", "Left", Some(1), Some(1.0), None).unwrap_err();
        assert_eq!(both.kind(), ErrorKind::Invariant);
        let neither = Event::new("Foot Off", "Left", None, None, None).unwrap_err();
        assert_eq!(neither.kind(), ErrorKind::Invariant);
    }

    #[test]
    fn test_conversions() {
        let e = Event::at_time("Foot Strike", "Right", 0.237);
        assert_eq!(e.get_frame(Some(100.0)).unwrap(), 23);
        assert_eq!(e.get_time(None).unwrap(), 0.237);

        let e = Event::at_frame("Foot Strike", "Right", 50);
        assert_eq!(e.get_time(Some(100.0)).unwrap(), 0.5);
        assert_eq!(e.get_frame(None).unwrap(), 50);
    }

    #[test]
    fn test_conversion_without_rate() {
        let e = Event::at_time("Foot Strike", "Right", 0.5);
        assert_eq!(e.get_frame(None).unwrap_err().kind(), ErrorKind::Compute);
        assert_eq!(e.get_frame(Some(0.0)).unwrap_err().kind(), ErrorKind::Compute);
        let e = Event::at_frame("Foot Strike", "Right", 5);
        assert_eq!(e.get_time(Some(-1.0)).unwrap_err().kind(), ErrorKind::Compute);
    }

    #[test]
    fn test_time_round_trip_within_one_sample() {
        for rate in [50.0, 100.0, 120.0, 1000.0, 33.3] {
            for time in [0.0, 0.013, 0.5, 1.337, 12.9] {
                let e = Event::at_time("E", "General", time);
                let frame = e.get_frame(Some(rate)).unwrap();
                let back = Event::at_frame("E", "General", frame).get_time(Some(rate)).unwrap();
                assert!((back - time).abs() <= 1.0 / rate + 1e-12, "rate {rate} time {time}");
            }
        }
    }

    #[test]
    fn test_serde_repr() {
        let e = Event::at_frame("Foot Off", "Left", 42).with_description("toe off");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["frame"], 42);
        assert!(json["time"].is_null());
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);

        let bad =
            serde_json::from_str::<Event>(r#"{"label":"a","context":"b","frame":1,"time":0.1}"#);
        assert!(bad.is_err());
    }
}
