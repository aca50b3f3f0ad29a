//! Gait phase extraction from an ordered event stream.
//!
//! Each extractor is a small state machine run over the events of one
//! context (side). Events of other contexts never change its state.
//! Incomplete trailing phases are dropped.

use crate::core::Event;
use crate::util::{Chrono, Result};

/// Interval bounded by two events of the same side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaitPhase<'a> {
    pub start: &'a Event,
    pub end: &'a Event,
}

impl GaitPhase<'_> {
    /// Elapsed seconds from `start` to `end` at the given rate.
    pub fn duration(&self, rate: Chrono) -> Result<Chrono> {
        Ok(self.end.get_time(Some(rate))? - self.start.get_time(Some(rate))?)
    }
}

/// One full gait cycle: stance followed by swing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaitCycle<'a> {
    pub foot_strike: &'a Event,
    pub foot_off: &'a Event,
    pub next_foot_strike: &'a Event,
}

impl<'a> GaitCycle<'a> {
    pub fn stance(&self) -> GaitPhase<'a> {
        GaitPhase {
            start: self.foot_strike,
            end: self.foot_off,
        }
    }

    pub fn swing(&self) -> GaitPhase<'a> {
        GaitPhase {
            start: self.foot_off,
            end: self.next_foot_strike,
        }
    }

    /// Foot strike to next foot strike.
    pub fn stride(&self) -> GaitPhase<'a> {
        GaitPhase {
            start: self.foot_strike,
            end: self.next_foot_strike,
        }
    }
}

/// Foot strike followed by the next foot off.
///
/// A later foot strike replaces a pending one; a foot off with nothing
/// pending is ignored.
pub fn stance_phases<'a>(
    events: &'a [Event],
    side: &str,
    foot_strike_label: &str,
    foot_off_label: &str,
) -> Vec<GaitPhase<'a>> {
    pair_phases(events, side, foot_strike_label, foot_off_label)
}

/// Foot off followed by the next foot strike.
pub fn swing_phases<'a>(
    events: &'a [Event],
    side: &str,
    foot_off_label: &str,
    foot_strike_label: &str,
) -> Vec<GaitPhase<'a>> {
    pair_phases(events, side, foot_off_label, foot_strike_label)
}

fn pair_phases<'a>(
    events: &'a [Event],
    side: &str,
    open: &str,
    close: &str,
) -> Vec<GaitPhase<'a>> {
    let mut phases = Vec::new();
    let mut pending: Option<&'a Event> = None;
    for event in events {
        if event.matches(open, side) {
            pending = Some(event);
        } else if event.matches(close, side) {
            if let Some(start) = pending.take() {
                phases.push(GaitPhase { start, end: event });
            }
        }
    }
    phases
}

#[derive(Clone, Copy, Debug)]
enum CycleState<'a> {
    SeekStrike,
    SeekOff {
        strike: &'a Event,
    },
    SeekNextStrike {
        strike: &'a Event,
        off: &'a Event,
    },
}

/// Chained `(foot strike, foot off, next foot strike)` cycles.
///
/// The closing strike of one cycle opens the next, so consecutive cycles
/// share their boundary event.
pub fn stance_swing_phases<'a>(
    events: &'a [Event],
    side: &str,
    foot_strike_label: &str,
    foot_off_label: &str,
) -> Vec<GaitCycle<'a>> {
    let mut cycles = Vec::new();
    let mut state = CycleState::SeekStrike;
    for event in events {
        let is_strike = event.matches(foot_strike_label, side);
        let is_off = event.matches(foot_off_label, side);
        state = match state {
            CycleState::SeekStrike if is_strike => CycleState::SeekOff { strike: event },
            CycleState::SeekOff { strike } if is_off => {
                CycleState::SeekNextStrike { strike, off: event }
            }
            CycleState::SeekNextStrike { strike, .. } if is_off => {
                CycleState::SeekNextStrike { strike, off: event }
            }
            CycleState::SeekNextStrike { strike, off } if is_strike => {
                cycles.push(GaitCycle {
                    foot_strike: strike,
                    foot_off: off,
                    next_foot_strike: event,
                });
                CycleState::SeekOff { strike: event }
            }
            other => other,
        };
    }
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: &str = "Foot Strike";
    const FO: &str = "Foot Off";

    fn ev(label: &str, side: &str, frame: i64) -> Event {
        Event::at_frame(label, side, frame)
    }

    fn frames(phases: &[GaitPhase<'_>]) -> Vec<(i64, i64)> {
        phases
            .iter()
            .map(|p| (p.start.frame().unwrap(), p.end.frame().unwrap()))
            .collect()
    }

    #[test]
    fn test_stance_swing_chain() {
        let events = vec![
            ev(FS, "Left", 10),
            ev(FO, "Left", 20),
            ev(FS, "Left", 30),
            ev(FO, "Left", 40),
            ev(FS, "Left", 50),
        ];
        let cycles = stance_swing_phases(&events, "Left", FS, FO);
        let got: Vec<_> = cycles
            .iter()
            .map(|c| {
                (
                    c.foot_strike.frame().unwrap(),
                    c.foot_off.frame().unwrap(),
                    c.next_foot_strike.frame().unwrap(),
                )
            })
            .collect();
        assert_eq!(got, vec![(10, 20, 30), (30, 40, 50)]);
        assert!(std::ptr::eq(cycles[0].next_foot_strike, cycles[1].foot_strike));
    }

    #[test]
    fn test_stance_swing_ignores_repeats() {
        // Repeated strike while seeking foot off keeps the first; repeated
        // foot off while seeking the next strike keeps the last.
        let events = vec![
            ev(FO, "Left", 5),
            ev(FS, "Left", 10),
            ev(FS, "Left", 12),
            ev(FO, "Left", 20),
            ev(FO, "Left", 22),
            ev(FS, "Right", 25),
            ev(FS, "Left", 30),
        ];
        let cycles = stance_swing_phases(&events, "Left", FS, FO);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].foot_strike.frame(), Some(10));
        assert_eq!(cycles[0].foot_off.frame(), Some(22));
        assert_eq!(cycles[0].next_foot_strike.frame(), Some(30));
    }

    #[test]
    fn test_stance_phases() {
        let events = vec![
            ev(FO, "Left", 1),
            ev(FS, "Left", 10),
            ev(FS, "Left", 12),
            ev(FO, "Right", 15),
            ev(FO, "Left", 20),
            ev(FS, "Left", 30),
        ];
        let phases = stance_phases(&events, "Left", FS, FO);
        assert_eq!(frames(&phases), vec![(12, 20)]);
    }

    #[test]
    fn test_swing_phases() {
        let events = vec![
            ev(FS, "Right", 0),
            ev(FO, "Right", 10),
            ev(FS, "Right", 20),
            ev(FO, "Right", 30),
            ev(FO, "Right", 32),
            ev(FS, "Right", 40),
            ev(FO, "Right", 50),
        ];
        let phases = swing_phases(&events, "Right", FO, FS);
        assert_eq!(frames(&phases), vec![(10, 20), (32, 40)]);
    }

    #[test]
    fn test_phase_durations() {
        let events = vec![ev(FS, "Left", 10), ev(FO, "Left", 70), ev(FS, "Left", 110)];
        let cycle = stance_swing_phases(&events, "Left", FS, FO)[0];
        assert!((cycle.stance().duration(100.0).unwrap() - 0.6).abs() < 1e-12);
        assert!((cycle.swing().duration(100.0).unwrap() - 0.4).abs() < 1e-12);
        assert!((cycle.stride().duration(100.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_events() {
        assert!(stance_swing_phases(&[], "Left", FS, FO).is_empty());
        assert!(stance_phases(&[], "Left", FS, FO).is_empty());
    }
}
