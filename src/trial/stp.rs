//! Spatiotemporal gait parameters.
//!
//! Every function returns one series per side listed in [`Settings::sides`].
//! Missing events or markers leave that side's series empty and log a
//! warning; they are never errors.

use std::collections::BTreeMap;

use super::Trial;
use crate::core::Sampled;
use crate::settings::Settings;
use crate::util::{units, Chrono};

/// Per-side values, keyed by side name.
pub type SideSeries = BTreeMap<String, Vec<f64>>;

fn empty_sides(settings: &Settings) -> SideSeries {
    settings.sides.iter().map(|s| (s.clone(), Vec::new())).collect()
}

/// Time between successive foot strikes, in seconds.
pub fn stride_times(trial: &Trial, settings: &Settings) -> SideSeries {
    let rate = trial.points().rate();
    let mut out = empty_sides(settings);
    for side in &settings.sides {
        let strikes = trial.get_events(&settings.foot_strike_label, side);
        if strikes.len() < 2 {
            tracing::warn!(
                side = %side,
                strikes = strikes.len(),
                "not enough foot strikes for stride time"
            );
            continue;
        }
        let times: Vec<Chrono> = strikes
            .iter()
            .filter_map(|e| e.get_time(Some(rate)).ok())
            .collect();
        let series = out.entry(side.clone()).or_default();
        series.extend(times.windows(2).map(|w| w[1] - w[0]));
    }
    out
}

/// Toe marker displacement between successive foot strikes, in metres.
pub fn stride_lengths(trial: &Trial, settings: &Settings) -> SideSeries {
    let points = trial.points();
    let rate = points.rate();
    let mut out = empty_sides(settings);
    let to_metres = match units::conversion_factor(points.units(), "m") {
        Ok(f) => f,
        Err(err) => {
            tracing::warn!(units = %points.units(), %err, "cannot express marker units in metres");
            return out;
        }
    };
    for side in &settings.sides {
        let toe = settings.toe_marker(side);
        if !points.contains_marker(&toe) {
            tracing::warn!(side = %side, marker = %toe, "toe marker not found");
            continue;
        }
        let strikes = trial.get_events(&settings.foot_strike_label, side);
        if strikes.len() < 2 {
            tracing::warn!(
                side = %side,
                strikes = strikes.len(),
                "not enough foot strikes for stride length"
            );
            continue;
        }
        let series = out.entry(side.clone()).or_default();
        for pair in strikes.windows(2) {
            let positions = pair[0]
                .get_frame(Some(rate))
                .and_then(|f| points.marker_coords_at(&toe, f))
                .and_then(|start| {
                    let end = pair[1]
                        .get_frame(Some(rate))
                        .and_then(|f| points.marker_coords_at(&toe, f))?;
                    Ok((start, end))
                });
            match positions {
                Ok((start, end)) => series.push(start.distance(end) * to_metres),
                Err(err) => tracing::warn!(side = %side, marker = %toe, %err, "skipping stride"),
            }
        }
    }
    out
}

/// Stride length over stride time, in metres per second.
///
/// A zero stride time yields NaN for that stride.
pub fn stride_velocities(trial: &Trial, settings: &Settings) -> SideSeries {
    let lengths = stride_lengths(trial, settings);
    let times = stride_times(trial, settings);
    let mut out = empty_sides(settings);
    for side in &settings.sides {
        let (Some(l), Some(t)) = (lengths.get(side), times.get(side)) else {
            continue;
        };
        if l.is_empty() || t.is_empty() {
            tracing::warn!(side = %side, "not enough data for stride velocity");
            continue;
        }
        if l.len() != t.len() {
            tracing::warn!(
                side = %side,
                lengths = l.len(),
                times = t.len(),
                "stride length and time counts differ"
            );
        }
        let series = out.entry(side.clone()).or_default();
        series.extend(
            l.iter()
                .zip(t)
                .map(|(l, t)| if *t == 0.0 { f64::NAN } else { l / t }),
        );
    }
    out
}

/// Foot strike to foot off time of each gait cycle, in seconds.
pub fn stance_times(trial: &Trial, settings: &Settings) -> SideSeries {
    cycle_series(trial, settings, |stance, _| stance)
}

/// Stance time as a percentage of the cycle's stride time.
pub fn stance_percentages(trial: &Trial, settings: &Settings) -> SideSeries {
    cycle_series(trial, settings, |stance, stride| {
        if stride == 0.0 {
            f64::NAN
        } else {
            100.0 * stance / stride
        }
    })
}

fn cycle_series(
    trial: &Trial,
    settings: &Settings,
    value: impl Fn(Chrono, Chrono) -> f64,
) -> SideSeries {
    let rate = trial.points().rate();
    let mut out = empty_sides(settings);
    for side in &settings.sides {
        let cycles = trial.stance_swing_phases_with(side, settings);
        if cycles.is_empty() {
            tracing::warn!(side = %side, "no complete gait cycles");
            continue;
        }
        let series = out.entry(side.clone()).or_default();
        for cycle in cycles {
            match (cycle.stance().duration(rate), cycle.stride().duration(rate)) {
                (Ok(stance), Ok(stride)) => series.push(value(stance, stride)),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(side = %side, %err, "skipping gait cycle")
                }
            }
        }
    }
    out
}
