//! Trial aggregate: one capture session with its cross-entity checks.
//!
//! A [`Trial`] is built from a [`TrialRecord`] by running, in order:
//! 1. structural validation of every entity (done by their constructors)
//! 2. event ordering by resolved `(frame, time)` at the point rate
//! 3. a full-scope marker gap scan, cached in the trial
//!
//! # Example
//!
//! ```ignore
//! use movedb::prelude::*;
//!
//! let trial = Trial::load_from(&adapter)?;
//! for cycle in trial.stance_swing_phases("Left", "Foot Strike", "Foot Off") {
//!     println!("{:?}", cycle.stride().duration(trial.points().rate()));
//! }
//! ```

mod gaps;
mod persist;
mod phases;
mod record;
pub mod stp;

pub use gaps::{full_frames, scan_gaps, GapMap, Region};
pub use persist::{TRIAL_KIND, TRIAL_VERSION};
pub use phases::{stance_phases, stance_swing_phases, swing_phases, GaitCycle, GaitPhase};
pub use record::{CaptureSource, TrialRecord};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::{cmp_keys, Event, ImportMethod, LinkedFiles, Sampled};
use crate::groups::{Analogs, ForcePlatform, Points};
use crate::settings::Settings;
use crate::util::{DVec3, Frame, Result};

/// One recorded capture session.
///
/// Deserializing a trial runs the same pipeline as
/// [`from_record`](Self::from_record), except that a stored gap cache is
/// kept instead of recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "persist::TrialRepr")]
pub struct Trial {
    name: String,
    session_name: Option<String>,
    subject_names: Vec<String>,
    classification: String,
    trial_type: Option<String>,
    import_method: ImportMethod,
    linked_files: LinkedFiles,
    parameters: BTreeMap<String, Value>,
    events: Vec<Event>,
    points: Points,
    point_gaps: Option<GapMap>,
    analogs: Analogs,
    force_platforms: Vec<ForcePlatform>,
}

impl Trial {
    /// Run the trial pipeline over an adapter record.
    pub fn from_record(record: TrialRecord) -> Result<Self> {
        Self::assemble(record, None)
    }

    /// Read a record from an adapter and build the trial.
    pub fn load_from(source: &impl CaptureSource) -> Result<Self> {
        Self::from_record(source.read_record()?)
    }

    /// Order events and fill the gap cache unless `point_gaps` is given.
    fn assemble(record: TrialRecord, point_gaps: Option<GapMap>) -> Result<Self> {
        let mut trial = Self {
            name: record.name,
            session_name: record.session_name,
            subject_names: record.subject_names,
            classification: record.classification,
            trial_type: record.trial_type,
            import_method: record.import_method,
            linked_files: record.linked_files,
            parameters: record.parameters,
            events: record.events,
            points: record.points,
            point_gaps,
            analogs: record.analogs,
            force_platforms: record.force_platforms,
        };
        tracing::debug!(
            trial = %trial.name,
            markers = trial.points.trajectories().len(),
            channels = trial.analogs.channels().len(),
            platforms = trial.force_platforms.len(),
            "building trial"
        );

        trial.order_events()?;
        tracing::debug!(trial = %trial.name, events = trial.events.len(), "events ordered");

        if trial.point_gaps.is_none() {
            let with_gaps = trial.recompute_point_gaps().len();
            if with_gaps > 0 {
                tracing::warn!(trial = %trial.name, markers = with_gaps, "marker gaps found");
            }
        }
        Ok(trial)
    }

    /// Stable sort of events by `(frame, time)` resolved at the point rate.
    fn order_events(&mut self) -> Result<()> {
        let rate = self.points.rate();
        let keys = self
            .events
            .iter()
            .map(|e| e.sort_key(rate))
            .collect::<Result<Vec<_>>>()?;
        let mut keyed: Vec<_> = keys.into_iter().zip(std::mem::take(&mut self.events)).collect();
        keyed.sort_by(|(a, _), (b, _)| cmp_keys(a, b));
        self.events = keyed.into_iter().map(|(_, e)| e).collect();
        Ok(())
    }

    // ---- metadata ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session_name(&self) -> Option<&str> {
        self.session_name.as_deref()
    }

    pub fn subject_names(&self) -> &[String] {
        &self.subject_names
    }

    pub fn classification(&self) -> &str {
        &self.classification
    }

    pub fn trial_type(&self) -> Option<&str> {
        self.trial_type.as_deref()
    }

    pub fn import_method(&self) -> ImportMethod {
        self.import_method
    }

    /// Free-form capture parameters.
    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    pub fn points(&self) -> &Points {
        &self.points
    }

    pub fn analogs(&self) -> &Analogs {
        &self.analogs
    }

    pub fn force_platforms(&self) -> &[ForcePlatform] {
        &self.force_platforms
    }

    // ---- events ----

    /// Events in ascending `(frame, time)` order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events matching `label` and `context`; an empty string matches anything.
    pub fn get_events(&self, label: &str, context: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| label.is_empty() || e.label() == label)
            .filter(|e| context.is_empty() || e.context() == context)
            .collect()
    }

    /// Insert an event, keeping the event order.
    pub fn add_event(&mut self, event: Event) -> Result<()> {
        event.sort_key(self.points.rate())?;
        self.events.push(event);
        self.order_events()
    }

    // ---- linked files ----

    /// Record an artifact path under `key`, stored as an absolute path.
    pub fn link_file(&mut self, key: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let absolute = std::path::absolute(path.as_ref())?;
        let key = key.into();
        tracing::debug!(
            trial = %self.name,
            key = %key,
            path = %absolute.display(),
            "linked file"
        );
        self.linked_files.set(key, absolute.to_string_lossy());
        Ok(())
    }

    /// Path linked under `key`, if any.
    pub fn get_linked_file(&self, key: &str) -> Option<&str> {
        self.linked_files.get(key)
    }

    pub fn linked_files(&self) -> &LinkedFiles {
        &self.linked_files
    }

    // ---- markers and gaps ----

    /// Add a marker to the points group. The gap cache is left as is.
    pub fn add_marker(
        &mut self,
        name: impl Into<String>,
        x: &[f64],
        y: &[f64],
        z: &[f64],
        residual: Option<&[f64]>,
        description: impl Into<String>,
    ) -> Result<()> {
        self.points.add_marker(name, x, y, z, residual, description)
    }

    /// Marker position at an absolute frame.
    pub fn marker_coords_at(&self, name: &str, frame: Frame) -> Result<DVec3> {
        self.points.marker_coords_at(name, frame)
    }

    /// Cached gap map from construction (or the last recompute).
    pub fn point_gaps(&self) -> Option<&GapMap> {
        self.point_gaps.as_ref()
    }

    /// Gap map for the trial.
    ///
    /// Once the cache is filled (always the case after construction) this
    /// returns the cached full-trial result and ignores `markers` and
    /// `regions`. Use [`scan_point_gaps`](Self::scan_point_gaps) for a
    /// narrower fresh scan.
    ///
    /// A cache that is present but empty (a trial with no gaps) still counts
    /// as filled, so no scan runs. Tools that treated an empty cache as
    /// "not computed yet" and rescanned will see the empty map instead.
    pub fn check_point_gaps(
        &self,
        markers: Option<&[&str]>,
        regions: Option<&[Region]>,
    ) -> GapMap {
        match &self.point_gaps {
            Some(cached) => {
                if markers.is_some() || regions.is_some() {
                    tracing::debug!(
                        trial = %self.name,
                        "serving cached point gaps, query arguments ignored"
                    );
                }
                cached.clone()
            }
            None => self.scan_point_gaps(markers, regions),
        }
    }

    /// Fresh gap scan; never reads or writes the cache.
    pub fn scan_point_gaps(
        &self,
        markers: Option<&[&str]>,
        regions: Option<&[Region]>,
    ) -> GapMap {
        scan_gaps(&self.points, markers, regions)
    }

    /// Replace the cache with a full-scope scan.
    pub fn recompute_point_gaps(&mut self) -> &GapMap {
        let gaps = scan_gaps(&self.points, None, None);
        tracing::debug!(trial = %self.name, markers_with_gaps = gaps.len(), "point gaps cached");
        self.point_gaps.insert(gaps)
    }

    /// Absolute frames where every requested marker is fully present.
    pub fn find_full_frames(&self, markers: Option<&[&str]>) -> Vec<Frame> {
        full_frames(&self.points, markers)
    }

    // ---- gait phases ----

    pub fn stance_phases(
        &self,
        side: &str,
        foot_strike_label: &str,
        foot_off_label: &str,
    ) -> Vec<GaitPhase<'_>> {
        stance_phases(&self.events, side, foot_strike_label, foot_off_label)
    }

    pub fn swing_phases(
        &self,
        side: &str,
        foot_off_label: &str,
        foot_strike_label: &str,
    ) -> Vec<GaitPhase<'_>> {
        swing_phases(&self.events, side, foot_off_label, foot_strike_label)
    }

    pub fn stance_swing_phases(
        &self,
        side: &str,
        foot_strike_label: &str,
        foot_off_label: &str,
    ) -> Vec<GaitCycle<'_>> {
        stance_swing_phases(&self.events, side, foot_strike_label, foot_off_label)
    }

    /// Stance phases using the labels from `settings`.
    pub fn stance_phases_with(&self, side: &str, settings: &Settings) -> Vec<GaitPhase<'_>> {
        self.stance_phases(side, &settings.foot_strike_label, &settings.foot_off_label)
    }

    /// Swing phases using the labels from `settings`.
    pub fn swing_phases_with(&self, side: &str, settings: &Settings) -> Vec<GaitPhase<'_>> {
        self.swing_phases(side, &settings.foot_off_label, &settings.foot_strike_label)
    }

    /// Gait cycles using the labels from `settings`.
    pub fn stance_swing_phases_with(&self, side: &str, settings: &Settings) -> Vec<GaitCycle<'_>> {
        self.stance_swing_phases(side, &settings.foot_strike_label, &settings.foot_off_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OutputKind, SampledSeries};
    use crate::groups::MarkerTrajectory;
    use crate::util::ErrorKind;

    fn record() -> TrialRecord {
        let series = SampledSeries::new(0, 4, 100.0).unwrap();
        let mut trajectories = BTreeMap::new();
        let nan = f64::NAN;
        trajectories.insert(
            "LTOE".to_string(),
            MarkerTrajectory::from_values(
                &[1.0, nan, 1.0, 1.0, 1.0],
                &[0.0; 5],
                &[0.0; 5],
                &[0.0; 5],
                "",
            )
            .unwrap(),
        );
        trajectories.insert(
            "RTOE".to_string(),
            MarkerTrajectory::from_values(&[1.0; 5], &[0.0; 5], &[0.0; 5], &[0.0; 5], "").unwrap(),
        );
        let points = Points::new(series, "mm", trajectories).unwrap();
        let analogs = Analogs::new(SampledSeries::new(0, 19, 400.0).unwrap(), BTreeMap::new(), 1.0);
        let mut record = TrialRecord::new("walk01", points, analogs);
        record.events = vec![
            Event::at_time("Foot Off", "Left", 0.035),
            Event::at_frame("Foot Strike", "Left", 1),
            Event::at_frame("Foot Strike", "Right", 3),
            Event::at_frame("Foot Off", "Left", 3),
        ];
        record
    }

    #[test]
    fn test_events_ordered_on_build() {
        let trial = Trial::from_record(record()).unwrap();
        let order: Vec<(&str, &str)> =
            trial.events().iter().map(|e| (e.label(), e.context())).collect();
        // Frame 3 ties resolve by time, then keep input order.
        assert_eq!(
            order,
            vec![
                ("Foot Strike", "Left"),
                ("Foot Strike", "Right"),
                ("Foot Off", "Left"),
                ("Foot Off", "Left"),
            ]
        );
        assert_eq!(trial.events()[2].frame(), Some(3));
        assert!(trial.events()[3].time().is_some());
    }

    #[test]
    fn test_get_events_filters() {
        let trial = Trial::from_record(record()).unwrap();
        assert_eq!(trial.get_events("", "").len(), 4);
        assert_eq!(trial.get_events("Foot Off", "").len(), 2);
        assert_eq!(trial.get_events("", "Right").len(), 1);
        assert_eq!(trial.get_events("Foot Strike", "Left").len(), 1);
    }

    #[test]
    fn test_add_event_keeps_order() {
        let mut trial = Trial::from_record(record()).unwrap();
        trial.add_event(Event::at_frame("Foot Strike", "Left", 0)).unwrap();
        assert_eq!(trial.events()[0].frame(), Some(0));
    }

    #[test]
    fn test_gap_cache_built() {
        let trial = Trial::from_record(record()).unwrap();
        let cached = trial.point_gaps().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached["LTOE"], vec![(0, 4)]);
    }

    #[test]
    fn test_add_marker_leaves_cache() {
        let mut trial = Trial::from_record(record()).unwrap();
        let nan = f64::NAN;
        trial
            .add_marker("LHEE", &[nan; 5], &[0.0; 5], &[0.0; 5], None, "")
            .unwrap();
        assert!(!trial.check_point_gaps(None, None).contains_key("LHEE"));
        assert!(trial.scan_point_gaps(Some(&["LHEE"][..]), None).contains_key("LHEE"));
        trial.recompute_point_gaps();
        assert!(trial.check_point_gaps(None, None).contains_key("LHEE"));

        let err = trial.add_marker("RHEE", &[0.0; 4], &[0.0; 5], &[0.0; 5], None, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_link_file_absolute() {
        let mut trial = Trial::from_record(record()).unwrap();
        trial.link_file("trc", "out/walk01.trc").unwrap();
        let path = trial.get_linked_file("trc").unwrap();
        assert!(Path::new(path).is_absolute());
        assert!(path.ends_with("walk01.trc"));
        assert_eq!(trial.get_linked_file("ik_results"), None);

        trial.link_file(OutputKind::Trc, "/tmp/other.trc").unwrap();
        assert_eq!(trial.linked_files().len(), 1);
        assert_eq!(trial.get_linked_file(OutputKind::Trc.as_str()), Some("/tmp/other.trc"));
    }

    #[test]
    fn test_phases_with_settings() {
        let trial = Trial::from_record(record()).unwrap();
        let settings = Settings::default();
        let stance = trial.stance_phases_with("Left", &settings);
        assert_eq!(stance.len(), 1);
        assert_eq!(stance[0].start.frame(), Some(1));
        assert_eq!(trial.swing_phases_with("Left", &settings).len(), 0);
        assert!(trial.stance_swing_phases_with("Left", &settings).is_empty());
    }
}
