//! Flat capture record handed over by capture-file adapters.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::{Event, EventRepr, ImportMethod, LinkedFiles};
use crate::groups::{
    Analogs, AnalogsRepr, ForcePlatform, ForcePlatformRepr, Points, PointsRepr,
};
use crate::util::{Error, Result};

/// Everything an adapter extracts from one capture, before the trial-level
/// pipeline (event ordering, gap caching) runs.
///
/// Adapters that speak JSON should go through [`TrialRecord::from_value`]
/// so a bad entity fails with its own [`ErrorKind`](crate::ErrorKind)
/// rather than a JSON error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordRepr")]
pub struct TrialRecord {
    pub name: String,
    pub session_name: Option<String>,
    pub subject_names: Vec<String>,
    pub classification: String,
    pub trial_type: Option<String>,
    pub import_method: ImportMethod,
    pub parameters: BTreeMap<String, Value>,
    pub events: Vec<Event>,
    pub points: Points,
    pub analogs: Analogs,
    pub force_platforms: Vec<ForcePlatform>,
    pub linked_files: LinkedFiles,
}

/// Record as it arrives, every entity still unchecked.
#[derive(Deserialize)]
pub(crate) struct RecordRepr {
    name: String,
    #[serde(default)]
    session_name: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    subject_names: Vec<String>,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    trial_type: Option<String>,
    #[serde(default)]
    import_method: ImportMethod,
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
    #[serde(default)]
    events: Vec<EventRepr>,
    points: PointsRepr,
    analogs: AnalogsRepr,
    #[serde(default)]
    force_platforms: Vec<ForcePlatformRepr>,
    #[serde(default)]
    linked_files: LinkedFiles,
}

impl TryFrom<RecordRepr> for TrialRecord {
    type Error = Error;

    fn try_from(r: RecordRepr) -> Result<Self> {
        let events = r
            .events
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>>>()?;
        let force_platforms = r
            .force_platforms
            .into_iter()
            .map(ForcePlatform::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: r.name,
            session_name: r.session_name,
            subject_names: r.subject_names,
            classification: r.classification,
            trial_type: r.trial_type,
            import_method: r.import_method,
            parameters: r.parameters,
            events,
            points: Points::try_from(r.points)?,
            analogs: Analogs::try_from(r.analogs)?,
            force_platforms,
            linked_files: r.linked_files,
        })
    }
}

impl TrialRecord {
    /// Record with only the required groups; everything else empty.
    pub fn new(name: impl Into<String>, points: Points, analogs: Analogs) -> Self {
        Self {
            name: name.into(),
            session_name: None,
            subject_names: Vec::new(),
            classification: String::new(),
            trial_type: None,
            import_method: ImportMethod::default(),
            parameters: BTreeMap::new(),
            events: Vec::new(),
            points,
            analogs,
            force_platforms: Vec::new(),
            linked_files: LinkedFiles::new(),
        }
    }

    /// Parse a JSON record, then validate every entity.
    ///
    /// Malformed JSON is an I/O error; a well-formed record that breaks an
    /// entity rule fails with that rule's error.
    pub fn from_value(value: Value) -> Result<Self> {
        let repr: RecordRepr = serde_json::from_value(value)?;
        Self::try_from(repr)
    }

    /// [`from_value`](Self::from_value) over a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let repr: RecordRepr = serde_json::from_str(json)?;
        Self::try_from(repr)
    }
}

/// Source of capture records (a C3D reader, a live acquisition bridge, ...).
///
/// Adapters implement this and call into the core; the core never depends
/// on a concrete adapter.
pub trait CaptureSource {
    fn read_record(&self) -> Result<TrialRecord>;
}

impl CaptureSource for TrialRecord {
    fn read_record(&self) -> Result<TrialRecord> {
        Ok(self.clone())
    }
}

/// Accept `"name"`, `["a", "b"]` or `null` for subject names.
fn one_or_many<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(name)) => vec![name],
        Some(OneOrMany::Many(names)) => names,
    })
}
