//! Whole-trial persistence as a tagged JSON envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::record::RecordRepr;
use super::{GapMap, Trial, TrialRecord};
use crate::util::{Error, Result};

/// `kind` tag written into every saved trial.
pub const TRIAL_KIND: &str = "movedb.Trial";

/// Envelope format version.
pub const TRIAL_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    kind: &'a str,
    version: u32,
    trial: &'a Trial,
}

/// Stored trial: the record fields plus the cached gap map.
#[derive(Deserialize)]
pub(super) struct TrialRepr {
    #[serde(flatten)]
    record: RecordRepr,
    #[serde(default)]
    point_gaps: Option<GapMap>,
}

impl TryFrom<TrialRepr> for Trial {
    type Error = Error;

    fn try_from(r: TrialRepr) -> Result<Self> {
        Trial::assemble(TrialRecord::try_from(r.record)?, r.point_gaps)
    }
}

impl Trial {
    /// Serialize the trial, gap cache included.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.envelope())?)
    }

    /// Restore a trial written by [`to_json`](Self::to_json).
    ///
    /// Fails with a type mismatch if the blob is not a tagged trial. Entity
    /// checks run after parsing, so a broken entity keeps its error kind.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut value: Value = serde_json::from_str(json)?;
        let kind = match value.get("kind") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => return Err(type_mismatch(other.to_string())),
            None => return Err(type_mismatch("untagged value".into())),
        };
        if kind != TRIAL_KIND {
            return Err(type_mismatch(kind.to_string()));
        }
        let version = value.get("version").and_then(Value::as_u64).unwrap_or(0);
        if version > TRIAL_VERSION as u64 {
            tracing::warn!(
                version,
                supported = TRIAL_VERSION,
                "trial saved by a newer format version"
            );
        }
        let repr: TrialRepr = serde_json::from_value(value["trial"].take())?;
        let trial = Trial::try_from(repr)?;
        tracing::debug!(trial = %trial.name, "trial restored");
        Ok(trial)
    }

    /// Write the trial to `path` as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &self.envelope())?;
        writer.flush()?;
        tracing::debug!(trial = %self.name, path = %path.display(), "trial saved");
        Ok(())
    }

    /// Read a trial previously written with [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn envelope(&self) -> Envelope<'_> {
        Envelope {
            kind: TRIAL_KIND,
            version: TRIAL_VERSION,
            trial: self,
        }
    }
}

fn type_mismatch(actual: String) -> Error {
    Error::TypeMismatch {
        expected: TRIAL_KIND.to_string(),
        actual,
    }
}
