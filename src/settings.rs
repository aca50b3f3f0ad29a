//! Gait analysis settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::util::Result;

/// Environment variable naming a JSON settings file.
pub const SETTINGS_ENV: &str = "MOVEDB_SETTINGS";

/// Event vocabulary and marker naming used by phase and STP queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Event labels
    pub foot_strike_label: String,
    pub foot_off_label: String,

    // Contexts analysed by the spatiotemporal parameters
    pub sides: Vec<String>,

    // Toe marker is "{first letter of side}{toe_marker_suffix}", e.g. LTOE
    pub toe_marker_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            foot_strike_label: "Foot Strike".into(),
            foot_off_label: "Foot Off".into(),
            sides: vec!["Left".into(), "Right".into()],
            toe_marker_suffix: "TOE".into(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Path named by `MOVEDB_SETTINGS`, if set.
    pub fn path() -> Option<PathBuf> {
        std::env::var_os(SETTINGS_ENV).map(PathBuf::from)
    }

    /// Load settings from `MOVEDB_SETTINGS`, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "failed to load settings, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Toe marker name for a side ("Left" -> "LTOE").
    pub fn toe_marker(&self, side: &str) -> String {
        let initial: String = side.chars().take(1).flat_map(char::to_uppercase).collect();
        format!("{initial}{}", self.toe_marker_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.foot_strike_label, "Foot Strike");
        assert_eq!(s.foot_off_label, "Foot Off");
        assert_eq!(s.sides, vec!["Left", "Right"]);
        assert_eq!(s.toe_marker("Left"), "LTOE");
        assert_eq!(s.toe_marker("right"), "RTOE");
    }

    #[test]
    fn test_partial_json() {
        let s = Settings::from_json_str(r#"{"foot_off_label": "Toe Off"}"#).unwrap();
        assert_eq!(s.foot_off_label, "Toe Off");
        assert_eq!(s.foot_strike_label, "Foot Strike");
    }

    #[test]
    fn test_bad_json() {
        assert!(Settings::from_json_str("{").is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.toe_marker_suffix = "MT2".into();
        s.save(&path).unwrap();
        assert_eq!(Settings::from_file(&path).unwrap(), s);
    }
}
