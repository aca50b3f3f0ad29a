//! Enumerations shared by trials and their adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a trial's data entered the system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportMethod {
    #[serde(rename = "C3D")]
    #[default]
    C3d,
    #[serde(rename = "Vicon Nexus")]
    ViconNexus,
    #[serde(rename = "Custom")]
    Custom,
}

impl ImportMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C3d => "C3D",
            Self::ViconNexus => "Vicon Nexus",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for ImportMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifacts an export adapter records through `Trial::link_file`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    ScaledModel,
    MarkerModel,
    Trc,
    IkSetup,
    IkResults,
    IdSetup,
    IdResults,
    FpMot,
    FpSetup,
}

impl OutputKind {
    /// All kinds, in pipeline order.
    pub const ALL: [OutputKind; 9] = [
        Self::ScaledModel,
        Self::MarkerModel,
        Self::Trc,
        Self::IkSetup,
        Self::IkResults,
        Self::IdSetup,
        Self::IdResults,
        Self::FpMot,
        Self::FpSetup,
    ];

    /// Key used in the linked file map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScaledModel => "scaled_model",
            Self::MarkerModel => "marker_model",
            Self::Trc => "trc",
            Self::IkSetup => "ik_setup",
            Self::IkResults => "ik_results",
            Self::IdSetup => "id_setup",
            Self::IdResults => "id_results",
            Self::FpMot => "fp_mot",
            Self::FpSetup => "fp_setup",
        }
    }

    /// Parse a linked file key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl AsRef<str> for OutputKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<OutputKind> for String {
    fn from(kind: OutputKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
