//! Error types
//!
//! Nothing here ever escapes a simulation tick: asset failures degrade to a
//! null render handle and settings failures are reported before the loop starts.

use std::fmt;

/// Failure to instantiate a renderable model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Model or material file could not be found
    NotFound { path: String },
    /// File exists but could not be parsed or uploaded
    Malformed { path: String, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "model not found: {path}"),
            Self::Malformed { path, reason } => write!(f, "malformed model {path}: {reason}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Failure to load or validate [`crate::Settings`]
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read settings: {e}"),
            Self::Parse(e) => write!(f, "failed to parse settings: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid setting `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
