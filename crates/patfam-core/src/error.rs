//! Error types for patfam-core

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for deduplication operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Failure reported by an external lookup collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,
}

/// Which collaborator a lookup failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Validity,
    Family,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Validity => write!(f, "validity"),
            LookupKind::Family => write!(f, "family"),
        }
    }
}

/// Main error type for deduplication
///
/// Unparseable identifiers and empty input are not errors; only an external
/// lookup that could not answer stops a deduplication run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DedupError {
    #[error("{lookup} lookup unavailable: {source}")]
    LookupUnavailable {
        lookup: LookupKind,
        #[source]
        source: LookupError,
    },
}

impl DedupError {
    pub(crate) fn lookup(lookup: LookupKind) -> impl FnOnce(LookupError) -> DedupError {
        move |source| {
            tracing::warn!(%lookup, error = %source, "lookup failed, aborting deduplication");
            DedupError::LookupUnavailable { lookup, source }
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid jurisdiction code: {0}")]
    InvalidJurisdiction(String),

    #[error("Preference order must name at least one jurisdiction")]
    EmptyPreference,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<impress_patents::IdentifierError> for ConfigError {
    fn from(e: impress_patents::IdentifierError) -> Self {
        match e {
            impress_patents::IdentifierError::InvalidJurisdiction(code) => {
                ConfigError::InvalidJurisdiction(code)
            }
            other => ConfigError::Parse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unavailable_message() {
        let err = DedupError::lookup(LookupKind::Validity)(LookupError::Timeout);
        assert_eq!(err.to_string(), "validity lookup unavailable: request timed out");
    }

    #[test]
    fn test_config_error_from_identifier_error() {
        let err: ConfigError =
            impress_patents::IdentifierError::InvalidJurisdiction("U5".to_string()).into();
        assert_eq!(err, ConfigError::InvalidJurisdiction("U5".to_string()));
    }
}
