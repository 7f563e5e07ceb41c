//! Error types for hit collection and run aggregation.
//!
//! Every error here is fatal for the run. [`AnalysisError::kind`] groups the
//! variants into the three classes an operator needs to tell apart.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::run::RunState;
use crate::detector::{Category, CollectionId};

/// Result type for the aggregation core.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Coarse classification of [`AnalysisError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Setup defect: registration, schema or state misuse.
    Configuration,
    /// The output artifact could not be created, written or read.
    Io,
    /// An event lacks data that every event must carry.
    DataAbsence,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no sensor registered for category '{0}'")]
    UnregisteredCategory(Category),

    #[error("hit collection '{0}' is not registered")]
    UnknownCollection(String),

    #[error("duplicate registration: {0}")]
    DuplicateRegistration(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("layer {layer} out of range for sensor '{sensor}' ({layers} layers)")]
    LayerOutOfRange {
        sensor: String,
        layer: usize,
        layers: usize,
    },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("run aggregator is {actual}, expected {expected}")]
    InvalidState { expected: RunState, actual: RunState },

    #[error("cannot access hit collection {id} ('{name}') in event {event}")]
    MissingCollection {
        id: CollectionId,
        name: String,
        event: u64,
    },

    #[error("hit collection '{name}' has no entries in event {event}")]
    EmptyCollection { name: String, event: u64 },

    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("histogram '{histogram}' holds non-finite sums; refusing to write {}", .path.display())]
    NonFinite { histogram: String, path: PathBuf },

    #[error("failed to encode or decode {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::MissingCollection { .. } | AnalysisError::EmptyCollection { .. } => {
                ErrorKind::DataAbsence
            }
            AnalysisError::Io { .. }
            | AnalysisError::NonFinite { .. }
            | AnalysisError::Format { .. } => ErrorKind::Io,
            _ => ErrorKind::Configuration,
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalysisError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let missing = AnalysisError::MissingCollection {
            id: CollectionId(3),
            name: "BotHitsCollection".to_string(),
            event: 12,
        };
        assert_eq!(missing.kind(), ErrorKind::DataAbsence);

        let io_err = AnalysisError::io(
            "create",
            "/nonexistent/out.json",
            io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        );
        assert_eq!(io_err.kind(), ErrorKind::Io);

        let config = AnalysisError::UnregisteredCategory(Category::TopLeft);
        assert_eq!(config.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_io_message_names_file() {
        let err = AnalysisError::io(
            "create",
            "/tmp/run/segments.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/run/segments.json"));
        assert!(msg.contains("denied"));
    }
}
