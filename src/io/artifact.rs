//! Run artifact I/O.
//!
//! The artifact is a single JSON document holding the run id, the number of
//! merged worker results, every histogram and the per-event table. It is
//! written once, at the end of a run, into a file created at run start.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::config::{OutputConfig, OutputFormat};
use crate::analysis::result::RunResult;
use crate::error::{AnalysisError, Result};
use crate::uid::RunId;

/// Schema version written into every artifact.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Persisted content of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub run_id: RunId,
    /// Number of worker partials merged into `result` (0 for sequential runs).
    pub workers: usize,
    pub result: RunResult,
}

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    schema_version: String,
    #[serde(flatten)]
    record: ArtifactRecord,
}

#[derive(Serialize)]
struct ArtifactFileRef<'a> {
    schema_version: &'a str,
    #[serde(flatten)]
    record: &'a ArtifactRecord,
}

/// Destination of a run's results.
pub trait OutputBackend: Send {
    /// Creates (or truncates) the output file.
    fn open(&mut self, path: &Path) -> Result<()>;

    fn write(&mut self, record: &ArtifactRecord) -> Result<()>;

    /// Flushes and releases the file.
    fn close(&mut self) -> Result<()>;

    fn path(&self) -> Option<&Path>;
}

/// Backend for the configured format.
pub fn open_backend(config: &OutputConfig) -> Box<dyn OutputBackend> {
    match config.format {
        OutputFormat::Json => Box::new(JsonArtifact::new()),
    }
}

/// Pretty-printed JSON artifact.
#[derive(Debug, Default)]
pub struct JsonArtifact {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl JsonArtifact {
    pub fn new() -> Self {
        Self::default()
    }

    fn target(&self) -> PathBuf {
        self.path.clone().unwrap_or_default()
    }
}

impl OutputBackend for JsonArtifact {
    fn open(&mut self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| AnalysisError::io("create", path, e))?;
        self.path = Some(path.to_path_buf());
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn write(&mut self, record: &ArtifactRecord) -> Result<()> {
        let path = self.target();
        let Some(writer) = self.writer.as_mut() else {
            return Err(AnalysisError::io(
                "write",
                path,
                std::io::Error::new(std::io::ErrorKind::NotConnected, "output file is not open"),
            ));
        };
        if let Some(h) = record.result.histograms().iter().find(|h| !h.is_finite()) {
            return Err(AnalysisError::NonFinite {
                histogram: h.name().to_string(),
                path,
            });
        }
        let file = ArtifactFileRef {
            schema_version: SCHEMA_VERSION,
            record,
        };
        serde_json::to_writer_pretty(&mut *writer, &file)
            .map_err(|source| AnalysisError::Format { path, source })
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| AnalysisError::io("flush", self.target(), e))?;
        }
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Reads an artifact back for offline analysis.
pub fn read_artifact(path: &Path) -> Result<ArtifactRecord> {
    let file = File::open(path).map_err(|e| AnalysisError::io("open", path, e))?;
    let file: ArtifactFile = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        AnalysisError::Format {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(file.record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::booking::Booking;
    use crate::analysis::config::AnalysisConfig;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    fn record() -> ArtifactRecord {
        let booking = Booking::from_config(&AnalysisConfig::new()).unwrap();
        let mut result = booking.book();
        result.h1_mut(0).unwrap().fill(2.0);
        result.h1_mut(0).unwrap().fill(7.5);
        result.h1_mut(1).unwrap().fill(0.25);
        result.table_mut().add_row(&[2.0, 0.0, 0.25, 0.0]).unwrap();
        result.table_mut().add_row(&[7.5, 0.1, 0.0, 3.0]).unwrap();
        ArtifactRecord {
            run_id: RunId::from("run-1"),
            workers: 2,
            result,
        }
    }

    #[test]
    fn test_write_and_read_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments.json");

        let original = record();
        let mut backend = JsonArtifact::new();
        backend.open(&path).unwrap();
        backend.write(&original).unwrap();
        backend.close().unwrap();
        assert_eq!(backend.path(), Some(path.as_path()));

        let loaded = read_artifact(&path).unwrap();
        assert_eq!(loaded, original);
        let h = loaded.result.h1_by_name("ERight").unwrap();
        assert!((h.overflow() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_artifact_is_self_describing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments.json");
        let mut backend = JsonArtifact::new();
        backend.open(&path).unwrap();
        backend.write(&record()).unwrap();
        backend.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"schema_version\": \"1.0.0\""));
        assert!(text.contains("\"Etotal\""));
        assert!(text.contains("\"columns\""));
    }

    #[test]
    fn test_open_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments.json");
        std::fs::write(&path, "stale content that is not json").unwrap();

        let mut backend = JsonArtifact::new();
        backend.open(&path).unwrap();
        backend.close().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_open_in_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("segments.json");
        let mut backend = JsonArtifact::new();
        let err = backend.open(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("segments.json"));
    }

    #[test]
    fn test_write_without_open_fails() {
        let mut backend = JsonArtifact::new();
        assert!(backend.write(&record()).is_err());
    }

    #[test]
    fn test_read_garbage_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_artifact(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_huge_fills_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments.json");
        let mut original = record();
        original.result.h1_mut(0).unwrap().fill(1e200);

        let mut backend = JsonArtifact::new();
        backend.open(&path).unwrap();
        backend.write(&original).unwrap();
        backend.close().unwrap();

        let loaded = read_artifact(&path).unwrap();
        assert_eq!(loaded, original);
        assert_eq!(loaded.result.h1(0).unwrap().entries(), 3);
    }

    #[test]
    fn test_non_finite_histogram_is_not_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("segments.json");
        let mut original = record();
        original.result.h1_mut(2).unwrap().fill_weighted(0.5, f64::INFINITY);

        let mut backend = JsonArtifact::new();
        backend.open(&path).unwrap();
        let err = backend.write(&original).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(matches!(
            err,
            AnalysisError::NonFinite { ref histogram, .. } if histogram == "ELeft"
        ));
    }
}
