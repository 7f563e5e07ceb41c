//! Output artifact I/O.
//!
//! This module provides the backend that persists a run's histograms and
//! table, and the reader used for offline analysis.

pub mod artifact;

pub use artifact::{ArtifactRecord, JsonArtifact, OutputBackend, open_backend, read_artifact};
