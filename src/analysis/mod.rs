//! Event and run aggregation.
//!
//! Every worker owns a [`RunAggregator`] whose [`RunResult`] is filled by the
//! [`EventAggregator`] at each event end. At run end the workers hand their
//! results to the master aggregator, which merges them, logs the summary and
//! writes the artifact. Everything the aggregators share is read-only and
//! lives in the [`AnalysisContext`].

pub mod booking;
pub mod config;
pub mod context;
pub mod event;
pub mod histogram;
pub mod result;
pub mod run;
pub mod summary;
pub mod table;

pub use booking::{Booking, HistogramSpec, SegmentSlots};
pub use config::{AnalysisConfig, Binning, OutputConfig, OutputFormat, SegmentAnalysis, TableConfig};
pub use context::AnalysisContext;
pub use event::EventAggregator;
pub use histogram::H1;
pub use result::RunResult;
pub use run::{RunAggregator, RunContext, RunState};
pub use summary::RunSummary;
pub use table::Table;
