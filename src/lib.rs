pub mod analysis;
pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod hits;
pub mod io;
pub mod logging;
pub mod manager;
pub mod name;
pub mod sensor;
pub mod transport;
pub mod uid;
pub mod units;

// Prelude
pub use analysis::{
    AnalysisConfig, AnalysisContext, Binning, Booking, EventAggregator, H1, OutputConfig,
    OutputFormat, RunAggregator, RunContext, RunResult, RunState, RunSummary, Table, TableConfig,
};
pub use config::AppConfig;
pub use detector::{Category, CollectionId, DetectorSetup, SegmentSpec};
pub use error::{AnalysisError, ErrorKind};
pub use event::Event;
pub use hits::{EventHits, Hit, HitCollection};
pub use io::{ArtifactRecord, JsonArtifact, OutputBackend, read_artifact};
pub use logging::{LogConfig, init_logging};
pub use manager::{RunManager, RunSettings};
pub use sensor::{SegmentSensor, SensorArray, Step};
pub use transport::{ToySource, TransportEngine};
pub use uid::RunId;
pub use units::BestUnit;
