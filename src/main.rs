use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use segment_calorimetry::{
    AnalysisContext, AppConfig, DetectorSetup, RunManager, SensorArray, ToySource, init_logging,
};
use tracing::info;

fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::from_json_file(&path)?,
        None => AppConfig::default(),
    };
    init_logging(&config.logging);

    let setup = Arc::new(DetectorSetup::standard());
    let output = config.analysis.output.path();
    let ctx = AnalysisContext::new(config.analysis, setup.clone())
        .context("Failed to set up the analysis")?;

    let manager = RunManager::new(ctx, SensorArray::new(&setup), config.run);
    let source = ToySource::new(config.source);
    let result = manager.run(&source)?;

    info!(
        events = result.table().len(),
        "results written to {}",
        output.display()
    );
    Ok(())
}
