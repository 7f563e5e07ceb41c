use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::logging::LogConfig;
use crate::manager::RunSettings;
use crate::transport::ToySourceConfig;

/// Top-level configuration of the `segment-calorimetry` binary.
///
/// Every section is optional in the JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub logging: LogConfig,
    pub run: RunSettings,
    pub source: ToySourceConfig,
}

impl AppConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .analysis
            .validate()
            .with_context(|| format!("Invalid analysis section in {}", path.display()))?;
        Ok(config)
    }
}
