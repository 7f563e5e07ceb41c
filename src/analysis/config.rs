use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::detector::{Category, DetectorSetup};
use crate::error::{AnalysisError, Result};
use crate::units::{CM, EV, MEV};

/// Fixed binning of a 1-D histogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    pub bins: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Binning {
    pub fn new(bins: usize, lower: f64, upper: f64) -> Self {
        Self { bins, lower, upper }
    }

    pub fn width(&self) -> f64 {
        (self.upper - self.lower) / self.bins as f64
    }

    pub fn validate(&self, what: &str) -> Result<()> {
        if self.bins == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "{what}: bin count must be positive"
            )));
        }
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower >= self.upper {
            return Err(AnalysisError::InvalidConfig(format!(
                "{what}: invalid range [{}, {})",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

/// Segment whose hits are aggregated, and the collection it is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub category: Category,
    pub collection_name: String,
}

impl SegmentAnalysis {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            collection_name: category.default_collection_name(),
        }
    }
}

/// Schema of the per-event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub name: String,
    pub title: String,
    /// Categories whose (energy, track length) pairs become columns.
    pub categories: Vec<Category>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "segments".to_string(),
            title: "Edep and TrackL".to_string(),
            categories: vec![Category::Right, Category::Left],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub file_name: PathBuf,
    pub format: OutputFormat,
}

impl OutputConfig {
    /// Output path; a missing extension is filled in from the format.
    pub fn path(&self) -> PathBuf {
        if self.file_name.extension().is_some() {
            self.file_name.clone()
        } else {
            self.file_name.with_extension(self.format.extension())
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from("segments"),
            format: OutputFormat::Json,
        }
    }
}

/// Everything the aggregation side needs to know about a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Segments
    pub segments: Vec<SegmentAnalysis>,
    /// Segment reported in progress lines; gets the short-range length histogram.
    pub primary: Category,

    // Histograms
    pub energy: Binning,
    pub primary_length: Binning,
    pub length: Binning,
    pub total_energy: Binning,

    // Table
    pub table: TableConfig,

    // Console
    /// Log a progress line every `print_progress` events. Zero disables it.
    pub print_progress: u64,

    // Artifact
    pub output: OutputConfig,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        let energy = Binning::new(100, 1.0 * EV, 5.0 * MEV);
        Self {
            segments: Category::ALL.iter().map(|&c| SegmentAnalysis::new(c)).collect(),
            primary: Category::Right,
            energy,
            primary_length: Binning::new(100, 0.0, 1.0 * CM),
            length: Binning::new(100, 0.0, 50.0 * CM),
            total_energy: energy,
            table: TableConfig::default(),
            print_progress: 1,
            output: OutputConfig::default(),
        }
    }

    /// Aggregates exactly the segments registered in `setup`, under their
    /// registered collection names.
    pub fn for_setup(setup: &DetectorSetup) -> Self {
        let mut config = Self::new();
        config.segments = setup
            .segments()
            .iter()
            .map(|s| SegmentAnalysis {
                category: s.category,
                collection_name: s.collection_name.clone(),
            })
            .collect();
        if let Some(first) = config.segments.first() {
            if !config.segments.iter().any(|s| s.category == config.primary) {
                config.primary = first.category;
            }
            let available: Vec<Category> = config.segments.iter().map(|s| s.category).collect();
            config.table.categories.retain(|c| available.contains(c));
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "no segments to aggregate".to_string(),
            ));
        }
        for (i, s) in self.segments.iter().enumerate() {
            if self.segments[..i].iter().any(|o| o.category == s.category) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "segment '{}' listed twice",
                    s.category
                )));
            }
        }
        if !self.segments.iter().any(|s| s.category == self.primary) {
            return Err(AnalysisError::InvalidConfig(format!(
                "primary segment '{}' is not aggregated",
                self.primary
            )));
        }
        if let Some(missing) = self
            .table
            .categories
            .iter()
            .find(|c| !self.segments.iter().any(|s| s.category == **c))
        {
            return Err(AnalysisError::InvalidConfig(format!(
                "table column segment '{missing}' is not aggregated"
            )));
        }
        self.energy.validate("energy binning")?;
        self.primary_length.validate("primary length binning")?;
        self.length.validate("length binning")?;
        self.total_energy.validate("total energy binning")?;
        if self.output.file_name.as_os_str().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "output file name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::SegmentSpec;
    use crate::units::MM;

    #[test]
    fn test_config_defaults() {
        let config = AnalysisConfig::new();
        assert_eq!(config.segments.len(), 7);
        assert_eq!(config.primary, Category::Right);
        assert_eq!(config.energy.bins, 100);
        assert!((config.energy.lower - 1e-6).abs() < 1e-15);
        assert!((config.energy.upper - 5.0).abs() < 1e-10);
        assert!((config.primary_length.upper - 10.0 * MM).abs() < 1e-10);
        assert!((config.length.upper - 500.0 * MM).abs() < 1e-10);
        assert_eq!(config.table.categories, vec![Category::Right, Category::Left]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_default_trait() {
        let config: AnalysisConfig = Default::default();
        assert_eq!(config.print_progress, 1);
    }

    #[test]
    fn test_output_path_extension() {
        let mut out = OutputConfig::default();
        assert_eq!(out.path(), PathBuf::from("segments.json"));
        out.file_name = PathBuf::from("run7.dat");
        assert_eq!(out.path(), PathBuf::from("run7.dat"));
    }

    #[test]
    fn test_validate_rejects_bad_binning() {
        let mut config = AnalysisConfig::new();
        config.length = Binning::new(0, 0.0, 1.0);
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::new();
        config.energy = Binning::new(10, 5.0, 5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unaggregated_table_column() {
        let mut config = AnalysisConfig::new();
        config.segments.retain(|s| s.category != Category::Left);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_for_setup_follows_registration() {
        let setup = DetectorSetup::new(vec![
            SegmentSpec::new(Category::Bottom).with_names("BotSD", "bottom_hits"),
            SegmentSpec::new(Category::Left),
        ])
        .unwrap();
        let config = AnalysisConfig::for_setup(&setup);
        assert_eq!(config.segments.len(), 2);
        assert_eq!(config.segments[0].collection_name, "bottom_hits");
        assert_eq!(config.primary, Category::Bottom);
        assert_eq!(config.table.categories, vec![Category::Left]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "print_progress": 100, "output": { "file_name": "B4" } }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.print_progress, 100);
        assert_eq!(config.output.path(), PathBuf::from("B4.json"));
        assert_eq!(config.segments.len(), 7);
    }
}
