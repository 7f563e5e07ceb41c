use crate::detector::Category;
use crate::error::Result;
use crate::units::Dimension;

use super::config::{AnalysisConfig, Binning};
use super::histogram::H1;
use super::result::RunResult;
use super::table::Table;

/// Histogram definition fixed at configuration time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub name: String,
    pub title: String,
    pub binning: Binning,
    pub dimension: Dimension,
}

/// Where one aggregated segment's values go.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSlots {
    pub category: Category,
    pub collection_name: String,
    pub energy: usize,
    pub length: usize,
}

/// Histogram and table layout derived from an [`AnalysisConfig`].
///
/// The layout is a pure function of the configuration, so every worker built
/// from the same configuration books identical schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    histograms: Vec<HistogramSpec>,
    slots: Vec<SegmentSlots>,
    total: usize,
    table_name: String,
    table_title: String,
    columns: Vec<String>,
    table_categories: Vec<Category>,
}

impl Booking {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let mut histograms = Vec::with_capacity(2 * config.segments.len() + 1);
        let mut slots = Vec::with_capacity(config.segments.len());
        for segment in &config.segments {
            let c = segment.category;
            let length_binning = if c == config.primary {
                config.primary_length
            } else {
                config.length
            };

            let energy = histograms.len();
            histograms.push(HistogramSpec {
                name: format!("E{}", c.tag()),
                title: format!("Edep in {} detector", c.label()),
                binning: config.energy,
                dimension: Dimension::Energy,
            });
            let length = histograms.len();
            histograms.push(HistogramSpec {
                name: format!("L{}", c.tag()),
                title: format!("trackL in {} detector", c.label()),
                binning: length_binning,
                dimension: Dimension::Length,
            });

            slots.push(SegmentSlots {
                category: c,
                collection_name: segment.collection_name.clone(),
                energy,
                length,
            });
        }

        let total = histograms.len();
        histograms.push(HistogramSpec {
            name: "Etotal".to_string(),
            title: "Total Edep".to_string(),
            binning: config.total_energy,
            dimension: Dimension::Energy,
        });

        let table_categories = config.table.categories.clone();
        let columns = table_categories
            .iter()
            .map(|c| format!("E{}", c.tag()))
            .chain(table_categories.iter().map(|c| format!("L{}", c.tag())))
            .collect();

        Ok(Self {
            histograms,
            slots,
            total,
            table_name: config.table.name.clone(),
            table_title: config.table.title.clone(),
            columns,
            table_categories,
        })
    }

    pub fn histograms(&self) -> &[HistogramSpec] {
        &self.histograms
    }

    pub fn slots(&self) -> &[SegmentSlots] {
        &self.slots
    }

    pub fn slot(&self, category: Category) -> Option<&SegmentSlots> {
        self.slots.iter().find(|s| s.category == category)
    }

    /// Index of the combined total energy histogram.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn table_categories(&self) -> &[Category] {
        &self.table_categories
    }

    /// Zeroed histograms and an empty table for a new run.
    pub fn book(&self) -> RunResult {
        let histograms = self
            .histograms
            .iter()
            .map(|spec| H1::new(&spec.name, &spec.title, spec.binning))
            .collect();
        let table = Table::new(&self.table_name, &self.table_title, self.columns.clone());
        RunResult::new(histograms, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::CM;

    #[test]
    fn test_standard_layout() {
        let booking = Booking::from_config(&AnalysisConfig::new()).unwrap();
        assert_eq!(booking.histograms().len(), 15);
        assert_eq!(booking.total(), 14);
        assert_eq!(booking.histograms()[14].name, "Etotal");

        let right = booking.slot(Category::Right).unwrap();
        assert_eq!(booking.histograms()[right.energy].name, "ERight");
        assert_eq!(booking.histograms()[right.length].name, "LRight");
        assert!((booking.histograms()[right.length].binning.upper - 1.0 * CM).abs() < 1e-10);

        let top_left = booking.slot(Category::TopLeft).unwrap();
        assert_eq!(booking.histograms()[top_left.length].name, "LTopL");
        assert!((booking.histograms()[top_left.length].binning.upper - 50.0 * CM).abs() < 1e-10);
    }

    #[test]
    fn test_table_columns() {
        let booking = Booking::from_config(&AnalysisConfig::new()).unwrap();
        assert_eq!(booking.columns(), &["ERight", "ELeft", "LRight", "LLeft"]);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = Booking::from_config(&AnalysisConfig::new()).unwrap();
        let b = Booking::from_config(&AnalysisConfig::new()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.book(), b.book());
    }

    #[test]
    fn test_book_is_zeroed() {
        let booking = Booking::from_config(&AnalysisConfig::new()).unwrap();
        let result = booking.book();
        assert!(result.histograms().iter().all(|h| h.entries() == 0));
        assert!(result.table().is_empty());
        assert_eq!(result.table().columns().len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::new();
        config.primary = Category::Front;
        config.segments.retain(|s| s.category != Category::Front);
        assert!(Booking::from_config(&config).is_err());
    }
}
