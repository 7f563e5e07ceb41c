use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::name::FindByName;

use super::histogram::H1;
use super::table::Table;

/// Histograms and table of one run (or of one worker's share of it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    histograms: Vec<H1>,
    table: Table,
}

impl RunResult {
    pub fn new(histograms: Vec<H1>, table: Table) -> Self {
        Self { histograms, table }
    }

    pub fn histograms(&self) -> &[H1] {
        &self.histograms
    }

    pub fn h1(&self, index: usize) -> Option<&H1> {
        self.histograms.get(index)
    }

    pub fn h1_mut(&mut self, index: usize) -> Option<&mut H1> {
        self.histograms.get_mut(index)
    }

    pub fn h1_by_name(&self, name: &str) -> Option<&H1> {
        self.histograms.find_by_name(name)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn same_schema(&self, other: &RunResult) -> bool {
        self.histograms.len() == other.histograms.len()
            && self
                .histograms
                .iter()
                .zip(&other.histograms)
                .all(|(a, b)| a.same_schema(b))
            && self.table.same_schema(&other.table)
    }

    /// Folds a partial result into this one.
    ///
    /// Bin contents and moments add, table rows are appended. The schema is
    /// checked up front so a mismatch leaves `self` untouched.
    pub fn merge(&mut self, other: RunResult) -> Result<()> {
        if !self.same_schema(&other) {
            return Err(AnalysisError::SchemaMismatch(
                "partial run result was booked with a different layout".to_string(),
            ));
        }
        for (a, b) in self.histograms.iter_mut().zip(&other.histograms) {
            a.merge(b)?;
        }
        self.table.merge(other.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::Binning;

    fn result() -> RunResult {
        RunResult::new(
            vec![
                H1::new("EA", "a", Binning::new(4, 0.0, 4.0)),
                H1::new("Etotal", "t", Binning::new(4, 0.0, 4.0)),
            ],
            Table::new("t", "t", vec!["EA".to_string()]),
        )
    }

    #[test]
    fn test_lookup_by_name() {
        let r = result();
        assert_eq!(r.h1_by_name("Etotal").map(|h| h.title()), Some("t"));
        assert!(r.h1_by_name("LA").is_none());
    }

    #[test]
    fn test_merge_adds_partials() {
        let mut a = result();
        a.h1_mut(0).unwrap().fill(1.5);
        a.table_mut().add_row(&[1.5]).unwrap();
        let mut b = result();
        b.h1_mut(0).unwrap().fill(1.5);
        b.table_mut().add_row(&[1.6]).unwrap();

        a.merge(b).unwrap();
        assert!((a.h1(0).unwrap().bin_content(1) - 2.0).abs() < 1e-10);
        assert_eq!(a.table().len(), 2);
    }

    #[test]
    fn test_merge_schema_mismatch_leaves_target_untouched() {
        let mut a = result();
        a.h1_mut(0).unwrap().fill(0.5);
        let before = a.clone();
        let other = RunResult::new(
            vec![H1::new("EA", "a", Binning::new(4, 0.0, 4.0))],
            Table::new("t", "t", vec!["EA".to_string()]),
        );
        assert!(a.merge(other).is_err());
        assert_eq!(a, before);
    }
}
