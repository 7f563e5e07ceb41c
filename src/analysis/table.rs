use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Flat table of `f64` columns with one row per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(name: &str, title: &str, columns: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn add_row(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(AnalysisError::SchemaMismatch(format!(
                "table '{}' has {} columns, row has {} values",
                self.name,
                self.columns.len(),
                values.len()
            )));
        }
        self.rows.push(values.to_vec());
        Ok(())
    }

    pub fn same_schema(&self, other: &Table) -> bool {
        self.name == other.name && self.columns == other.columns
    }

    /// Appends `other`'s rows after this table's rows.
    pub fn merge(&mut self, other: Table) -> Result<()> {
        if !self.same_schema(&other) {
            return Err(AnalysisError::SchemaMismatch(format!(
                "table '{}' {:?} cannot absorb '{}' {:?}",
                self.name, self.columns, other.name, other.columns
            )));
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            "segments",
            "Edep and TrackL",
            vec!["ERight".to_string(), "LRight".to_string()],
        )
    }

    #[test]
    fn test_add_row() {
        let mut t = table();
        t.add_row(&[1.0, 2.0]).unwrap();
        t.add_row(&[3.0, 4.0]).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows()[1], vec![3.0, 4.0]);
    }

    #[test]
    fn test_add_row_width_mismatch() {
        let mut t = table();
        let err = t.add_row(&[1.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::SchemaMismatch(_)));
        assert!(t.is_empty());
    }

    #[test]
    fn test_merge_concatenates() {
        let mut a = table();
        a.add_row(&[1.0, 1.0]).unwrap();
        let mut b = table();
        b.add_row(&[2.0, 2.0]).unwrap();
        a.merge(b).unwrap();
        assert_eq!(a.rows(), &[vec![1.0, 1.0], vec![2.0, 2.0]]);
    }

    #[test]
    fn test_merge_rejects_other_schema() {
        let mut a = table();
        let b = Table::new("segments", "x", vec!["ELeft".to_string()]);
        assert!(a.merge(b).is_err());
    }
}
