use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::name::HasName;

use super::config::Binning;

/// Fixed-range 1-D histogram.
///
/// Values below `lower` go to the underflow counter, values at or above
/// `upper` (and NaN) to the overflow counter. Every finite fill contributes
/// to the mean and RMS, whether or not it landed in a visible bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct H1 {
    name: String,
    title: String,
    binning: Binning,
    counts: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
    sum_w: f64,
    sum_wx: f64,
    sum_wx2: f64,
}

impl H1 {
    pub fn new(name: &str, title: &str, binning: Binning) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            binning,
            counts: vec![0.0; binning.bins],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
            sum_w: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn binning(&self) -> Binning {
        self.binning
    }

    /// Visible bin that `x` falls into, if any.
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        let Binning { bins, lower, upper } = self.binning;
        if !(x >= lower && x < upper) {
            return None;
        }
        let i = ((x - lower) / self.binning.width()) as usize;
        Some(i.min(bins - 1))
    }

    pub fn fill(&mut self, x: f64) {
        self.fill_weighted(x, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, w: f64) {
        self.entries += 1;
        match self.bin_index(x) {
            Some(i) => self.counts[i] += w,
            None if x < self.binning.lower => self.underflow += w,
            None => self.overflow += w,
        }
        if !x.is_finite() {
            return;
        }
        // Fills whose square overflows stay out of the moments.
        let sum_w = self.sum_w + w;
        let sum_wx = self.sum_wx + w * x;
        let sum_wx2 = self.sum_wx2 + w * x * x;
        if sum_w.is_finite() && sum_wx.is_finite() && sum_wx2.is_finite() {
            self.sum_w = sum_w;
            self.sum_wx = sum_wx;
            self.sum_wx2 = sum_wx2;
        }
    }

    /// Whether every stored sum is finite and can be persisted.
    pub fn is_finite(&self) -> bool {
        [
            self.underflow,
            self.overflow,
            self.sum_w,
            self.sum_wx,
            self.sum_wx2,
        ]
        .iter()
        .chain(&self.counts)
        .all(|v| v.is_finite())
    }

    /// Number of fills, in and out of range.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn bin_content(&self, index: usize) -> f64 {
        self.counts.get(index).copied().unwrap_or(0.0)
    }

    /// Sum of weights in visible bins.
    pub fn in_range(&self) -> f64 {
        self.counts.iter().sum()
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    pub fn mean(&self) -> f64 {
        if self.sum_w == 0.0 {
            return 0.0;
        }
        self.sum_wx / self.sum_w
    }

    pub fn rms(&self) -> f64 {
        if self.sum_w == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_wx2 / self.sum_w - mean * mean).max(0.0).sqrt()
    }

    pub fn same_schema(&self, other: &H1) -> bool {
        self.name == other.name && self.binning == other.binning
    }

    /// Adds `other` bin by bin.
    pub fn merge(&mut self, other: &H1) -> Result<()> {
        if !self.same_schema(other) {
            return Err(AnalysisError::SchemaMismatch(format!(
                "histogram '{}' {:?} cannot absorb '{}' {:?}",
                self.name, self.binning, other.name, other.binning
            )));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.sum_w += other.sum_w;
        self.sum_wx += other.sum_wx;
        self.sum_wx2 += other.sum_wx2;
        Ok(())
    }
}

impl HasName for H1 {
    fn get_name(&self) -> &str {
        &self.name
    }
}
