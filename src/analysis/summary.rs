use std::fmt;

use crate::units::BestUnit;

use super::booking::Booking;
use super::result::RunResult;
use super::run::RunContext;

/// End-of-run statistics block: mean and RMS of every filled histogram.
pub struct RunSummary<'a> {
    booking: &'a Booking,
    result: &'a RunResult,
    context: RunContext,
}

impl<'a> RunSummary<'a> {
    pub fn new(booking: &'a Booking, result: &'a RunResult, context: RunContext) -> Self {
        Self {
            booking,
            result,
            context,
        }
    }
}

impl fmt::Display for RunSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = if self.context.is_master() {
            "for the entire run".to_string()
        } else {
            format!("for the local thread ({})", self.context)
        };
        writeln!(f, " ----> print histograms statistic {scope}")?;
        writeln!(f)?;
        for (spec, h) in self.booking.histograms().iter().zip(self.result.histograms()) {
            if h.entries() == 0 {
                continue;
            }
            writeln!(
                f,
                " {} : mean = {} rms = {}",
                spec.name,
                BestUnit::new(h.mean(), spec.dimension),
                BestUnit::new(h.rms(), spec.dimension)
            )?;
        }
        Ok(())
    }
}
