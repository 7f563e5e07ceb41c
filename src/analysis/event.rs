use std::sync::Arc;

use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::event::Event;
use crate::hits::Hit;
use crate::units::BestUnit;

use super::context::AnalysisContext;
use super::result::RunResult;
use super::run::RunContext;

/// Folds each finished event's summary hits into a [`RunResult`].
pub struct EventAggregator {
    ctx: Arc<AnalysisContext>,
    run_context: RunContext,
}

impl EventAggregator {
    pub fn new(ctx: Arc<AnalysisContext>, run_context: RunContext) -> Self {
        Self { ctx, run_context }
    }

    /// Reads the summary hit of every booked segment and fills `result`.
    ///
    /// Fails without touching `result` if any collection is missing or empty.
    pub fn end_of_event(&self, event: &Event, result: &mut RunResult) -> Result<()> {
        let ids = self.ctx.collection_ids()?;
        let booking = self.ctx.booking();

        let mut summaries: Vec<Hit> = Vec::with_capacity(ids.len());
        for (slot, &id) in booking.slots().iter().zip(ids) {
            let collection = event.hits().get(id).ok_or_else(|| {
                AnalysisError::MissingCollection {
                    id,
                    name: slot.collection_name.clone(),
                    event: event.id(),
                }
            })?;
            let hit = collection
                .last()
                .ok_or_else(|| AnalysisError::EmptyCollection {
                    name: slot.collection_name.clone(),
                    event: event.id(),
                })?;
            summaries.push(*hit);
        }

        self.print_progress(event.id(), &summaries);

        for (slot, hit) in booking.slots().iter().zip(&summaries) {
            fill(result, slot.energy, hit.energy_deposit())?;
            fill(result, slot.length, hit.track_length())?;
        }

        // One fill per segment, not one fill of the summed deposit.
        for hit in &summaries {
            fill(result, booking.total(), hit.energy_deposit())?;
        }

        let categories = booking.table_categories();
        let mut row = Vec::with_capacity(2 * categories.len());
        for pass in 0..2 {
            for category in categories {
                let index = booking
                    .slots()
                    .iter()
                    .position(|s| s.category == *category)
                    .ok_or(AnalysisError::UnregisteredCategory(*category))?;
                let hit = &summaries[index];
                row.push(if pass == 0 {
                    hit.energy_deposit()
                } else {
                    hit.track_length()
                });
            }
        }
        result.table_mut().add_row(&row)
    }

    fn print_progress(&self, event_id: u64, summaries: &[Hit]) {
        let config = self.ctx.config();
        let modulo = config.print_progress;
        if modulo == 0 || event_id % modulo != 0 {
            return;
        }
        let Some(index) = self
            .ctx
            .booking()
            .slots()
            .iter()
            .position(|s| s.category == config.primary)
        else {
            return;
        };
        let hit = &summaries[index];
        info!("---> End of event: {event_id} ({})", self.run_context);
        info!(
            "   {}: total energy: {:>7} total track length: {:>7}",
            config.primary.tag(),
            BestUnit::energy(hit.energy_deposit()),
            BestUnit::length(hit.track_length())
        );
    }
}

fn fill(result: &mut RunResult, index: usize, value: f64) -> Result<()> {
    let h = result.h1_mut(index).ok_or_else(|| {
        AnalysisError::SchemaMismatch(format!("run result has no histogram #{index}"))
    })?;
    h.fill(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::AnalysisConfig;
    use crate::detector::{Category, DetectorSetup};
    use crate::error::ErrorKind;
    use crate::sensor::SensorArray;

    fn setup() -> (Arc<AnalysisContext>, SensorArray, Arc<DetectorSetup>) {
        let detector = Arc::new(DetectorSetup::standard());
        let mut config = AnalysisConfig::new();
        config.print_progress = 0;
        let ctx = AnalysisContext::new(config, detector.clone()).unwrap();
        let sensors = SensorArray::new(&detector);
        (ctx, sensors, detector)
    }

    #[test]
    fn test_event_fills_every_histogram_once() {
        let (ctx, sensors, detector) = setup();
        let aggregator = EventAggregator::new(ctx.clone(), RunContext::Master);
        let mut result = ctx.booking().book();

        let mut event = Event::new(0, detector.num_collections());
        sensors.begin_event(event.hits_mut());
        sensors
            .record_step(Category::Left, 1.2, 30.0, true, event.hits_mut())
            .unwrap();
        aggregator.end_of_event(&event, &mut result).unwrap();

        let total = ctx.booking().total();
        for (i, h) in result.histograms().iter().enumerate() {
            let expected = if i == total { 7 } else { 1 };
            assert_eq!(h.entries(), expected, "histogram {}", h.name());
        }
        let left = result.h1_by_name("ELeft").unwrap();
        assert!((left.mean() - 1.2).abs() < 1e-10);
        assert_eq!(result.table().rows(), &[vec![0.0, 1.2, 0.0, 30.0]]);
    }

    #[test]
    fn test_missing_collection_is_data_absence() {
        let (ctx, sensors, detector) = setup();
        let aggregator = EventAggregator::new(ctx.clone(), RunContext::Master);
        let mut result = ctx.booking().book();

        let mut event = Event::new(5, detector.num_collections());
        sensors
            .record_step(Category::Right, 2.0, 1.0, true, event.hits_mut())
            .unwrap();
        let err = aggregator.end_of_event(&event, &mut result).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataAbsence);
        assert!(matches!(err, AnalysisError::MissingCollection { event: 5, .. }));
        assert!(result.histograms().iter().all(|h| h.entries() == 0));
        assert!(result.table().is_empty());
    }
}
