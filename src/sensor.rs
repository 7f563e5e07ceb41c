//! Sensitive segments.
//!
//! The transport engine reports every step that crosses a registered segment
//! to that segment's [`SegmentSensor`]. The sensor folds the step into the
//! event's hit collection, creating the collection the first time it fires
//! in an event.

use tracing::debug;

use crate::detector::{Category, CollectionId, DetectorSetup, SegmentSpec};
use crate::error::{AnalysisError, Result};
use crate::hits::{EventHits, Hit, HitCollection};

/// One step of a simulated track inside a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Energy deposited along the step, MeV.
    pub energy_deposit: f64,
    /// Geometric step length, mm.
    pub step_length: f64,
    /// Whether the stepping particle is charged.
    pub charged: bool,
    /// Readout layer (copy number) inside the segment.
    pub layer: usize,
}

impl Step {
    pub fn new(energy_deposit: f64, step_length: f64, charged: bool) -> Self {
        Self {
            energy_deposit,
            step_length,
            charged,
            layer: 0,
        }
    }

    pub fn with_layer(mut self, layer: usize) -> Self {
        self.layer = layer;
        self
    }

    /// Path length that counts toward the track length (neutral steps count zero).
    pub fn charged_path(&self) -> f64 {
        if self.charged { self.step_length } else { 0.0 }
    }
}

/// Accumulates steps of one segment into that segment's hit collection.
#[derive(Debug, Clone)]
pub struct SegmentSensor {
    category: Category,
    collection_id: CollectionId,
    sensor_name: String,
    collection_name: String,
    layers: usize,
}

impl SegmentSensor {
    pub fn new(spec: &SegmentSpec, collection_id: CollectionId) -> Self {
        Self {
            category: spec.category,
            collection_id,
            sensor_name: spec.sensor_name.clone(),
            collection_name: spec.collection_name.clone(),
            layers: spec.layers,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn name(&self) -> &str {
        &self.sensor_name
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Creates this event's collection if it does not exist yet.
    ///
    /// A fresh collection holds one zeroed hit per layer plus the summary hit.
    pub fn initialize<'a>(&self, hits: &'a mut EventHits) -> &'a mut HitCollection {
        hits.get_or_insert_with(self.collection_id, || {
            let mut collection = HitCollection::new(&self.sensor_name, &self.collection_name);
            for _ in 0..=self.layers {
                collection.insert(Hit::new());
            }
            collection
        })
    }

    /// Folds one step into the current event.
    pub fn process_step(&self, step: &Step, hits: &mut EventHits) -> Result<()> {
        let layers = self.layers;
        if layers > 0 && step.layer >= layers {
            return Err(AnalysisError::LayerOutOfRange {
                sensor: self.sensor_name.clone(),
                layer: step.layer,
                layers,
            });
        }

        let collection = self.initialize(hits);

        let energy = step.energy_deposit;
        let path = step.charged_path();
        if energy <= 0.0 && path <= 0.0 {
            return Ok(());
        }

        if layers > 0
            && let Some(layer_hit) = collection.get_mut(step.layer)
        {
            layer_hit.add(energy, path);
        }
        if let Some(summary) = collection.last_mut() {
            summary.add(energy, path);
        }
        Ok(())
    }
}

/// All sensors of a detector setup.
///
/// Shared read-only between workers; every mutation goes into the
/// per-event [`EventHits`].
#[derive(Debug, Clone)]
pub struct SensorArray {
    sensors: Vec<SegmentSensor>,
}

impl SensorArray {
    pub fn new(setup: &DetectorSetup) -> Self {
        let sensors = setup
            .segments()
            .iter()
            .enumerate()
            .map(|(i, spec)| SegmentSensor::new(spec, CollectionId(i)))
            .collect();
        Self { sensors }
    }

    pub fn sensors(&self) -> &[SegmentSensor] {
        &self.sensors
    }

    pub fn sensor(&self, category: Category) -> Result<&SegmentSensor> {
        self.sensors
            .iter()
            .find(|s| s.category == category)
            .ok_or(AnalysisError::UnregisteredCategory(category))
    }

    /// Creates every registered collection for a new event.
    pub fn begin_event(&self, hits: &mut EventHits) {
        for sensor in &self.sensors {
            sensor.initialize(hits);
        }
    }

    /// Step entry point for the transport engine.
    ///
    /// `path_length` only counts when `charged_with_path` is set.
    pub fn record_step(
        &self,
        category: Category,
        energy_deposit: f64,
        path_length: f64,
        charged_with_path: bool,
        hits: &mut EventHits,
    ) -> Result<()> {
        let step = Step::new(energy_deposit, path_length, charged_with_path);
        self.record(category, &step, hits)
    }

    pub fn record(&self, category: Category, step: &Step, hits: &mut EventHits) -> Result<()> {
        self.sensor(category)?.process_step(step, hits)
    }

    /// Dumps the event's collections at debug level.
    pub fn end_event(&self, event_id: u64, hits: &EventHits) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        for (_, collection) in hits.iter() {
            for (i, hit) in collection.iter().enumerate() {
                debug!(
                    event = event_id,
                    collection = collection.name(),
                    index = i,
                    edep_mev = hit.energy_deposit(),
                    track_mm = hit.track_length(),
                    "hit"
                );
            }
        }
    }
}
