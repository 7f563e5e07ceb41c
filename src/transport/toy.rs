use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::sensor::{SensorArray, Step};
use crate::units::{KEV, MM};

use super::TransportEngine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToySourceConfig {
    pub seed: u64,
    /// Probability that a particle history reaches a given segment.
    pub hit_probability: f64,
    /// Upper bound of steps per reached segment.
    pub max_steps: u32,
    /// Mean deposit per step, MeV.
    pub mean_deposit: f64,
    /// Mean step length, mm.
    pub mean_step: f64,
    pub charged_fraction: f64,
}

impl Default for ToySourceConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            hit_probability: 0.4,
            max_steps: 20,
            mean_deposit: 80.0 * KEV,
            mean_step: 0.8 * MM,
            charged_fraction: 0.7,
        }
    }
}

/// Synthetic engine producing random steps in every registered segment.
///
/// Each event gets its own RNG stream derived from the seed and the event id,
/// so an event yields the same steps whichever worker tracks it.
#[derive(Debug, Clone, Default)]
pub struct ToySource {
    config: ToySourceConfig,
}

impl ToySource {
    pub fn new(config: ToySourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToySourceConfig {
        &self.config
    }

    fn rng_for(&self, event_id: u64) -> StdRng {
        let mixed = event_id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.config.seed ^ mixed)
    }
}

/// Exponentially distributed sample with the given mean.
fn exponential(rng: &mut StdRng, mean: f64) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    -mean * (1.0 - u).ln()
}

impl TransportEngine for ToySource {
    fn transport(&self, event: &mut Event, sensors: &SensorArray) -> Result<()> {
        let cfg = &self.config;
        let mut rng = self.rng_for(event.id());

        sensors.begin_event(event.hits_mut());
        for sensor in sensors.sensors() {
            if rng.gen_range(0.0..1.0) >= cfg.hit_probability || cfg.max_steps == 0 {
                continue;
            }
            let num_steps = rng.gen_range(1..=cfg.max_steps);
            for _ in 0..num_steps {
                let mut step = Step::new(
                    exponential(&mut rng, cfg.mean_deposit),
                    exponential(&mut rng, cfg.mean_step),
                    rng.gen_range(0.0..1.0) < cfg.charged_fraction,
                );
                if sensor.layers() > 0 {
                    step = step.with_layer(rng.gen_range(0..sensor.layers()));
                }
                sensor.process_step(&step, event.hits_mut())?;
            }
        }
        sensors.end_event(event.id(), event.hits());
        Ok(())
    }
}
