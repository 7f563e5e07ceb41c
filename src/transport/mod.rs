//! Boundary to the particle-transport engine.
//!
//! The engine tracks one event at a time and reports every step inside a
//! sensitive segment through the [`SensorArray`]. Engines are shared by all
//! workers, so they must be `Sync` and keep per-event state on the stack.

pub mod toy;

pub use toy::{ToySource, ToySourceConfig};

use anyhow::Result;

use crate::event::Event;
use crate::sensor::SensorArray;

pub trait TransportEngine: Sync {
    /// Tracks event `event.id()` to completion, feeding steps to `sensors`.
    fn transport(&self, event: &mut Event, sensors: &SensorArray) -> Result<()>;
}

impl<F> TransportEngine for F
where
    F: Fn(&mut Event, &SensorArray) -> Result<()> + Sync,
{
    fn transport(&self, event: &mut Event, sensors: &SensorArray) -> Result<()> {
        self(event, sensors)
    }
}
