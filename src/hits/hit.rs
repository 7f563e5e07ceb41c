use serde::{Deserialize, Serialize};

/// Energy deposit and charged track length accumulated in one segment during
/// one event.
///
/// Both quantities start at zero and never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    energy_deposit: f64,
    track_length: f64,
}

impl Hit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step contribution. Non-positive and non-finite deltas are dropped.
    pub fn add(&mut self, energy_deposit: f64, track_length: f64) {
        if energy_deposit > 0.0 && energy_deposit.is_finite() {
            self.energy_deposit += energy_deposit;
        }
        if track_length > 0.0 && track_length.is_finite() {
            self.track_length += track_length;
        }
    }

    /// Deposited energy in MeV.
    pub fn energy_deposit(&self) -> f64 {
        self.energy_deposit
    }

    /// Charged track length in mm.
    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    pub fn is_empty(&self) -> bool {
        self.energy_deposit == 0.0 && self.track_length == 0.0
    }
}
