//! Internal units and human-readable formatting.
//!
//! Energies are stored in MeV and lengths in mm. Multiply by a constant to
//! convert into internal units, divide to convert out of them.

use std::fmt;

pub const MEV: f64 = 1.0;
pub const EV: f64 = 1e-6 * MEV;
pub const KEV: f64 = 1e-3 * MEV;
pub const GEV: f64 = 1e3 * MEV;

pub const MM: f64 = 1.0;
pub const UM: f64 = 1e-3 * MM;
pub const CM: f64 = 10.0 * MM;
pub const M: f64 = 1e3 * MM;

/// Physical dimension of a stored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Energy,
    Length,
}

impl Dimension {
    /// Candidate units in ascending order.
    fn units(self) -> &'static [(f64, &'static str)] {
        match self {
            Dimension::Energy => &[(EV, "eV"), (KEV, "keV"), (MEV, "MeV"), (GEV, "GeV")],
            Dimension::Length => &[(UM, "um"), (MM, "mm"), (CM, "cm"), (M, "m")],
        }
    }

    fn reference(self) -> (f64, &'static str) {
        match self {
            Dimension::Energy => (MEV, "MeV"),
            Dimension::Length => (MM, "mm"),
        }
    }
}

/// Display adapter that prints a value in the largest unit not exceeding it.
///
/// Honors the formatter precision (default 4 significant decimals).
#[derive(Debug, Clone, Copy)]
pub struct BestUnit {
    pub value: f64,
    pub dimension: Dimension,
}

impl BestUnit {
    pub fn new(value: f64, dimension: Dimension) -> Self {
        Self { value, dimension }
    }

    pub fn energy(value: f64) -> Self {
        Self::new(value, Dimension::Energy)
    }

    pub fn length(value: f64) -> Self {
        Self::new(value, Dimension::Length)
    }

    /// Returns the chosen (scaled value, unit symbol).
    pub fn resolve(&self) -> (f64, &'static str) {
        let magnitude = self.value.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            let (unit, symbol) = self.dimension.reference();
            return (self.value / unit, symbol);
        }
        let units = self.dimension.units();
        let (unit, symbol) = units
            .iter()
            .rev()
            .find(|(unit, _)| magnitude >= *unit)
            .copied()
            .unwrap_or(units[0]);
        (self.value / unit, symbol)
    }
}

impl fmt::Display for BestUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, symbol) = self.resolve();
        let precision = f.precision().unwrap_or(4);
        let text = format!("{value:.precision$} {symbol}");
        match f.width() {
            Some(width) => write!(f, "{text:>width$}"),
            None => f.write_str(&text),
        }
    }
}
