//! Per-event hit model.

mod collection;
mod hit;

pub use collection::{EventHits, HitCollection};
pub use hit::Hit;
