use std::sync::{Arc, OnceLock};

use crate::detector::{CollectionId, DetectorSetup};
use crate::error::Result;

use super::booking::Booking;
use super::config::AnalysisConfig;

/// Read-only state shared by every aggregator of a process.
///
/// Built once at startup and handed around behind an `Arc`. Collection ids
/// are resolved from names on first use and cached for all workers.
#[derive(Debug)]
pub struct AnalysisContext {
    config: AnalysisConfig,
    setup: Arc<DetectorSetup>,
    booking: Booking,
    collection_ids: OnceLock<Vec<CollectionId>>,
}

impl AnalysisContext {
    pub fn new(config: AnalysisConfig, setup: Arc<DetectorSetup>) -> Result<Arc<Self>> {
        let booking = Booking::from_config(&config)?;
        Ok(Arc::new(Self {
            config,
            setup,
            booking,
            collection_ids: OnceLock::new(),
        }))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn setup(&self) -> &DetectorSetup {
        &self.setup
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    /// Collection id of every booked segment, in slot order.
    pub fn collection_ids(&self) -> Result<&[CollectionId]> {
        if let Some(ids) = self.collection_ids.get() {
            return Ok(ids);
        }
        let ids = self
            .booking
            .slots()
            .iter()
            .map(|slot| self.setup.collection_id(&slot.collection_name))
            .collect::<Result<Vec<_>>>()?;
        // A concurrent first call may have won; both computed the same ids.
        Ok(self.collection_ids.get_or_init(|| ids))
    }

    pub fn ids_resolved(&self) -> bool {
        self.collection_ids.get().is_some()
    }
}
