use crate::hits::EventHits;

/// Transport record of one event: its sequential id and the hit collections
/// the sensors produced while it was tracked.
#[derive(Debug, Clone)]
pub struct Event {
    id: u64,
    hits: EventHits,
}

impl Event {
    pub fn new(id: u64, num_collections: usize) -> Self {
        Self {
            id,
            hits: EventHits::new(num_collections),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn hits(&self) -> &EventHits {
        &self.hits
    }

    pub fn hits_mut(&mut self) -> &mut EventHits {
        &mut self.hits
    }
}
