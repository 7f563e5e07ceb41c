use crate::detector::CollectionId;

use super::Hit;

/// Ordered hits produced by one sensor during one event.
///
/// Layer hits (if any) come first; the last entry is the summary hit.
#[derive(Debug, Clone, PartialEq)]
pub struct HitCollection {
    sensor_name: String,
    name: String,
    hits: Vec<Hit>,
}

impl HitCollection {
    pub fn new(sensor_name: &str, name: &str) -> Self {
        Self {
            sensor_name: sensor_name.to_string(),
            name: name.to_string(),
            hits: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_name(&self) -> &str {
        &self.sensor_name
    }

    /// Appends a hit and returns its index.
    pub fn insert(&mut self, hit: Hit) -> usize {
        self.hits.push(hit);
        self.hits.len() - 1
    }

    pub fn entries(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Hit> {
        self.hits.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Hit> {
        self.hits.get_mut(index)
    }

    /// The summary hit.
    pub fn last(&self) -> Option<&Hit> {
        self.hits.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Hit> {
        self.hits.last_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }
}

/// Hit collections of one event, indexed by [`CollectionId`].
#[derive(Debug, Clone, Default)]
pub struct EventHits {
    collections: Vec<Option<HitCollection>>,
}

impl EventHits {
    pub fn new(num_collections: usize) -> Self {
        Self {
            collections: vec![None; num_collections],
        }
    }

    pub fn get(&self, id: CollectionId) -> Option<&HitCollection> {
        self.collections.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: CollectionId) -> Option<&mut HitCollection> {
        self.collections.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: CollectionId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the collection at `id`, creating it with `create` when absent.
    pub fn get_or_insert_with<F>(&mut self, id: CollectionId, create: F) -> &mut HitCollection
    where
        F: FnOnce() -> HitCollection,
    {
        if id.0 >= self.collections.len() {
            self.collections.resize(id.0 + 1, None);
        }
        self.collections[id.0].get_or_insert_with(create)
    }

    /// Iterates over the collections that exist in this event.
    pub fn iter(&self) -> impl Iterator<Item = (CollectionId, &HitCollection)> {
        self.collections
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (CollectionId(i), c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_insert_and_last() {
        let mut hc = HitCollection::new("RightSD", "RightHitsCollection");
        assert!(hc.is_empty());
        assert!(hc.last().is_none());

        let mut layer = Hit::new();
        layer.add(0.1, 0.2);
        assert_eq!(hc.insert(layer), 0);
        let mut total = Hit::new();
        total.add(1.0, 2.0);
        assert_eq!(hc.insert(total), 1);

        assert_eq!(hc.entries(), 2);
        assert!((hc.last().unwrap().energy_deposit() - 1.0).abs() < 1e-10);
        assert!((hc.get(0).unwrap().track_length() - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_event_hits_create_once() {
        let mut hits = EventHits::new(3);
        assert!(!hits.contains(CollectionId(1)));

        let hc = hits.get_or_insert_with(CollectionId(1), || HitCollection::new("SD", "Hits"));
        hc.insert(Hit::new());
        let hc = hits.get_or_insert_with(CollectionId(1), || HitCollection::new("SD", "Other"));
        assert_eq!(hc.name(), "Hits");
        assert_eq!(hc.entries(), 1);

        assert_eq!(hits.iter().count(), 1);
    }

    #[test]
    fn test_event_hits_grows_for_unseen_id() {
        let mut hits = EventHits::default();
        hits.get_or_insert_with(CollectionId(4), || HitCollection::new("SD", "Hits"));
        assert!(hits.contains(CollectionId(4)));
        assert!(!hits.contains(CollectionId(0)));
    }
}
