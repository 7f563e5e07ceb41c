//! Sensor registration.
//!
//! A [`DetectorSetup`] is built once, before the first run, from the ordered
//! list of segments the geometry makes sensitive. It owns the
//! collection-name to [`CollectionId`] mapping and is shared read-only with
//! every worker afterwards.

mod category;

pub use category::Category;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Stable index of a registered hit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectionId(pub usize);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration record for one sensitive segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub category: Category,
    pub sensor_name: String,
    pub collection_name: String,
    /// Number of readout layers. Zero means the collection only carries the
    /// summary hit.
    pub layers: usize,
}

impl SegmentSpec {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            sensor_name: category.default_sensor_name(),
            collection_name: category.default_collection_name(),
            layers: 0,
        }
    }

    pub fn with_names(mut self, sensor_name: &str, collection_name: &str) -> Self {
        self.sensor_name = sensor_name.to_string();
        self.collection_name = collection_name.to_string();
        self
    }

    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }
}

/// Ordered, immutable set of registered segments.
#[derive(Debug, Clone)]
pub struct DetectorSetup {
    segments: Vec<SegmentSpec>,
}

impl DetectorSetup {
    /// Registers the given segments. Collection ids follow list order.
    pub fn new(segments: Vec<SegmentSpec>) -> Result<Self> {
        if segments.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "a detector setup needs at least one segment".to_string(),
            ));
        }

        let mut categories = HashSet::new();
        let mut sensors = HashSet::new();
        let mut collections = HashSet::new();
        for spec in &segments {
            if !categories.insert(spec.category) {
                return Err(AnalysisError::DuplicateRegistration(format!(
                    "category '{}'",
                    spec.category
                )));
            }
            if !sensors.insert(spec.sensor_name.as_str()) {
                return Err(AnalysisError::DuplicateRegistration(format!(
                    "sensor '{}'",
                    spec.sensor_name
                )));
            }
            if !collections.insert(spec.collection_name.as_str()) {
                return Err(AnalysisError::DuplicateRegistration(format!(
                    "hit collection '{}'",
                    spec.collection_name
                )));
            }
        }

        Ok(Self { segments })
    }

    /// All seven segments with default names and no layers.
    pub fn standard() -> Self {
        Self {
            segments: Category::ALL.iter().map(|&c| SegmentSpec::new(c)).collect(),
        }
    }

    pub fn segments(&self) -> &[SegmentSpec] {
        &self.segments
    }

    pub fn num_collections(&self) -> usize {
        self.segments.len()
    }

    /// Looks up a collection id by its registered name.
    pub fn collection_id(&self, name: &str) -> Result<CollectionId> {
        self.segments
            .iter()
            .position(|s| s.collection_name == name)
            .map(CollectionId)
            .ok_or_else(|| AnalysisError::UnknownCollection(name.to_string()))
    }

    pub fn collection_name(&self, id: CollectionId) -> Option<&str> {
        self.segments.get(id.0).map(|s| s.collection_name.as_str())
    }

    /// Returns the registration of `category` together with its collection id.
    pub fn segment(&self, category: Category) -> Result<(CollectionId, &SegmentSpec)> {
        self.segments
            .iter()
            .enumerate()
            .find(|(_, s)| s.category == category)
            .map(|(i, s)| (CollectionId(i), s))
            .ok_or(AnalysisError::UnregisteredCategory(category))
    }
}

impl Default for DetectorSetup {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_standard_setup_ids_follow_order() {
        let setup = DetectorSetup::standard();
        assert_eq!(setup.num_collections(), 7);
        assert_eq!(
            setup.collection_id("RightHitsCollection").unwrap(),
            CollectionId(0)
        );
        assert_eq!(
            setup.collection_id("TopLHitsCollection").unwrap(),
            CollectionId(6)
        );
        assert_eq!(setup.collection_name(CollectionId(2)), Some("BotHitsCollection"));
    }

    #[test]
    fn test_unknown_collection_is_configuration_error() {
        let setup = DetectorSetup::standard();
        let err = setup.collection_id("AbsorberHitsCollection9").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unregistered_category() {
        let setup = DetectorSetup::new(vec![
            SegmentSpec::new(Category::Right),
            SegmentSpec::new(Category::Left),
        ])
        .unwrap();
        assert!(setup.segment(Category::Left).is_ok());
        let err = setup.segment(Category::Back).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::UnregisteredCategory(Category::Back)
        ));
    }

    #[test]
    fn test_duplicate_registrations_rejected() {
        let dup_category = DetectorSetup::new(vec![
            SegmentSpec::new(Category::Right),
            SegmentSpec::new(Category::Right).with_names("OtherSD", "OtherHits"),
        ]);
        assert!(matches!(
            dup_category,
            Err(AnalysisError::DuplicateRegistration(_))
        ));

        let dup_collection = DetectorSetup::new(vec![
            SegmentSpec::new(Category::Right).with_names("A", "Hits"),
            SegmentSpec::new(Category::Left).with_names("B", "Hits"),
        ]);
        assert!(matches!(
            dup_collection,
            Err(AnalysisError::DuplicateRegistration(_))
        ));
    }

    #[test]
    fn test_empty_setup_rejected() {
        assert!(DetectorSetup::new(Vec::new()).is_err());
    }
}
