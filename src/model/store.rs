//! Ordered feature storage.

use crate::constants::MIN_POLYGON_VERTICES;
use crate::model::feature::{Feature, FeatureId, FeatureMeta, FeatureRecord};
use crate::model::geometry::{Point, polygon_contains};

/// Storage for the features of one role (author or viewer).
///
/// Insertion order is render order: later features are drawn on top and
/// win hit tests.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    features: Vec<Feature>,
    /// Counter for generating unique feature IDs.
    next_id: FeatureId,
    /// Set when features change. Used to skip redundant scene rebuilds.
    dirty: bool,
}

impl Default for FeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureStore {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
            next_id: 1,
            dirty: true,
        }
    }

    /// Build a store from decoded records, skipping any with too few vertices.
    pub fn from_records(records: impl IntoIterator<Item = FeatureRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record.points, record.meta);
        }
        store
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Append a feature and return its ID.
    ///
    /// Returns `None` (and stores nothing) for fewer than three points.
    pub fn insert(&mut self, points: Vec<Point>, meta: FeatureMeta) -> Option<FeatureId> {
        if points.len() < MIN_POLYGON_VERTICES {
            log::debug!("Refusing feature with {} points", points.len());
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.features.push(Feature::new(id, points, meta));
        self.mark_dirty();
        Some(id)
    }

    /// Remove a feature by ID.
    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        let index = self.features.iter().position(|f| f.id == id)?;
        self.mark_dirty();
        Some(self.features.remove(index))
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Mutable access; marks the store dirty.
    pub fn get_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        let feature = self.features.iter_mut().find(|f| f.id == id)?;
        self.dirty = true;
        Some(feature)
    }

    /// Features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.features.is_empty() {
            self.mark_dirty();
        }
        self.features.clear();
    }

    /// Interchange records in store order.
    pub fn records(&self) -> Vec<FeatureRecord> {
        self.features.iter().map(Feature::to_record).collect()
    }

    /// Topmost feature whose polygon contains `point`.
    pub fn hit_test(&self, point: &Point) -> Option<FeatureId> {
        self.hit_test_where(point, |_| true)
    }

    /// Topmost feature containing `point` among those accepted by `filter`.
    pub fn hit_test_where(
        &self,
        point: &Point,
        filter: impl Fn(&Feature) -> bool,
    ) -> Option<FeatureId> {
        self.features
            .iter()
            .rev()
            .filter(|f| filter(*f))
            .find(|f| polygon_contains(&f.points, point))
            .map(|f| f.id)
    }

    /// Topmost vertex handle within `radius` of `point`, as (feature, vertex index).
    pub fn hit_test_vertex(&self, point: &Point, radius: f64) -> Option<(FeatureId, usize)> {
        self.features.iter().rev().find_map(|f| {
            f.points
                .iter()
                .position(|v| v.distance_to(point) <= radius)
                .map(|index| (f.id, index))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn test_insert_and_remove() {
        let mut store = FeatureStore::new();
        let a = store.insert(square(0.0, 0.0, 10.0), FeatureMeta::default()).unwrap();
        let b = store.insert(square(20.0, 0.0, 10.0), FeatureMeta::default()).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(store.len(), 1);
        assert!(store.get(a).is_none());
        assert!(store.remove(a).is_none());
    }

    #[test]
    fn test_insert_rejects_degenerate_polygons() {
        let mut store = FeatureStore::new();
        let two = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(store.insert(two, FeatureMeta::default()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut store = FeatureStore::new();
        let a = store.insert(square(0.0, 0.0, 1.0), FeatureMeta::default()).unwrap();
        store.remove(a);
        let b = store.insert(square(0.0, 0.0, 1.0), FeatureMeta::default()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_preserved() {
        let mut store = FeatureStore::new();
        for name in ["a", "b", "c"] {
            store.insert(square(0.0, 0.0, 1.0), FeatureMeta::new(name, "", "", ""));
        }
        let names: Vec<_> = store.iter().map(|f| f.meta.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut store = FeatureStore::new();
        let bottom = store.insert(square(0.0, 0.0, 100.0), FeatureMeta::default()).unwrap();
        let top = store.insert(square(40.0, 40.0, 20.0), FeatureMeta::default()).unwrap();

        assert_eq!(store.hit_test(&Point::new(50.0, 50.0)), Some(top));
        assert_eq!(store.hit_test(&Point::new(10.0, 10.0)), Some(bottom));
        assert_eq!(store.hit_test(&Point::new(500.0, 500.0)), None);
        assert_eq!(
            store.hit_test_where(&Point::new(50.0, 50.0), |f| f.id != top),
            Some(bottom)
        );
    }

    #[test]
    fn test_hit_test_vertex() {
        let mut store = FeatureStore::new();
        let id = store.insert(square(0.0, 0.0, 100.0), FeatureMeta::default()).unwrap();

        assert_eq!(store.hit_test_vertex(&Point::new(101.0, 99.0), 4.5), Some((id, 2)));
        assert_eq!(store.hit_test_vertex(&Point::new(50.0, 50.0), 4.5), None);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut store = FeatureStore::new();
        assert!(store.is_dirty());
        store.clear_dirty();

        let id = store.insert(square(0.0, 0.0, 1.0), FeatureMeta::default()).unwrap();
        assert!(store.is_dirty());
        store.clear_dirty();

        let _ = store.get(id);
        assert!(!store.is_dirty());
        store.get_mut(id).unwrap().meta.name = "x".into();
        assert!(store.is_dirty());
    }

    #[test]
    fn test_from_records_skips_short_polygons() {
        let records = vec![
            FeatureRecord::new(square(0.0, 0.0, 1.0), FeatureMeta::default()),
            FeatureRecord::new(vec![Point::new(0.0, 0.0)], FeatureMeta::default()),
        ];
        let store = FeatureStore::from_records(records);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].points, square(0.0, 0.0, 1.0));
    }
}
