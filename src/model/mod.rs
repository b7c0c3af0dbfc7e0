//! Data models shared by the editor and the viewer.

mod feature;
mod geometry;
mod reference;
mod store;

pub use feature::{
    Feature, FeatureId, FeatureMeta, FeatureRecord, join_services, parse_services,
};
pub use geometry::{
    BoundingBox, Point, centroid, normalize_angle, polygon_contains, snap_angle,
};
pub use reference::ReferenceImage;
pub use store::FeatureStore;
