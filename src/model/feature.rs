//! Feature data model: a closed polygon plus four metadata strings.

use serde::{Deserialize, Serialize};

use crate::constants::UNNAMED_LABEL;
use crate::model::geometry::{BoundingBox, Point, centroid};

/// Unique identifier for a feature within one store.
pub type FeatureId = u32;

/// Metadata attached to a feature.
///
/// All four values are free text. An empty string means "absent".
/// `services` keeps the raw comma-joined form and is only split into tags
/// when read through [`FeatureMeta::service_tags`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub services: String,
    pub target: String,
}

impl FeatureMeta {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        services: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            services: services.into(),
            target: target.into(),
        }
    }

    /// Name for display, `"(unnamed)"` when empty.
    pub fn title(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED_LABEL
        } else {
            &self.name
        }
    }

    /// Parsed service tags.
    pub fn service_tags(&self) -> Vec<String> {
        parse_services(&self.services)
    }

    /// External link, if one is set.
    pub fn target(&self) -> Option<&str> {
        (!self.target.is_empty()).then_some(self.target.as_str())
    }
}

/// Split a comma-joined service list: trim each entry, drop empty entries
/// and repeated tags, keep first-seen order.
pub fn parse_services(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Join service tags back into the stored comma form.
pub fn join_services<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// A feature as it travels through the interchange formats: no identity,
/// just geometry and metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub points: Vec<Point>,
    pub meta: FeatureMeta,
}

impl FeatureRecord {
    pub fn new(points: Vec<Point>, meta: FeatureMeta) -> Self {
        Self { points, meta }
    }

    /// Drop a trailing vertex equal to the first (a closed ring re-opened for editing).
    pub fn strip_closing_point(&mut self) {
        if self.points.len() > 3 && self.points.first() == self.points.last() {
            self.points.pop();
        }
    }
}

/// A committed feature in a [`FeatureStore`](crate::model::FeatureStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Unique identifier.
    pub id: FeatureId,
    /// Polygon vertices in document space, open representation.
    pub points: Vec<Point>,
    /// Name, type, services and target.
    pub meta: FeatureMeta,
}

impl Feature {
    pub fn new(id: FeatureId, points: Vec<Point>, meta: FeatureMeta) -> Self {
        Self { id, points, meta }
    }

    /// Axis-aligned bounds of the polygon.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.points)
    }

    /// Vertex mean, used as the rotation pivot.
    pub fn centroid(&self) -> Option<Point> {
        centroid(&self.points)
    }

    /// Interchange form of this feature.
    pub fn to_record(&self) -> FeatureRecord {
        FeatureRecord::new(self.points.clone(), self.meta.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_services_trims_and_drops_empty() {
        assert_eq!(parse_services("wifi, printer"), vec!["wifi", "printer"]);
        assert_eq!(parse_services(" ,wifi,, printer ,"), vec!["wifi", "printer"]);
        assert_eq!(parse_services("wifi, wifi ,printer"), vec!["wifi", "printer"]);
        assert!(parse_services("").is_empty());
        assert!(parse_services(" , ,").is_empty());
    }

    #[test]
    fn test_title_falls_back_to_unnamed() {
        let mut meta = FeatureMeta::default();
        assert_eq!(meta.title(), "(unnamed)");
        meta.name = "Lobby".into();
        assert_eq!(meta.title(), "Lobby");
    }

    #[test]
    fn test_target_is_optional() {
        let mut meta = FeatureMeta::default();
        assert_eq!(meta.target(), None);
        meta.target = "https://x".into();
        assert_eq!(meta.target(), Some("https://x"));
    }

    #[test]
    fn test_strip_closing_point() {
        let mut closed = FeatureRecord::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(0.0, 0.0),
            ],
            FeatureMeta::default(),
        );
        closed.strip_closing_point();
        assert_eq!(closed.points.len(), 3);

        // Already open: untouched
        closed.strip_closing_point();
        assert_eq!(closed.points.len(), 3);
    }

    proptest! {
        #[test]
        fn reparsing_joined_services_is_stable(
            tags in proptest::collection::vec("[ a-z]{0,6}", 0..8)
        ) {
            let raw = tags.join(",");
            let parsed = parse_services(&raw);
            let rejoined = join_services(&parsed);
            prop_assert_eq!(parse_services(&rejoined), parsed.clone());
            prop_assert!(parsed.iter().all(|t| !t.is_empty() && t.trim() == t));
        }
    }
}
