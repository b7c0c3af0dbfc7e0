//! Unit tests for feature format implementations.
//!
//! These tests verify the correctness of encoding, decoding, and round-trip
//! conversions between the two formats.

mod overlay_tests;

use crate::model::{FeatureMeta, FeatureRecord, Point};

/// The triangle used throughout the codec tests.
pub(super) fn lobby() -> FeatureRecord {
    FeatureRecord::new(
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ],
        FeatureMeta::new("Lobby", "amenity", "wifi, printer", "https://x"),
    )
}
