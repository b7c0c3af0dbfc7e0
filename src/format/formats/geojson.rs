//! GeoJSON format implementation.
//!
//! Features are written as a `FeatureCollection` of `Polygon`s in document
//! coordinates. Each polygon has a single ring, closed by repeating the
//! first vertex. Services are a JSON array instead of the stored
//! comma-joined string.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::traits::{
    ExportData, ExportOptions, ExportResult, FeatureFormat, FormatWarning, ImportOptions,
    ImportResult,
};
use crate::model::{FeatureMeta, FeatureRecord, Point, join_services, parse_services};

const COLLECTION_TYPE: &str = "FeatureCollection";
const FEATURE_TYPE: &str = "Feature";
const POLYGON_TYPE: &str = "Polygon";

/// GeoJSON feature collection format.
///
/// Supports:
/// - `Polygon` geometries (first ring only)
/// - name, type, services and target properties
///
/// Does not support:
/// - Other geometry types (skipped with warning)
/// - Holes (inner rings are ignored)
pub struct GeoJsonFormat;

impl FeatureFormat for GeoJsonFormat {
    fn id(&self) -> &'static str {
        "geojson"
    }

    fn display_name(&self) -> &'static str {
        "GeoJSON"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json", "geojson"]
    }

    fn default_filename(&self) -> &'static str {
        "features.json"
    }

    fn export(
        &self,
        data: &ExportData<'_>,
        _options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let mut result = ExportResult::default();
        let mut features = Vec::with_capacity(data.records.len());

        for (index, record) in data.records.iter().enumerate() {
            if record.points.is_empty() {
                result.add_warning(
                    FormatWarning::warning("Skipped feature without points").at_feature(index),
                );
                continue;
            }
            features.push(GeoFeature::from_record(record));
        }

        result.features_exported = features.len();
        let collection = GeoCollection {
            kind: COLLECTION_TYPE.to_string(),
            features,
        };
        result.content = serde_json::to_string_pretty(&collection)?;
        result.filename = self.default_filename().to_string();

        log::info!("Exported {} features as GeoJSON", result.features_exported);
        Ok(result)
    }

    fn import(&self, text: &str, options: &ImportOptions) -> Result<ImportResult, FormatError> {
        let collection: InputCollection = serde_json::from_str(text)?;

        match collection.kind.as_deref() {
            None | Some(COLLECTION_TYPE) => {}
            Some(kind) => {
                return Err(FormatError::invalid_format(format!(
                    "Expected a {}, found '{}'",
                    COLLECTION_TYPE, kind
                )));
            }
        }

        let mut result = ImportResult::default();
        for (index, feature) in collection.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry else {
                result.add_warning(
                    FormatWarning::warning(format!("Skipped feature {}: no geometry", index))
                        .at_feature(index),
                );
                continue;
            };

            if geometry.kind != POLYGON_TYPE {
                result.add_warning(
                    FormatWarning::warning(format!(
                        "Skipped feature {}: unsupported geometry '{}'",
                        index, geometry.kind
                    ))
                    .at_feature(index),
                );
                continue;
            }

            let points = outer_ring(geometry.coordinates, index)?;
            if points.len() < crate::constants::MIN_POLYGON_VERTICES {
                result.add_warning(
                    FormatWarning::warning(format!(
                        "Skipped feature {}: ring has only {} positions",
                        index,
                        points.len()
                    ))
                    .at_feature(index),
                );
                continue;
            }

            let meta = feature.properties.unwrap_or_default().into_meta();
            result.records.push(FeatureRecord::new(points, meta));
        }

        log::info!("Imported {} features from GeoJSON", result.records.len());
        Ok(result.finish(options))
    }
}

/// First ring of a `Polygon` coordinate array as points.
///
/// Only the first two numbers of each position are used.
fn outer_ring(coordinates: serde_json::Value, index: usize) -> Result<Vec<Point>, FormatError> {
    let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(coordinates).map_err(|e| {
        FormatError::invalid_format(format!("Feature {}: bad polygon coordinates: {}", index, e))
    })?;

    let Some(ring) = rings.into_iter().next() else {
        return Ok(Vec::new());
    };

    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Point::new(*x, *y)),
            _ => Err(FormatError::invalid_format(format!(
                "Feature {}: position needs two numbers",
                index
            ))),
        })
        .collect()
}

/// Ring with the closing vertex appended when it is missing.
fn closed_ring(points: &[Point]) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if first != last => ring.push([first.x, first.y]),
        _ => {}
    }
    ring
}

// Output shape

#[derive(Serialize)]
struct GeoCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<GeoFeature>,
}

#[derive(Serialize)]
struct GeoFeature {
    #[serde(rename = "type")]
    kind: String,
    properties: GeoProperties,
    geometry: GeoPolygon,
}

#[derive(Serialize)]
struct GeoProperties {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    services: Vec<String>,
    target: String,
}

#[derive(Serialize)]
struct GeoPolygon {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<Vec<[f64; 2]>>,
}

impl GeoFeature {
    fn from_record(record: &FeatureRecord) -> Self {
        let meta = &record.meta;
        Self {
            kind: FEATURE_TYPE.to_string(),
            properties: GeoProperties {
                name: meta.name.clone(),
                kind: meta.kind.clone(),
                services: meta.service_tags(),
                target: meta.target.clone(),
            },
            geometry: GeoPolygon {
                kind: POLYGON_TYPE.to_string(),
                coordinates: vec![closed_ring(&record.points)],
            },
        }
    }
}

// Input shape: lenient, every property optional

#[derive(Deserialize)]
struct InputCollection {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    features: Vec<InputFeature>,
}

#[derive(Deserialize)]
struct InputFeature {
    #[serde(default)]
    properties: Option<InputProperties>,
    #[serde(default)]
    geometry: Option<InputGeometry>,
}

#[derive(Deserialize, Default)]
struct InputProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    services: Option<InputServices>,
    #[serde(default)]
    target: Option<String>,
}

/// Services as written by this crate (array) or as a raw comma string.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputServices {
    List(Vec<String>),
    Joined(String),
}

#[derive(Deserialize)]
struct InputGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

impl InputProperties {
    fn into_meta(self) -> FeatureMeta {
        let services = match self.services {
            Some(InputServices::List(tags)) => join_services(&tags),
            Some(InputServices::Joined(raw)) => join_services(&parse_services(&raw)),
            None => String::new(),
        };
        FeatureMeta::new(
            self.name.unwrap_or_default(),
            self.kind.unwrap_or_default(),
            services,
            self.target.unwrap_or_default(),
        )
    }
}
