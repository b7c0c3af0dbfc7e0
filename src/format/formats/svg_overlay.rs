//! SVG overlay format implementation.
//!
//! The overlay is a plain SVG document that can be dropped on top of the
//! reference image: one `<polygon>` per feature inside `<g id="features">`,
//! metadata carried in `data-*` attributes. The reference image itself may
//! be embedded as a faint backdrop, which importers ignore.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::format::error::FormatError;
use crate::format::traits::{
    ExportData, ExportOptions, ExportResult, FeatureFormat, FormatWarning, ImportOptions,
    ImportResult,
};
use crate::model::{FeatureMeta, FeatureRecord, Point};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const ROLE_ATTRIBUTE: &str = "data-role";
const FEATURE_ROLE: &str = "feature";

/// SVG overlay format.
///
/// Supports:
/// - Polygons with name, type, services and target
/// - Optional embedded reference image (export only)
///
/// Any element with `data-role="feature"` is read back, whatever its tag.
pub struct OverlayFormat;

impl FeatureFormat for OverlayFormat {
    fn id(&self) -> &'static str {
        "overlay"
    }

    fn display_name(&self) -> &'static str {
        "SVG overlay"
    }

    fn extensions(&self) -> &[&'static str] {
        &["svg"]
    }

    fn default_filename(&self) -> &'static str {
        "overlay.svg"
    }

    fn export(
        &self,
        data: &ExportData<'_>,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let canvas = data
            .background
            .map(|bg| bg.size)
            .unwrap_or(options.default_canvas);
        let view_box = format!("0 0 {} {}", canvas.width, canvas.height);

        // <svg>
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", SVG_NAMESPACE));
        svg.push_attribute(("viewBox", view_box.as_str()));
        writer
            .write_event(Event::Start(svg))
            .map_err(|e| FormatError::Xml(e.into()))?;

        // Backdrop
        if let Some(href) = data.background.and_then(|bg| bg.href.as_deref()) {
            let width = canvas.width.to_string();
            let height = canvas.height.to_string();
            let opacity = options.background_opacity.to_string();
            let mut image = BytesStart::new("image");
            image.push_attribute(("href", href));
            image.push_attribute(("x", "0"));
            image.push_attribute(("y", "0"));
            image.push_attribute(("width", width.as_str()));
            image.push_attribute(("height", height.as_str()));
            image.push_attribute(("opacity", opacity.as_str()));
            writer
                .write_event(Event::Empty(image))
                .map_err(|e| FormatError::Xml(e.into()))?;
        }

        // <g id="features">
        let mut group = BytesStart::new("g");
        group.push_attribute(("id", "features"));
        writer
            .write_event(Event::Start(group))
            .map_err(|e| FormatError::Xml(e.into()))?;

        let mut result = ExportResult::default();
        for (index, record) in data.records.iter().enumerate() {
            if record.points.is_empty() {
                result.add_warning(
                    FormatWarning::warning("Skipped feature without points").at_feature(index),
                );
                continue;
            }
            self.write_polygon(&mut writer, record)?;
            result.features_exported += 1;
        }

        writer
            .write_event(Event::End(BytesEnd::new("g")))
            .map_err(|e| FormatError::Xml(e.into()))?;
        writer
            .write_event(Event::End(BytesEnd::new("svg")))
            .map_err(|e| FormatError::Xml(e.into()))?;

        result.content = String::from_utf8(writer.into_inner())
            .map_err(|_| FormatError::invalid_format("Invalid UTF-8 in SVG"))?;
        result.filename = self.default_filename().to_string();

        log::info!("Exported {} features as SVG overlay", result.features_exported);
        Ok(result)
    }

    fn import(&self, text: &str, options: &ImportOptions) -> Result<ImportResult, FormatError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut result = ImportResult::default();
        let mut index = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let Some(element) = FeatureElement::read(e)? else {
                        continue;
                    };
                    match element.into_record() {
                        Ok(record) => result.records.push(record),
                        Err(reason) => result.add_warning(
                            FormatWarning::warning(format!(
                                "Skipped overlay feature {}: {}",
                                index, reason
                            ))
                            .at_feature(index),
                        ),
                    }
                    index += 1;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(FormatError::Xml(e)),
                _ => {}
            }
        }

        log::info!("Imported {} features from SVG overlay", result.records.len());
        Ok(result.finish(options))
    }
}

impl OverlayFormat {
    fn write_polygon<W: Write>(
        &self,
        writer: &mut Writer<W>,
        record: &FeatureRecord,
    ) -> Result<(), FormatError> {
        let points = format_points(&record.points);
        let meta = &record.meta;

        let mut polygon = BytesStart::new("polygon");
        polygon.push_attribute(("class", "feature"));
        polygon.push_attribute(("points", points.as_str()));
        polygon.push_attribute((ROLE_ATTRIBUTE, FEATURE_ROLE));
        for (key, value) in [
            ("data-name", &meta.name),
            ("data-type", &meta.kind),
            ("data-services", &meta.services),
            ("data-target", &meta.target),
        ] {
            // Empty values are left out entirely
            if !value.is_empty() {
                polygon.push_attribute((key, value.as_str()));
            }
        }

        writer
            .write_event(Event::Empty(polygon))
            .map_err(|e| FormatError::Xml(e.into()))?;
        Ok(())
    }
}

/// Attributes of one `data-role="feature"` element.
#[derive(Debug, Default)]
struct FeatureElement {
    points: Option<String>,
    meta: FeatureMeta,
}

impl FeatureElement {
    /// Read an element's attributes, or `None` if it is not a feature.
    fn read(element: &BytesStart<'_>) -> Result<Option<Self>, FormatError> {
        let mut is_feature = false;
        let mut parsed = FeatureElement::default();

        for attr in element.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            match attr.key.as_ref() {
                b"data-role" => is_feature = value == FEATURE_ROLE,
                b"points" => parsed.points = Some(value),
                b"data-name" => parsed.meta.name = value,
                b"data-type" => parsed.meta.kind = value,
                b"data-services" => parsed.meta.services = value,
                b"data-target" => parsed.meta.target = value,
                _ => {}
            }
        }

        Ok(is_feature.then_some(parsed))
    }

    fn into_record(self) -> Result<FeatureRecord, String> {
        let raw = self.points.ok_or_else(|| "missing points".to_string())?;
        let points = parse_points(&raw)?;
        if points.len() < crate::constants::MIN_POLYGON_VERTICES {
            return Err(format!("only {} points", points.len()));
        }
        Ok(FeatureRecord::new(points, self.meta))
    }
}

/// `x,y x,y ...` with plain float formatting.
pub(crate) fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an SVG `points` list. Commas and whitespace both separate numbers.
pub(crate) fn parse_points(raw: &str) -> Result<Vec<Point>, String> {
    let numbers = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("invalid coordinate '{}'", token))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if numbers.len() % 2 != 0 {
        return Err("odd number of coordinates".to_string());
    }

    Ok(numbers
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}
