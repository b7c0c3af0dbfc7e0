//! Tests for the SVG overlay format.

use super::lobby;
use crate::format::error::FormatError;
use crate::format::formats::OverlayFormat;
use crate::format::traits::{ExportData, ExportOptions, FeatureFormat, ImportOptions};
use crate::model::{FeatureMeta, FeatureRecord, Point, ReferenceImage};

fn export(records: &[FeatureRecord], background: Option<&ReferenceImage>) -> String {
    let data = ExportData::new(records).with_background(background);
    OverlayFormat
        .export(&data, &ExportOptions::default())
        .unwrap()
        .content
}

#[test]
fn test_export_structure() {
    let records = vec![lobby()];
    let result = OverlayFormat
        .export(&ExportData::new(&records), &ExportOptions::default())
        .unwrap();

    assert_eq!(result.filename, "overlay.svg");
    assert_eq!(result.features_exported, 1);
    assert!(!result.has_warnings());

    let svg = &result.content;
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"viewBox="0 0 1500 1000""#));
    assert!(svg.contains(r#"<g id="features">"#));
    assert!(svg.contains(r#"class="feature""#));
    assert!(svg.contains(r#"points="0,0 10,0 5,10""#));
    assert!(svg.contains(r#"data-role="feature""#));
    assert!(svg.contains(r#"data-name="Lobby""#));
    assert!(svg.contains(r#"data-type="amenity""#));
    assert!(svg.contains(r#"data-services="wifi, printer""#));
    assert!(svg.contains(r#"data-target="https://x""#));
    // No reference image loaded
    assert!(!svg.contains("<image"));
}

#[test]
fn test_export_omits_empty_attributes() {
    let mut record = lobby();
    record.meta = FeatureMeta::new("Hall", "", "", "");
    let svg = export(&[record], None);

    assert!(svg.contains(r#"data-name="Hall""#));
    assert!(!svg.contains("data-type"));
    assert!(!svg.contains("data-services"));
    assert!(!svg.contains("data-target"));
}

#[test]
fn test_export_escapes_ampersand_and_quote() {
    let mut record = lobby();
    record.meta.name = r#"Tom & "Jerry""#.to_string();
    record.meta.target = "https://x/?a=1&b=2".to_string();
    let svg = export(&[record], None);

    assert!(svg.contains(r#"data-name="Tom &amp; &quot;Jerry&quot;""#));
    assert!(svg.contains(r#"data-target="https://x/?a=1&amp;b=2""#));
}

#[test]
fn test_export_embeds_reference_image() {
    let background = ReferenceImage::new(800.0, 600.0).with_href("campus.png");
    let svg = export(&[lobby()], Some(&background));

    assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    assert!(svg.contains(r#"<image href="campus.png""#));
    assert!(svg.contains(r#"width="800""#));
    assert!(svg.contains(r#"opacity="0.15""#));
    // Backdrop comes before the features
    assert!(svg.find("<image").unwrap() < svg.find("<g id=\"features\">").unwrap());
}

#[test]
fn test_export_without_href_sizes_canvas_only() {
    let background = ReferenceImage::new(640.0, 480.0);
    let svg = export(&[lobby()], Some(&background));
    assert!(svg.contains(r#"viewBox="0 0 640 480""#));
    assert!(!svg.contains("<image"));
}

#[test]
fn test_export_empty_store() {
    let svg = export(&[], None);
    assert!(svg.contains(r#"<g id="features">"#));
    assert!(!svg.contains("<polygon"));
}

#[test]
fn test_import_selects_by_role() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <image href="bg.png" opacity="0.15"/>
  <polygon points="0,0 1,0 1,1"/>
  <g id="features">
    <polygon class="feature" points="0,0 10,0 5,10" data-role="feature" data-name="Lobby" data-type="amenity"/>
    <path data-role="feature" points="20 20, 30 20, 30 30" data-services="wifi,coffee"></path>
  </g>
</svg>"#;

    let result = OverlayFormat.import(svg, &ImportOptions::default()).unwrap();
    assert_eq!(result.records.len(), 2);
    assert!(!result.has_warnings());

    let first = &result.records[0];
    assert_eq!(first.points, lobby().points);
    assert_eq!(first.meta.name, "Lobby");
    assert_eq!(first.meta.kind, "amenity");
    assert_eq!(first.meta.services, "");
    assert_eq!(first.meta.target, "");

    let second = &result.records[1];
    assert_eq!(second.points[2], Point::new(30.0, 30.0));
    assert_eq!(second.meta.service_tags(), vec!["wifi", "coffee"]);
}

#[test]
fn test_import_unescapes_attributes() {
    let svg = r#"<svg><polygon data-role="feature" points="0,0 1,0 1,1" data-name="A &amp; &quot;B&quot;"/></svg>"#;
    let result = OverlayFormat.import(svg, &ImportOptions::default()).unwrap();
    assert_eq!(result.records[0].meta.name, r#"A & "B""#);
}

#[test]
fn test_import_skips_bad_points_with_warning() {
    let svg = r#"<svg>
  <polygon data-role="feature" points="0,0 1,0" data-name="short"/>
  <polygon data-role="feature" points="0,0 1,x 1,1" data-name="garbled"/>
  <polygon data-role="feature" points="0,0 1,0 1" data-name="odd"/>
  <polygon data-role="feature" data-name="missing"/>
  <polygon data-role="feature" points="0,0 4,0 4,4" data-name="ok"/>
</svg>"#;

    let result = OverlayFormat.import(svg, &ImportOptions::default()).unwrap();
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].meta.name, "ok");
    assert_eq!(result.warnings.len(), 4);
    let indices: Vec<_> = result.warnings.iter().map(|w| w.feature_index).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[test]
fn test_import_malformed_xml_is_error() {
    let svg = r#"<svg><g id="features"></svg>"#;
    let err = OverlayFormat
        .import(svg, &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, FormatError::Xml(_)));
}

#[test]
fn test_import_strip_closing_point_option() {
    let svg = r#"<svg><polygon data-role="feature" points="0,0 10,0 5,10 0,0"/></svg>"#;

    let kept = OverlayFormat.import(svg, &ImportOptions::default()).unwrap();
    assert_eq!(kept.records[0].points.len(), 4);

    let stripped = OverlayFormat
        .import(svg, &ImportOptions::new().strip_closing_point(true))
        .unwrap();
    assert_eq!(stripped.records[0].points, lobby().points);
}
