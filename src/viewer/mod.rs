//! Read-only viewing role.
//!
//! The viewer loads features exported by the editor, lets the visitor narrow
//! them down with type/service chips and a name search, and frames a
//! feature when it is clicked. It never modifies features.

mod filter;

pub use filter::{Chip, ChipGroup, FilterIndex};

use crate::config::{AppConfig, Tuning};
use crate::format::{FeatureFormat, FormatError, FormatRegistry, FormatWarning, ImportOptions};
use crate::keybindings::{EditorAction, KeyBindings, KeyCode};
use crate::model::{Feature, FeatureId, FeatureStore, Point, ReferenceImage};
use crate::render::{Scene, build_scene};
use crate::transform::{Size, ViewTransform};

/// What the details panel shows for the selected feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDetails {
    /// Name, or "(unnamed)".
    pub title: String,
    /// Type badge (may be empty).
    pub kind: String,
    /// Service badges.
    pub services: Vec<String>,
    /// External link, opened by the host. Never followed by the core.
    pub target: Option<String>,
}

impl FeatureDetails {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            title: feature.meta.title().to_string(),
            kind: feature.meta.kind.clone(),
            services: feature.meta.service_tags(),
            target: feature.meta.target().map(str::to_string),
        }
    }
}

/// Viewer state: its own store, view and filters.
#[derive(Debug, Clone)]
pub struct Viewer {
    tuning: Tuning,
    keybindings: KeyBindings,
    view: ViewTransform,
    viewport: Size,
    background: Option<ReferenceImage>,
    store: FeatureStore,
    filter: FilterIndex,
    selected: Option<FeatureId>,
    /// Last screen sample while dragging the background.
    panning: Option<Point>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Viewer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            tuning: config.tuning.clone(),
            keybindings: config.keybindings.clone(),
            view: ViewTransform::identity(),
            viewport: Size::default(),
            background: None,
            store: FeatureStore::new(),
            filter: FilterIndex::default(),
            selected: None,
            panning: None,
        }
    }

    // Accessors

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterIndex {
        &self.filter
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.selected
    }

    pub fn background(&self) -> Option<&ReferenceImage> {
        self.background.as_ref()
    }

    // View

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Show a decoded reference image and fit it to the viewport.
    pub fn load_background(&mut self, image: ReferenceImage) -> bool {
        self.background = Some(image);
        self.fit_view()
    }

    /// Fit the reference image. Skipped without an image or a usable viewport.
    pub fn fit_view(&mut self) -> bool {
        let Some(image) = &self.background else {
            return false;
        };
        self.view
            .fit_to_bounds(image.size, self.viewport, self.tuning.fit_margin)
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    pub fn wheel(&mut self, screen: Point, delta: f64) {
        let factor = ViewTransform::wheel_factor(delta, self.tuning.zoom_sensitivity);
        self.view.zoom_at_point(screen, factor);
    }

    pub fn key_down(&mut self, key: KeyCode) -> bool {
        match self.keybindings.action_for_key(key) {
            Some(EditorAction::ResetView) => {
                self.reset_view();
                true
            }
            _ => false,
        }
    }

    // Loading

    /// Replace the loaded features with the decoded `text`.
    ///
    /// On error the previous features, filters and selection are kept.
    /// Chips are rebuilt from the new features; the search query is kept.
    pub fn import(
        &mut self,
        text: &str,
        format: &dyn FeatureFormat,
        options: &ImportOptions,
    ) -> Result<Vec<FormatWarning>, FormatError> {
        let result = format.import(text, options)?;

        self.store = FeatureStore::from_records(result.records);
        let query = self.filter.query().to_string();
        self.filter = FilterIndex::build(&self.store);
        self.filter.set_query(&query);
        self.selected = None;
        self.panning = None;

        log::info!(
            "Viewer loaded {} features ({})",
            self.store.len(),
            format.display_name()
        );
        Ok(result.warnings)
    }

    /// Import choosing the format from the file name.
    pub fn import_named(
        &mut self,
        filename: &str,
        text: &str,
        registry: &FormatRegistry,
    ) -> Result<Vec<FormatWarning>, FormatError> {
        let format = registry.for_filename(filename)?;
        self.import(text, format, &ImportOptions::default())
    }

    // Filtering

    pub fn toggle_chip(&mut self, group: ChipGroup, label: &str) -> Option<bool> {
        let state = self.filter.toggle(group, label)?;
        self.store.mark_dirty();
        Some(state)
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.set_query(query);
        self.store.mark_dirty();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear_active();
        self.filter.set_query("");
        self.store.mark_dirty();
    }

    pub fn chips(&self) -> Vec<Chip> {
        self.filter.chips()
    }

    pub fn is_visible(&self, feature: &Feature) -> bool {
        self.filter.matches(&feature.meta)
    }

    /// IDs of the features passing the current filters, in store order.
    pub fn visible_ids(&self) -> Vec<FeatureId> {
        self.store
            .iter()
            .filter(|f| self.is_visible(f))
            .map(|f| f.id)
            .collect()
    }

    // Selection

    /// Select a visible feature and frame it. Hidden or unknown features
    /// are ignored.
    pub fn select(&mut self, id: FeatureId) -> Option<FeatureDetails> {
        let feature = self.store.get(id).filter(|f| self.is_visible(f))?;
        let details = FeatureDetails::from_feature(feature);

        if let Some(bounds) = feature.bounding_box() {
            self.view.frame_bounds(
                &bounds,
                self.viewport,
                self.tuning.frame_padding,
                self.tuning.frame_max_scale,
            );
        }

        self.selected = Some(id);
        self.store.mark_dirty();
        log::debug!("Viewer selected {} ({})", id, details.title);
        Some(details)
    }

    /// Details for the current selection.
    pub fn details(&self) -> Option<FeatureDetails> {
        self.selected
            .and_then(|id| self.store.get(id))
            .map(FeatureDetails::from_feature)
    }

    // Pointer

    /// Press: a visible feature under the pointer is selected and framed,
    /// otherwise a background pan begins.
    pub fn pointer_down(&mut self, screen: Point) -> Option<FeatureDetails> {
        let doc = self.view.screen_to_document(screen);
        let hit = self
            .store
            .hit_test_where(&doc, |f| self.filter.matches(&f.meta));

        match hit {
            Some(id) => self.select(id),
            None => {
                self.panning = Some(screen);
                None
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if let Some(last) = self.panning {
            self.view.pan_by(screen.x - last.x, screen.y - last.y);
            self.panning = Some(screen);
        }
    }

    pub fn pointer_up(&mut self) {
        self.panning = None;
    }

    // Rendering

    pub fn scene(&self) -> Scene {
        build_scene(
            &self.store,
            self.view,
            self.background.as_ref(),
            self.selected,
            |f| self.is_visible(f),
            None,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::GeoJsonFormat;
    use crate::model::{FeatureMeta, FeatureRecord};
    use crate::render::ItemKey;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    fn campus_json() -> String {
        let records = vec![
            FeatureRecord::new(square(0.0, 0.0, 10.0), FeatureMeta::new("Room A", "room", "wifi", "")),
            FeatureRecord::new(square(20.0, 0.0, 10.0), FeatureMeta::new("Room B", "room", "", "")),
            FeatureRecord::new(
                square(100.0, 200.0, 50.0),
                FeatureMeta::new("Great Hall", "hall", "wifi,coffee", "https://x"),
            ),
        ];
        GeoJsonFormat
            .export(
                &crate::format::ExportData::new(&records),
                &crate::format::ExportOptions::default(),
            )
            .unwrap()
            .content
    }

    fn loaded_viewer() -> Viewer {
        let mut viewer = Viewer::default();
        viewer.set_viewport(Size::new(800.0, 600.0));
        viewer
            .import(&campus_json(), &GeoJsonFormat, &ImportOptions::default())
            .unwrap();
        viewer
    }

    #[test]
    fn test_import_builds_chips() {
        let viewer = loaded_viewer();
        assert_eq!(viewer.store().len(), 3);
        let labels: Vec<_> = viewer.chips().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["hall", "room", "coffee", "wifi"]);
    }

    #[test]
    fn test_type_filter_leaves_one_hall() {
        let mut viewer = loaded_viewer();
        viewer.toggle_chip(ChipGroup::Type, "hall");
        assert_eq!(viewer.visible_ids().len(), 1);

        let scene = viewer.scene();
        assert_eq!(scene.visible_items().count(), 1);
    }

    #[test]
    fn test_failed_import_keeps_previous_features() {
        let mut viewer = loaded_viewer();
        viewer.toggle_chip(ChipGroup::Type, "room");

        let err = viewer.import("{ broken", &GeoJsonFormat, &ImportOptions::default());
        assert!(err.is_err());
        assert_eq!(viewer.store().len(), 3);
        assert!(viewer.filter().is_active(ChipGroup::Type, "room"));
    }

    #[test]
    fn test_reimport_resets_chips_but_keeps_query() {
        let mut viewer = loaded_viewer();
        viewer.toggle_chip(ChipGroup::Type, "room");
        viewer.set_query("room");
        viewer
            .import(&campus_json(), &GeoJsonFormat, &ImportOptions::default())
            .unwrap();

        assert!(!viewer.filter().is_active(ChipGroup::Type, "room"));
        assert_eq!(viewer.filter().query(), "room");
        assert_eq!(viewer.visible_ids().len(), 2);
    }

    #[test]
    fn test_import_named_picks_format() {
        let registry = FormatRegistry::new();
        let mut viewer = Viewer::default();
        let svg = r#"<svg><polygon data-role="feature" points="0,0 1,0 1,1" data-name="x"/></svg>"#;

        viewer.import_named("overlay.SVG", svg, &registry).unwrap();
        assert_eq!(viewer.store().len(), 1);

        // Anything else is parsed as GeoJSON, so SVG text fails there
        assert!(matches!(
            viewer.import_named("overlay.txt", svg, &registry),
            Err(FormatError::Json(_))
        ));
        assert_eq!(viewer.store().len(), 1);
    }

    #[test]
    fn test_select_frames_feature() {
        let mut viewer = loaded_viewer();
        let hall = viewer.visible_ids()[2];

        let details = viewer.select(hall).unwrap();
        assert_eq!(details.title, "Great Hall");
        assert_eq!(details.kind, "hall");
        assert_eq!(details.services, vec!["wifi", "coffee"]);
        assert_eq!(details.target.as_deref(), Some("https://x"));

        // 50x50 box in 740x540: capped at 6x
        assert_eq!(viewer.view().scale, 6.0);
        let top_left = viewer.view().document_to_screen(Point::new(100.0, 200.0));
        assert!((top_left.x - 30.0).abs() < 1e-9);
        assert!((top_left.y - 30.0).abs() < 1e-9);
        assert_eq!(viewer.selected(), Some(hall));
    }

    #[test]
    fn test_hidden_feature_cannot_be_selected() {
        let mut viewer = loaded_viewer();
        let room_a = viewer.visible_ids()[0];
        viewer.toggle_chip(ChipGroup::Type, "hall");

        assert!(viewer.select(room_a).is_none());
        // Clicking where it is drawn pans instead
        assert!(viewer.pointer_down(Point::new(5.0, 5.0)).is_none());
        assert_eq!(viewer.selected(), None);
    }

    #[test]
    fn test_pointer_click_selects_and_details_show_unnamed() {
        let mut viewer = Viewer::default();
        viewer.set_viewport(Size::new(800.0, 600.0));
        let json = r#"{"type":"FeatureCollection","features":[
            {"properties":{"type":"room"},"geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10]]]}}
        ]}"#;
        viewer
            .import(json, &GeoJsonFormat, &ImportOptions::default())
            .unwrap();

        let details = viewer.pointer_down(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(details.title, "(unnamed)");
        assert_eq!(details.target, None);
        assert_eq!(viewer.details(), Some(details));
    }

    #[test]
    fn test_background_drag_pans() {
        let mut viewer = loaded_viewer();
        // Moves before a press are dropped
        viewer.pointer_move(Point::new(50.0, 50.0));
        assert_eq!(*viewer.view(), ViewTransform::identity());

        viewer.pointer_down(Point::new(400.0, 400.0));
        viewer.pointer_move(Point::new(410.0, 395.0));
        viewer.pointer_move(Point::new(420.0, 390.0));
        viewer.pointer_up();
        viewer.pointer_move(Point::new(500.0, 500.0));

        assert_eq!(*viewer.view(), ViewTransform::new(1.0, 20.0, -10.0));
        // Release without a press is harmless
        viewer.pointer_up();
    }

    #[test]
    fn test_fit_and_reset() {
        let mut viewer = Viewer::default();
        assert!(!viewer.fit_view());

        viewer.set_viewport(Size::new(1000.0, 500.0));
        assert!(viewer.load_background(ReferenceImage::new(2000.0, 1000.0)));
        assert!((viewer.view().scale - 0.475).abs() < 1e-12);

        viewer.wheel(Point::new(10.0, 10.0), -120.0);
        assert!(viewer.key_down(KeyCode::Char('0')));
        assert_eq!(*viewer.view(), ViewTransform::identity());
        assert!(!viewer.key_down(KeyCode::Char('x')));
    }

    #[test]
    fn test_scene_marks_selection() {
        let mut viewer = loaded_viewer();
        let hall = viewer.visible_ids()[2];
        viewer.select(hall);
        let scene = viewer.scene();
        assert_eq!(
            scene.item(ItemKey::Feature(hall)).unwrap().style,
            crate::render::ItemStyle::Selected
        );
        assert!(scene.handle_radius.is_none());
    }
}
