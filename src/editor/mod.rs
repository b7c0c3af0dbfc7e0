//! Authoring role: draw, select, move, rotate, duplicate and delete features.
//!
//! The host forwards raw input (pointer samples in screen pixels, wheel
//! deltas, key presses) and draws [`Editor::scene`] afterwards. Every
//! operation is local and infallible; inputs that make no sense in the
//! current state are ignored.
//!
//! ## States
//!
//! - **Idle**: presses pick a vertex handle, a feature or the background
//! - **Drawing**: presses append vertices to the draft polygon
//! - **Rotating**: the rotate key is held with a feature selected; pointer
//!   moves turn the feature about its centroid

pub mod inspector;
pub mod session;

pub use inspector::{Inspector, MetadataField, MetadataFields};
pub use session::Interaction;

use crate::config::{AppConfig, Tuning};
use crate::constants::{COPY_SUFFIX, MIN_POLYGON_VERTICES};
use crate::format::{ExportData, ExportOptions, ExportResult, FeatureFormat, FormatError};
use crate::keybindings::{EditorAction, KeyBindings, KeyCode, Modifiers};
use crate::model::{Feature, FeatureId, FeatureMeta, FeatureStore, Point, ReferenceImage};
use crate::render::{Scene, build_scene};
use crate::transform::{Size, ViewTransform};

/// Coarse editor state, derived from the draft and the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Idle,
    Drawing,
    Rotating,
}

/// Authoring state: one store, one view, one selection.
#[derive(Debug, Clone)]
pub struct Editor {
    tuning: Tuning,
    keybindings: KeyBindings,
    view: ViewTransform,
    viewport: Size,
    background: Option<ReferenceImage>,
    store: FeatureStore,
    /// Vertices of the polygon being drawn, not yet in the store.
    draft: Option<Vec<Point>>,
    inspector: Inspector,
    session: Interaction,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl Editor {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            tuning: config.tuning.clone(),
            keybindings: config.keybindings.clone(),
            view: ViewTransform::identity(),
            viewport: Size::default(),
            background: None,
            store: FeatureStore::new(),
            draft: None,
            inspector: Inspector::new(),
            session: Interaction::None,
        }
    }

    // Accessors

    pub fn mode(&self) -> EditorMode {
        if self.draft.is_some() {
            EditorMode::Drawing
        } else if self.session.is_rotating() {
            EditorMode::Rotating
        } else {
            EditorMode::Idle
        }
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    /// Mutable store access for hosts that drain the dirty flag.
    pub fn store_mut(&mut self) -> &mut FeatureStore {
        &mut self.store
    }

    pub fn draft(&self) -> Option<&[Point]> {
        self.draft.as_deref()
    }

    pub fn selected(&self) -> Option<FeatureId> {
        self.inspector.selected()
    }

    pub fn selected_feature(&self) -> Option<&Feature> {
        self.selected().and_then(|id| self.store.get(id))
    }

    pub fn inspector(&self) -> &Inspector {
        &self.inspector
    }

    pub fn session(&self) -> &Interaction {
        &self.session
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
        log::info!(
            "Reference image {}x{}",
            image.size.width,
            image.size.height
        );
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

    // Drawing

    /// Begin a new polygon. An unfinished draft is discarded first.
    pub fn start_draw(&mut self) {
        if self.draft.is_some() {
            log::debug!("Discarding unfinished draft");
        }
        self.draft = Some(Vec::new());
        self.session = Interaction::None;
        log::debug!("✏️ Drawing started");
    }

    /// Commit the draft if it has at least three vertices, otherwise drop it.
    pub fn finish_draw(&mut self) -> Option<FeatureId> {
        let points = self.draft.take()?;
        if points.len() < MIN_POLYGON_VERTICES {
            log::debug!("Draft with {} points discarded", points.len());
            return None;
        }

        let id = self.store.insert(points, FeatureMeta::default())?;
        self.select(Some(id));
        log::info!("Created feature {}", id);
        Some(id)
    }

    /// Drop the draft regardless of its size.
    pub fn cancel_draw(&mut self) {
        if self.draft.take().is_some() {
            log::debug!("Drawing cancelled");
        }
    }

    pub fn double_click(&mut self) {
        if self.draft.is_some() {
            self.finish_draw();
        }
    }

    // Selection and metadata

    /// Change the selection. A rotation bound to another feature ends.
    pub fn select(&mut self, id: Option<FeatureId>) {
        self.inspector.select(&self.store, id);
        let selected = self.inspector.selected();
        if self.session.feature().is_some() && self.session.feature() != selected {
            self.session = Interaction::None;
        }
        self.store.mark_dirty();
    }

    /// Write one inspector field into the selected feature.
    pub fn set_field(&mut self, field: MetadataField, value: &str) -> bool {
        self.inspector.edit(&mut self.store, field, value)
    }

    /// Clone the selected feature with an offset and " (copy)" appended to
    /// its name, then select the clone.
    pub fn duplicate_selected(&mut self) -> Option<FeatureId> {
        let source = self.selected_feature()?;
        let (dx, dy) = self.tuning.duplicate_offset;
        let points: Vec<Point> = source.points.iter().map(|p| p.offset(dx, dy)).collect();
        let mut meta = source.meta.clone();
        meta.name.push_str(COPY_SUFFIX);

        let id = self.store.insert(points, meta)?;
        self.select(Some(id));
        log::info!("Duplicated feature as {}", id);
        Some(id)
    }

    /// Remove the selected feature and clear the selection.
    pub fn delete_selected(&mut self) -> Option<Feature> {
        let id = self.selected()?;
        let removed = self.store.remove(id)?;
        if self.session.feature() == Some(id) {
            self.session = Interaction::None;
        }
        self.select(None);
        log::info!("Deleted feature {}", id);
        Some(removed)
    }

    // Pointer

    /// Press at `screen`.
    pub fn pointer_down(&mut self, screen: Point) {
        let doc = self.view.screen_to_document(screen);

        if let Some(draft) = &mut self.draft {
            draft.push(doc);
            log::debug!("Draft point {} at ({:.1}, {:.1})", draft.len(), doc.x, doc.y);
            return;
        }

        // Rotation takes precedence over any drag
        if self.session.is_rotating() {
            return;
        }

        if let Some((feature, index)) = self
            .store
            .hit_test_vertex(&doc, self.tuning.vertex_handle_radius)
        {
            self.session = Interaction::DraggingVertex { feature, index };
            return;
        }

        if let Some(id) = self.store.hit_test(&doc) {
            self.select(Some(id));
            if let Some(feature) = self.store.get(id) {
                self.session = Interaction::DraggingShape {
                    feature: id,
                    origin_points: feature.points.clone(),
                    start_doc: doc,
                };
            }
            return;
        }

        self.session = Interaction::Panning { last: screen };
    }

    /// Pointer sample at `screen`. Moves without an active session are dropped.
    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let doc = self.view.screen_to_document(screen);

        match &mut self.session {
            Interaction::None => {}
            Interaction::Panning { last } => {
                let (dx, dy) = (screen.x - last.x, screen.y - last.y);
                *last = screen;
                self.view.pan_by(dx, dy);
            }
            Interaction::DraggingVertex { feature, index } => {
                let index = *index;
                if let Some(point) = self
                    .store
                    .get_mut(*feature)
                    .and_then(|f| f.points.get_mut(index))
                {
                    *point = doc;
                }
            }
            Interaction::DraggingShape {
                feature,
                origin_points,
                start_doc,
            } => {
                let moved = session::drag_shape_points(origin_points, *start_doc, doc);
                if let Some(f) = self.store.get_mut(*feature) {
                    f.points = moved;
                }
            }
            Interaction::Rotating { feature, ref_angle } => {
                let Some(target) = self.store.get_mut(*feature) else {
                    return;
                };
                let Some(pivot) = target.centroid() else {
                    return;
                };
                let snap = modifiers
                    .shift
                    .then(|| self.tuning.rotate_snap_radians());
                let step = session::rotation_step(pivot, *ref_angle, doc, snap);
                if let Some(delta) = step.delta {
                    session::rotate_points(&mut target.points, pivot, delta);
                }
                *ref_angle = Some(step.next_ref);
            }
        }
    }

    /// Release. Ends pans and drags; a release without a press is ignored.
    pub fn pointer_up(&mut self) {
        if self.session.ends_on_release() {
            self.session = Interaction::None;
        }
    }

    // Keys

    /// Key press. Returns whether the key was bound to an action.
    pub fn key_down(&mut self, key: KeyCode) -> bool {
        let Some(action) = self.keybindings.action_for_key(key) else {
            return false;
        };

        match action {
            EditorAction::FinishDraw => {
                self.finish_draw();
            }
            EditorAction::CancelDraw => self.cancel_draw(),
            EditorAction::ResetView => self.reset_view(),
            // Feature actions are unavailable while drawing
            _ if self.draft.is_some() => {}
            EditorAction::Rotate => self.begin_rotation(),
            EditorAction::Duplicate => {
                self.duplicate_selected();
            }
            EditorAction::Delete => {
                self.delete_selected();
            }
        }
        true
    }

    /// Key release. Releasing the rotate key ends the rotation.
    pub fn key_up(&mut self, key: KeyCode) {
        if self.keybindings.action_for_key(key) == Some(EditorAction::Rotate)
            && self.session.is_rotating()
        {
            self.session = Interaction::None;
            log::debug!("Rotation ended");
        }
    }

    fn begin_rotation(&mut self) {
        let Some(feature) = self.selected() else {
            return;
        };
        // Key repeat while already rotating keeps the reference angle
        if matches!(self.session, Interaction::Rotating { feature: f, .. } if f == feature) {
            return;
        }
        self.session = Interaction::Rotating {
            feature,
            ref_angle: None,
        };
        log::debug!("🔄 Rotating feature {}", feature);
    }

    // Output

    /// Encode all features with `format`, using the reference image (if any)
    /// as the overlay canvas.
    pub fn export(&self, format: &dyn FeatureFormat) -> Result<ExportResult, FormatError> {
        let records = self.store.records();
        let data = ExportData::new(&records).with_background(self.background.as_ref());
        format.export(&data, &ExportOptions::from_tuning(&self.tuning))
    }

    pub fn scene(&self) -> Scene {
        build_scene(
            &self.store,
            self.view,
            self.background.as_ref(),
            self.selected(),
            |_| true,
            self.draft.as_deref(),
            Some(self.tuning.vertex_handle_radius),
        )
    }
}
