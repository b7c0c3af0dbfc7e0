//! Display list for the map overlay.
//!
//! Hosts draw a [`Scene`]: one item per feature in store order, plus the
//! in-progress draft on top while drawing. Building a scene never mutates
//! anything, so it is safe to rebuild after every event; an unchanged state
//! yields an equal scene.

use crate::model::{Feature, FeatureId, FeatureStore, Point, ReferenceImage};
use crate::transform::ViewTransform;

/// What a scene item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKey {
    Feature(FeatureId),
    /// The polygon currently being drawn (not yet in the store).
    Draft,
}

/// Visual emphasis. Styling beyond these three states is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStyle {
    Normal,
    Selected,
    /// Draft polygon, drawn translucent.
    Ghost,
}

/// One polygon to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub key: ItemKey,
    /// Vertices in document space (apply the scene transform to draw).
    pub points: Vec<Point>,
    /// Hover title: the feature name or "(unnamed)".
    pub title: String,
    pub style: ItemStyle,
    /// False when hidden by the viewer's filters.
    pub visible: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub transform: ViewTransform,
    pub background: Option<ReferenceImage>,
    pub items: Vec<SceneItem>,
    /// Vertex handle radius in document units, `None` when handles are not shown.
    pub handle_radius: Option<f64>,
}

impl Scene {
    /// Items that should actually be drawn.
    pub fn visible_items(&self) -> impl Iterator<Item = &SceneItem> {
        self.items.iter().filter(|item| item.visible)
    }

    pub fn item(&self, key: ItemKey) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.key == key)
    }
}

/// Build a scene from a feature store.
///
/// `visible` decides per feature whether it is drawn; `draft` (if any) is
/// appended last with [`ItemStyle::Ghost`].
pub fn build_scene(
    store: &FeatureStore,
    transform: ViewTransform,
    background: Option<&ReferenceImage>,
    selected: Option<FeatureId>,
    visible: impl Fn(&Feature) -> bool,
    draft: Option<&[Point]>,
    handle_radius: Option<f64>,
) -> Scene {
    let mut items: Vec<SceneItem> = store
        .iter()
        .map(|feature| SceneItem {
            key: ItemKey::Feature(feature.id),
            points: feature.points.clone(),
            title: feature.meta.title().to_string(),
            style: if selected == Some(feature.id) {
                ItemStyle::Selected
            } else {
                ItemStyle::Normal
            },
            visible: visible(feature),
        })
        .collect();

    if let Some(points) = draft {
        items.push(SceneItem {
            key: ItemKey::Draft,
            points: points.to_vec(),
            title: crate::constants::UNNAMED_LABEL.to_string(),
            style: ItemStyle::Ghost,
            visible: true,
        });
    }

    Scene {
        transform,
        background: background.cloned(),
        items,
        handle_radius,
    }
}
