//! Campus Map - polygon features drawn over a reference image.
//!
//! Two front-ends share one document model:
//! - [`Editor`] draws, selects, drags, rotates, duplicates and annotates
//!   polygons, then exports them as an SVG overlay or GeoJSON.
//! - [`Viewer`] loads either export, filters features by type, service and
//!   name, and shows details for the selected one.
//!
//! Both are host-agnostic state machines: the host feeds pointer, wheel and
//! key events in screen pixels and draws the [`render::Scene`] they return.

pub mod config;
pub mod constants;
pub mod editor;
pub mod format;
pub mod keybindings;
pub mod model;
pub mod render;
pub mod transform;
pub mod viewer;

pub use config::AppConfig;
pub use editor::Editor;
pub use format::FormatRegistry;
pub use model::FeatureStore;
pub use transform::ViewTransform;
pub use viewer::Viewer;
