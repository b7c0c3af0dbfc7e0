//! Feature import/export.
//!
//! Features travel between the authoring tool and the viewer as text in one
//! of two formats, both implementing the [`FeatureFormat`] trait:
//!
//! - **SVG overlay**: a vector document with one polygon per feature and the
//!   metadata in `data-*` attributes, optionally over a faint copy of the
//!   reference image
//! - **GeoJSON**: a `FeatureCollection` of closed `Polygon` rings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_map::format::{ExportData, ExportOptions, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let format = registry.for_filename("features.json")?;
//! let result = format.export(&ExportData::new(&records), &ExportOptions::default())?;
//! ```

mod error;
pub mod formats;
mod registry;
mod traits;

pub use error::FormatError;
pub use formats::{GeoJsonFormat, OverlayFormat};
pub use registry::FormatRegistry;
pub use traits::{
    ExportData, ExportOptions, ExportResult, FeatureFormat, FormatWarning, ImportOptions,
    ImportResult, WarningSeverity,
};
