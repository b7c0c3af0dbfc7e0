//! Feature format implementations.

mod geojson;
mod svg_overlay;

#[cfg(test)]
mod tests;

pub use geojson::GeoJsonFormat;
pub use svg_overlay::OverlayFormat;
