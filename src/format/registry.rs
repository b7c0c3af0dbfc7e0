//! Format registry for discovering and accessing feature formats.

use std::collections::HashMap;
use std::path::Path;

use crate::format::error::FormatError;
use crate::format::formats::{GeoJsonFormat, OverlayFormat};
use crate::format::traits::FeatureFormat;

/// Id of the format used for any file that is not an SVG.
const FALLBACK_FORMAT: &str = "geojson";

/// Registry of available feature formats.
///
/// Both built-in formats are registered automatically on creation.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Box<dyn FeatureFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: HashMap::new(),
        };

        registry.register(Box::new(OverlayFormat));
        registry.register(Box::new(GeoJsonFormat));

        registry
    }

    /// Register a format implementation.
    pub fn register(&mut self, format: Box<dyn FeatureFormat>) {
        self.formats.insert(format.id(), format);
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn FeatureFormat> {
        self.formats.get(id).map(|f| f.as_ref())
    }

    /// Get a format by ID, or an [`FormatError::UnknownFormat`].
    pub fn require(&self, id: &str) -> Result<&dyn FeatureFormat, FormatError> {
        self.get(id).ok_or_else(|| FormatError::unknown_format(id))
    }

    /// Find formats claiming an exact file extension (case-insensitive, no dot).
    pub fn by_extension(&self, ext: &str) -> Vec<&dyn FeatureFormat> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let mut found: Vec<&dyn FeatureFormat> = self
            .formats
            .values()
            .filter(|f| f.extensions().iter().any(|e| *e == ext))
            .map(|f| f.as_ref())
            .collect();
        found.sort_by_key(|f| f.id());
        found
    }

    /// Pick the format for a file name: `.svg` is an overlay, anything else
    /// is read as GeoJSON.
    pub fn for_filename(&self, filename: &str) -> Result<&dyn FeatureFormat, FormatError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        let format = match self
            .by_extension(ext)
            .into_iter()
            .find(|f| f.id() != FALLBACK_FORMAT)
        {
            Some(format) => format,
            None => self.require(FALLBACK_FORMAT)?,
        };

        log::debug!("Format for '{}': {}", filename, format.id());
        Ok(format)
    }

    /// Get all registered formats, sorted by ID.
    pub fn all(&self) -> Vec<&dyn FeatureFormat> {
        let mut all: Vec<&dyn FeatureFormat> = self.formats.values().map(|f| f.as_ref()).collect();
        all.sort_by_key(|f| f.id());
        all
    }

    /// Get all format IDs, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.formats.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
