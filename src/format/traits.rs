//! Trait definitions for feature format implementations.

use crate::config::Tuning;
use crate::format::error::FormatError;
use crate::model::{FeatureRecord, ReferenceImage};
use crate::transform::Size;

/// Trait for feature interchange formats.
///
/// Each format (SVG overlay, GeoJSON) converts between the in-memory
/// [`FeatureRecord`] list and a UTF-8 text payload. File I/O is left to the
/// caller: the core is handed ready text and hands back ready text.
pub trait FeatureFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "overlay", "geojson").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses, without the dot.
    fn extensions(&self) -> &[&'static str];

    /// Suggested file name for a download.
    fn default_filename(&self) -> &'static str;

    /// Encode features to text.
    fn export(
        &self,
        data: &ExportData<'_>,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError>;

    /// Decode features from text.
    fn import(&self, text: &str, options: &ImportOptions) -> Result<ImportResult, FormatError>;
}

/// What gets exported: the features plus the optional reference image.
#[derive(Debug, Clone, Copy)]
pub struct ExportData<'a> {
    pub records: &'a [FeatureRecord],
    pub background: Option<&'a ReferenceImage>,
}

impl<'a> ExportData<'a> {
    pub fn new(records: &'a [FeatureRecord]) -> Self {
        Self {
            records,
            background: None,
        }
    }

    /// Attach the reference image (overlay canvas size and backdrop).
    pub fn with_background(mut self, background: Option<&'a ReferenceImage>) -> Self {
        self.background = background;
        self
    }
}

/// Options for export operations.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Opacity of the embedded reference image in overlay output.
    pub background_opacity: f64,

    /// Overlay canvas size used when no reference image is attached.
    pub default_canvas: Size,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export options from the configured tuning values.
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            background_opacity: tuning.background_opacity,
            default_canvas: tuning.default_canvas,
        }
    }

    /// Set the background opacity.
    pub fn background_opacity(mut self, opacity: f64) -> Self {
        self.background_opacity = opacity;
        self
    }
}

/// Options for import operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Remove a ring's closing duplicate so the polygon is open for editing.
    /// Off by default: imported rings keep the point list exactly as stored.
    pub strip_closing_point: bool,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set closing-point stripping.
    pub fn strip_closing_point(mut self, strip: bool) -> Self {
        self.strip_closing_point = strip;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Suggested file name for the payload.
    pub filename: String,

    /// Encoded text.
    pub content: String,

    /// Number of features written.
    pub features_exported: usize,

    /// Warnings generated during export.
    pub warnings: Vec<FormatWarning>,
}

impl ExportResult {
    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of an import operation.
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Decoded features in document order.
    pub records: Vec<FeatureRecord>,

    /// Records that were skipped or adjusted.
    pub warnings: Vec<FormatWarning>,
}

impl ImportResult {
    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        log::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Apply import options that are independent of the source format.
    pub(crate) fn finish(mut self, options: &ImportOptions) -> Self {
        if options.strip_closing_point {
            for record in &mut self.records {
                record.strip_closing_point();
            }
        }
        self
    }
}

/// Warning generated during format conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatWarning {
    /// Position of the offending element in the input (if applicable).
    pub feature_index: Option<usize>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            feature_index: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Set the input position this warning relates to.
    pub fn at_feature(mut self, index: usize) -> Self {
        self.feature_index = Some(index);
        self
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Something was skipped or modified.
    Warning,
}
