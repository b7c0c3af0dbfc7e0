//! Global constants for the campus map editor and viewer.

/// Wheel delta multiplier: a wheel step of `delta` zooms by `exp(-delta * k)`.
pub const ZOOM_SENSITIVITY: f64 = 0.0015;

/// Fraction of the viewport used when fitting the reference image.
pub const FIT_MARGIN: f64 = 0.95;

/// Document-space offset applied to duplicated features.
pub const DUPLICATE_OFFSET: (f64, f64) = (10.0, 10.0);

/// Rotation snapping step (degrees) while the snap modifier is held.
pub const ROTATE_SNAP_DEGREES: f64 = 15.0;

/// Screen padding around a feature framed by the viewer.
pub const FRAME_PADDING: f64 = 30.0;

/// Upper bound on the scale used when framing a feature.
pub const FRAME_MAX_SCALE: f64 = 6.0;

/// Vertex handle radius in document units (also the vertex hit radius).
pub const VERTEX_HANDLE_RADIUS: f64 = 4.5;

/// Opacity of the reference image embedded in overlay exports.
pub const BACKGROUND_OPACITY: f64 = 0.15;

/// Overlay canvas used when no reference image has been loaded.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1500.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1000.0;

/// Minimum number of vertices for a feature to enter the store.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Display label for features without a name.
pub const UNNAMED_LABEL: &str = "(unnamed)";

/// Suffix appended to the name of a duplicated feature.
pub const COPY_SUFFIX: &str = " (copy)";
