//! Reference bitmap handed over by the image-loading host.

use serde::{Deserialize, Serialize};

use crate::transform::Size;

/// A decoded background image: its pixel size and, optionally, a handle
/// (URL, data URI or file path) under which the host can show it again.
///
/// The core only fits the view to `size` and embeds `href` into overlay
/// exports; it never reads pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl ReferenceImage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}
