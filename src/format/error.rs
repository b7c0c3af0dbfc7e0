//! Error types for feature format operations.

use thiserror::Error;

/// Errors that can occur while encoding or decoding features.
#[derive(Error, Debug)]
pub enum FormatError {
    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute inside an otherwise well-formed XML element
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Input is well-formed but not the expected structure
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// No format registered under the requested name
    #[error("Unknown format: {name}")]
    UnknownFormat {
        /// Requested format id or file name
        name: String,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an unknown format error.
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat { name: name.into() }
    }
}
