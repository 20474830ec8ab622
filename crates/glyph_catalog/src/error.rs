//! Error types for the glyph catalog

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Glyph file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Degenerate limits for '{key}' ({file}): {reason}")]
    DegenerateLimits {
        key: String,
        file: String,
        reason: String,
    },

    #[error("Invalid manifest key: {0:?}")]
    InvalidKey(String),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
