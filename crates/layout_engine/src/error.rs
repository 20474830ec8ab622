//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),

    #[error("Invalid layout configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog maps {0:?} but holds no variant for it")]
    MissingVariant(char),

    #[error("Invalid hyphenation rule {pattern:?}: {source}")]
    InvalidHyphenRule {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Hyphenation rules error: {0}")]
    RuleFile(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
