//! Glyph Catalog - Handwritten glyph variants and their placement metadata
//!
//! This crate holds the read-only catalog the layout engine draws from: every
//! character maps to one or more SVG variants, each carrying the ink limits and
//! the entry/exit anchors used for cursive connectors.
//!
//! # Modules
//!
//! - `symbol`: Normalized placement metadata (`SymbolData`)
//! - `catalog`: The character -> variants map and the `GlyphProvider` seam
//! - `manifest`: Loading a catalog from a JSON glyph manifest
//! - `svg`: Probing the intrinsic size of an SVG file

mod symbol;
mod catalog;
mod error;
pub mod manifest;
pub mod svg;

pub use symbol::*;
pub use catalog::*;
pub use error::*;

pub use manifest::{FontManifest, ManifestLoadOptions};
