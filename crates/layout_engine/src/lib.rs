//! Layout Engine - Handwriting layout, line breaking, and connectors
//!
//! This crate places glyph variants from a catalog onto a page canvas,
//! breaking lines by hyphenation, word wrap, or a hard break, and joins the
//! letters of each word with connector strokes.

mod config;
mod page;
mod state;
mod hyphenation;
mod breaks;
mod connectors;
mod engine;
mod error;

pub use config::*;
pub use page::*;
pub use state::*;
pub use hyphenation::*;
pub use breaks::*;
pub use connectors::*;
pub use engine::*;
pub use error::*;
