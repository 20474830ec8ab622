//! Render Model - Page canvas abstraction and scene export
//!
//! This crate defines the surface the layout engine draws on: glyph images,
//! connector strokes, and page outlines, plus an in-memory scene that can be
//! serialized as a standalone SVG document.

mod render_item;
mod canvas;
mod scene;
mod error;
mod svg_export;

pub use render_item::*;
pub use canvas::*;
pub use scene::*;
pub use error::*;
pub use svg_export::*;
