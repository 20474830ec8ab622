//! The page canvas seam
//!
//! Layout talks to whatever surface renders the page through [`PageCanvas`].
//! Items keep their insertion order; handles stay valid until the item is
//! removed or the canvas is cleared.

use crate::{CanvasItem, ItemHandle, Point, Rect, RectStyle, StrokeSpec};
use glyph_catalog::GlyphImage;
use std::sync::Arc;

/// Ordering for [`PageCanvas::items`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest item first
    #[default]
    Ascending,
    /// Newest item first
    Descending,
}

/// A passive sink for placed glyphs, strokes, and outlines
pub trait PageCanvas {
    /// Remove every item
    fn clear(&mut self);

    /// Place a glyph image with its bounding box origin at `position`
    fn add_glyph(&mut self, image: &Arc<GlyphImage>, position: Point, scale: f64) -> ItemHandle;

    /// Draw a stroke from `from` to `to`
    fn add_line(&mut self, from: Point, to: Point, stroke: &StrokeSpec) -> ItemHandle;

    /// Draw a rectangle outline
    fn add_rect(&mut self, rect: Rect, style: &RectStyle) -> ItemHandle;

    /// Remove an item; false if the handle is unknown
    fn remove_item(&mut self, handle: ItemHandle) -> bool;

    /// Move an item's anchor; false if the handle is unknown
    fn move_item(&mut self, handle: ItemHandle, position: Point) -> bool;

    /// Snapshot of one item
    fn item(&self, handle: ItemHandle) -> Option<CanvasItem>;

    /// Snapshot of all items in the requested order
    fn items(&self, order: SortOrder) -> Vec<CanvasItem>;

    fn item_count(&self) -> usize;

    /// Show or hide an item; false if the handle is unknown
    fn set_visible(&mut self, handle: ItemHandle, visible: bool) -> bool;
}
