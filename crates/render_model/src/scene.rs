//! In-memory canvas

use crate::{CanvasItem, ItemHandle, ItemKind, PageCanvas, Point, Rect, RectStyle, SortOrder, StrokeSpec};
use glyph_catalog::GlyphImage;
use std::sync::Arc;

/// A retained scene of canvas items, kept in insertion order.
///
/// Handles are never reused within one scene, even across `clear`.
#[derive(Debug, Clone, Default)]
pub struct SceneCanvas {
    items: Vec<CanvasItem>,
    next_handle: u64,
    /// Area the scene covers, used when exporting
    scene_rect: Option<Rect>,
}

impl SceneCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene covering `rect`
    pub fn with_scene_rect(rect: Rect) -> Self {
        Self {
            scene_rect: Some(rect),
            ..Self::default()
        }
    }

    pub fn set_scene_rect(&mut self, rect: Rect) {
        self.scene_rect = Some(rect);
    }

    /// The configured scene rect, or the union of all item bounds
    pub fn scene_rect(&self) -> Rect {
        if let Some(rect) = self.scene_rect {
            return rect;
        }

        let mut bounds = self.items.iter().map(CanvasItem::bounds);
        let Some(first) = bounds.next() else {
            return Rect::default();
        };
        bounds.fold(first, |acc, b| {
            let x = acc.x.min(b.x);
            let y = acc.y.min(b.y);
            Rect::new(x, y, acc.right().max(b.right()) - x, acc.bottom().max(b.bottom()) - y)
        })
    }

    /// All glyph items in insertion order
    pub fn glyphs(&self) -> impl Iterator<Item = &CanvasItem> {
        self.items.iter().filter(|item| item.is_glyph())
    }

    /// All line items in insertion order
    pub fn lines(&self) -> impl Iterator<Item = &CanvasItem> {
        self.items.iter().filter(|item| item.is_line())
    }

    /// Borrow the items without cloning
    pub fn iter(&self) -> impl Iterator<Item = &CanvasItem> {
        self.items.iter()
    }

    fn push(&mut self, position: Point, kind: ItemKind) -> ItemHandle {
        self.next_handle += 1;
        let handle = ItemHandle(self.next_handle);
        self.items.push(CanvasItem {
            handle,
            position,
            visible: true,
            kind,
        });
        handle
    }

    fn find_mut(&mut self, handle: ItemHandle) -> Option<&mut CanvasItem> {
        self.items.iter_mut().find(|item| item.handle == handle)
    }
}

impl PageCanvas for SceneCanvas {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn add_glyph(&mut self, image: &Arc<GlyphImage>, position: Point, scale: f64) -> ItemHandle {
        self.push(
            position,
            ItemKind::Glyph {
                image: Arc::clone(image),
                scale,
            },
        )
    }

    fn add_line(&mut self, from: Point, to: Point, stroke: &StrokeSpec) -> ItemHandle {
        self.push(from, ItemKind::Line { to, stroke: *stroke })
    }

    fn add_rect(&mut self, rect: Rect, style: &RectStyle) -> ItemHandle {
        self.push(
            rect.top_left(),
            ItemKind::Rect {
                size: (rect.width, rect.height),
                style: *style,
            },
        )
    }

    fn remove_item(&mut self, handle: ItemHandle) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.handle != handle);
        self.items.len() != before
    }

    fn move_item(&mut self, handle: ItemHandle, position: Point) -> bool {
        match self.find_mut(handle) {
            Some(item) => {
                // Lines keep their length and direction
                if let ItemKind::Line { to, .. } = &mut item.kind {
                    to.x += position.x - item.position.x;
                    to.y += position.y - item.position.y;
                }
                item.position = position;
                true
            }
            None => false,
        }
    }

    fn item(&self, handle: ItemHandle) -> Option<CanvasItem> {
        self.items.iter().find(|item| item.handle == handle).cloned()
    }

    fn items(&self, order: SortOrder) -> Vec<CanvasItem> {
        match order {
            SortOrder::Ascending => self.items.clone(),
            SortOrder::Descending => self.items.iter().rev().cloned().collect(),
        }
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn set_visible(&mut self, handle: ItemHandle, visible: bool) -> bool {
        match self.find_mut(handle) {
            Some(item) => {
                item.visible = visible;
                true
            }
            None => false,
        }
    }
}
