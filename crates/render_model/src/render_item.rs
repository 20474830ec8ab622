//! Render item types

use glyph_catalog::GlyphImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A point in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A rectangle in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from its top-left and bottom-right corners
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const DARK_GRAY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// `#rrggbb`, ignoring alpha
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// How a stroke ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke style for lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSpec {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeSpec {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            cap: LineCap::Round,
        }
    }
}

/// Outline style for rectangles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectStyle {
    pub stroke: StrokeSpec,
    pub fill: Option<Color>,
}

impl RectStyle {
    pub fn outline(color: Color) -> Self {
        Self {
            stroke: StrokeSpec::new(color, 1.0),
            fill: None,
        }
    }
}

impl Default for RectStyle {
    fn default() -> Self {
        Self::outline(Color::BLACK)
    }
}

/// Identifies an item placed on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemHandle(pub u64);

/// What an item draws
#[derive(Debug, Clone)]
pub enum ItemKind {
    /// A glyph image drawn at `position` with uniform `scale`
    Glyph { image: Arc<GlyphImage>, scale: f64 },
    /// A straight stroke; `position` is the start point
    Line { to: Point, stroke: StrokeSpec },
    /// A rectangle outline; `position` is the top-left corner
    Rect { size: (f64, f64), style: RectStyle },
}

/// Snapshot of one canvas item
#[derive(Debug, Clone)]
pub struct CanvasItem {
    pub handle: ItemHandle,
    pub position: Point,
    pub visible: bool,
    pub kind: ItemKind,
}

impl CanvasItem {
    /// Axis-aligned bounds of what the item draws
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ItemKind::Glyph { image, scale } => Rect::new(
                self.position.x,
                self.position.y,
                image.size.width * scale,
                image.size.height * scale,
            ),
            ItemKind::Line { to, .. } => Rect::from_corners(
                Point::new(self.position.x.min(to.x), self.position.y.min(to.y)),
                Point::new(self.position.x.max(to.x), self.position.y.max(to.y)),
            ),
            ItemKind::Rect { size, .. } => Rect::new(self.position.x, self.position.y, size.0, size.1),
        }
    }

    pub fn is_glyph(&self) -> bool {
        matches!(self.kind, ItemKind::Glyph { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, ItemKind::Line { .. })
    }
}
