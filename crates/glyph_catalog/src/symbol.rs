//! Placement metadata for a single glyph image

use serde::{Deserialize, Serialize};

/// A width/height pair in device pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Multiply both dimensions by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// A point expressed as fractions of a glyph's bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle expressed as fractions of a glyph's bounding box.
///
/// Edges are stored rather than origin/size because the manifest authoring
/// tool records the crop lines directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl NormRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// The whole bounding box
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Describe why these limits are unusable, if they are
    pub fn degeneracy(&self) -> Option<String> {
        let edges = [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ];
        for (name, value) in edges {
            if !(0.0..=1.0).contains(&value) {
                return Some(format!("{} = {} is outside [0, 1]", name, value));
            }
        }
        if self.left >= self.right {
            return Some("left >= right".to_string());
        }
        if self.top >= self.bottom {
            return Some("top >= bottom".to_string());
        }
        None
    }
}

impl Default for NormRect {
    fn default() -> Self {
        Self::full()
    }
}

/// Placement metadata for one glyph image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolData {
    /// Image file the glyph was authored in (provenance only)
    #[serde(default)]
    pub file_name: String,
    /// Usable ink area within the bounding box
    #[serde(default)]
    pub limits: NormRect,
    /// Where an incoming connector stroke attaches
    #[serde(default)]
    pub in_point: NormPoint,
    /// Where an outgoing connector stroke leaves
    #[serde(default)]
    pub out_point: NormPoint,
}

impl SymbolData {
    pub fn new(file_name: impl Into<String>, limits: NormRect) -> Self {
        Self {
            file_name: file_name.into(),
            limits,
            in_point: NormPoint::new(limits.left, limits.bottom),
            out_point: NormPoint::new(limits.right, limits.bottom),
        }
    }

    pub fn with_anchors(mut self, in_point: NormPoint, out_point: NormPoint) -> Self {
        self.in_point = in_point;
        self.out_point = out_point;
        self
    }
}
