//! Character to glyph-variant catalog

use crate::{Size, SymbolData};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A source image shared by the variants drawn from it
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphImage {
    /// Resolved path of the SVG file
    pub source: PathBuf,
    /// Default render size of the image in device pixels
    pub size: Size,
}

impl GlyphImage {
    pub fn new(source: impl Into<PathBuf>, size: Size) -> Self {
        Self {
            source: source.into(),
            size,
        }
    }
}

/// One concrete option for rendering a character
#[derive(Debug, Clone)]
pub struct GlyphVariant {
    /// Shared image handle
    pub image: Arc<GlyphImage>,
    /// Render scale applied to the image
    pub scale: f64,
    /// Placement metadata
    pub data: SymbolData,
}

impl GlyphVariant {
    pub fn new(image: Arc<GlyphImage>, scale: f64, data: SymbolData) -> Self {
        Self { image, scale, data }
    }

    /// Build a variant scaled so its ink height equals `ink_height`
    pub fn fitted(image: Arc<GlyphImage>, data: SymbolData, ink_height: f64) -> Self {
        let source_ink = image.size.height * data.limits.height();
        let scale = if source_ink > 0.0 { ink_height / source_ink } else { 1.0 };
        Self { image, scale, data }
    }

    /// Bounding box of the image after scaling
    pub fn scaled_size(&self) -> Size {
        self.image.size.scaled(self.scale)
    }

    /// Width of the visible strokes after scaling
    pub fn ink_width(&self) -> f64 {
        self.scaled_size().width * self.data.limits.width()
    }
}

/// Read-only glyph lookup used by the layout engine
pub trait GlyphProvider {
    /// Whether at least one variant exists for `ch`
    fn has_glyph(&self, ch: char) -> bool;

    /// All variants for `ch`; non-empty whenever `has_glyph` is true
    fn variants_for(&self, ch: char) -> &[GlyphVariant];
}

/// Pick one variant uniformly at random
pub fn pick_variant<'a>(variants: &'a [GlyphVariant], rng: &mut dyn RngCore) -> Option<&'a GlyphVariant> {
    variants.choose(rng)
}

/// Multi-valued map from character to its glyph variants.
///
/// Keys are case sensitive: `a` and `A` are distinct entries.
#[derive(Debug, Clone, Default)]
pub struct GlyphCatalog {
    glyphs: HashMap<char, Vec<GlyphVariant>>,
}

impl GlyphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variant for `ch`, keeping insertion order
    pub fn insert(&mut self, ch: char, variant: GlyphVariant) {
        self.glyphs.entry(ch).or_default().push(variant);
    }

    /// Remove every variant of `ch`
    pub fn remove(&mut self, ch: char) -> Option<Vec<GlyphVariant>> {
        self.glyphs.remove(&ch)
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Total number of variants across all characters
    pub fn variant_count(&self) -> usize {
        self.glyphs.values().map(Vec::len).sum()
    }

    /// Mapped characters in sorted order
    pub fn chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.glyphs.keys().copied().collect();
        chars.sort_unstable();
        chars
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
    }
}

impl GlyphProvider for GlyphCatalog {
    fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.get(&ch).is_some_and(|v| !v.is_empty())
    }

    fn variants_for(&self, ch: char) -> &[GlyphVariant] {
        self.glyphs.get(&ch).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl<T: GlyphProvider + ?Sized> GlyphProvider for &T {
    fn has_glyph(&self, ch: char) -> bool {
        (**self).has_glyph(ch)
    }

    fn variants_for(&self, ch: char) -> &[GlyphVariant] {
        (**self).variants_for(ch)
    }
}

impl<T: GlyphProvider + ?Sized> GlyphProvider for Arc<T> {
    fn has_glyph(&self, ch: char) -> bool {
        (**self).has_glyph(ch)
    }

    fn variants_for(&self, ch: char) -> &[GlyphVariant] {
        (**self).variants_for(ch)
    }
}
