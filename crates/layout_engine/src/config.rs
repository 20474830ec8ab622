//! Layout configuration
//!
//! Spacing is configured in millimetres, the way it is entered by users, and
//! converted to device pixels once per pass.

use crate::{LayoutError, Result};
use render_model::{Color, Rect};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// How the variant-selection stream is seeded at the start of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Same seed every pass: reproducible output
    Fixed(u64),
    /// Seed from the wall clock: a fresh look every pass
    #[default]
    Clock,
}

impl SeedPolicy {
    /// Seed to use for the pass starting now
    pub fn seed(&self) -> u64 {
        match self {
            SeedPolicy::Fixed(seed) => *seed,
            SeedPolicy::Clock => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default(),
        }
    }
}

/// Configuration for a layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Device resolution
    pub dpi: f64,
    /// Ink height of a glyph in mm
    pub font_size: f64,
    /// Gap between adjacent glyphs in mm
    pub letter_spacing: f64,
    /// Advance for a space in mm
    pub word_spacing: f64,
    /// Gap between lines in mm
    pub line_spacing: f64,
    /// Number of word spacings a tab advances
    pub spaces_in_tab: u32,
    /// Connector stroke width in mm
    pub pen_width: f64,
    /// Connector stroke color
    pub font_color: Color,
    /// Move a word that crosses the right margin to the next line
    pub wrap_words: bool,
    /// Split words at hyphenation points when they cross the right margin
    pub hyphenate_words: bool,
    /// Draw connector strokes between letters of a word
    pub connect_letters: bool,
    /// Seeding of the variant-selection stream
    pub seed: SeedPolicy,
    /// Swap the left and right margin widths
    pub mirror_margins: bool,
    /// Hide the sheet and margin outlines
    pub borders_hidden: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            font_size: 6.0,
            letter_spacing: 0.0,
            word_spacing: 3.0,
            line_spacing: 2.0,
            spaces_in_tab: 4,
            pen_width: 0.4,
            font_color: Color::BLACK,
            wrap_words: true,
            hyphenate_words: true,
            connect_letters: true,
            seed: SeedPolicy::Clock,
            mirror_margins: false,
            borders_hidden: false,
        }
    }
}

impl LayoutConfig {
    /// Dots per millimetre
    pub fn dpmm(&self) -> f64 {
        self.dpi / MM_PER_INCH
    }

    /// Reject values no pass can work with
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi > 0.0) {
            return Err(LayoutError::InvalidConfig(format!("dpi must be positive, got {}", self.dpi)));
        }
        if !(self.font_size > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if self.font_size + self.line_spacing <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "line height (font size + line spacing) must be positive".to_string(),
            ));
        }
        if self.pen_width < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "pen width must not be negative, got {}",
                self.pen_width
            )));
        }
        Ok(())
    }

    /// Resolve device-pixel metrics for a pass inside `margins`
    pub fn pass_metrics(&self, margins: Rect) -> PassMetrics {
        let dpmm = self.dpmm();
        PassMetrics {
            margins,
            font_size: self.font_size * dpmm,
            letter_spacing: self.letter_spacing * dpmm,
            word_spacing: self.word_spacing * dpmm,
            tab_advance: (self.word_spacing * self.spaces_in_tab as f64 - self.letter_spacing) * dpmm,
            line_height: (self.font_size + self.line_spacing) * dpmm,
            pen_width: self.pen_width * dpmm,
        }
    }
}

/// Device-pixel geometry fixed for the duration of one pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassMetrics {
    /// Margin rect the text flows inside
    pub margins: Rect,
    pub font_size: f64,
    pub letter_spacing: f64,
    pub word_spacing: f64,
    pub tab_advance: f64,
    /// Distance between consecutive line tops
    pub line_height: f64,
    pub pen_width: f64,
}

impl PassMetrics {
    /// Lowest cursor y a glyph may still start at
    pub fn bottom_limit(&self) -> f64 {
        self.margins.bottom() - self.font_size
    }

    pub fn is_beyond_bottom(&self, y: f64) -> bool {
        y > self.bottom_limit()
    }
}
