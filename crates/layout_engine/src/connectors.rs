//! Connector strokes between consecutive letters of a word

use crate::WordGroup;
use render_model::{Color, PageCanvas, Point, StrokeSpec};

/// Draws a stroke from each glyph's exit point to the next glyph's entry point
#[derive(Debug, Clone, Copy)]
pub struct ConnectorGenerator {
    stroke: StrokeSpec,
}

impl ConnectorGenerator {
    pub fn new(color: Color, pen_width: f64) -> Self {
        Self {
            stroke: StrokeSpec::round(color, pen_width),
        }
    }

    pub fn stroke(&self) -> &StrokeSpec {
        &self.stroke
    }

    /// Endpoints of every connector, group by group
    pub fn segments(words: &[WordGroup]) -> Vec<(Point, Point)> {
        words
            .iter()
            .flat_map(|word| word.glyphs().windows(2).map(|pair| (pair[0].out_point(), pair[1].in_point())))
            .collect()
    }

    /// Add all connectors to the canvas, returning how many were drawn
    pub fn connect(&self, words: &[WordGroup], canvas: &mut dyn PageCanvas) -> usize {
        let segments = Self::segments(words);
        for (from, to) in &segments {
            canvas.add_line(*from, *to, &self.stroke);
        }
        segments.len()
    }
}
