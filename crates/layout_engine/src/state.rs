//! Per-pass layout state
//!
//! A pass keeps the pen position, the last placed glyph, and the word groups
//! built so far. Break strategies rewrite the tail of this state when a glyph
//! would cross the right margin.

use glyph_catalog::{Size, SymbolData};
use render_model::{ItemHandle, Point};

/// A glyph that belongs to a word group
#[derive(Debug, Clone, PartialEq)]
pub struct WordGlyph {
    /// Canvas item for the glyph
    pub handle: ItemHandle,
    pub data: SymbolData,
    /// Scaled bounding box size
    pub size: Size,
    /// Top-left of the bounding box
    pub position: Point,
    /// Where the ink starts: the pen position the glyph was placed at
    pub anchor: Point,
}

impl WordGlyph {
    /// Page position of the incoming connector point
    pub fn in_point(&self) -> Point {
        self.position.offset(
            self.size.width * self.data.in_point.x,
            self.size.height * self.data.in_point.y,
        )
    }

    /// Page position of the outgoing connector point
    pub fn out_point(&self) -> Point {
        self.position.offset(
            self.size.width * self.data.out_point.x,
            self.size.height * self.data.out_point.y,
        )
    }

    /// Page x where the ink ends
    pub fn ink_right(&self) -> f64 {
        self.position.x + self.size.width * self.data.limits.right
    }

    /// Shift the glyph by a delta
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.position = self.position.offset(dx, dy);
        self.anchor = self.anchor.offset(dx, dy);
    }
}

/// Glyphs joined by connector strokes, in placement order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordGroup {
    glyphs: Vec<WordGlyph>,
}

impl WordGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyphs(&self) -> &[WordGlyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn push(&mut self, glyph: WordGlyph) {
        self.glyphs.push(glyph);
    }

    pub fn last(&self) -> Option<&WordGlyph> {
        self.glyphs.last()
    }

    fn pop(&mut self) -> Option<WordGlyph> {
        self.glyphs.pop()
    }

    /// Detach the last `count` glyphs as a new group
    fn split_tail(&mut self, count: usize) -> WordGroup {
        let at = self.glyphs.len().saturating_sub(count);
        WordGroup {
            glyphs: self.glyphs.split_off(at),
        }
    }
}

/// The most recently placed glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousGlyph {
    /// Pen position the glyph was placed at
    pub anchor: Point,
    /// Ink width of the glyph
    pub ink_width: f64,
}

impl PreviousGlyph {
    /// Pen position right after this glyph
    pub fn next_cursor(&self, letter_spacing: f64) -> Point {
        Point::new(self.anchor.x + self.ink_width + letter_spacing, self.anchor.y)
    }
}

/// Mutable state of one layout pass
#[derive(Debug, Clone)]
pub struct LayoutState {
    /// Pen position where the next glyph's ink starts
    pub cursor: Point,
    pub previous: Option<PreviousGlyph>,
    words: Vec<WordGroup>,
    /// Trailing glyphs to take back off the sheet at the end of the pass
    pending_removal: usize,
    glyph_count: usize,
    hyphens: Vec<ItemHandle>,
}

impl LayoutState {
    pub fn new(origin: Point) -> Self {
        Self {
            cursor: origin,
            previous: None,
            words: vec![WordGroup::new()],
            pending_removal: 0,
            glyph_count: 0,
            hyphens: Vec::new(),
        }
    }

    /// Close the current group; the next word glyph opens a fresh one
    pub fn start_word(&mut self) {
        if self.words.last().is_some_and(|w| !w.is_empty()) {
            self.words.push(WordGroup::new());
        }
    }

    /// The group word glyphs are currently appended to
    pub fn current_word(&self) -> &WordGroup {
        // `words` is never empty
        &self.words[self.words.len() - 1]
    }

    pub fn words(&self) -> &[WordGroup] {
        &self.words
    }

    /// Record a glyph placed at the cursor and advance past it.
    ///
    /// Glyphs that are not part of a word are placed outside any group and
    /// end the current one.
    pub fn place_glyph(&mut self, glyph: WordGlyph, ink_width: f64, letter_spacing: f64, joins_word: bool) {
        self.previous = Some(PreviousGlyph {
            anchor: glyph.anchor,
            ink_width,
        });
        self.cursor.x += ink_width + letter_spacing;
        self.glyph_count += 1;

        if joins_word {
            self.current_mut().push(glyph);
        } else {
            self.start_word();
        }
    }

    /// Move the last `count` glyphs of the current group into a new group
    /// and shift them by a delta. Returns the moved glyphs.
    pub fn split_current_word(&mut self, count: usize, dx: f64, dy: f64) -> &[WordGlyph] {
        let mut tail = self.current_mut().split_tail(count);
        for glyph in &mut tail.glyphs {
            glyph.translate(dx, dy);
        }
        self.words.push(tail);
        self.current_word().glyphs()
    }

    /// Take the last placed word glyph back off the state
    pub fn pop_last_glyph(&mut self) -> Option<WordGlyph> {
        while let Some(group) = self.words.last_mut() {
            if let Some(glyph) = group.pop() {
                self.glyph_count -= 1;
                return Some(glyph);
            }
            if self.words.len() == 1 {
                break;
            }
            self.words.pop();
        }
        None
    }

    pub fn defer_removal(&mut self, count: usize) {
        self.pending_removal = count;
    }

    pub fn pending_removal(&self) -> usize {
        self.pending_removal
    }

    /// Glyphs currently placed, hyphens excluded
    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    pub fn record_hyphen(&mut self, handle: ItemHandle) {
        self.hyphens.push(handle);
    }

    pub fn hyphens(&self) -> &[ItemHandle] {
        &self.hyphens
    }

    fn current_mut(&mut self) -> &mut WordGroup {
        let last = self.words.len() - 1;
        &mut self.words[last]
    }
}
