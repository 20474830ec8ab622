//! Line-break strategies
//!
//! When the next glyph would cross the right margin the engine tries each
//! enabled strategy in order until one applies:
//! 1. Hyphenation: split the current word at a legal break point
//! 2. Word wrap: move the whole current word to the next line
//! 3. Hard break: start a new line at the current glyph
//!
//! Strategies rewrite the tail of the [`LayoutState`] and move the affected
//! canvas items. A strategy that cannot help leaves both untouched.

use crate::{HyphenRuleSet, LayoutState, PassMetrics};
use glyph_catalog::{pick_variant, GlyphProvider};
use rand::RngCore;
use render_model::{PageCanvas, Point};

/// Cursor positions this close vertically are on the same line
pub const SAME_LINE_TOLERANCE: f64 = 1e-7;

/// Below this a word already starts at the left margin
const MARGIN_EPSILON: f64 = 1e-7;

const HYPHEN: char = '-';

/// Result of one strategy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakOutcome {
    /// The state was rewritten; the current glyph goes at the new cursor
    Applied,
    /// Nothing changed; try the next strategy
    NotApplicable,
}

/// Everything a strategy may read or draw on besides the state
pub struct BreakContext<'a> {
    /// Text being laid out, as scalar values
    pub text: &'a [char],
    /// Index of the glyph that does not fit
    pub index: usize,
    pub metrics: &'a PassMetrics,
    pub catalog: &'a dyn GlyphProvider,
    pub rules: &'a HyphenRuleSet,
    pub canvas: &'a mut dyn PageCanvas,
    pub rng: &'a mut dyn RngCore,
}

impl BreakContext<'_> {
    fn current_char(&self) -> char {
        self.text[self.index]
    }

    fn previous_char(&self) -> Option<char> {
        self.index.checked_sub(1).map(|i| self.text[i])
    }
}

/// A way of making room for a glyph that crosses the right margin
pub trait BreakStrategy {
    fn name(&self) -> &'static str;

    fn try_break(&self, state: &mut LayoutState, ctx: &mut BreakContext<'_>) -> BreakOutcome;
}

/// Build the strategy chain for the enabled options
pub fn break_strategies(hyphenate: bool, wrap: bool) -> Vec<Box<dyn BreakStrategy>> {
    let mut strategies: Vec<Box<dyn BreakStrategy>> = Vec::with_capacity(3);
    if hyphenate {
        strategies.push(Box::new(Hyphenation));
    }
    if wrap {
        strategies.push(Box::new(WordWrap));
    }
    strategies.push(Box::new(HardBreak));
    strategies
}

/// Split the current word at the nearest legal point before the overflow
#[derive(Debug, Clone, Copy, Default)]
pub struct Hyphenation;

impl BreakStrategy for Hyphenation {
    fn name(&self) -> &'static str {
        "hyphenation"
    }

    fn try_break(&self, state: &mut LayoutState, ctx: &mut BreakContext<'_>) -> BreakOutcome {
        let Some(previous_char) = ctx.previous_char() else {
            return BreakOutcome::NotApplicable;
        };
        if !ctx.current_char().is_alphanumeric() || !previous_char.is_alphanumeric() {
            return BreakOutcome::NotApplicable;
        }
        let Some(previous) = state.previous else {
            return BreakOutcome::NotApplicable;
        };
        if (state.cursor.y - previous.anchor.y).abs() > SAME_LINE_TOLERANCE {
            return BreakOutcome::NotApplicable;
        }

        let start = word_start(ctx.text, ctx.index);
        if start > ctx.index {
            return BreakOutcome::NotApplicable;
        }
        let end = word_end(ctx.text, ctx.index);
        let word: String = ctx.text[start..end].iter().collect();
        let position = ctx.index - start;

        let Some(break_at) = ctx.rules.break_points(&word).into_iter().filter(|&b| b <= position).max() else {
            return BreakOutcome::NotApplicable;
        };
        let count = position - break_at;
        if count >= state.current_word().len() {
            return BreakOutcome::NotApplicable;
        }

        place_hyphen(state, ctx, count);

        let metrics = ctx.metrics;
        if !wrap_last_symbols(state, ctx.canvas, metrics, count) {
            // Nothing moved: the current glyph opens the next line
            if let Some(prev) = state.previous.as_mut() {
                prev.anchor.x = metrics.margins.x - prev.ink_width - metrics.letter_spacing;
                prev.anchor.y += metrics.line_height;
            }
            state.start_word();
        }

        continue_after_previous(state, metrics);
        if metrics.is_beyond_bottom(state.cursor.y) {
            state.defer_removal(count);
        }

        tracing::trace!(word = %word, break_at, moved = count, "Hyphenated word at margin");
        BreakOutcome::Applied
    }
}

/// Move the whole current word to the next line
#[derive(Debug, Clone, Copy, Default)]
pub struct WordWrap;

impl BreakStrategy for WordWrap {
    fn name(&self) -> &'static str {
        "word_wrap"
    }

    fn try_break(&self, state: &mut LayoutState, ctx: &mut BreakContext<'_>) -> BreakOutcome {
        let Some(previous_char) = ctx.previous_char() else {
            return BreakOutcome::NotApplicable;
        };
        if !is_word_char(ctx.current_char()) || !is_word_char(previous_char) {
            return BreakOutcome::NotApplicable;
        }

        let count = ctx.index.saturating_sub(word_start(ctx.text, ctx.index));
        if !wrap_last_symbols(state, ctx.canvas, ctx.metrics, count) {
            return BreakOutcome::NotApplicable;
        }

        continue_after_previous(state, ctx.metrics);
        if ctx.metrics.is_beyond_bottom(state.cursor.y) {
            let moved = state.current_word().len();
            state.defer_removal(moved);
        }

        tracing::trace!(index = ctx.index, "Wrapped word to next line");
        BreakOutcome::Applied
    }
}

/// Start a new line at the current glyph
#[derive(Debug, Clone, Copy, Default)]
pub struct HardBreak;

impl BreakStrategy for HardBreak {
    fn name(&self) -> &'static str {
        "hard_break"
    }

    fn try_break(&self, state: &mut LayoutState, ctx: &mut BreakContext<'_>) -> BreakOutcome {
        // Punctuation may hang past the margin
        if is_punctuation(ctx.current_char()) {
            return BreakOutcome::NotApplicable;
        }

        state.cursor = Point::new(ctx.metrics.margins.x, state.cursor.y + ctx.metrics.line_height);
        state.start_word();
        BreakOutcome::Applied
    }
}

/// Transfer the last `count` glyphs of the current word to the start of the
/// next line.
///
/// The count is clamped to the word length. Returns false, changing nothing,
/// when there is nothing to move or the word already starts at the left margin.
pub fn wrap_last_symbols(
    state: &mut LayoutState,
    canvas: &mut dyn PageCanvas,
    metrics: &PassMetrics,
    count: usize,
) -> bool {
    let word = state.current_word();
    let count = count.min(word.len());
    if count == 0 {
        return false;
    }

    let first = &word.glyphs()[word.len() - count];
    let offset = first.anchor.x - metrics.margins.x;
    if offset <= MARGIN_EPSILON {
        return false;
    }

    let line_height = metrics.line_height;
    for glyph in state.split_current_word(count, -offset, line_height) {
        let found = canvas.move_item(glyph.handle, glyph.position);
        debug_assert!(found, "glyph {:?} is not on the canvas", glyph.handle);
    }
    if let Some(prev) = state.previous.as_mut() {
        prev.anchor = prev.anchor.offset(-offset, line_height);
    }
    true
}

fn continue_after_previous(state: &mut LayoutState, metrics: &PassMetrics) {
    if let Some(prev) = state.previous {
        state.cursor = prev.next_cursor(metrics.letter_spacing);
    }
}

/// Draw a hyphen after the glyphs that stay on the current line
fn place_hyphen(state: &mut LayoutState, ctx: &mut BreakContext<'_>, moved: usize) {
    let catalog = ctx.catalog;
    let Some(variant) = pick_variant(catalog.variants_for(HYPHEN), &mut *ctx.rng) else {
        return;
    };
    let word = state.current_word();
    let Some(last_kept) = word.len().checked_sub(moved + 1).and_then(|i| word.glyphs().get(i)) else {
        return;
    };

    let size = variant.scaled_size();
    let limits = variant.data.limits;
    let position = Point::new(
        last_kept.ink_right() + ctx.metrics.letter_spacing - size.width * limits.left,
        state.cursor.y - size.height * limits.top,
    );
    let handle = ctx.canvas.add_glyph(&variant.image, position, variant.scale);
    state.record_hyphen(handle);
}

/// Letters, digits, and punctuation stay inside a word group
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || is_punctuation(ch)
}

/// Unicode punctuation (general category P*) for the common blocks
pub fn is_punctuation(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_punctuation() && !matches!(ch, '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~');
    }
    matches!(
        ch,
        '\u{00A1}'
            | '\u{00A7}'
            | '\u{00AB}'
            | '\u{00B6}'
            | '\u{00B7}'
            | '\u{00BB}'
            | '\u{00BF}'
            | '\u{037E}'
            | '\u{0387}'
            | '\u{055A}'..='\u{055F}'
            | '\u{0589}'..='\u{058A}'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{2043}'
            | '\u{2045}'..='\u{2051}'
            | '\u{2053}'..='\u{205E}'
            | '\u{2E00}'..='\u{2E4F}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
            | '\u{3014}'..='\u{301F}'
            | '\u{FF01}'..='\u{FF03}'
            | '\u{FF05}'..='\u{FF0A}'
            | '\u{FF0C}'..='\u{FF0F}'
            | '\u{FF1A}'..='\u{FF1B}'
            | '\u{FF1F}'..='\u{FF20}'
    )
}

/// First index of the letter run ending at `index`.
///
/// Greater than `index` when the character at `index` is not a letter.
fn word_start(text: &[char], index: usize) -> usize {
    text[..=index]
        .iter()
        .rposition(|c| !c.is_alphabetic())
        .map_or(0, |i| i + 1)
}

/// One past the last index of the letter run containing `index`
fn word_end(text: &[char], index: usize) -> usize {
    text[index..]
        .iter()
        .position(|c| !c.is_alphabetic())
        .map_or(text.len(), |p| index + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayoutConfig, WordGlyph, MM_PER_INCH};
    use glyph_catalog::{GlyphImage, NormRect, Size, SymbolData};
    use render_model::{ItemHandle, Rect, SceneCanvas};
    use std::sync::Arc;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    /// Margins at (10, 10), 10px glyphs, 12px lines
    fn metrics() -> PassMetrics {
        let config = LayoutConfig {
            dpi: MM_PER_INCH,
            font_size: 10.0,
            letter_spacing: 0.0,
            line_spacing: 2.0,
            ..Default::default()
        };
        config.pass_metrics(Rect::new(10.0, 10.0, 100.0, 100.0))
    }

    /// Place one 10px word glyph per x on the first line
    fn place(state: &mut LayoutState, canvas: &mut SceneCanvas, xs: &[f64]) -> Vec<ItemHandle> {
        let image = Arc::new(GlyphImage::new("g.svg", Size::new(10.0, 10.0)));
        xs.iter()
            .map(|&x| {
                let position = Point::new(x, 10.0);
                let handle = canvas.add_glyph(&image, position, 1.0);
                let glyph = WordGlyph {
                    handle,
                    data: SymbolData::new("g.svg", NormRect::full()),
                    size: Size::new(10.0, 10.0),
                    position,
                    anchor: position,
                };
                state.place_glyph(glyph, 10.0, 0.0, true);
                handle
            })
            .collect()
    }

    fn position(canvas: &SceneCanvas, handle: ItemHandle) -> Point {
        canvas.item(handle).unwrap().position
    }

    #[test]
    fn test_wrap_clamps_count_to_word_length() {
        let metrics = metrics();
        let mut canvas = SceneCanvas::new();
        let mut state = LayoutState::new(Point::new(10.0, 10.0));
        let before = place(&mut state, &mut canvas, &[10.0]);
        state.start_word();
        let word = place(&mut state, &mut canvas, &[30.0, 40.0, 50.0]);

        assert!(wrap_last_symbols(&mut state, &mut canvas, &metrics, 5));

        let moved = state.current_word();
        assert_eq!(moved.len(), 3);
        assert_eq!(state.glyph_count(), 4);
        assert_eq!(state.words()[0].len(), 1);
        assert_eq!(position(&canvas, before[0]), Point::new(10.0, 10.0));
        let positions: Vec<Point> = word.iter().map(|&h| position(&canvas, h)).collect();
        assert_eq!(
            positions,
            vec![Point::new(10.0, 22.0), Point::new(20.0, 22.0), Point::new(30.0, 22.0)]
        );
        assert_eq!(state.previous.unwrap().anchor, Point::new(30.0, 22.0));
    }

    #[test]
    fn test_wrap_of_nothing_changes_nothing() {
        let metrics = metrics();
        let mut canvas = SceneCanvas::new();
        let mut state = LayoutState::new(Point::new(30.0, 10.0));
        let word = place(&mut state, &mut canvas, &[30.0, 40.0]);
        let cursor = state.cursor;
        let previous = state.previous;

        assert!(!wrap_last_symbols(&mut state, &mut canvas, &metrics, 0));
        assert_eq!(state.cursor, cursor);
        assert_eq!(state.previous, previous);
        assert_eq!(state.words().len(), 1);
        assert_eq!(state.current_word().len(), 2);
        assert_eq!(position(&canvas, word[1]), Point::new(40.0, 10.0));
    }

    #[test]
    fn test_wrap_skips_word_at_left_margin() {
        let metrics = metrics();
        let mut canvas = SceneCanvas::new();
        let mut state = LayoutState::new(Point::new(10.0, 10.0));
        let word = place(&mut state, &mut canvas, &[10.0, 20.0, 30.0]);

        assert!(!wrap_last_symbols(&mut state, &mut canvas, &metrics, 3));
        assert_eq!(state.words().len(), 1);
        let positions: Vec<Point> = word.iter().map(|&h| position(&canvas, h)).collect();
        assert_eq!(
            positions,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0), Point::new(30.0, 10.0)]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not on the canvas")]
    fn test_wrap_with_state_out_of_sync_with_canvas() {
        let metrics = metrics();
        let mut canvas = SceneCanvas::new();
        let mut state = LayoutState::new(Point::new(30.0, 10.0));
        place(&mut state, &mut canvas, &[30.0, 40.0]);
        canvas.clear();

        wrap_last_symbols(&mut state, &mut canvas, &metrics, 1);
    }

    #[test]
    fn test_word_bounds() {
        let text = chars("ab cde, f");
        assert_eq!(word_start(&text, 4), 3);
        assert_eq!(word_end(&text, 4), 6);
        assert_eq!(word_start(&text, 1), 0);
        assert_eq!(word_end(&text, 8), 9);
        // Not a letter
        assert_eq!(word_start(&text, 6), 7);
    }

    #[test]
    fn test_is_punctuation() {
        for ch in ['.', ',', '!', '?', '-', '(', '"', '«', '»', '—', '…', '¿'] {
            assert!(is_punctuation(ch), "{ch:?} should be punctuation");
        }
        for ch in ['a', 'я', '1', ' ', '+', '=', '$', '<', '\n'] {
            assert!(!is_punctuation(ch), "{ch:?} should not be punctuation");
        }
    }

    #[test]
    fn test_is_word_char() {
        assert!(is_word_char('ж'));
        assert!(is_word_char('7'));
        assert!(is_word_char(';'));
        assert!(!is_word_char('+'));
        assert!(!is_word_char(' '));
    }

    #[test]
    fn test_strategy_chain() {
        let names = |chain: Vec<Box<dyn BreakStrategy>>| chain.iter().map(|s| s.name()).collect::<Vec<_>>();
        assert_eq!(
            names(break_strategies(true, true)),
            vec!["hyphenation", "word_wrap", "hard_break"]
        );
        assert_eq!(names(break_strategies(false, true)), vec!["word_wrap", "hard_break"]);
        assert_eq!(names(break_strategies(false, false)), vec!["hard_break"]);
    }
}
