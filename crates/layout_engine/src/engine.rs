//! Layout engine
//!
//! Places glyphs for a text on one sheet. Each pass clears the canvas, draws
//! the sheet and margin outlines, then walks the text one scalar value at a
//! time: mapped characters become glyphs, everything else advances the pen.
//! When a glyph would cross the right margin the break strategy chain makes
//! room for it. The pass stops at the first glyph that would start below the
//! bottom margin; the caller continues the text on a new sheet from
//! [`RenderReport::consumed`].

use crate::breaks::{break_strategies, is_word_char, BreakContext, BreakOutcome};
use crate::{
    ConnectorGenerator, HyphenRuleSet, LayoutConfig, LayoutError, LayoutState, PageGeometry, PassMetrics, Result,
    WordGlyph,
};
use glyph_catalog::{pick_variant, GlyphProvider};
use perf::PerfTimer;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use render_model::{Color, ItemHandle, PageCanvas, RectStyle};

/// Outcome of one layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Text glyphs left on the sheet
    pub glyphs: usize,
    /// Hyphen glyphs added at line breaks
    pub hyphens: usize,
    /// Connector strokes drawn
    pub connectors: usize,
    /// Characters of the text represented on this sheet
    pub consumed: usize,
    /// Trailing glyphs taken back off the sheet for the next one
    pub removed: usize,
    /// Whether the pass stopped at the bottom margin
    pub page_full: bool,
}

/// Outline items drawn by the last pass
#[derive(Debug, Clone, Copy)]
struct Borders {
    sheet: ItemHandle,
    margins: ItemHandle,
}

/// Lays out text on a page canvas with glyphs from a catalog
pub struct LayoutEngine<C, R = StdRng> {
    catalog: C,
    geometry: PageGeometry,
    config: LayoutConfig,
    rules: HyphenRuleSet,
    rng: R,
    borders: Option<Borders>,
}

impl<C: GlyphProvider> LayoutEngine<C, StdRng> {
    pub fn new(catalog: C, geometry: PageGeometry, config: LayoutConfig) -> Self {
        Self::with_rng(catalog, geometry, config)
    }
}

impl<C: GlyphProvider, R: RngCore + SeedableRng> LayoutEngine<C, R> {
    /// Create an engine drawing variants from a specific generator type
    pub fn with_rng(catalog: C, geometry: PageGeometry, config: LayoutConfig) -> Self {
        Self {
            catalog,
            geometry,
            config,
            rules: HyphenRuleSet::new(),
            rng: R::seed_from_u64(0),
            borders: None,
        }
    }

    pub fn with_hyphen_rules(mut self, rules: HyphenRuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn set_hyphen_rules(&mut self, rules: HyphenRuleSet) {
        self.rules = rules;
    }

    pub fn hyphen_rules(&self) -> &HyphenRuleSet {
        &self.rules
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Mirror or unmirror margins for the next pass
    pub fn set_mirror_margins(&mut self, mirrored: bool) {
        self.config.mirror_margins = mirrored;
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        self.geometry = geometry;
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn set_catalog(&mut self, catalog: C) {
        self.catalog = catalog;
    }

    /// Lay out `text` and return how many characters were consumed
    pub fn render_text(&mut self, canvas: &mut dyn PageCanvas, text: &str) -> Result<usize> {
        self.render(canvas, text).map(|report| report.consumed)
    }

    /// Lay out `text` on a cleared canvas
    pub fn render(&mut self, canvas: &mut dyn PageCanvas, text: &str) -> Result<RenderReport> {
        let _timer = PerfTimer::layout("render_text");
        self.config.validate()?;
        self.geometry.validate()?;

        let margins = self.geometry.current_margins(self.config.mirror_margins);
        let metrics = self.config.pass_metrics(margins);

        canvas.clear();
        self.draw_borders(canvas, &metrics);
        self.rng = R::seed_from_u64(self.config.seed.seed());

        let strategies = break_strategies(self.config.hyphenate_words, self.config.wrap_words);
        let chars: Vec<char> = text.chars().collect();
        let mut state = LayoutState::new(margins.top_left());
        let mut consumed = 0;
        let mut page_full = false;
        tracing::debug!(chars = chars.len(), margins = ?margins, "Starting layout pass");

        for (index, &ch) in chars.iter().enumerate() {
            if !self.catalog.has_glyph(ch) {
                advance_unmapped(&mut state, &metrics, ch);
                consumed = index + 1;
                if metrics.is_beyond_bottom(state.cursor.y) {
                    page_full = true;
                    break;
                }
                continue;
            }

            let variant =
                pick_variant(self.catalog.variants_for(ch), &mut self.rng).ok_or(LayoutError::MissingVariant(ch))?;
            let size = variant.scaled_size();
            let ink_width = variant.ink_width();

            if state.cursor.x > metrics.margins.right() - ink_width {
                let mut ctx = BreakContext {
                    text: &chars,
                    index,
                    metrics: &metrics,
                    catalog: &self.catalog,
                    rules: &self.rules,
                    canvas: &mut *canvas,
                    rng: &mut self.rng,
                };
                for strategy in &strategies {
                    if strategy.try_break(&mut state, &mut ctx) == BreakOutcome::Applied {
                        if let Ok(mut stats) = perf::global_metrics().lock() {
                            stats.record_break(strategy.name());
                        }
                        break;
                    }
                }
            }

            if metrics.is_beyond_bottom(state.cursor.y) {
                tracing::debug!(index, pending = state.pending_removal(), "Sheet full");
                page_full = true;
                break;
            }

            let limits = variant.data.limits;
            let anchor = state.cursor;
            let position = anchor.offset(-size.width * limits.left, -size.height * limits.top);
            let handle = canvas.add_glyph(&variant.image, position, variant.scale);
            let glyph = WordGlyph {
                handle,
                data: variant.data.clone(),
                size,
                position,
                anchor,
            };
            state.place_glyph(glyph, ink_width, metrics.letter_spacing, is_word_char(ch));
            consumed = index + 1;
        }

        let mut removed = 0;
        for _ in 0..state.pending_removal() {
            match state.pop_last_glyph() {
                Some(glyph) => {
                    let found = canvas.remove_item(glyph.handle);
                    debug_assert!(found, "glyph {:?} is not on the canvas", glyph.handle);
                    removed += 1;
                }
                None => break,
            }
        }
        consumed = consumed.saturating_sub(removed);

        let connectors = if self.config.connect_letters {
            ConnectorGenerator::new(self.config.font_color, metrics.pen_width).connect(state.words(), canvas)
        } else {
            0
        };

        let report = RenderReport {
            glyphs: state.glyph_count(),
            hyphens: state.hyphens().len(),
            connectors,
            consumed,
            removed,
            page_full,
        };
        if let Ok(mut stats) = perf::global_metrics().lock() {
            stats.record_pass(report.glyphs, report.connectors);
        }
        tracing::debug!(
            glyphs = report.glyphs,
            hyphens = report.hyphens,
            connectors = report.connectors,
            consumed = report.consumed,
            total = chars.len(),
            page_full = report.page_full,
            "Layout pass complete"
        );
        Ok(report)
    }

    /// Show or hide the sheet and margin outlines
    pub fn hide_borders(&mut self, canvas: &mut dyn PageCanvas, hide: bool) {
        self.config.borders_hidden = hide;
        if let Some(borders) = self.borders {
            canvas.set_visible(borders.sheet, !hide);
            canvas.set_visible(borders.margins, !hide);
        }
    }

    fn draw_borders(&mut self, canvas: &mut dyn PageCanvas, metrics: &PassMetrics) {
        let visible = !self.config.borders_hidden;
        let sheet = canvas.add_rect(self.geometry.sheet, &RectStyle::default());
        let margins = canvas.add_rect(metrics.margins, &RectStyle::outline(Color::DARK_GRAY));
        canvas.set_visible(sheet, visible);
        canvas.set_visible(margins, visible);
        self.borders = Some(Borders { sheet, margins });
    }
}

/// Move the pen over a character that has no glyph
fn advance_unmapped(state: &mut LayoutState, metrics: &PassMetrics, ch: char) {
    match ch {
        '\t' => state.cursor.x += metrics.tab_advance,
        '\n' => {
            state.cursor.x = metrics.margins.x;
            state.cursor.y += metrics.line_height;
        }
        ' ' => state.cursor.x += metrics.word_spacing - metrics.letter_spacing,
        _ => state.cursor.x += metrics.font_size + metrics.letter_spacing,
    }
    state.start_word();

    if state.cursor.x > metrics.margins.right() - (metrics.font_size + metrics.letter_spacing) {
        state.cursor.x = metrics.margins.x;
        state.cursor.y += metrics.line_height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageMargins, SeedPolicy, MM_PER_INCH};
    use glyph_catalog::{GlyphCatalog, GlyphImage, GlyphVariant, NormRect, Size, SymbolData};
    use render_model::{Point, Rect, SceneCanvas, SortOrder};
    use std::sync::Arc;

    /// One millimetre per pixel keeps the arithmetic readable
    fn config() -> LayoutConfig {
        LayoutConfig {
            dpi: MM_PER_INCH,
            font_size: 10.0,
            letter_spacing: 0.0,
            word_spacing: 5.0,
            line_spacing: 2.0,
            pen_width: 1.0,
            hyphenate_words: false,
            seed: SeedPolicy::Fixed(1),
            ..Default::default()
        }
    }

    fn catalog(chars: &str) -> GlyphCatalog {
        let image = Arc::new(GlyphImage::new("g.svg", Size::new(10.0, 10.0)));
        let mut catalog = GlyphCatalog::new();
        for ch in chars.chars() {
            let data = SymbolData::new(format!("{ch}.svg"), NormRect::full());
            catalog.insert(ch, GlyphVariant::new(Arc::clone(&image), 1.0, data));
        }
        catalog
    }

    fn page(width: f64, height: f64) -> PageGeometry {
        PageGeometry::new(
            Rect::new(0.0, 0.0, width + 20.0, height + 20.0),
            Rect::new(10.0, 10.0, width, height),
        )
    }

    fn glyph_positions(canvas: &SceneCanvas) -> Vec<Point> {
        canvas.glyphs().map(|item| item.position).collect()
    }

    #[test]
    fn test_empty_text() {
        let mut engine = LayoutEngine::new(catalog("ab"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        let report = engine.render(&mut canvas, "").unwrap();
        assert_eq!(report, RenderReport::default());
        // Sheet and margin outlines only
        assert_eq!(canvas.item_count(), 2);
    }

    #[test]
    fn test_two_words_on_one_line() {
        let mut engine = LayoutEngine::new(catalog("ab"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        assert_eq!(engine.render_text(&mut canvas, "a b").unwrap(), 3);
        assert_eq!(
            glyph_positions(&canvas),
            vec![Point::new(10.0, 10.0), Point::new(25.0, 10.0)]
        );
        assert_eq!(canvas.lines().count(), 0);
    }

    #[test]
    fn test_connectors_join_letters() {
        let mut engine = LayoutEngine::new(catalog("abc"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        let report = engine.render(&mut canvas, "abc").unwrap();
        assert_eq!(report.connectors, 2);
        assert_eq!(canvas.lines().count(), 2);
    }

    #[test]
    fn test_connectors_disabled() {
        let mut engine = LayoutEngine::new(
            catalog("abc"),
            page(100.0, 100.0),
            LayoutConfig {
                connect_letters: false,
                ..config()
            },
        );
        let mut canvas = SceneCanvas::new();

        assert_eq!(engine.render(&mut canvas, "abc").unwrap().connectors, 0);
        assert_eq!(canvas.lines().count(), 0);
    }

    #[test]
    fn test_hard_break_when_word_fills_line() {
        let mut engine = LayoutEngine::new(catalog("a"), page(10.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        assert_eq!(engine.render_text(&mut canvas, "aa").unwrap(), 2);
        assert_eq!(
            glyph_positions(&canvas),
            vec![Point::new(10.0, 10.0), Point::new(10.0, 22.0)]
        );
    }

    #[test]
    fn test_word_wrap_moves_whole_word() {
        let mut engine = LayoutEngine::new(catalog("ab"), page(40.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        // The second b crosses the margin and takes the first one along
        let report = engine.render(&mut canvas, "aa bb").unwrap();
        assert_eq!(report.glyphs, 4);
        assert_eq!(
            glyph_positions(&canvas),
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(10.0, 22.0),
                Point::new(20.0, 22.0),
            ]
        );
        assert_eq!(report.connectors, 2);
    }

    #[test]
    fn test_newline_moves_to_next_line() {
        let mut engine = LayoutEngine::new(catalog("a"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        engine.render(&mut canvas, "a\na").unwrap();
        assert_eq!(
            glyph_positions(&canvas),
            vec![Point::new(10.0, 10.0), Point::new(10.0, 22.0)]
        );
    }

    #[test]
    fn test_unmapped_characters_advance() {
        let mut engine = LayoutEngine::new(catalog("a"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();

        let report = engine.render(&mut canvas, "\tz a").unwrap();
        assert_eq!(report.consumed, 4);
        // tab 20, unknown 10, space 5
        assert_eq!(glyph_positions(&canvas), vec![Point::new(45.0, 10.0)]);
    }

    #[test]
    fn test_tab_advance_subtracts_letter_spacing() {
        let config = LayoutConfig {
            letter_spacing: 1.0,
            spaces_in_tab: 4,
            ..config()
        };
        let mut engine = LayoutEngine::new(catalog("a"), page(100.0, 100.0), config);
        let mut canvas = SceneCanvas::new();

        engine.render(&mut canvas, "\ta").unwrap();
        // 10 + 5 * 4 - 1
        assert_eq!(glyph_positions(&canvas), vec![Point::new(29.0, 10.0)]);
    }

    #[test]
    fn test_page_full_stops_pass() {
        let mut engine = LayoutEngine::new(catalog("a"), page(10.0, 20.0), config());
        let mut canvas = SceneCanvas::new();

        let report = engine.render(&mut canvas, "aaa").unwrap();
        assert!(report.page_full);
        assert_eq!(report.glyphs, 1);
        assert_eq!(report.consumed, 1);
    }

    #[test]
    fn test_borders_hidden() {
        let mut engine = LayoutEngine::new(catalog("a"), page(100.0, 100.0), config());
        let mut canvas = SceneCanvas::new();
        engine.render(&mut canvas, "a").unwrap();

        engine.hide_borders(&mut canvas, true);
        let hidden = canvas.items(SortOrder::Ascending).iter().filter(|i| !i.visible).count();
        assert_eq!(hidden, 2);

        // Persists into the next pass
        engine.render(&mut canvas, "a").unwrap();
        let hidden = canvas.items(SortOrder::Ascending).iter().filter(|i| !i.visible).count();
        assert_eq!(hidden, 2);

        engine.hide_borders(&mut canvas, false);
        assert!(canvas.items(SortOrder::Ascending).iter().all(|i| i.visible));
    }

    #[test]
    fn test_mirrored_margins() {
        let geometry = PageGeometry::from_millimetres(100.0, 100.0, PageMargins::default(), MM_PER_INCH);
        let mut engine = LayoutEngine::new(catalog("a"), geometry, config());
        let mut canvas = SceneCanvas::new();

        engine.render(&mut canvas, "a").unwrap();
        assert_eq!(glyph_positions(&canvas), vec![Point::new(20.0, 10.0)]);

        engine.set_mirror_margins(true);
        engine.render(&mut canvas, "a").unwrap();
        assert_eq!(glyph_positions(&canvas), vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let geometry = PageGeometry::new(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 50.0, 50.0));
        let mut engine = LayoutEngine::new(catalog("a"), geometry, config());
        let mut canvas = SceneCanvas::new();

        assert!(matches!(
            engine.render(&mut canvas, "a"),
            Err(LayoutError::InvalidPageSetup(_))
        ));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let narrow = Arc::new(GlyphImage::new("a1.svg", Size::new(10.0, 10.0)));
        let wide = Arc::new(GlyphImage::new("a2.svg", Size::new(14.0, 12.0)));
        let mut catalog = GlyphCatalog::new();
        catalog.insert('a', GlyphVariant::new(narrow, 1.0, SymbolData::new("a1.svg", NormRect::full())));
        catalog.insert(
            'a',
            GlyphVariant::new(wide, 1.0, SymbolData::new("a2.svg", NormRect::new(0.2, 0.1, 0.8, 0.9))),
        );

        let mut engine = LayoutEngine::new(catalog, page(60.0, 200.0), config());
        let layout = |engine: &mut LayoutEngine<GlyphCatalog>| {
            let mut canvas = SceneCanvas::new();
            let report = engine.render(&mut canvas, "aaaa aaa aaaaa aa aaaaaa").unwrap();
            let placed = canvas
                .glyphs()
                .map(|item| match &item.kind {
                    render_model::ItemKind::Glyph { image, .. } => (image.source.clone(), item.position),
                    _ => unreachable!(),
                })
                .collect::<Vec<_>>();
            (report, placed)
        };

        let (first_report, first) = layout(&mut engine);
        let (second_report, second) = layout(&mut engine);
        assert_eq!(first_report, second_report);
        assert_eq!(first, second);
        assert_eq!(first.len(), first_report.glyphs);
    }
}
