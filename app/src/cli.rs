//! Command-line interface for handwriter.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use glyph_catalog::{GlyphCatalog, ManifestLoadOptions};
use layout_engine::{HyphenRuleSet, LayoutEngine};
use perf::PerfTimer;
use render_model::{write_svg_file, SceneCanvas};
use std::path::{Path, PathBuf};
use store::{HandwritingSettings, SettingsManager};

/// handwriter - lay out text with handwritten glyphs
#[derive(Parser)]
#[command(name = "handwriter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a text file to one SVG per sheet
    Render(RenderArgs),
    /// Write a settings file with default values
    InitSettings {
        /// Where to write the settings
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Settings file (defaults are used if it does not exist)
    #[arg(long, value_name = "JSON")]
    pub settings: PathBuf,

    /// Text to render
    #[arg(long, value_name = "FILE")]
    pub text: PathBuf,

    /// Output directory for sheet-NNN.svg files
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Font manifest, overriding the settings
    #[arg(long, value_name = "MANIFEST")]
    pub font: Option<PathBuf>,

    /// Hyphenation rules, overriding the settings
    #[arg(long, value_name = "JSON")]
    pub rules: Option<PathBuf>,

    /// Stop after this many sheets
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub max_sheets: usize,

    /// Mirror margins on every second sheet
    #[arg(long)]
    pub mirror_margins: bool,

    /// Leave sheet and margin outlines out of the output
    #[arg(long)]
    pub hide_borders: bool,
}

pub fn run() -> Result<()> {
    match Cli::parse().command {
        Commands::Render(args) => render(&args).map(|_| ()),
        Commands::InitSettings { path } => {
            SettingsManager::with_path(path.clone())
                .reset_sync()
                .with_context(|| format!("writing settings to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote default settings");
            Ok(())
        }
    }
}

/// Render `args.text` into numbered SVG sheets, returning the files written
pub fn render(args: &RenderArgs) -> Result<Vec<PathBuf>> {
    let mut manager = SettingsManager::with_path(args.settings.clone());
    let mut settings = manager
        .load_sync()
        .with_context(|| format!("reading settings from {}", args.settings.display()))?
        .clone();
    apply_overrides(&mut settings, args);

    let config = settings.to_layout_config()?;
    let geometry = settings.page_geometry();

    let font = settings
        .resources
        .font_manifest
        .clone()
        .context("no font manifest: pass --font or set resources.font_manifest")?;
    let catalog = {
        let _timer = PerfTimer::load("catalog");
        let options = ManifestLoadOptions {
            ink_height: config.font_size * config.dpmm(),
        };
        GlyphCatalog::load_manifest(&font, options)
            .with_context(|| format!("loading font manifest {}", font.display()))?
    };
    let rules = match &settings.resources.hyphenation_rules {
        Some(path) => HyphenRuleSet::load(path)
            .with_context(|| format!("loading hyphenation rules {}", path.display()))?,
        None => HyphenRuleSet::new(),
    };

    let text = std::fs::read_to_string(&args.text)
        .with_context(|| format!("reading text from {}", args.text.display()))?
        .replace("\r\n", "\n");
    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    let mirror = settings.sheet.mirror_margins;
    let mut engine = LayoutEngine::new(catalog, geometry, config).with_hyphen_rules(rules);
    let chars: Vec<char> = text.chars().collect();
    let mut offset = 0;
    let mut written = Vec::new();

    while offset < chars.len() && written.len() < args.max_sheets {
        let number = written.len() + 1;
        engine.set_mirror_margins(mirror && number % 2 == 0);

        let rest: String = chars[offset..].iter().collect();
        let mut canvas = SceneCanvas::with_scene_rect(geometry.sheet);
        let report = engine.render(&mut canvas, &rest)?;
        if report.consumed == 0 {
            bail!("sheet {} has no room for the text at offset {}", number, offset);
        }

        let path = sheet_path(&args.out, number);
        {
            let _timer = PerfTimer::export("sheet_svg");
            write_svg_file(&canvas, &path).with_context(|| format!("writing {}", path.display()))?;
        }
        tracing::info!(
            sheet = number,
            glyphs = report.glyphs,
            connectors = report.connectors,
            path = %path.display(),
            "Wrote sheet"
        );

        offset += report.consumed;
        written.push(path);
    }

    if offset < chars.len() {
        tracing::warn!(
            remaining = chars.len() - offset,
            max_sheets = args.max_sheets,
            "Sheet limit reached before the end of the text"
        );
    }
    if let Ok(metrics) = perf::global_metrics().lock() {
        let summary = metrics.summary();
        tracing::info!(
            sheets = written.len(),
            glyphs = summary.glyphs_placed,
            connectors = summary.connectors_drawn,
            mean_layout_ms = summary.layout_stats.mean_ms,
            "Rendering finished"
        );
        if let Ok(json) = summary.to_json() {
            tracing::debug!(target: "perf", "{}", json);
        }
    }
    Ok(written)
}

fn apply_overrides(settings: &mut HandwritingSettings, args: &RenderArgs) {
    if let Some(font) = &args.font {
        settings.resources.font_manifest = Some(font.clone());
    }
    if let Some(rules) = &args.rules {
        settings.resources.hyphenation_rules = Some(rules.clone());
    }
    settings.sheet.mirror_margins |= args.mirror_margins;
    settings.sheet.hide_borders |= args.hide_borders;
}

fn sheet_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("sheet-{:03}.svg", number))
}
