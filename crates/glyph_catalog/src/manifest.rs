//! Glyph manifest loading
//!
//! A manifest is a JSON document listing, per character key, the SVG files
//! authored for it together with their placement metadata:
//!
//! ```json
//! {
//!   "font": { "a": [{ "file_name": "a1.svg", "limits": { ... } }] },
//!   "upper_case": { "a": [{ "file_name": "A1.svg" }] }
//! }
//! ```
//!
//! Uppercase letters live in their own table so manifests survive being
//! edited on case-insensitive stores. File names are relative to the manifest.

use crate::svg::probe_svg_file;
use crate::{CatalogError, GlyphCatalog, GlyphImage, GlyphVariant, Result, SymbolData};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Serialized form of a glyph catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontManifest {
    /// Glyphs keyed by character (or `slash` / `backslash`)
    #[serde(default)]
    pub font: BTreeMap<String, Vec<SymbolData>>,
    /// Uppercase glyphs keyed by the lowercase or uppercase letter
    #[serde(default)]
    pub upper_case: BTreeMap<String, Vec<SymbolData>>,
}

/// Options controlling how manifest entries become variants
#[derive(Debug, Clone, Copy)]
pub struct ManifestLoadOptions {
    /// Ink height every glyph is scaled to, in device pixels
    pub ink_height: f64,
}

impl FontManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Every (character, metadata) pair in load order
    pub fn entries(&self) -> Result<Vec<(char, &SymbolData)>> {
        let mut entries = Vec::new();

        for (key, symbols) in &self.font {
            let ch = resolve_key(key)?;
            entries.extend(symbols.iter().map(|data| (ch, data)));
        }

        for (key, symbols) in &self.upper_case {
            let ch = resolve_key(key)?;
            let upper = ch.to_uppercase().next().unwrap_or(ch);
            entries.extend(symbols.iter().map(|data| (upper, data)));
        }

        Ok(entries)
    }

    /// Build a catalog, resolving file names against `base_dir`.
    ///
    /// Entries whose image cannot be read are skipped with a warning;
    /// entries with degenerate limits are rejected.
    pub fn build_catalog(&self, base_dir: &Path, options: ManifestLoadOptions) -> Result<GlyphCatalog> {
        let mut catalog = GlyphCatalog::new();
        let mut images: HashMap<PathBuf, Arc<GlyphImage>> = HashMap::new();
        let mut skipped = 0usize;

        for (ch, data) in self.entries()? {
            if let Some(reason) = data.limits.degeneracy() {
                return Err(CatalogError::DegenerateLimits {
                    key: ch.to_string(),
                    file: data.file_name.clone(),
                    reason,
                });
            }

            let path = base_dir.join(&data.file_name);
            let image = match images.get(&path) {
                Some(image) => Arc::clone(image),
                None => match probe_svg_file(&path) {
                    Ok(size) => {
                        let image = Arc::new(GlyphImage::new(path.clone(), size));
                        images.insert(path, Arc::clone(&image));
                        image
                    }
                    Err(e) => {
                        tracing::warn!("Skipping glyph {:?} ({}): {}", ch, data.file_name, e);
                        skipped += 1;
                        continue;
                    }
                },
            };

            catalog.insert(ch, GlyphVariant::fitted(image, data.clone(), options.ink_height));
        }

        tracing::info!(
            chars = catalog.len(),
            variants = catalog.variant_count(),
            skipped,
            "glyph catalog built"
        );

        Ok(catalog)
    }
}

impl GlyphCatalog {
    /// Load a catalog from a manifest file
    pub fn load_manifest(path: &Path, options: ManifestLoadOptions) -> Result<Self> {
        let manifest = FontManifest::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        manifest.build_catalog(base_dir, options)
    }
}

/// Map a manifest key to the character it stands for
fn resolve_key(key: &str) -> Result<char> {
    match key {
        "slash" => Ok('/'),
        "backslash" => Ok('\\'),
        _ => key
            .chars()
            .next()
            .ok_or_else(|| CatalogError::InvalidKey(key.to_string())),
    }
}
