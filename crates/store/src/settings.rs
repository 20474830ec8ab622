//! Handwriting settings management
//!
//! Settings are stored as pretty-printed JSON. Missing fields take their
//! default values, so older files keep loading as new settings are added.

use crate::{Result, StoreError};
use layout_engine::{LayoutConfig, PageGeometry, PageMargins, SeedPolicy};
use render_model::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings container
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct HandwritingSettings {
    pub device: DeviceSettings,
    pub spacing: SpacingSettings,
    pub pen: PenSettings,
    pub sheet: SheetSettings,
    pub behavior: BehaviorSettings,
    pub resources: ResourceSettings,
}

/// Output device settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeviceSettings {
    /// Dots per inch of the rendered sheet
    pub dpi: f64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self { dpi: 300.0 }
    }
}

/// Spacing in millimetres
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpacingSettings {
    pub letter_spacing: f64,
    pub line_spacing: f64,
    pub word_spacing: f64,
    pub spaces_in_tab: u32,
}

impl Default for SpacingSettings {
    fn default() -> Self {
        Self {
            letter_spacing: 0.0,
            line_spacing: 2.0,
            word_spacing: 3.0,
            spaces_in_tab: 4,
        }
    }
}

/// Glyph size and connector stroke
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PenSettings {
    /// Ink height in millimetres
    pub font_size: f64,
    /// Connector width in millimetres
    pub pen_width: f64,
    /// Connector color as `#rrggbb`
    pub font_color: String,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            font_size: 6.0,
            pen_width: 0.4,
            font_color: "#000000".to_string(),
        }
    }
}

/// Sheet size and margins in millimetres
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SheetSettings {
    pub width: f64,
    pub height: f64,
    pub margins: PageMargins,
    /// Swap left and right margins
    pub mirror_margins: bool,
    pub hide_borders: bool,
}

impl Default for SheetSettings {
    fn default() -> Self {
        // A4 portrait
        Self {
            width: 210.0,
            height: 297.0,
            margins: PageMargins::default(),
            mirror_margins: false,
            hide_borders: false,
        }
    }
}

/// Line breaking and connector behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehaviorSettings {
    pub wrap_words: bool,
    pub hyphenate_words: bool,
    pub connect_letters: bool,
    /// Fixed variant seed; 0 picks a fresh seed every pass
    pub seed: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            wrap_words: true,
            hyphenate_words: true,
            connect_letters: true,
            seed: 0,
        }
    }
}

/// Files the renderer loads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ResourceSettings {
    /// Glyph catalog manifest
    pub font_manifest: Option<PathBuf>,
    /// Hyphenation rule file
    pub hyphenation_rules: Option<PathBuf>,
}

impl HandwritingSettings {
    /// Layout configuration for these settings
    pub fn to_layout_config(&self) -> Result<LayoutConfig> {
        let font_color = Color::from_hex(&self.pen.font_color).ok_or_else(|| StoreError::InvalidSetting {
            name: "pen.font_color",
            reason: format!("expected #rrggbb, got {:?}", self.pen.font_color),
        })?;
        let seed = match self.behavior.seed {
            0 => SeedPolicy::Clock,
            seed => SeedPolicy::Fixed(seed),
        };

        Ok(LayoutConfig {
            dpi: self.device.dpi,
            font_size: self.pen.font_size,
            letter_spacing: self.spacing.letter_spacing,
            word_spacing: self.spacing.word_spacing,
            line_spacing: self.spacing.line_spacing,
            spaces_in_tab: self.spacing.spaces_in_tab,
            pen_width: self.pen.pen_width,
            font_color,
            wrap_words: self.behavior.wrap_words,
            hyphenate_words: self.behavior.hyphenate_words,
            connect_letters: self.behavior.connect_letters,
            seed,
            mirror_margins: self.sheet.mirror_margins,
            borders_hidden: self.sheet.hide_borders,
        })
    }

    /// Sheet and margin rectangles in device pixels
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::from_millimetres(self.sheet.width, self.sheet.height, self.sheet.margins, self.device.dpi)
    }
}

/// Settings manager for loading, saving, and updating settings
pub struct SettingsManager {
    settings_path: PathBuf,
    /// Current settings (cached)
    current: HandwritingSettings,
}

impl SettingsManager {
    /// Manage `settings.json` inside the given directory
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self::with_path(app_data_dir.join("settings.json"))
    }

    /// Manage a settings file at an explicit path
    pub fn with_path(settings_path: PathBuf) -> Self {
        Self {
            settings_path,
            current: HandwritingSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Load settings from disk, or defaults if the file is missing or unreadable as JSON
    pub fn load_sync(&mut self) -> Result<&HandwritingSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<HandwritingSettings>(&content) {
                Ok(settings) => {
                    self.current = settings;
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.settings_path.display(),
                        "Failed to parse settings file, using defaults: {}",
                        e
                    );
                    self.current = HandwritingSettings::default();
                }
            }
        } else {
            self.current = HandwritingSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &HandwritingSettings {
        &self.current
    }

    /// Replace the settings and save them
    pub fn update_sync(&mut self, settings: HandwritingSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub fn reset_sync(&mut self) -> Result<&HandwritingSettings> {
        self.current = HandwritingSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = HandwritingSettings::default();

        assert_eq!(settings.device.dpi, 300.0);
        assert_eq!(settings.spacing.word_spacing, 3.0);
        assert_eq!(settings.spacing.spaces_in_tab, 4);
        assert_eq!(settings.pen.font_size, 6.0);
        assert_eq!(settings.pen.font_color, "#000000");
        assert_eq!((settings.sheet.width, settings.sheet.height), (210.0, 297.0));
        assert_eq!(settings.sheet.margins.left, 20.0);
        assert!(settings.behavior.wrap_words);
        assert!(settings.behavior.hyphenate_words);
        assert!(settings.behavior.connect_letters);
        assert_eq!(settings.behavior.seed, 0);
        assert!(settings.resources.font_manifest.is_none());
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = HandwritingSettings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: HandwritingSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let parsed: HandwritingSettings =
            serde_json::from_str(r#"{ "pen": { "font_size": 8.0 }, "behavior": { "seed": 42 } }"#).unwrap();
        assert_eq!(parsed.pen.font_size, 8.0);
        assert_eq!(parsed.pen.pen_width, 0.4);
        assert_eq!(parsed.behavior.seed, 42);
        assert!(parsed.behavior.wrap_words);
        assert_eq!(parsed.device.dpi, 300.0);
    }

    #[test]
    fn test_to_layout_config() {
        let mut settings = HandwritingSettings::default();
        settings.behavior.seed = 9;
        settings.pen.font_color = "#102030".to_string();
        settings.sheet.mirror_margins = true;

        let config = settings.to_layout_config().unwrap();
        assert_eq!(config.seed, SeedPolicy::Fixed(9));
        assert_eq!(config.font_color, Color::rgb(0x10, 0x20, 0x30));
        assert!(config.mirror_margins);
        assert!(config.validate().is_ok());

        settings.behavior.seed = 0;
        assert_eq!(settings.to_layout_config().unwrap().seed, SeedPolicy::Clock);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let mut settings = HandwritingSettings::default();
        settings.pen.font_color = "black".to_string();
        assert!(matches!(
            settings.to_layout_config(),
            Err(StoreError::InvalidSetting { name: "pen.font_color", .. })
        ));
    }

    #[test]
    fn test_page_geometry_in_pixels() {
        let mut settings = HandwritingSettings::default();
        settings.device.dpi = 25.4;

        let geometry = settings.page_geometry();
        assert_eq!(geometry.sheet.width, 210.0);
        assert_eq!(geometry.margins.x, 20.0);
        assert_eq!(geometry.margins.width, 180.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        // Defaults when no file exists
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &HandwritingSettings::default());

        let mut new_settings = HandwritingSettings::default();
        new_settings.spacing.letter_spacing = 0.5;
        new_settings.behavior.hyphenate_words = false;
        manager.update_sync(new_settings.clone()).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded, &new_settings);
    }

    #[test]
    fn test_settings_manager_reset_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        let mut new_settings = HandwritingSettings::default();
        new_settings.device.dpi = 600.0;
        manager.update_sync(new_settings).unwrap();

        let settings = manager.reset_sync().unwrap();
        assert_eq!(settings.device.dpi, 300.0);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut manager = SettingsManager::with_path(path);
        assert_eq!(manager.load_sync().unwrap(), &HandwritingSettings::default());
    }
}
