//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::APP_NAME;
use crate::models::ProviderCatalog;
use crate::wizard::editor::{DEFAULT_COLUMN_MARGIN, DEFAULT_MAX_COLUMNS};
use crate::wizard::{BindingFailurePolicy, FieldLimits, WizardSettings};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Provider catalog file replacing the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Log directory (defaults to `<config dir>/logs`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Wizard behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// What to do when a key binding cannot be registered
    pub binding_failures: BindingFailurePolicy,
    /// Glyph shown for each password character
    pub mask_glyph: char,
    /// Column budget of the free-text fields
    pub max_columns: usize,
    /// Columns kept free at the end of a free-text line
    pub column_margin: usize,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            binding_failures: BindingFailurePolicy::default(),
            mask_glyph: '*',
            max_columns: DEFAULT_MAX_COLUMNS,
            column_margin: DEFAULT_COLUMN_MARGIN,
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/MailVerify/config.toml`
/// - macOS: `~/Library/Application Support/MailVerify/config.toml`
/// - Windows: `%APPDATA%\MailVerify\config.toml`
///
/// # Validation
///
/// - `mask_glyph` must not be whitespace or a control character
/// - `column_margin` must be smaller than `max_columns`
/// - `catalog` must point to an existing file (if set)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Wizard settings
    #[serde(default)]
    pub wizard: WizardConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/MailVerify/`
    /// - macOS: `~/Library/Application Support/MailVerify/`
    /// - Windows: `%APPDATA%\MailVerify\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Saves configuration to `path`.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        // Atomic rename
        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let glyph = self.wizard.mask_glyph;
        if glyph.is_whitespace() || glyph.is_control() {
            anyhow::bail!("mask_glyph must be a visible character, got {glyph:?}");
        }

        if self.wizard.column_margin >= self.wizard.max_columns {
            anyhow::bail!(
                "column_margin ({}) must be smaller than max_columns ({})",
                self.wizard.column_margin,
                self.wizard.max_columns
            );
        }

        if let Some(catalog) = &self.paths.catalog {
            if !catalog.is_file() {
                anyhow::bail!("Provider catalog file does not exist: {}", catalog.display());
            }
        }

        Ok(())
    }

    /// Directory log files are written to.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.paths.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("logs")),
        }
    }

    /// Wizard settings derived from the `[wizard]` section.
    #[must_use]
    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings {
            mask_glyph: self.wizard.mask_glyph,
            text_limits: FieldLimits::new(self.wizard.max_columns, self.wizard.column_margin),
            binding_policy: self.wizard.binding_failures,
        }
    }

    /// Loads the configured provider catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<ProviderCatalog> {
        match &self.paths.catalog {
            Some(path) => ProviderCatalog::load(path)
                .with_context(|| format!("Failed to load provider catalog: {}", path.display())),
            None => Ok(ProviderCatalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.catalog, None);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert_eq!(config.wizard.binding_failures, BindingFailurePolicy::Lenient);
        assert_eq!(config.wizard.mask_glyph, '*');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_rejects_bad_wizard_values() {
        let mut config = Config::new();
        config.wizard.mask_glyph = ' ';
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.wizard.column_margin = config.wizard.max_columns;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.paths.catalog = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.wizard.binding_failures = BindingFailurePolicy::Strict;
        config.wizard.mask_glyph = '•';
        config.ui.theme_mode = ThemeMode::Light;
        config.save_to(&path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[wizard]\nbinding_failures = \"strict\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.wizard.binding_failures, BindingFailurePolicy::Strict);
        assert_eq!(config.wizard.max_columns, DEFAULT_MAX_COLUMNS);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_wizard_settings_and_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let catalog_path = temp_dir.path().join("providers.toml");
        fs::write(
            &catalog_path,
            "[[providers]]\nid = \"x\"\nname = \"X Mail\"\nimap_host = \"imap.x.test\"\n",
        )
        .unwrap();

        let mut config = Config::new();
        config.wizard.max_columns = 100;
        config.wizard.column_margin = 10;
        config.paths.catalog = Some(catalog_path);

        let settings = config.wizard_settings();
        assert_eq!(settings.text_limits, FieldLimits::new(100, 10));

        let catalog = config.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).map(|p| p.imap_port), Some(993));
        assert_eq!(Config::new().load_catalog().unwrap().len(), 15);
    }
}
