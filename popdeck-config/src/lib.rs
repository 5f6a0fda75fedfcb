//! Shared configuration loader for the popdeck toolchain.
//!
//! `defaults/popdeck.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`PopdeckConfig`].
//!
//! The icon map is deliberately not part of the file configuration: room
//! names are case-sensitive and the layered key handling is not. It travels
//! as a JSON payload instead (see `popdeck_engine::parse_icon_map`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use popdeck_engine::{DetectStrategy, EditOptions, InsertMode};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/popdeck.default.toml");

/// Top-level configuration consumed by popdeck applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PopdeckConfig {
    pub edit: EditConfig,
}

/// Mirrors the knobs exposed by the editing engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EditConfig {
    pub indent: usize,
    pub detect_by: DetectStrategy,
    pub insert_mode: InsertMode,
}

impl PopdeckConfig {
    /// Assemble the engine options this configuration describes.
    pub fn edit_options(&self, icon_map: Option<HashMap<String, String>>) -> EditOptions {
        EditOptions {
            detect_by: self.edit.detect_by,
            insert_mode: self.edit.insert_mode,
            indent: self.edit.indent,
            icon_map,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PopdeckConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PopdeckConfig, ConfigError> {
    Loader::new().build()
}
