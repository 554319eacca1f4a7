//! Shared configuration loader for the Coco/R grammar tools.
//!
//! `defaults/coco.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`CocoConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/coco.default.toml");

/// Top-level configuration consumed by the tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CocoConfig {
    pub completion: CompletionConfig,
    pub remap: RemapConfig,
    pub logging: LoggingConfig,
}

/// Which completion candidates are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CompletionConfig {
    pub include_keywords: bool,
    pub include_descriptions: bool,
    pub suggest_undeclared_productions: bool,
}

/// How diagnostics against generated files are traced back to the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemapConfig {
    pub map_file: String,
    pub generated_files: Vec<String>,
}

impl RemapConfig {
    /// Case-insensitive match of a generated file name.
    pub fn is_generated_file(&self, file_name: &str) -> bool {
        self.generated_files
            .iter()
            .any(|name| name.eq_ignore_ascii_case(file_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
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
    pub fn build(self) -> Result<CocoConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<CocoConfig, ConfigError> {
    Loader::new().build()
}
