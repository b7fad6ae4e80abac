//! Map loading configuration.
//!
//! Loaded from a TOML file; every field has a default, so an empty file
//! (or no file at all) is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::prefab;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Directory containing sector files
    pub sector_dir: PathBuf,
    /// Extension of sector files, without the dot
    pub sector_extension: String,
    /// Directory searched recursively for prefab files
    pub prefab_dir: PathBuf,
    /// Extension of prefab files, without the dot
    pub prefab_extension: String,
    /// Prefab format version the decoder expects; others are only logged
    pub expected_prefab_version: i32,
    /// Decode files on the rayon thread pool
    pub parallel: bool,
    /// Upper bound on deferred-resolution passes
    pub max_resolve_passes: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            sector_dir: PathBuf::from("map/europe"),
            sector_extension: "base".to_string(),
            prefab_dir: PathBuf::from("prefab"),
            prefab_extension: "ppd".to_string(),
            expected_prefab_version: prefab::KNOWN_VERSION,
            parallel: true,
            max_resolve_passes: 16,
        }
    }
}

impl MapConfig {
    /// Create a new configuration builder
    pub fn builder() -> MapConfigBuilder {
        MapConfigBuilder::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Builder for MapConfig
#[derive(Debug, Clone, Default)]
pub struct MapConfigBuilder {
    sector_dir: Option<PathBuf>,
    sector_extension: Option<String>,
    prefab_dir: Option<PathBuf>,
    prefab_extension: Option<String>,
    expected_prefab_version: Option<i32>,
    parallel: Option<bool>,
    max_resolve_passes: Option<usize>,
}

impl MapConfigBuilder {
    /// Set the sector directory
    pub fn sector_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.sector_dir = Some(path.into());
        self
    }

    pub fn sector_extension(mut self, ext: impl Into<String>) -> Self {
        self.sector_extension = Some(ext.into());
        self
    }

    /// Set the prefab directory
    pub fn prefab_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.prefab_dir = Some(path.into());
        self
    }

    pub fn prefab_extension(mut self, ext: impl Into<String>) -> Self {
        self.prefab_extension = Some(ext.into());
        self
    }

    pub fn expected_prefab_version(mut self, version: i32) -> Self {
        self.expected_prefab_version = Some(version);
        self
    }

    /// Enable or disable parallel decoding
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = Some(enabled);
        self
    }

    pub fn max_resolve_passes(mut self, passes: usize) -> Self {
        self.max_resolve_passes = Some(passes);
        self
    }

    /// Build the configuration
    pub fn build(self) -> MapConfig {
        let default = MapConfig::default();
        MapConfig {
            sector_dir: self.sector_dir.unwrap_or(default.sector_dir),
            sector_extension: self.sector_extension.unwrap_or(default.sector_extension),
            prefab_dir: self.prefab_dir.unwrap_or(default.prefab_dir),
            prefab_extension: self.prefab_extension.unwrap_or(default.prefab_extension),
            expected_prefab_version: self
                .expected_prefab_version
                .unwrap_or(default.expected_prefab_version),
            parallel: self.parallel.unwrap_or(default.parallel),
            max_resolve_passes: self.max_resolve_passes.unwrap_or(default.max_resolve_passes),
        }
    }
}
