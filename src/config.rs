//! Runtime configuration and fixed constants
//!
//! The config file is optional. Lookup order:
//! 1. the path in `FRAME_FLIP_CONFIG`
//! 2. the user config dir:
//!    - Linux: ~/.config/frame-flip/config.json
//!    - macOS: ~/Library/Application Support/frame-flip/config.json
//!    - Windows: %APPDATA%\frame-flip\config.json
//! 3. built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Recognized image extensions (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Directory scanned by the manifest builder when run without flags
pub const DEFAULT_ROSTER_ROOT: &str = "./default-rosters";

/// Manifest written by the builder and read by the game
pub const DEFAULT_MANIFEST_FILE: &str = "rosters.json";

/// Base path recorded in the manifest for every roster
pub const DEFAULT_ROSTER_PREFIX: &str = "default-rosters";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FRAME_FLIP_CONFIG";

/// Window file drops arriving within this window form one batch
pub const DROP_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Upper bound on one remote request, body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Largest raster produced from an SVG, per side
pub const MAX_SVG_DIMENSION: u32 = 16_384;

/// True when `name` ends in one of the recognized image extensions.
///
/// A trailing `/` marks a directory, never an image.
pub fn has_image_extension(name: &str) -> bool {
    if name.ends_with('/') {
        return false;
    }

    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// A selectable preset roster
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RosterPreset {
    /// Identifier used for lookup (e.g. "harry-potter")
    pub id: String,
    /// Button label
    pub label: String,
    /// Base path relative to the asset root
    pub path: String,
}

impl RosterPreset {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            path: format!("{DEFAULT_ROSTER_PREFIX}/{id}"),
        }
    }
}

/// Everything the game reads at startup
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Local directory that roster and manifest paths are relative to
    pub asset_root: PathBuf,
    /// Manifest location relative to the asset root (or remote base)
    pub manifest_path: String,
    /// Fetch rosters over HTTP from this base URL instead of the asset root
    pub remote_base_url: Option<String>,
    pub rosters: Vec<RosterPreset>,
    /// Upper bound on images fetched and decoded at once
    pub max_concurrent_loads: usize,
    /// Frame edge length in logical pixels
    pub frame_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            manifest_path: DEFAULT_MANIFEST_FILE.to_string(),
            remote_base_url: None,
            rosters: vec![
                RosterPreset::new("genshin", "Genshin Impact"),
                RosterPreset::new("harry-potter", "Harry Potter"),
                RosterPreset::new("furniture", "Furniture"),
            ],
            max_concurrent_loads: 4,
            frame_size: 180.0,
        }
    }
}

impl GameConfig {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the effective config, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config.sanitized()
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring config file, using defaults");
                Self::default()
            }
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(explicit));
        }

        let mut path = dirs::config_dir()?;
        path.push("frame-flip");
        path.push("config.json");
        Some(path)
    }

    /// Clamp values that would stall or break the loader
    pub fn sanitized(mut self) -> Self {
        self.max_concurrent_loads = self.max_concurrent_loads.max(1);
        if !self.frame_size.is_finite() || self.frame_size <= 0.0 {
            self.frame_size = Self::default().frame_size;
        }
        self
    }

    /// Find a preset by identifier
    pub fn preset(&self, id: &str) -> Option<&RosterPreset> {
        self.rosters.iter().find(|preset| preset.id == id)
    }
}
