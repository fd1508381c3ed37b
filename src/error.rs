//! Error types for every stage of the game
//!
//! Only `BuildError` is ever fatal. Everything raised at runtime is logged and
//! degraded to a partial result plus a status line for the user.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest build failures that abort the whole build
#[derive(Debug, Error)]
pub enum BuildError {
    /// The roster root is missing or cannot be listed
    #[error("cannot read roster root {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest file could not be written
    #[error("cannot write manifest {}: {source}", .path.display())]
    WriteManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single roster directory that could not be scanned (skipped, never fatal)
#[derive(Debug, Error)]
#[error("cannot read roster directory {}: {source}", .path.display())]
pub struct ScanError {
    pub path: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Transport failures of a fetch (a non-2xx status is not one of these)
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Path escapes the asset root or is otherwise unusable
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Why a roster produced no images
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("unknown roster '{roster}'")]
    Unknown { roster: String },

    #[error("roster '{roster}' has no images at {path}")]
    Empty { roster: String, path: String },

    #[error("roster '{roster}' could not be listed at {path}: {source}")]
    Unavailable {
        roster: String,
        path: String,
        #[source]
        source: FetchError,
    },
}

impl RosterError {
    /// The message shown to the user; identical for every cause
    pub fn notice(&self) -> String {
        match self {
            Self::Unknown { roster } => format!(
                "No images found in the {roster} roster yet. Please add images to the default-rosters/{roster}/ folder."
            ),
            Self::Empty { roster, path } | Self::Unavailable { roster, path, .. } => format!(
                "No images found in the {roster} roster yet. Please add images to the {path}/ folder."
            ),
        }
    }
}

/// One image that failed to load; the batch skips it and carries on
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("cannot parse svg: {0}")]
    Svg(#[from] usvg::Error),

    #[error("cannot rasterize svg: {0}")]
    Raster(String),

    #[error("cannot encode png: {0}")]
    Encode(String),

    #[error("load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Board operations rejected by the current state
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("frame {index} is out of range (board has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("cannot start a game with no images")]
    EmptyBoard,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
