//! Error types for the hand-array core.
//!
//! Only configuration loading and placement commits can fail. Lookup misses
//! surface as `Option::None`, projection misses as hidden ghosts, and range
//! violations are clamped, so none of those appear here.

use std::path::PathBuf;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Reasons a placement commit is abandoned without touching any item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("Placement requested outside Placement mode")]
    NotPlacing,

    #[error("Hand holds no items")]
    NothingHeld,

    #[error("Ghost count mismatch: {ghosts} ghosts for {items} held items")]
    GhostCountMismatch { ghosts: usize, items: usize },

    #[error("No ghost is on a valid surface")]
    NoValidTarget,
}

pub type Result<T, E = PlacementError> = std::result::Result<T, E>;
