//! Error type shared by the scanner, publisher and configuration loader.

use std::path::PathBuf;

/// Errors produced by a tracker cycle or while loading configuration.
///
/// Every variant is terminal to the current cycle only; the pipeline logs it
/// and waits for the next heartbeat.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Scan center was not finite, or the radius was not a finite positive number.
    #[error("invalid scan region: center {center:?}, radius {radius}")]
    InvalidRegion { center: [f64; 3], radius: f64 },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),
}

impl TrackerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
