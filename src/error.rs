//! Error types surfaced to the host
//!
//! The tick itself never fails; errors only come from startup validation and
//! from storage backends (which `Persistence` swallows).

use thiserror::Error;

use crate::assets::DrawableKind;

/// Fatal problems that prevent a run from starting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("no asset manifest attached before start_run")]
    AssetsNotAttached,
    #[error("asset manifest has no drawable handle for {0:?}")]
    MissingDrawable(DrawableKind),
}

/// Failures reported by a key/value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
