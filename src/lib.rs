//! Orbital Dash - a side-scrolling arcade survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, power-ups, collisions, scoring)
//! - `session`: Host-facing facade (intents, frame driving, snapshots, high scores)
//! - `persistence`: Best-effort key/value storage backends
//! - `tuning`: Data-driven balance overrides
//! - `assets`: Opaque drawable handles supplied by the host

pub mod assets;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod session;
pub mod sim;
pub mod tuning;

pub use assets::{AssetHandle, AssetManifest, DrawableKind};
pub use error::{StartupError, StorageError};
pub use highscores::{HighScoreEntry, HighScores};
pub use session::Session;
pub use tuning::{EffectiveTuning, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest elapsed time a single tick may simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Playfield dimensions (logical pixels)
    pub const FIELD_WIDTH: f32 = 1100.0;
    pub const FIELD_HEIGHT: f32 = 620.0;

    /// Lives
    pub const STARTING_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;

    /// Damage response windows (seconds)
    pub const INVULNERABILITY_SECONDS: f32 = 1.2;
    pub const HIT_PAUSE_SECONDS: f32 = 0.35;
    pub const HIT_FLASH_SECONDS: f32 = 0.3;

    /// Pre-run countdown used by the native runner (seconds)
    pub const DEFAULT_COUNTDOWN_SECONDS: f32 = 5.0;

    /// Real play time over which difficulty ramps to its maximum (seconds)
    pub const DIFFICULTY_WINDOW_SECONDS: f32 = 180.0;

    /// Blaster refire delay (seconds)
    pub const FIRE_COOLDOWN_SECONDS: f32 = 0.12;
}

/// Playfield size as a vector
#[inline]
pub fn field_size() -> Vec2 {
    Vec2::new(consts::FIELD_WIDTH, consts::FIELD_HEIGHT)
}

/// Linear interpolation from `start` to `end`
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}
