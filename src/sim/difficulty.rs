//! Difficulty ramp over the first minutes of a run

use serde::{Deserialize, Serialize};

use crate::consts::DIFFICULTY_WINDOW_SECONDS;
use crate::lerp;

const SPAWN_INTERVAL_START: f32 = 1.8;
const SPAWN_INTERVAL_END: f32 = 0.85;
const BASE_SPEED_START: f32 = 240.0;
const BASE_SPEED_END: f32 = 600.0;
const SIZE_SCALE_START: f32 = 0.75;
const SIZE_SCALE_END: f32 = 2.0;

/// Maps running time onto spawn interval, speed and size
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyScaler {
    pub elapsed: f32,
}

impl DifficultyScaler {
    /// Only called for running, non-paused time
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Ramp progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / DIFFICULTY_WINDOW_SECONDS).clamp(0.0, 1.0)
    }

    /// Seconds between asteroid spawns
    pub fn spawn_interval(&self) -> f32 {
        lerp(SPAWN_INTERVAL_START, SPAWN_INTERVAL_END, self.progress())
    }

    /// Horizontal asteroid speed before per-asteroid variance (px/s)
    pub fn base_speed(&self) -> f32 {
        lerp(BASE_SPEED_START, BASE_SPEED_END, self.progress())
    }

    pub fn size_scale(&self) -> f32 {
        lerp(SIZE_SCALE_START, SIZE_SCALE_END, self.progress())
    }
}
