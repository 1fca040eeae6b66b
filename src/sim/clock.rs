//! Frame clock adapter
//!
//! Converts whatever elapsed time the host reports into a bounded simulation
//! step. Long stalls (tab switches, breakpoints) never produce a giant step.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DT;

/// Clamp a raw elapsed sample into `[0, MAX_FRAME_DT]`
#[inline]
pub fn clamp_frame_delta(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    raw.min(MAX_FRAME_DT)
}

/// Tracks the previous frame timestamp and pending resets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
    reset_pending: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next sample count as zero elapsed
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Consume one raw elapsed sample, returning the clamped step
    pub fn advance(&mut self, raw: f32) -> f32 {
        if self.reset_pending {
            self.reset_pending = false;
            return 0.0;
        }
        clamp_frame_delta(raw)
    }

    /// Derive a raw elapsed sample (seconds) from a host timestamp.
    /// The first frame and the frame after a reset yield 0.
    pub fn delta_from_timestamp(&mut self, now_ms: f64) -> f32 {
        let previous = self.last_timestamp_ms.replace(now_ms);
        if self.reset_pending {
            return 0.0;
        }
        match previous {
            Some(prev) if now_ms.is_finite() && prev.is_finite() => {
                ((now_ms - prev) / 1000.0) as f32
            }
            _ => 0.0,
        }
    }
}
