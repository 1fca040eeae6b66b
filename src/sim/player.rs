//! Player craft physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;

/// Downward acceleration (px/s²)
pub const GRAVITY: f32 = 1400.0;
/// Upward velocity set by a jump (px/s)
pub const JUMP_VELOCITY: f32 = 520.0;
/// Craft size in pixels
pub const PLAYER_WIDTH: f32 = 44.0;
pub const PLAYER_HEIGHT: f32 = 58.0;
/// Anchor column as a fraction of field width
pub const ANCHOR_FRACTION: f32 = 0.2;
/// Spring strength pulling the craft back to its anchor
const ANCHOR_SPRING: f32 = 10.0;
/// Horizontal velocity retained each tick
const ANCHOR_DAMPING: f32 = 0.35;

/// Decoded directional input.
///
/// Carried through to the snapshot but the craft's physics ignore it; only
/// jumping steers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub move_down: bool,
}

/// The player's craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub anchor_x: f32,
    pub intent: MovementIntent,
}

impl Player {
    pub fn new(field: Vec2) -> Self {
        let anchor_x = field.x * ANCHOR_FRACTION;
        Self {
            pos: Vec2::new(anchor_x, field.y * 0.5),
            vel: Vec2::ZERO,
            half_extents: Vec2::new(PLAYER_WIDTH * 0.5, PLAYER_HEIGHT * 0.5),
            anchor_x,
            intent: MovementIntent::default(),
        }
    }

    /// Return to the starting position at rest
    pub fn reset(&mut self, field: Vec2) {
        *self = Self::new(field);
    }

    pub fn jump(&mut self) {
        self.vel.y = -JUMP_VELOCITY;
    }

    /// Integrate one step. Returns true if the craft touched the field edge.
    pub fn update(&mut self, dt: f32, field: Vec2) -> bool {
        self.vel.y += GRAVITY * dt;
        self.vel.x += (self.anchor_x - self.pos.x) * ANCHOR_SPRING * dt;
        self.vel.x *= ANCHOR_DAMPING;

        self.pos += self.vel * dt;

        let min = self.half_extents;
        let max = field - self.half_extents;
        let mut touched = false;

        if self.pos.x < min.x || self.pos.x > max.x {
            self.pos.x = self.pos.x.clamp(min.x, max.x);
            self.vel.x = 0.0;
            touched = true;
        }
        if self.pos.y < min.y || self.pos.y > max.y {
            self.pos.y = self.pos.y.clamp(min.y, max.y);
            self.vel.y = 0.0;
            touched = true;
        }

        touched
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, self.half_extents.x * 2.0, self.half_extents.y * 2.0)
    }

    /// Where bullets leave the craft
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.half_extents.x * 0.9,
            self.pos.y - self.half_extents.y * 0.1,
        )
    }
}
