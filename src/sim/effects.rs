//! Cosmetic explosions

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const EXPLOSION_LIFE: f32 = 0.4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: f32,
    pub elapsed: f32,
}

impl Explosion {
    /// Animation progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / EXPLOSION_LIFE).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explosions {
    pub active: Vec<Explosion>,
}

impl Explosions {
    pub fn spawn(&mut self, pos: Vec2, size: f32) {
        self.active.push(Explosion {
            pos,
            size,
            elapsed: 0.0,
        });
    }

    pub fn update(&mut self, dt: f32) {
        for explosion in &mut self.active {
            explosion.elapsed += dt;
        }
        self.active.retain(|e| e.elapsed < EXPLOSION_LIFE);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
