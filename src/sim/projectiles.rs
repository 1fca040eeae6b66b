//! Player projectiles: blaster bullets and homing missiles
//!
//! Missiles hold a `TargetRef` handle rather than the target itself. The
//! handle is resolved every tick; if the target is gone the missile
//! detonates where it is.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;

pub const BULLET_SIZE: Vec2 = Vec2::new(14.0, 4.0);
pub const BULLET_SPEED: f32 = 760.0;

pub const MISSILE_SPEED: f32 = 1600.0;
pub const MISSILE_LIFE: f32 = 2.2;
/// Distance at which a missile counts as arrived
pub const MISSILE_HIT_RADIUS: f32 = 18.0;
const MISSILE_WOBBLE_RATE: f32 = 16.0;
const MISSILE_WOBBLE: f32 = 0.06;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub prev: Vec2,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self { id, pos, prev: pos }
    }

    pub fn update(&mut self, dt: f32) {
        self.prev = self.pos;
        self.pos.x += BULLET_SPEED * dt;
    }

    pub fn is_off_field(&self, field: Vec2) -> bool {
        self.pos.x > field.x + BULLET_SIZE.x * 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, BULLET_SIZE.x, BULLET_SIZE.y)
    }
}

/// Handle to a missile's target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRef {
    Hazard(u32),
    Alien(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileStatus {
    Flying,
    /// Reached its target this tick
    Arrived,
    /// Target no longer exists
    TargetLost,
    /// Lifetime ran out
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub id: u32,
    pub pos: Vec2,
    pub prev: Vec2,
    pub vel: Vec2,
    pub target: TargetRef,
    pub elapsed: f32,
    pub life: f32,
    pub status: MissileStatus,
}

impl Missile {
    pub fn new(id: u32, pos: Vec2, target: TargetRef) -> Self {
        Self {
            id,
            pos,
            prev: pos,
            vel: Vec2::new(MISSILE_SPEED, 0.0),
            target,
            elapsed: 0.0,
            life: MISSILE_LIFE,
            status: MissileStatus::Flying,
        }
    }

    /// Steer toward the resolved target point and advance.
    /// `target_point` is None when the handle no longer resolves.
    pub fn update(&mut self, dt: f32, target_point: Option<Vec2>) -> MissileStatus {
        if self.status != MissileStatus::Flying {
            return self.status;
        }
        self.prev = self.pos;
        self.elapsed += dt;

        let Some(target) = target_point else {
            self.status = MissileStatus::TargetLost;
            return self.status;
        };

        let to_target = target - self.pos;
        if to_target.length() <= MISSILE_HIT_RADIUS {
            self.status = MissileStatus::Arrived;
            return self.status;
        }

        let dir = to_target.normalize_or_zero();
        let wobble = (self.elapsed * MISSILE_WOBBLE_RATE).sin() * MISSILE_WOBBLE;
        let steered = Vec2::new(dir.x - dir.y * wobble, dir.y + dir.x * wobble);
        self.vel = steered.try_normalize().unwrap_or(dir) * MISSILE_SPEED;
        self.pos += self.vel * dt;

        // Passed through the hit radius during this step
        if super::bounds::point_segment_distance(target, self.prev, self.pos) <= MISSILE_HIT_RADIUS {
            self.status = MissileStatus::Arrived;
        } else if self.elapsed >= self.life {
            self.status = MissileStatus::Expired;
        }
        self.status
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, 6.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectiles {
    pub bullets: Vec<Bullet>,
    pub missiles: Vec<Missile>,
}

impl Projectiles {
    pub fn update_bullets(&mut self, dt: f32, field: Vec2) {
        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        self.bullets.retain(|b| !b.is_off_field(field));
    }

    /// Move every flying missile using `resolve` to look up target points
    pub fn update_missiles(&mut self, dt: f32, resolve: impl Fn(TargetRef) -> Option<Vec2>) {
        for missile in &mut self.missiles {
            let target = resolve(missile.target);
            missile.update(dt, target);
        }
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
        self.missiles.clear();
    }
}
