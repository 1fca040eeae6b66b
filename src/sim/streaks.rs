//! Rare foreground shooting stars
//!
//! Only the glowing head collides; the long trail is drawn but harmless.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::rng::RandomSource;
use super::spawner::{EntityIds, SpawnTimer};

pub const MAX_STREAKS: usize = 1;
const TRAIL_LENGTH: f32 = 520.0;
const THICKNESS: f32 = 5.0;
const LIFE_SECONDS: f32 = 2.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub trail_length: f32,
    pub thickness: f32,
    pub life: f32,
    pub elapsed: f32,
}

impl Streak {
    fn spawn(id: u32, field: Vec2, rng: &mut impl RandomSource) -> Self {
        Self {
            id,
            pos: Vec2::new(field.x + 60.0, rng.range(40.0, field.y * 0.6)),
            vel: Vec2::new(-rng.range(900.0, 1250.0), rng.range(80.0, 260.0)),
            trail_length: TRAIL_LENGTH,
            thickness: THICKNESS,
            life: LIFE_SECONDS,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.pos += self.vel * dt;
    }

    pub fn head_radius(&self) -> f32 {
        self.thickness * 1.05
    }

    pub fn head_bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.head_radius())
    }

    pub fn direction(&self) -> Vec2 {
        self.vel.try_normalize().unwrap_or(Vec2::NEG_X)
    }

    /// End of the trail, behind the head
    pub fn tail(&self) -> Vec2 {
        self.pos - self.direction() * self.trail_length
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.life
    }

    pub fn is_off_field(&self, field: Vec2) -> bool {
        let reach = Aabb::spanning(self.pos, self.tail(), self.trail_length + 80.0);
        reach.right() < 0.0 || reach.left > field.x || reach.bottom() < 0.0 || reach.top > field.y
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakField {
    pub streaks: Vec<Streak>,
    timer: SpawnTimer,
}

impl StreakField {
    pub fn new(rng: &mut impl RandomSource) -> Self {
        Self {
            streaks: Vec::new(),
            timer: SpawnTimer::new(14.0, 24.0, MAX_STREAKS, rng),
        }
    }

    pub fn update(&mut self, dt: f32, field: Vec2, ids: &mut EntityIds, rng: &mut impl RandomSource) {
        if self.timer.tick(dt, self.streaks.len(), 1.0, rng) {
            self.streaks.push(Streak::spawn(ids.next(), field, rng));
        }
        for streak in &mut self.streaks {
            streak.update(dt);
        }
        self.streaks
            .retain(|s| !s.is_expired() && !s.is_off_field(field));
    }

    pub fn remove(&mut self, id: u32) {
        self.streaks.retain(|s| s.id != id);
    }

    pub fn clear(&mut self, rng: &mut impl RandomSource) {
        self.streaks.clear();
        self.timer.reset(rng);
    }
}
