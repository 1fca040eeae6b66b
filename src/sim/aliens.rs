//! Hostile alien ships and their lasers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::rng::RandomSource;
use super::spawner::{EntityIds, SpawnTimer};

pub const MAX_ALIENS: usize = 2;
const ALIEN_WIDTH: f32 = 64.0;
const ALIEN_HEIGHT: f32 = 38.0;
/// Delay before a fresh alien's first shot is allowed
const FIRST_SHOT_DELAY: f32 = 0.6;
/// Vertical chase speed of trackers (px/s)
const TRACKER_SPEED: f32 = 70.0;

const LASER_SIZE: Vec2 = Vec2::new(16.0, 4.0);
const LASER_SPEED: f32 = 520.0;
const TAIL_LASER_SIZE: Vec2 = Vec2::new(44.0, 4.0);
const TAIL_LASER_SPEED: f32 = 420.0;

/// Alien flight and firing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienBehavior {
    /// Flies straight, fires short bolts
    Standard,
    /// Flies straight, fires long slow lasers
    TailLaser,
    /// Drifts toward the player's row
    Tracker,
}

impl AlienBehavior {
    pub fn roll(rng: &mut impl RandomSource) -> Self {
        let roll = rng.unit();
        if roll < 0.6 {
            AlienBehavior::Standard
        } else if roll < 0.82 {
            AlienBehavior::TailLaser
        } else {
            AlienBehavior::Tracker
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub id: u32,
    pub behavior: AlienBehavior,
    pub pos: Vec2,
    pub scale: f32,
    pub speed: f32,
    pub fire_cooldown: f32,
    pub fire_timer: f32,
    pub variant: usize,
}

impl Alien {
    fn spawn(id: u32, field: Vec2, variants: usize, rng: &mut impl RandomSource) -> Self {
        let behavior = AlienBehavior::roll(rng);
        let scale = 0.85 + rng.unit() * 0.4;
        Self {
            id,
            behavior,
            pos: Vec2::new(
                field.x + ALIEN_WIDTH + 40.0,
                80.0 + rng.unit() * (field.y - 160.0),
            ),
            scale,
            speed: 190.0 + rng.unit() * 60.0,
            fire_cooldown: 1.6 + rng.unit() * 0.8,
            fire_timer: FIRST_SHOT_DELAY,
            variant: rng.index(variants),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(ALIEN_WIDTH, ALIEN_HEIGHT) * self.scale
    }

    pub fn update(&mut self, dt: f32, speed_scale: f32, player_y: f32, field: Vec2) {
        self.pos.x -= self.speed * speed_scale * dt;
        self.fire_timer += dt;

        if self.behavior == AlienBehavior::Tracker {
            let step = TRACKER_SPEED * dt;
            let dy = (player_y - self.pos.y).clamp(-step, step);
            let half = self.size().y * 0.5;
            self.pos.y = (self.pos.y + dy).clamp(half, field.y - half);
        }
    }

    /// Fire if the cooldown has elapsed
    pub fn try_fire(&mut self, id: u32) -> Option<Laser> {
        if self.fire_timer < self.fire_cooldown {
            return None;
        }
        self.fire_timer = 0.0;
        let muzzle = Vec2::new(self.pos.x - ALIEN_WIDTH * self.scale * 0.4, self.pos.y);
        let (size, speed) = match self.behavior {
            AlienBehavior::TailLaser => (TAIL_LASER_SIZE, TAIL_LASER_SPEED),
            AlienBehavior::Standard | AlienBehavior::Tracker => (LASER_SIZE, LASER_SPEED),
        };
        Some(Laser {
            id,
            pos: muzzle,
            prev: muzzle,
            size,
            speed,
        })
    }

    pub fn is_off_field(&self) -> bool {
        self.pos.x < -self.size().x - 40.0
    }

    pub fn bounds(&self) -> Aabb {
        let size = self.size();
        Aabb::centered(self.pos, size.x, size.y)
    }
}

/// A bolt fired by an alien, travelling left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: u32,
    pub pos: Vec2,
    pub prev: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Laser {
    pub fn update(&mut self, dt: f32) {
        self.prev = self.pos;
        self.pos.x -= self.speed * dt;
    }

    pub fn is_off_field(&self, field: Vec2) -> bool {
        self.pos.x < -self.size.x * 2.0 || self.pos.x > field.x + self.size.x * 2.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.pos, self.size.x, self.size.y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienSquad {
    pub aliens: Vec<Alien>,
    pub lasers: Vec<Laser>,
    timer: SpawnTimer,
}

impl AlienSquad {
    pub fn new(rng: &mut impl RandomSource) -> Self {
        Self {
            aliens: Vec::new(),
            lasers: Vec::new(),
            timer: SpawnTimer::new(6.0, 12.0, MAX_ALIENS, rng),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        field: Vec2,
        speed_scale: f32,
        player_y: f32,
        variants: usize,
        ids: &mut EntityIds,
        rng: &mut impl RandomSource,
    ) {
        if self.timer.tick(dt, self.aliens.len(), 1.0, rng) {
            let alien = Alien::spawn(ids.next(), field, variants, rng);
            log::debug!("Alien {} spawned ({:?})", alien.id, alien.behavior);
            self.aliens.push(alien);
        }

        for alien in &mut self.aliens {
            alien.update(dt, speed_scale, player_y, field);
            if alien.fire_timer >= alien.fire_cooldown {
                if let Some(laser) = alien.try_fire(ids.next()) {
                    self.lasers.push(laser);
                }
            }
        }

        for laser in &mut self.lasers {
            laser.update(dt);
        }

        self.aliens.retain(|a| !a.is_off_field());
        self.lasers.retain(|l| !l.is_off_field(field));
    }

    pub fn find(&self, id: u32) -> Option<&Alien> {
        self.aliens.iter().find(|a| a.id == id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Alien> {
        let index = self.aliens.iter().position(|a| a.id == id)?;
        Some(self.aliens.remove(index))
    }

    pub fn clear(&mut self, rng: &mut impl RandomSource) {
        self.aliens.clear();
        self.lasers.clear();
        self.timer.reset(rng);
    }
}
