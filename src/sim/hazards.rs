//! Asteroids and space-dust debris
//!
//! Both kinds drift right to left and share one list so collision, missile
//! targeting and the orbital beam treat them uniformly.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::difficulty::DifficultyScaler;
use super::powerups::{Modifiers, WaveSettings};
use super::rng::RandomSource;
use super::spawner::{EntityIds, SpawnTimer};

/// Live asteroid cap
pub const MAX_ASTEROIDS: usize = 40;
/// Live debris cap while space dust is active
pub const MAX_DEBRIS: usize = 12;
/// Unscaled asteroid sprite size (px)
const ASTEROID_SPRITE_SIZE: f32 = 96.0;
/// Collision box shrink relative to the sprite
const ASTEROID_HITBOX_FACTOR: f32 = 0.78;
const DEBRIS_SIZE: f32 = 46.0;
const DEBRIS_ROTATION_SPEED: f32 = 2.2;
const DEBRIS_SPEED_MIN: f32 = 300.0;
const DEBRIS_SPEED_MAX: f32 = 460.0;
/// Fragment scale relative to the parent asteroid
const SPLIT_SCALE: f32 = 0.6;
/// Vertical speed given to fragments (px/s)
const SPLIT_DRIFT: f32 = 140.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Asteroid,
    Debris,
}

/// A drifting hazard that costs a life on contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    /// Vertical center before wave oscillation
    pub base_y: f32,
    /// Leftward speed before modifiers (px/s)
    pub speed: f32,
    pub vel_y: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    /// Half-size at `scale`, before the live size modifier
    pub radii: Vec2,
    pub osc_phase: f32,
    pub osc_speed: f32,
    /// 0 for spawned asteroids, 1 for fragments
    pub split_depth: u8,
    pub variant: usize,
    /// Size modifier applied on the last update
    pub live_size_scale: f32,
}

impl Hazard {
    fn asteroid(
        id: u32,
        field: Vec2,
        base_speed: f32,
        size_scale: f32,
        variants: usize,
        rng: &mut impl RandomSource,
    ) -> Self {
        let scale = (0.78 + rng.unit() * 0.8) * size_scale;
        let radii = Vec2::splat(ASTEROID_SPRITE_SIZE * scale * 0.5);
        let available = (field.y - radii.y * 2.0).max(10.0);
        let base_y = radii.y + rng.unit() * available;
        Self {
            id,
            kind: HazardKind::Asteroid,
            pos: Vec2::new(field.x + radii.x + 20.0, base_y),
            base_y,
            speed: base_speed + rng.unit() * 150.0,
            vel_y: 0.0,
            rotation: rng.unit() * TAU,
            rotation_speed: (rng.unit() - 0.5) * 1.4,
            scale,
            radii,
            osc_phase: rng.unit() * TAU,
            osc_speed: 0.8 + rng.unit() * 0.6,
            split_depth: 0,
            variant: rng.index(variants),
            live_size_scale: 1.0,
        }
    }

    fn debris(id: u32, field: Vec2, rng: &mut impl RandomSource) -> Self {
        let half = DEBRIS_SIZE * 0.5;
        let base_y = half + rng.unit() * (field.y - DEBRIS_SIZE).max(10.0);
        Self {
            id,
            kind: HazardKind::Debris,
            pos: Vec2::new(field.x + DEBRIS_SIZE + 60.0, base_y),
            base_y,
            speed: rng.range(DEBRIS_SPEED_MIN, DEBRIS_SPEED_MAX),
            vel_y: 0.0,
            rotation: rng.unit() * TAU,
            rotation_speed: DEBRIS_ROTATION_SPEED,
            scale: 1.0,
            radii: Vec2::splat(half),
            osc_phase: rng.unit() * TAU,
            osc_speed: 0.8 + rng.unit() * 0.6,
            split_depth: 0,
            variant: 0,
            live_size_scale: 1.0,
        }
    }

    pub fn update(&mut self, dt: f32, speed_scale: f32, size_scale: f32, wave: Option<WaveSettings>) {
        if self.kind == HazardKind::Asteroid {
            self.live_size_scale = size_scale;
        }
        self.pos.x -= self.speed * speed_scale * dt;
        self.rotation += self.rotation_speed * dt;
        self.base_y += self.vel_y * dt;

        match wave {
            Some(wave) if wave.amplitude > 0.0 => {
                self.osc_phase += self.osc_speed * wave.speed * dt;
                self.pos.y = self.base_y + self.osc_phase.sin() * wave.amplitude;
            }
            _ => self.pos.y = self.base_y,
        }
    }

    /// Half-size including the live size modifier
    pub fn extent(&self) -> Vec2 {
        self.radii * self.live_size_scale
    }

    /// Radius used by the orbital beam
    pub fn reach(&self) -> f32 {
        let extent = self.bounds();
        extent.width.max(extent.height) * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        let size = match self.kind {
            HazardKind::Asteroid => self.extent() * 2.0 * ASTEROID_HITBOX_FACTOR,
            HazardKind::Debris => self.radii * 2.0,
        };
        Aabb::centered(self.pos, size.x, size.y)
    }

    pub fn is_off_field(&self, field: Vec2) -> bool {
        match self.kind {
            HazardKind::Asteroid => {
                let extent = self.extent();
                if self.pos.x < -extent.x - 30.0 {
                    return true;
                }
                let pad = extent.y + 80.0;
                self.pos.y < -pad || self.pos.y > field.y + pad
            }
            HazardKind::Debris => {
                let margin = DEBRIS_SIZE * 1.2 + 120.0;
                self.pos.x < -margin || self.pos.x > field.x + margin
            }
        }
    }

    /// Fragment pair produced by the asteroid splitter
    fn fragments(&self, ids: &mut EntityIds) -> [Hazard; 2] {
        let make = |id: u32, drift: f32| Hazard {
            id,
            scale: self.scale * SPLIT_SCALE,
            radii: self.radii * SPLIT_SCALE,
            vel_y: drift,
            split_depth: self.split_depth + 1,
            ..self.clone()
        };
        [make(ids.next(), -SPLIT_DRIFT), make(ids.next(), SPLIT_DRIFT)]
    }
}

/// Owns every live hazard and both hazard spawners
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardField {
    pub hazards: Vec<Hazard>,
    asteroid_timer: SpawnTimer,
    dust_timer: SpawnTimer,
}

impl HazardField {
    pub fn new(rng: &mut impl RandomSource) -> Self {
        Self {
            hazards: Vec::new(),
            asteroid_timer: SpawnTimer::external(MAX_ASTEROIDS),
            dust_timer: SpawnTimer::new(0.35, 0.7, MAX_DEBRIS, rng),
        }
    }

    pub fn count(&self, kind: HazardKind) -> usize {
        self.hazards.iter().filter(|h| h.kind == kind).count()
    }

    /// Spawn, move and prune hazards for one tick
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        field: Vec2,
        difficulty: &DifficultyScaler,
        mods: &Modifiers,
        spawn_rate: f32,
        variants: usize,
        ids: &mut EntityIds,
        rng: &mut impl RandomSource,
    ) {
        let asteroids = self.count(HazardKind::Asteroid);
        if self
            .asteroid_timer
            .tick_interval(dt, asteroids, difficulty.spawn_interval(), spawn_rate)
        {
            let hazard = Hazard::asteroid(
                ids.next(),
                field,
                difficulty.base_speed(),
                difficulty.size_scale(),
                variants,
                rng,
            );
            self.hazards.push(hazard);
        }

        if mods.space_dust {
            let debris = self.count(HazardKind::Debris);
            if self.dust_timer.tick(dt, debris, 1.0, rng) {
                self.hazards.push(Hazard::debris(ids.next(), field, rng));
            }
        } else {
            self.dust_timer.accumulator = 0.0;
        }

        for hazard in &mut self.hazards {
            hazard.update(dt, mods.hazard_speed_scale, mods.hazard_size_scale, mods.wave);
        }

        self.prune(field);
    }

    pub fn find(&self, id: u32) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.id == id)
    }

    /// Remove a hazard by ID; when `split` is set an unsplit asteroid leaves
    /// two fragments behind
    pub fn remove(&mut self, id: u32, split: bool, ids: &mut EntityIds) -> Option<Hazard> {
        let index = self.hazards.iter().position(|h| h.id == id)?;
        let hazard = self.hazards.remove(index);
        if split && hazard.kind == HazardKind::Asteroid && hazard.split_depth == 0 {
            self.hazards.extend(hazard.fragments(ids));
        }
        Some(hazard)
    }

    /// Drop hazards that have left the field
    pub fn prune(&mut self, field: Vec2) {
        self.hazards.retain(|h| !h.is_off_field(field));
    }

    pub fn clear(&mut self, rng: &mut impl RandomSource) {
        self.hazards.clear();
        self.asteroid_timer.accumulator = 0.0;
        self.dust_timer.reset(rng);
    }
}
