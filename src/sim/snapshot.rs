//! Read-only views of the simulation for drawing and the game-over screen

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::MovementIntent;
use super::powerups::{BeamSegment, EffectCategory, PowerUpKind};
use super::run::{DamageTier, Lives, RunPhase};
use super::score::ScoreBreakdown;
use super::state::SimulationState;
use crate::assets::{AssetHandle, DrawableKind};

/// One drawable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteInstance {
    pub id: u32,
    pub kind: DrawableKind,
    pub variant: usize,
    /// Resolved by the session when a manifest is attached
    pub handle: Option<AssetHandle>,
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    /// Power-up shown inside a pickup orb
    pub icon: Option<PowerUpKind>,
    /// Trail end for streaks and projectiles
    pub trail: Option<Vec2>,
    /// Animation progress in [0, 1] for explosions
    pub progress: f32,
}

impl SpriteInstance {
    fn new(id: u32, kind: DrawableKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            variant: 0,
            handle: None,
            pos,
            size,
            rotation: 0.0,
            icon: None,
            trail: None,
            progress: 0.0,
        }
    }
}

/// HUD meter for one active power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpMeter {
    pub kind: PowerUpKind,
    pub category: EffectCategory,
    /// remaining / total
    pub ratio: f32,
}

/// Everything the drawing side needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub phase: RunPhase,
    pub countdown: f32,
    pub elapsed: f32,
    pub lives: Lives,
    pub damage_tier: DamageTier,
    pub invulnerable: bool,
    /// Remaining hit-flash seconds
    pub hit_flash: f32,
    pub cloaked: bool,
    pub movement: MovementIntent,
    pub player: SpriteInstance,
    /// Entities in draw order: hazards, pickups, aliens, lasers, streaks,
    /// bullets, missiles, explosions
    pub entities: Vec<SpriteInstance>,
    pub power_ups: Vec<PowerUpMeter>,
    pub score: f64,
    pub multiplier: f64,
    pub breakdown: ScoreBreakdown,
    pub beam: Option<BeamSegment>,
}

/// Final numbers for the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub breakdown: ScoreBreakdown,
    pub elapsed: f32,
    pub destroyed: u32,
    pub phased: u32,
    pub pickups_collected: u32,
    pub hits_taken: u32,
    pub missiles_launched: u32,
    /// Seconds each kind was active (kinds never used are omitted)
    pub uptime: Vec<(PowerUpKind, f32)>,
}

impl SimulationState {
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut entities = Vec::new();

        for hazard in &self.hazards.hazards {
            let kind = match hazard.kind {
                super::hazards::HazardKind::Asteroid => DrawableKind::Asteroid,
                super::hazards::HazardKind::Debris => DrawableKind::Debris,
            };
            let mut sprite = SpriteInstance::new(hazard.id, kind, hazard.pos, hazard.extent() * 2.0);
            sprite.variant = hazard.variant;
            sprite.rotation = hazard.rotation;
            entities.push(sprite);
        }

        for pickup in &self.pickups.pickups {
            let mut sprite = SpriteInstance::new(
                pickup.id,
                DrawableKind::PowerUp,
                pickup.pos,
                Vec2::splat(pickup.radius * 2.0),
            );
            sprite.icon = Some(pickup.kind);
            entities.push(sprite);
        }

        for alien in &self.aliens.aliens {
            let mut sprite = SpriteInstance::new(alien.id, DrawableKind::Alien, alien.pos, alien.size());
            sprite.variant = alien.variant;
            entities.push(sprite);
        }

        for laser in &self.aliens.lasers {
            let mut sprite = SpriteInstance::new(laser.id, DrawableKind::AlienLaser, laser.pos, laser.size);
            sprite.trail = Some(laser.prev);
            entities.push(sprite);
        }

        for streak in &self.streaks.streaks {
            let radius = streak.head_radius();
            let mut sprite =
                SpriteInstance::new(streak.id, DrawableKind::Streak, streak.pos, Vec2::splat(radius * 2.0));
            sprite.trail = Some(streak.tail());
            sprite.progress = (streak.elapsed / streak.life).clamp(0.0, 1.0);
            entities.push(sprite);
        }

        for bullet in &self.projectiles.bullets {
            let mut sprite = SpriteInstance::new(
                bullet.id,
                DrawableKind::Bullet,
                bullet.pos,
                super::projectiles::BULLET_SIZE,
            );
            sprite.trail = Some(bullet.prev);
            entities.push(sprite);
        }

        for missile in &self.projectiles.missiles {
            let mut sprite =
                SpriteInstance::new(missile.id, DrawableKind::Missile, missile.pos, Vec2::splat(12.0));
            sprite.rotation = missile.vel.y.atan2(missile.vel.x);
            sprite.trail = Some(missile.prev);
            entities.push(sprite);
        }

        for explosion in &self.explosions.active {
            let mut sprite =
                SpriteInstance::new(0, DrawableKind::Explosion, explosion.pos, Vec2::splat(explosion.size));
            sprite.progress = explosion.progress();
            entities.push(sprite);
        }

        let player = SpriteInstance::new(
            0,
            DrawableKind::Player,
            self.player.pos,
            self.player.half_extents * 2.0,
        );

        RenderSnapshot {
            phase: self.run.phase,
            countdown: self.run.countdown,
            elapsed: self.stats.elapsed,
            lives: self.run.lives,
            damage_tier: self.run.damage_tier(),
            invulnerable: self.run.is_invulnerable(),
            hit_flash: self.run.hit_flash,
            cloaked: self.modifiers().cloaked,
            movement: self.player.intent,
            player,
            entities,
            power_ups: self
                .powerups
                .active()
                .into_iter()
                .map(|(kind, ratio)| PowerUpMeter {
                    kind,
                    category: kind.category(),
                    ratio,
                })
                .collect(),
            score: self.ledger.total,
            multiplier: self.ledger.multiplier,
            breakdown: self.ledger.breakdown(),
            beam: self.beam(),
        }
    }

    /// Summary of the finished run; None until game over
    pub fn summary(&self) -> Option<RunSummary> {
        if !self.run.is_over() {
            return None;
        }
        Some(RunSummary {
            score: self.ledger.final_score(),
            breakdown: self.ledger.breakdown(),
            elapsed: self.stats.elapsed,
            destroyed: self.ledger.destroyed_count,
            phased: self.ledger.phased_count,
            pickups_collected: self.stats.pickups_collected,
            hits_taken: self.stats.hits_taken,
            missiles_launched: self.stats.missiles_launched,
            uptime: PowerUpKind::ALL
                .into_iter()
                .map(|kind| (kind, self.powerups.uptime(kind)))
                .filter(|(_, seconds)| *seconds > 0.0)
                .collect(),
        })
    }
}
