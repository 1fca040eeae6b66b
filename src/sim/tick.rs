//! Per-frame simulation tick
//!
//! Advances the whole simulation by one clamped elapsed sample. Subsystems
//! always run in the same order: clock, player, difficulty, entity managers,
//! power-up timers, collisions, time score.

use super::collision::{self, damage_player};
use super::player::MovementIntent;
use super::powerups::PowerUpKind;
use super::projectiles::Bullet;
use super::run::RunPhase;
use super::score::{NEGATIVE_SURVIVAL_POINTS, ScoreCategory};
use super::state::{SimEvent, SimulationState};
use crate::consts::FIRE_COOLDOWN_SECONDS;

/// Decoded intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional keys (carried, not steering)
    pub movement: MovementIntent,
    /// Jump pressed since the last tick
    pub jump: bool,
    /// Fire pressed since the last tick
    pub fire: bool,
}

/// Advance the simulation by one raw elapsed sample (seconds)
pub fn tick(state: &mut SimulationState, input: &TickInput, raw_dt: f32) {
    let dt = state.clock.advance(raw_dt);
    state.player.intent = input.movement;

    match state.run.phase {
        RunPhase::Idle | RunPhase::Paused => return,
        RunPhase::Countdown => {
            if state.run.advance_countdown(dt) {
                state.clock.request_reset();
                state.emit(SimEvent::CountdownFinished);
                log::info!("Countdown finished, run is live");
            }
            return;
        }
        RunPhase::GameOver => {
            state.explosions.update(dt);
            return;
        }
        RunPhase::Running => {}
    }

    if dt <= 0.0 {
        return;
    }

    let in_hit_pause = state.run.in_hit_pause();
    state.run.decay(dt);
    state.stats.elapsed += dt;
    state.fire_cooldown = (state.fire_cooldown - dt).max(0.0);

    // Frozen frame after damage: only timers, time score and explosions
    if in_hit_pause {
        decay_power_ups(state, dt);
        add_time_score(state, dt);
        state.explosions.update(dt);
        return;
    }

    if input.jump {
        state.player.jump();
    }
    if input.fire {
        fire_blaster(state);
    }

    if state.player.update(dt, state.field) {
        damage_player(state);
        if state.run.is_over() {
            return;
        }
    }

    state.difficulty.advance(dt);
    advance_entities(state, dt);
    decay_power_ups(state, dt);

    collision::resolve(state);
    if state.run.is_over() {
        return;
    }

    add_time_score(state, dt);
}

/// Spawn a bullet if the blaster is active and ready
fn fire_blaster(state: &mut SimulationState) {
    if !state.modifiers().can_fire || state.fire_cooldown > 0.0 {
        return;
    }
    let id = state.ids.next();
    let bullet = Bullet::new(id, state.player.muzzle());
    state.projectiles.bullets.push(bullet);
    state.fire_cooldown = FIRE_COOLDOWN_SECONDS;
}

/// Move and spawn everything that is not the player
fn advance_entities(state: &mut SimulationState, dt: f32) {
    let mods = state.modifiers();
    let field = state.field;

    state.hazards.update(
        dt,
        field,
        &state.difficulty,
        &mods,
        state.tuning.asteroid_spawn_rate_multiplier,
        state.variants.asteroid,
        &mut state.ids,
        &mut state.rng,
    );
    state.pickups.update(
        dt,
        field,
        &state.tuning.allowed_powerup_kinds,
        state.tuning.power_up_spawn_rate_multiplier,
        &mut state.ids,
        &mut state.rng,
    );
    state.aliens.update(
        dt,
        field,
        mods.hazard_speed_scale,
        state.player.pos.y,
        state.variants.alien,
        &mut state.ids,
        &mut state.rng,
    );
    state.streaks.update(dt, field, &mut state.ids, &mut state.rng);

    if state.powerups.is_active(PowerUpKind::SeekerMissiles) && state.powerups.seeker.tick(dt) {
        if let Some(target) = state.nearest_target() {
            state.launch_missile(target);
        }
    }

    state.projectiles.update_bullets(dt, field);
    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.update_missiles(dt, |target| state.target_point(target));
    state.projectiles = projectiles;

    state.explosions.update(dt);
}

/// Count power-ups down and apply expiry effects
fn decay_power_ups(state: &mut SimulationState, dt: f32) {
    for kind in state.powerups.decay(dt) {
        match kind {
            PowerUpKind::Multiplier => state.ledger.multiplier = 1.0,
            PowerUpKind::MissileBarrage => state.launch_barrage(),
            _ => {}
        }
        if kind.is_negative() {
            state
                .ledger
                .add(NEGATIVE_SURVIVAL_POINTS, ScoreCategory::Negative);
        }
        state.emit(SimEvent::PowerUpExpired(kind));
        log::debug!("{} expired", kind.name());
    }
}

fn add_time_score(state: &mut SimulationState, dt: f32) {
    let negative = state.powerups.any_negative_active();
    state.ledger.add_time(dt, negative);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;
    use crate::sim::hazards::{Hazard, HazardKind};
    use crate::sim::run::Lives;
    use crate::tuning::EffectiveTuning;
    use glam::Vec2;

    fn running_state() -> SimulationState {
        let mut state = SimulationState::new(7, EffectiveTuning::default());
        state.start_run(0.0);
        state
    }

    /// Keep the craft airborne in the middle of the field
    fn hover(state: &mut SimulationState) {
        state.player.pos = state.field * Vec2::new(0.2, 0.5);
        state.player.vel = Vec2::ZERO;
    }

    #[test]
    fn test_idle_and_paused_do_nothing() {
        let mut state = SimulationState::new(1, EffectiveTuning::default());
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.ledger.total, 0.0);

        state.start_run(0.0);
        state.run.pause();
        let before = state.player.pos;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert_eq!(state.player.pos, before);
        assert_eq!(state.ledger.total, 0.0);
    }

    #[test]
    fn test_countdown_reaches_running_and_resets_clock() {
        let mut state = SimulationState::new(1, EffectiveTuning::default());
        state.start_run(0.18);
        // First sample swallowed by the start reset
        tick(&mut state, &TickInput::default(), 0.05);
        for _ in 0..4 {
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert_eq!(state.run.phase, RunPhase::Running);
        assert!(state.clock.reset_pending());
        assert!(state.drain_events().contains(&SimEvent::CountdownFinished));
        assert_eq!(state.ledger.total, 0.0);
    }

    #[test]
    fn test_huge_delta_is_clamped() {
        let mut state = running_state();
        tick(&mut state, &TickInput::default(), 0.0);
        hover(&mut state);
        tick(&mut state, &TickInput::default(), 10.0);
        assert!((state.stats.elapsed - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_multiplier_expires_after_eleven_seconds() {
        let mut state = running_state();
        state.tuning.infinite_lives = true;
        state.run.lives = Lives::Infinite;
        crate::sim::collision::collect_power_up(&mut state, PowerUpKind::Multiplier);
        assert_eq!(state.ledger.multiplier, 2.0);

        let mut expiries = 0;
        for _ in 0..(11 * 20) {
            hover(&mut state);
            tick(&mut state, &TickInput::default(), 0.05);
            expiries += state
                .drain_events()
                .iter()
                .filter(|e| **e == SimEvent::PowerUpExpired(PowerUpKind::Multiplier))
                .count();
        }
        assert_eq!(expiries, 1);
        assert_eq!(state.ledger.multiplier, 1.0);
        assert!(!state.powerups.is_active(PowerUpKind::Multiplier));
    }

    #[test]
    fn test_negative_expiry_pays_out() {
        let mut state = running_state();
        state.run.lives = Lives::Infinite;
        state.powerups.activate(PowerUpKind::Wave);
        for _ in 0..(9 * 20) {
            hover(&mut state);
            tick(&mut state, &TickInput::default(), 0.05);
        }
        assert_eq!(state.ledger.buckets.negative, NEGATIVE_SURVIVAL_POINTS);
    }

    #[test]
    fn test_hit_pause_freezes_entities() {
        let mut state = running_state();
        tick(&mut state, &TickInput::default(), 0.0);
        hover(&mut state);
        state.hazards.hazards.push(Hazard {
            id: 500,
            kind: HazardKind::Asteroid,
            pos: Vec2::new(900.0, 100.0),
            base_y: 100.0,
            speed: 300.0,
            vel_y: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: 1.0,
            radii: Vec2::splat(30.0),
            osc_phase: 0.0,
            osc_speed: 1.0,
            split_depth: 0,
            variant: 0,
            live_size_scale: 1.0,
        });
        damage_player(&mut state);
        assert!(state.run.in_hit_pause());

        let before_time = state.ledger.buckets.time;
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.hazards.find(500).map(|h| h.pos.x), Some(900.0));
        assert!(state.ledger.buckets.time > before_time);
    }

    #[test]
    fn test_blaster_fires_with_cooldown() {
        let mut state = running_state();
        tick(&mut state, &TickInput::default(), 0.0);
        state.powerups.activate(PowerUpKind::Blaster);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        hover(&mut state);
        tick(&mut state, &fire, 0.05);
        hover(&mut state);
        tick(&mut state, &fire, 0.05);
        assert_eq!(state.projectiles.bullets.len(), 1);
        hover(&mut state);
        tick(&mut state, &fire, 0.05);
        hover(&mut state);
        tick(&mut state, &fire, 0.05);
        assert_eq!(state.projectiles.bullets.len(), 2);
    }

    #[test]
    fn test_no_fire_without_blaster() {
        let mut state = running_state();
        tick(&mut state, &TickInput::default(), 0.0);
        hover(&mut state);
        tick(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
            0.05,
        );
        assert!(state.projectiles.bullets.is_empty());
    }

    #[test]
    fn test_boundary_touch_is_a_hit() {
        let mut state = running_state();
        tick(&mut state, &TickInput::default(), 0.0);
        state.player.pos.y = state.field.y - state.player.half_extents.y;
        state.player.vel.y = 500.0;
        tick(&mut state, &TickInput::default(), 0.05);
        assert_eq!(state.run.lives, Lives::Finite(2));
    }
}
