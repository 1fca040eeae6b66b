//! Collision resolution
//!
//! Runs once per tick after every entity has moved. Checks run in a fixed
//! order and stop as soon as the run ends.

use super::bounds::point_segment_distance;
use super::hazards::HazardKind;
use super::powerups::{BEAM_MAX_KILLS_PER_TICK, PowerUpKind};
use super::projectiles::{MissileStatus, TargetRef};
use super::run::HitOutcome;
use super::score::{ALIEN_POINTS, ASTEROID_POINTS, DEBRIS_POINTS};
use super::state::{SimEvent, SimulationState};

const PLAYER_EXPLOSION_SIZE: f32 = 70.0;
const MISSILE_EXPLOSION_SIZE: f32 = 36.0;

/// Resolve every interaction for this tick
pub fn resolve(state: &mut SimulationState) {
    let steps: [fn(&mut SimulationState); 8] = [
        player_vs_hazards,
        player_vs_pickups,
        player_vs_aliens,
        player_vs_lasers,
        player_vs_streaks,
        bullets_vs_targets,
        missiles_vs_targets,
        beam_vs_targets,
    ];
    for step in steps {
        if state.run.is_over() {
            break;
        }
        step(state);
    }
    // Split fragments can start beyond their own margin
    state.hazards.prune(state.field);
}

/// Single entry point for player damage
pub fn damage_player(state: &mut SimulationState) -> HitOutcome {
    let outcome = state.run.register_hit();
    match outcome {
        HitOutcome::Ignored => {}
        HitOutcome::Damaged { lives } => {
            state.stats.hits_taken += 1;
            state.explosions.spawn(state.player.pos, PLAYER_EXPLOSION_SIZE);
            state.emit(SimEvent::PlayerHit { lives });
            log::debug!("Player hit, lives now {lives:?}");
        }
        HitOutcome::GameOver => {
            state.stats.hits_taken += 1;
            state.explosions.spawn(state.player.pos, PLAYER_EXPLOSION_SIZE);
            let score = state.ledger.final_score();
            state.emit(SimEvent::PlayerHit {
                lives: state.run.lives,
            });
            state.emit(SimEvent::GameOver { score });
            log::info!(
                "Game over: score {score} after {:.1}s",
                state.stats.elapsed
            );
        }
    }
    outcome
}

/// Apply a collected power-up
pub fn collect_power_up(state: &mut SimulationState, kind: PowerUpKind) {
    state.stats.pickups_collected += 1;
    match kind {
        PowerUpKind::ExtraLife => {
            state.run.add_life();
        }
        PowerUpKind::Multiplier => {
            state.ledger.multiplier = super::powerups::MULTIPLIER_SCORE_SCALE;
            state.powerups.activate(kind);
        }
        _ => state.powerups.activate(kind),
    }
    state.emit(SimEvent::PowerUpCollected(kind));
    log::debug!("Collected {}", kind.name());
}

/// Remove a hazard, award points and split it if the splitter is active
pub fn destroy_hazard(state: &mut SimulationState, id: u32) -> Option<f64> {
    let split = state.modifiers().splitter;
    let hazard = state.hazards.remove(id, split, &mut state.ids)?;
    let points = match hazard.kind {
        HazardKind::Asteroid => ASTEROID_POINTS,
        HazardKind::Debris => DEBRIS_POINTS,
    };
    let credited = state.ledger.record_destroyed(points);
    state.explosions.spawn(hazard.pos, hazard.extent().x * 2.0);
    state.emit(SimEvent::Destroyed {
        target: TargetRef::Hazard(id),
        points: credited,
    });
    Some(credited)
}

pub fn destroy_alien(state: &mut SimulationState, id: u32) -> Option<f64> {
    let alien = state.aliens.remove(id)?;
    let credited = state.ledger.record_destroyed(ALIEN_POINTS);
    state.explosions.spawn(alien.pos, alien.size().x);
    state.emit(SimEvent::Destroyed {
        target: TargetRef::Alien(id),
        points: credited,
    });
    Some(credited)
}

fn destroy_target(state: &mut SimulationState, target: TargetRef) -> Option<f64> {
    match target {
        TargetRef::Hazard(id) => destroy_hazard(state, id),
        TargetRef::Alien(id) => destroy_alien(state, id),
    }
}

/// Cloak turns the first overlap into a phase; otherwise it is a hit
fn player_vs_hazards(state: &mut SimulationState) {
    if state.run.is_invulnerable() {
        return;
    }
    let player = state.player.bounds();
    let Some(hazard) = state
        .hazards
        .hazards
        .iter()
        .find(|h| h.bounds().overlaps(&player))
    else {
        return;
    };
    let (id, pos, size) = (hazard.id, hazard.pos, hazard.extent().x * 2.0);

    if state.modifiers().cloaked {
        state.hazards.remove(id, false, &mut state.ids);
        state.ledger.record_phased();
        state.explosions.spawn(pos, size);
        state.emit(SimEvent::Phased { hazard: id });
    } else {
        damage_player(state);
    }
}

fn player_vs_pickups(state: &mut SimulationState) {
    let player = state.player.bounds();
    let mut collected = Vec::new();
    state.pickups.pickups.retain(|pickup| {
        if pickup.bounds().overlaps(&player) {
            collected.push(pickup.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        collect_power_up(state, kind);
    }
}

/// Aliens, lasers and streaks only hurt an uncloaked, vulnerable player
fn shielded(state: &SimulationState) -> bool {
    state.run.is_invulnerable() || state.modifiers().cloaked
}

fn player_vs_aliens(state: &mut SimulationState) {
    if shielded(state) {
        return;
    }
    let player = state.player.bounds();
    if state.aliens.aliens.iter().any(|a| a.bounds().overlaps(&player)) {
        damage_player(state);
    }
}

fn player_vs_lasers(state: &mut SimulationState) {
    if shielded(state) {
        return;
    }
    let player = state.player.bounds();
    if state.aliens.lasers.iter().any(|l| l.bounds().overlaps(&player)) {
        damage_player(state);
    }
}

fn player_vs_streaks(state: &mut SimulationState) {
    if shielded(state) {
        return;
    }
    let player = state.player.bounds();
    let hit = state
        .streaks
        .streaks
        .iter()
        .find(|s| s.head_bounds().overlaps(&player))
        .map(|s| s.id);
    if let Some(id) = hit {
        state.streaks.remove(id);
        damage_player(state);
    }
}

/// Each bullet destroys at most one target, hazards first
fn bullets_vs_targets(state: &mut SimulationState) {
    let bullets = std::mem::take(&mut state.projectiles.bullets);
    let mut remaining = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        let bounds = bullet.bounds();
        let target = state
            .hazards
            .hazards
            .iter()
            .find(|h| h.bounds().overlaps(&bounds))
            .map(|h| TargetRef::Hazard(h.id))
            .or_else(|| {
                state
                    .aliens
                    .aliens
                    .iter()
                    .find(|a| a.bounds().overlaps(&bounds))
                    .map(|a| TargetRef::Alien(a.id))
            });

        match target {
            Some(target) => {
                destroy_target(state, target);
            }
            None => remaining.push(bullet),
        }
    }

    state.projectiles.bullets = remaining;
}

/// Settle missiles that arrived, lost their target or ran out of time.
/// Flying missiles also detonate on contact with their own target.
fn missiles_vs_targets(state: &mut SimulationState) {
    let missiles = std::mem::take(&mut state.projectiles.missiles);
    let mut remaining = Vec::with_capacity(missiles.len());

    for mut missile in missiles {
        if missile.status == MissileStatus::Flying {
            let contact = match missile.target {
                TargetRef::Hazard(id) => state
                    .hazards
                    .find(id)
                    .is_some_and(|h| h.bounds().overlaps(&missile.bounds())),
                TargetRef::Alien(id) => state
                    .aliens
                    .find(id)
                    .is_some_and(|a| a.bounds().overlaps(&missile.bounds())),
            };
            if contact {
                missile.status = MissileStatus::Arrived;
            }
        }

        match missile.status {
            MissileStatus::Flying => remaining.push(missile),
            MissileStatus::Arrived => {
                if destroy_target(state, missile.target).is_none() {
                    state.explosions.spawn(missile.pos, MISSILE_EXPLOSION_SIZE);
                }
                state.emit(SimEvent::MissileDetonated { pos: missile.pos });
            }
            MissileStatus::TargetLost | MissileStatus::Expired => {
                state.explosions.spawn(missile.pos, MISSILE_EXPLOSION_SIZE);
                state.emit(SimEvent::MissileDetonated { pos: missile.pos });
            }
        }
    }

    state.projectiles.missiles = remaining;
}

/// Orbital laser sweep, capped per category per tick
fn beam_vs_targets(state: &mut SimulationState) {
    let Some(beam) = state.beam() else {
        return;
    };

    let hazards: Vec<u32> = state
        .hazards
        .hazards
        .iter()
        .filter(|h| {
            point_segment_distance(h.pos, beam.start, beam.end) <= h.reach() + beam.thickness
        })
        .take(BEAM_MAX_KILLS_PER_TICK)
        .map(|h| h.id)
        .collect();

    let aliens: Vec<u32> = state
        .aliens
        .aliens
        .iter()
        .filter(|a| {
            let reach = a.size().max_element() * 0.5;
            point_segment_distance(a.pos, beam.start, beam.end) <= reach + beam.thickness
        })
        .take(BEAM_MAX_KILLS_PER_TICK)
        .map(|a| a.id)
        .collect();

    for id in hazards {
        destroy_hazard(state, id);
    }
    for id in aliens {
        destroy_alien(state, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::aliens::Laser;
    use crate::sim::hazards::Hazard;
    use crate::sim::pickups::Pickup;
    use crate::sim::projectiles::{Bullet, Missile};
    use crate::sim::run::{DamageTier, Lives, RunPhase};
    use crate::sim::score::PHASE_POINTS;
    use crate::tuning::EffectiveTuning;
    use glam::Vec2;

    fn running_state() -> SimulationState {
        let mut state = SimulationState::new(42, EffectiveTuning::default());
        state.start_run(0.0);
        state
    }

    fn asteroid_at(state: &mut SimulationState, pos: Vec2) -> u32 {
        let id = state.ids.next();
        state.hazards.hazards.push(Hazard {
            id,
            kind: HazardKind::Asteroid,
            pos,
            base_y: pos.y,
            speed: 0.0,
            vel_y: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: 1.0,
            radii: Vec2::splat(48.0),
            osc_phase: 0.0,
            osc_speed: 1.0,
            split_depth: 0,
            variant: 0,
            live_size_scale: 1.0,
        });
        id
    }

    #[test]
    fn test_hazard_hit_costs_a_life() {
        let mut state = running_state();
        let pos = state.player.pos;
        asteroid_at(&mut state, pos);
        resolve(&mut state);
        assert_eq!(state.run.lives, Lives::Finite(2));
        assert!(state.run.invulnerability > 0.0);
        assert_eq!(state.run.damage_tier(), DamageTier::Damaged);
        // Hazard survives the hit
        assert_eq!(state.hazards.hazards.len(), 1);

        // Still overlapping next tick, but invulnerable
        resolve(&mut state);
        assert_eq!(state.run.lives, Lives::Finite(2));
    }

    #[test]
    fn test_cloak_phases_hazard() {
        let mut state = running_state();
        state.powerups.activate(PowerUpKind::Cloak);
        let pos = state.player.pos;
        asteroid_at(&mut state, pos);
        asteroid_at(&mut state, pos);
        resolve(&mut state);
        assert_eq!(state.run.lives, Lives::Finite(3));
        assert_eq!(state.hazards.hazards.len(), 1);
        assert_eq!(state.ledger.buckets.phased, PHASE_POINTS);
        assert_eq!(state.ledger.phased_count, 1);
    }

    #[test]
    fn test_last_life_game_over_once() {
        let mut state = running_state();
        state.run.lives = Lives::Finite(1);
        let pos = state.player.pos;
        asteroid_at(&mut state, pos);
        state.aliens.lasers.push(Laser {
            id: 999,
            pos,
            prev: pos,
            size: Vec2::new(16.0, 4.0),
            speed: 0.0,
        });
        resolve(&mut state);
        assert_eq!(state.run.phase, RunPhase::GameOver);
        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        state.run.invulnerability = 0.0;
        assert_eq!(damage_player(&mut state), HitOutcome::Ignored);
        assert_eq!(state.run.lives, Lives::Finite(0));
    }

    #[test]
    fn test_all_overlapping_pickups_collected() {
        let mut state = running_state();
        let pos = state.player.pos;
        for kind in [PowerUpKind::Blaster, PowerUpKind::ExtraLife] {
            let id = state.ids.next();
            state.pickups.pickups.push(Pickup {
                id,
                kind,
                radius: 20.0,
                pos,
                speed: 0.0,
                bob_phase: 0.0,
            });
        }
        resolve(&mut state);
        assert!(state.pickups.pickups.is_empty());
        assert!(state.powerups.is_active(PowerUpKind::Blaster));
        assert_eq!(state.run.lives, Lives::Finite(4));
        assert_eq!(state.stats.pickups_collected, 2);
    }

    #[test]
    fn test_bullet_consumed_by_first_hit() {
        let mut state = running_state();
        let target = Vec2::new(800.0, 300.0);
        asteroid_at(&mut state, target);
        asteroid_at(&mut state, target);
        state.projectiles.bullets.push(Bullet::new(500, target));
        resolve(&mut state);
        assert!(state.projectiles.bullets.is_empty());
        assert_eq!(state.hazards.hazards.len(), 1);
        assert_eq!(state.ledger.buckets.destroyed, ASTEROID_POINTS);
    }

    #[test]
    fn test_splitter_leaves_fragments() {
        let mut state = running_state();
        state.powerups.activate(PowerUpKind::AsteroidSplitter);
        let id = asteroid_at(&mut state, Vec2::new(800.0, 300.0));
        destroy_hazard(&mut state, id);
        assert_eq!(state.hazards.hazards.len(), 2);
    }

    #[test]
    fn test_fragments_past_the_edge_are_pruned() {
        let mut state = running_state();
        state.powerups.activate(PowerUpKind::AsteroidSplitter);
        let pos = Vec2::new(-85.0, 300.0);
        let id = asteroid_at(&mut state, pos);
        state.hazards.hazards[0].radii = Vec2::splat(60.0);
        assert!(!state.hazards.hazards[0].is_off_field(state.field));
        state
            .projectiles
            .missiles
            .push(Missile::new(9, pos, TargetRef::Hazard(id)));

        resolve(&mut state);
        assert_eq!(state.ledger.destroyed_count, 1);
        assert!(state.hazards.hazards.is_empty());
    }

    #[test]
    fn test_missile_target_lost_detonates_without_kill() {
        let mut state = running_state();
        let mut missile = Missile::new(7, Vec2::new(500.0, 300.0), TargetRef::Hazard(1234));
        missile.update(0.016, None);
        state.projectiles.missiles.push(missile);
        resolve(&mut state);
        assert!(state.projectiles.missiles.is_empty());
        assert_eq!(state.ledger.destroyed_count, 0);
        assert_eq!(state.explosions.active.len(), 1);
    }

    #[test]
    fn test_missile_contact_destroys_target() {
        let mut state = running_state();
        let pos = Vec2::new(700.0, 200.0);
        let id = asteroid_at(&mut state, pos);
        state
            .projectiles
            .missiles
            .push(Missile::new(8, pos, TargetRef::Hazard(id)));
        resolve(&mut state);
        assert!(state.hazards.find(id).is_none());
        assert_eq!(state.ledger.destroyed_count, 1);
    }

    #[test]
    fn test_beam_kills_capped_per_tick() {
        let mut state = running_state();
        state.player.pos = Vec2::new(200.0, 300.0);
        state.powerups.activate(PowerUpKind::OrbitalLaser);
        let beam = state.beam().expect("beam lit at activation");
        for i in 1..=5 {
            let t = i as f32 / 6.0;
            let point = beam.start + (beam.end - beam.start) * t;
            asteroid_at(&mut state, point);
        }
        // Keep the player clear of the asteroids it spawned on the beam
        state.run.invulnerability = 10.0;
        resolve(&mut state);
        assert_eq!(state.hazards.hazards.len(), 2);
        assert_eq!(state.ledger.destroyed_count, 3);
    }
}
