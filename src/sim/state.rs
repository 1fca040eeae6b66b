//! Simulation state and core simulation types
//!
//! Everything one run mutates lives in `SimulationState`. It is owned by a
//! single session and handed to each subsystem by `&mut`.

use glam::Vec2;

use super::aliens::AlienSquad;
use super::clock::FrameClock;
use super::difficulty::DifficultyScaler;
use super::effects::Explosions;
use super::hazards::HazardField;
use super::pickups::PickupField;
use super::player::Player;
use super::powerups::{BeamSegment, Modifiers, PowerUpKind, PowerUpTimers, orbital_beam};
use super::projectiles::{Missile, Projectiles, TargetRef};
use super::rng::GameRng;
use super::run::{Lives, RunState};
use super::score::ScoreLedger;
use super::spawner::EntityIds;
use super::streaks::StreakField;
use crate::field_size;
use crate::tuning::EffectiveTuning;

/// Something that happened during a tick, for hosts that want to react
/// (sounds, haptics, logging)
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    CountdownFinished,
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    PlayerHit { lives: Lives },
    Phased { hazard: u32 },
    Destroyed { target: TargetRef, points: f64 },
    MissileDetonated { pos: Vec2 },
    GameOver { score: u64 },
}

/// Per-run counters shown in the summary
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Running (unpaused) seconds
    pub elapsed: f32,
    pub pickups_collected: u32,
    pub hits_taken: u32,
    pub missiles_launched: u32,
}

/// Sprite variant counts supplied by the asset manifest
#[derive(Debug, Clone, Copy)]
pub struct SpriteVariants {
    pub asteroid: usize,
    pub alien: usize,
}

impl Default for SpriteVariants {
    fn default() -> Self {
        Self {
            asteroid: 1,
            alien: 1,
        }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: GameRng,
    pub clock: FrameClock,
    pub field: Vec2,
    pub run: RunState,
    pub player: Player,
    pub difficulty: DifficultyScaler,
    pub hazards: HazardField,
    pub pickups: PickupField,
    pub aliens: AlienSquad,
    pub streaks: StreakField,
    pub projectiles: Projectiles,
    pub powerups: PowerUpTimers,
    pub ledger: ScoreLedger,
    pub explosions: Explosions,
    pub tuning: EffectiveTuning,
    pub ids: EntityIds,
    /// Seconds until the blaster may fire again
    pub fire_cooldown: f32,
    pub stats: RunStats,
    pub variants: SpriteVariants,
    events: Vec<SimEvent>,
}

impl SimulationState {
    pub fn new(seed: u64, tuning: EffectiveTuning) -> Self {
        let field = field_size();
        let mut rng = GameRng::new(seed);
        let hazards = HazardField::new(&mut rng);
        let pickups = PickupField::new(&mut rng);
        let aliens = AlienSquad::new(&mut rng);
        let streaks = StreakField::new(&mut rng);

        Self {
            seed,
            rng,
            clock: FrameClock::new(),
            field,
            run: RunState::new(),
            player: Player::new(field),
            difficulty: DifficultyScaler::default(),
            hazards,
            pickups,
            aliens,
            streaks,
            projectiles: Projectiles::default(),
            powerups: PowerUpTimers::new(),
            ledger: ScoreLedger::new(),
            explosions: Explosions::default(),
            tuning,
            ids: EntityIds::default(),
            fire_cooldown: 0.0,
            stats: RunStats::default(),
            variants: SpriteVariants::default(),
            events: Vec::new(),
        }
    }

    /// Clear every entity, timer and score. The RNG keeps its sequence so
    /// consecutive runs differ.
    pub fn reset_world(&mut self) {
        self.player.reset(self.field);
        self.difficulty = DifficultyScaler::default();
        self.hazards.clear(&mut self.rng);
        self.pickups.clear(&mut self.rng);
        self.aliens.clear(&mut self.rng);
        self.streaks.clear(&mut self.rng);
        self.projectiles.clear();
        self.powerups.clear();
        self.ledger = ScoreLedger::new();
        self.explosions.clear();
        self.fire_cooldown = 0.0;
        self.stats = RunStats::default();
        self.events.clear();
    }

    /// Reset the world and enter the countdown (or Running when `countdown`
    /// is not positive)
    pub fn start_run(&mut self, countdown: f32) {
        self.reset_world();
        self.run.start(countdown, self.tuning.infinite_lives);
        self.clock.request_reset();
        log::info!(
            "Run started (seed {}, countdown {:.1}s, lives {:?})",
            self.seed,
            countdown.max(0.0),
            self.run.lives
        );
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers::from_timers(&self.powerups, &self.tuning)
    }

    /// Current orbital laser beam, if one is lit
    pub fn beam(&self) -> Option<BeamSegment> {
        let timer = self.powerups.get(PowerUpKind::OrbitalLaser)?;
        orbital_beam(timer, self.player.pos)
    }

    /// Resolve a missile handle to the target's center
    pub fn target_point(&self, target: TargetRef) -> Option<Vec2> {
        match target {
            TargetRef::Hazard(id) => self.hazards.find(id).map(|h| h.bounds().center()),
            TargetRef::Alien(id) => self.aliens.find(id).map(|a| a.pos),
        }
    }

    /// Closest hazard or alien ahead of the player
    pub fn nearest_target(&self) -> Option<TargetRef> {
        let origin = self.player.pos;
        let hazards = self
            .hazards
            .hazards
            .iter()
            .filter(|h| h.pos.x > origin.x)
            .map(|h| (TargetRef::Hazard(h.id), h.pos.distance_squared(origin)));
        let aliens = self
            .aliens
            .aliens
            .iter()
            .filter(|a| a.pos.x > origin.x)
            .map(|a| (TargetRef::Alien(a.id), a.pos.distance_squared(origin)));

        hazards
            .chain(aliens)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(target, _)| target)
    }

    /// Launch one homing missile from the craft
    pub fn launch_missile(&mut self, target: TargetRef) {
        let id = self.ids.next();
        let missile = Missile::new(id, self.player.muzzle(), target);
        self.projectiles.missiles.push(missile);
        self.stats.missiles_launched += 1;
    }

    /// One missile per live hazard and alien
    pub fn launch_barrage(&mut self) {
        let targets: Vec<TargetRef> = self
            .hazards
            .hazards
            .iter()
            .map(|h| TargetRef::Hazard(h.id))
            .chain(self.aliens.aliens.iter().map(|a| TargetRef::Alien(a.id)))
            .collect();
        log::debug!("Missile barrage: {} targets", targets.len());
        for target in targets {
            self.launch_missile(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::run::RunPhase;

    #[test]
    fn test_start_run_resets_world() {
        let mut state = SimulationState::new(1, EffectiveTuning::default());
        state.ledger.add(500.0, crate::sim::ScoreCategory::Misc);
        state.powerups.activate(PowerUpKind::Cloak);
        state.start_run(3.0);
        assert_eq!(state.ledger.total, 0.0);
        assert!(!state.powerups.is_active(PowerUpKind::Cloak));
        assert_eq!(state.run.phase, RunPhase::Countdown);
        assert!(state.clock.reset_pending());
    }

    #[test]
    fn test_target_handles_resolve_and_lapse() {
        let mut state = SimulationState::new(2, EffectiveTuning::default());
        state.start_run(0.0);
        assert!(state.nearest_target().is_none());
        assert!(state.target_point(TargetRef::Hazard(99)).is_none());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = SimulationState::new(3, EffectiveTuning::default());
        state.emit(SimEvent::CountdownFinished);
        assert_eq!(state.drain_events(), vec![SimEvent::CountdownFinished]);
        assert!(state.drain_events().is_empty());
    }
}
