//! Host-facing session
//!
//! Wraps one `SimulationState` with everything outside the tick: decoded
//! intents, the asset manifest, and the leaderboard. A host calls `frame`
//! (or `tick`) once per display frame and reads back a `RenderSnapshot`.

use crate::assets::AssetManifest;
use crate::error::StartupError;
use crate::highscores::HighScores;
use crate::persistence::{KeyValueStore, MemoryStore, Persistence};
use crate::sim::{
    MovementIntent, RenderSnapshot, RunPhase, RunSummary, SimEvent, SimulationState, TickInput,
};
use crate::tuning::Tuning;

pub struct Session<S: KeyValueStore = MemoryStore> {
    state: SimulationState,
    assets: Option<AssetManifest>,
    persistence: Persistence<S>,
    high_scores: HighScores,
    last_name: String,
    /// Intents latched since the last tick
    input: TickInput,
    /// Set once the current run's score has been submitted
    score_saved: bool,
}

impl Session<MemoryStore> {
    /// Session with throwaway storage
    pub fn in_memory(seed: u64, tuning: &Tuning) -> Self {
        Self::new(seed, tuning, MemoryStore::new())
    }
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(seed: u64, tuning: &Tuning, store: S) -> Self {
        let persistence = Persistence::new(store);
        let high_scores = persistence.load_high_scores();
        let last_name = persistence.load_last_name();
        Self {
            state: SimulationState::new(seed, tuning.effective()),
            assets: None,
            persistence,
            high_scores,
            last_name,
            input: TickInput::default(),
            score_saved: false,
        }
    }

    /// Provide drawable handles; required before the first run
    pub fn attach_assets(&mut self, manifest: AssetManifest) {
        self.state.variants.asteroid = manifest
            .variant_count(crate::assets::DrawableKind::Asteroid)
            .max(1);
        self.state.variants.alien = manifest
            .variant_count(crate::assets::DrawableKind::Alien)
            .max(1);
        self.assets = Some(manifest);
    }

    /// Reset the world and begin a countdown. Fails without a complete
    /// asset manifest; the previous state is left untouched.
    pub fn start_run(&mut self, countdown: f32) -> Result<(), StartupError> {
        let manifest = self.assets.as_ref().ok_or(StartupError::AssetsNotAttached)?;
        manifest.validate()?;
        self.input = TickInput::default();
        self.score_saved = false;
        self.state.start_run(countdown);
        Ok(())
    }

    pub fn skip_countdown(&mut self) {
        if self.state.run.skip_countdown() {
            self.state.clock.request_reset();
            log::info!("Countdown skipped");
        }
    }

    pub fn pause(&mut self) {
        if self.state.run.pause() {
            log::debug!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.run.resume() {
            self.state.clock.request_reset();
            log::debug!("Resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.run.phase {
            RunPhase::Running => self.pause(),
            RunPhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn jump(&mut self) {
        self.input.jump = true;
    }

    pub fn fire(&mut self) {
        self.input.fire = true;
    }

    pub fn set_movement(&mut self, movement: MovementIntent) {
        self.input.movement = movement;
    }

    /// Advance by a raw elapsed sample in seconds; returns this tick's events
    pub fn tick(&mut self, elapsed_seconds: f32) -> Vec<SimEvent> {
        crate::sim::tick(&mut self.state, &self.input, elapsed_seconds);
        self.input.jump = false;
        self.input.fire = false;
        self.state.drain_events()
    }

    /// Advance using a host timestamp in milliseconds
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<SimEvent> {
        let raw = self.state.clock.delta_from_timestamp(timestamp_ms);
        self.tick(raw)
    }

    /// Current frame with asset handles resolved
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut snapshot = self.state.snapshot();
        if let Some(manifest) = &self.assets {
            snapshot.player.handle = manifest.handle(snapshot.player.kind, 0);
            for sprite in &mut snapshot.entities {
                sprite.handle = match sprite.icon {
                    Some(kind) => manifest
                        .icon(kind)
                        .or_else(|| manifest.handle(sprite.kind, sprite.variant)),
                    None => manifest.handle(sprite.kind, sprite.variant),
                };
            }
        }
        snapshot
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.state.summary()
    }

    pub fn phase(&self) -> RunPhase {
        self.state.run.phase
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Name to prefill the save prompt with
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Whether the finished run may still be saved and would place
    pub fn can_save_high_score(&self) -> bool {
        !self.score_saved
            && self
                .state
                .summary()
                .is_some_and(|summary| self.high_scores.qualifies(summary.score))
    }

    /// Record the finished run under `name`. Allowed once per run after game
    /// over. Returns the rank achieved.
    pub fn save_high_score(&mut self, name: &str, when: &str) -> Option<usize> {
        if self.score_saved {
            return None;
        }
        let summary = self.state.summary()?;
        let cleaned = HighScores::clean_name(name)?;
        if !self.high_scores.qualifies(summary.score) {
            log::info!("Score {} does not qualify for the board", summary.score);
            return None;
        }

        self.score_saved = true;
        let rank = self.high_scores.submit(&cleaned, summary.score, when);
        self.persistence.save_high_scores(&self.high_scores);
        self.persistence.save_last_name(&cleaned);
        self.last_name = cleaned;

        match rank {
            Some(rank) => log::info!("Saved score {} at rank {rank}", summary.score),
            None => log::info!("Score {} did not make the board", summary.score),
        }
        rank
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetHandle, DrawableKind};
    use crate::sim::{Lives, PowerUpKind};

    fn manifest() -> AssetManifest {
        AssetManifest::new()
            .with(DrawableKind::Player, AssetHandle(1))
            .with(DrawableKind::Asteroid, AssetHandle(2))
            .with(DrawableKind::Asteroid, AssetHandle(3))
            .with(DrawableKind::Alien, AssetHandle(4))
            .with(DrawableKind::PowerUp, AssetHandle(5))
            .with_icon(PowerUpKind::Cloak, AssetHandle(6))
    }

    fn started() -> Session {
        let mut session = Session::in_memory(5, &Tuning::default());
        session.attach_assets(manifest());
        session.start_run(0.0).expect("assets attached");
        session
    }

    fn end_run(session: &mut Session) {
        session.state.run.lives = Lives::Finite(1);
        crate::sim::collision::damage_player(&mut session.state);
        assert_eq!(session.phase(), RunPhase::GameOver);
    }

    #[test]
    fn test_start_requires_assets() {
        let mut session = Session::in_memory(1, &Tuning::default());
        assert_eq!(session.start_run(3.0), Err(StartupError::AssetsNotAttached));
        assert_eq!(session.phase(), RunPhase::Idle);

        session.attach_assets(AssetManifest::new().with(DrawableKind::Player, AssetHandle(1)));
        assert!(matches!(
            session.start_run(3.0),
            Err(StartupError::MissingDrawable(_))
        ));
        assert_eq!(session.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_skip_countdown() {
        let mut session = Session::in_memory(1, &Tuning::default());
        session.attach_assets(manifest());
        session.start_run(5.0).expect("assets attached");
        assert_eq!(session.phase(), RunPhase::Countdown);
        session.skip_countdown();
        assert_eq!(session.phase(), RunPhase::Running);
        assert!(session.state().clock.reset_pending());
    }

    #[test]
    fn test_toggle_pause_and_resume_resets_clock() {
        let mut session = started();
        session.tick(0.0);
        session.toggle_pause();
        assert_eq!(session.phase(), RunPhase::Paused);
        session.toggle_pause();
        assert_eq!(session.phase(), RunPhase::Running);
        let events = session.frame(1000.0);
        assert!(events.is_empty());
        assert_eq!(session.state().stats.elapsed, 0.0);
    }

    #[test]
    fn test_intents_are_latched_for_one_tick() {
        let mut session = started();
        session.tick(0.0);
        session.jump();
        session.tick(0.016);
        assert!(session.state().player.vel.y < 0.0);
        assert!(!session.input.jump);
    }

    #[test]
    fn test_snapshot_resolves_handles() {
        let mut session = started();
        session.state.powerups.activate(PowerUpKind::Cloak);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.player.handle, Some(AssetHandle(1)));
    }

    #[test]
    fn test_save_high_score_once_per_run() {
        let mut session = started();
        session.state.ledger.add(1234.0, crate::sim::ScoreCategory::Misc);
        assert_eq!(session.save_high_score("Ace", "now"), None);

        end_run(&mut session);
        assert!(session.can_save_high_score());
        assert_eq!(session.save_high_score("  Ace  ", "now"), Some(1));
        assert_eq!(session.last_name(), "Ace");
        assert_eq!(session.save_high_score("Ace", "again"), None);
        assert_eq!(session.high_scores().entries.len(), 1);
        assert!(!session.can_save_high_score());

        // Next run may save again; a zero score never qualifies
        session.start_run(0.0).expect("assets attached");
        end_run(&mut session);
        assert_eq!(session.save_high_score("Bee", "later"), None);
        session.state.ledger.add(100.0, crate::sim::ScoreCategory::Misc);
        assert_eq!(session.save_high_score("Bee", "later"), Some(2));
    }

    #[test]
    fn test_scores_persist_across_sessions() {
        let mut first = started();
        first.state.ledger.add(500.0, crate::sim::ScoreCategory::Misc);
        end_run(&mut first);
        first.save_high_score("Orion", "t");

        let store = first.store().clone();
        let second = Session::new(9, &Tuning::default(), store);
        assert_eq!(second.high_scores().top_score(), Some(500));
        assert_eq!(second.last_name(), "Orion");
    }
}
