//! Run lifecycle and damage handling
//!
//! `register_hit` is the only way the player loses a life. It is a no-op
//! during invulnerability and after game over, so overlapping damage sources
//! in one tick can never cost more than one life or end the run twice.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Nothing started yet
    Idle,
    /// Visible countdown before play
    Countdown,
    /// Active gameplay
    Running,
    /// Gameplay frozen by the player
    Paused,
    /// Run ended, summary available
    GameOver,
}

/// Remaining lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lives {
    Finite(u8),
    Infinite,
}

impl Lives {
    pub fn count(self) -> Option<u8> {
        match self {
            Lives::Finite(n) => Some(n),
            Lives::Infinite => None,
        }
    }
}

/// Craft condition shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageTier {
    Nominal,
    Damaged,
    Critical,
}

/// Result of a damage event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable or already over
    Ignored,
    Damaged { lives: Lives },
    GameOver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub lives: Lives,
    pub invulnerability: f32,
    pub hit_pause: f32,
    pub hit_flash: f32,
    pub countdown: f32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            lives: Lives::Finite(STARTING_LIVES),
            invulnerability: 0.0,
            hit_pause: 0.0,
            hit_flash: 0.0,
            countdown: 0.0,
        }
    }
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh run (from any phase). A non-positive countdown goes
    /// straight to Running.
    pub fn start(&mut self, countdown: f32, infinite_lives: bool) {
        *self = Self {
            lives: if infinite_lives {
                Lives::Infinite
            } else {
                Lives::Finite(STARTING_LIVES)
            },
            ..Self::default()
        };
        if countdown.is_finite() && countdown > 0.0 {
            self.phase = RunPhase::Countdown;
            self.countdown = countdown;
        } else {
            self.phase = RunPhase::Running;
        }
    }

    /// Jump straight to Running. Returns true if the phase changed.
    pub fn skip_countdown(&mut self) -> bool {
        if self.phase != RunPhase::Countdown {
            return false;
        }
        self.countdown = 0.0;
        self.phase = RunPhase::Running;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != RunPhase::Running {
            return false;
        }
        self.phase = RunPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != RunPhase::Paused {
            return false;
        }
        self.phase = RunPhase::Running;
        true
    }

    /// Tick the countdown. Returns true on the tick it reaches zero.
    pub fn advance_countdown(&mut self, dt: f32) -> bool {
        if self.phase != RunPhase::Countdown {
            return false;
        }
        self.countdown = (self.countdown - dt).max(0.0);
        if self.countdown <= 0.0 {
            self.phase = RunPhase::Running;
            return true;
        }
        false
    }

    /// Count damage windows down
    pub fn decay(&mut self, dt: f32) {
        self.invulnerability = (self.invulnerability - dt).max(0.0);
        self.hit_pause = (self.hit_pause - dt).max(0.0);
        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }

    pub fn in_hit_pause(&self) -> bool {
        self.hit_pause > 0.0
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::GameOver
    }

    /// Apply one damage event
    pub fn register_hit(&mut self) -> HitOutcome {
        if self.is_over() || self.is_invulnerable() {
            return HitOutcome::Ignored;
        }

        if let Lives::Finite(n) = self.lives {
            self.lives = Lives::Finite(n.saturating_sub(1));
        }
        self.invulnerability = INVULNERABILITY_SECONDS;
        self.hit_pause = HIT_PAUSE_SECONDS;
        self.hit_flash = HIT_FLASH_SECONDS;

        if self.lives == Lives::Finite(0) {
            self.phase = RunPhase::GameOver;
            self.hit_pause = 0.0;
            return HitOutcome::GameOver;
        }
        HitOutcome::Damaged { lives: self.lives }
    }

    /// Grant a life (capped). Returns false if already at the cap.
    pub fn add_life(&mut self) -> bool {
        match self.lives {
            Lives::Finite(n) if n < MAX_LIVES => {
                self.lives = Lives::Finite(n + 1);
                true
            }
            _ => false,
        }
    }

    pub fn damage_tier(&self) -> DamageTier {
        match self.lives {
            Lives::Infinite => DamageTier::Nominal,
            Lives::Finite(n) if n >= 3 => DamageTier::Nominal,
            Lives::Finite(2) => DamageTier::Damaged,
            Lives::Finite(_) => DamageTier::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> RunState {
        let mut run = RunState::new();
        run.start(0.0, false);
        run
    }

    #[test]
    fn test_hit_costs_one_life() {
        let mut run = running();
        let outcome = run.register_hit();
        assert_eq!(outcome, HitOutcome::Damaged { lives: Lives::Finite(2) });
        assert!(run.invulnerability > 0.0);
        assert_eq!(run.damage_tier(), DamageTier::Damaged);
    }

    #[test]
    fn test_second_hit_inside_window_is_ignored() {
        let mut run = running();
        run.register_hit();
        run.decay(0.5);
        assert_eq!(run.register_hit(), HitOutcome::Ignored);
        assert_eq!(run.lives, Lives::Finite(2));

        run.decay(1.0);
        assert_eq!(run.register_hit(), HitOutcome::Damaged { lives: Lives::Finite(1) });
    }

    #[test]
    fn test_last_life_ends_run_once() {
        let mut run = running();
        run.lives = Lives::Finite(1);
        assert_eq!(run.register_hit(), HitOutcome::GameOver);
        assert_eq!(run.phase, RunPhase::GameOver);
        assert_eq!(run.lives, Lives::Finite(0));

        run.invulnerability = 0.0;
        assert_eq!(run.register_hit(), HitOutcome::Ignored);
        assert_eq!(run.lives, Lives::Finite(0));
    }

    #[test]
    fn test_infinite_lives_never_end() {
        let mut run = RunState::new();
        run.start(0.0, true);
        for _ in 0..10 {
            run.register_hit();
            run.decay(2.0);
        }
        assert_eq!(run.phase, RunPhase::Running);
        assert_eq!(run.damage_tier(), DamageTier::Nominal);
    }

    #[test]
    fn test_countdown_then_pause_cycle() {
        let mut run = RunState::new();
        run.start(1.0, false);
        assert_eq!(run.phase, RunPhase::Countdown);
        assert!(!run.pause());
        assert!(!run.advance_countdown(0.6));
        assert!(run.advance_countdown(0.6));
        assert_eq!(run.phase, RunPhase::Running);
        assert!(run.pause());
        assert!(run.resume());
        assert!(!run.resume());
    }

    #[test]
    fn test_extra_life_capped() {
        let mut run = running();
        assert!(run.add_life());
        assert!(run.add_life());
        assert!(!run.add_life());
        assert_eq!(run.lives, Lives::Finite(MAX_LIVES));
    }
}
