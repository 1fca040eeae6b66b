//! Shared spawn accumulator used by every entity manager

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// Shortest delay between two spawns of the same manager (seconds)
pub const MIN_SPAWN_INTERVAL: f32 = 0.15;

/// Apply a rate multiplier to a delay, flooring at `MIN_SPAWN_INTERVAL`.
/// Non-positive or non-finite rates count as 1.
pub fn effective_interval(base: f32, rate: f32) -> f32 {
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    (base / rate).max(MIN_SPAWN_INTERVAL)
}

/// Monotonic entity ID allocator shared by every manager
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl EntityIds {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Accumulator with a randomized delay and a live-count cap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub accumulator: f32,
    pub next_delay: f32,
    min_delay: f32,
    max_delay: f32,
    pub cap: usize,
}

impl SpawnTimer {
    /// Timer whose delay is drawn from `[min_delay, max_delay)` after each spawn
    pub fn new(min_delay: f32, max_delay: f32, cap: usize, rng: &mut impl RandomSource) -> Self {
        Self {
            accumulator: 0.0,
            next_delay: rng.range(min_delay, max_delay),
            min_delay,
            max_delay,
            cap,
        }
    }

    /// Timer whose delay is supplied by the caller on every tick
    pub fn external(cap: usize) -> Self {
        Self {
            accumulator: 0.0,
            next_delay: 0.0,
            min_delay: 0.0,
            max_delay: 0.0,
            cap,
        }
    }

    /// Clear progress and draw a fresh delay
    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        self.accumulator = 0.0;
        self.next_delay = rng.range(self.min_delay, self.max_delay);
    }

    /// Advance with the timer's own randomized delay. Returns true when one
    /// entity should spawn this tick.
    pub fn tick(
        &mut self,
        dt: f32,
        live: usize,
        rate: f32,
        rng: &mut impl RandomSource,
    ) -> bool {
        if self.tick_interval(dt, live, self.next_delay, rate) {
            self.next_delay = rng.range(self.min_delay, self.max_delay);
            true
        } else {
            false
        }
    }

    /// Advance against an explicit base delay
    pub fn tick_interval(&mut self, dt: f32, live: usize, base_delay: f32, rate: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator >= effective_interval(base_delay, rate) && live < self.cap {
            self.accumulator = 0.0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;

    #[test]
    fn test_rate_multiplier_halves_delay() {
        let mut timer = SpawnTimer::external(10);
        let spawned: Vec<bool> = (0..4)
            .map(|_| timer.tick_interval(0.25, 0, 2.0, 2.0))
            .collect();
        assert_eq!(spawned, [false, false, false, true]);
    }

    #[test]
    fn test_interval_floor() {
        assert_eq!(effective_interval(0.2, 10.0), MIN_SPAWN_INTERVAL);
        assert_eq!(effective_interval(3.0, 0.0), 3.0);
        assert_eq!(effective_interval(3.0, f32::NAN), 3.0);
        assert_eq!(effective_interval(3.0, -2.0), 3.0);
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let mut timer = SpawnTimer::external(2);
        assert!(!timer.tick_interval(5.0, 2, 1.0, 1.0));
        // Slot frees up: the stored progress spawns right away
        assert!(timer.tick_interval(0.0, 1, 1.0, 1.0));
    }

    #[test]
    fn test_randomized_delay_resamples() {
        let mut rng = ScriptedRandom::new(&[0.0, 0.5]);
        let mut timer = SpawnTimer::new(5.0, 8.0, 2, &mut rng);
        assert_eq!(timer.next_delay, 5.0);
        assert!(!timer.tick(4.0, 0, 1.0, &mut rng));
        assert!(timer.tick(1.0, 0, 1.0, &mut rng));
        assert_eq!(timer.next_delay, 6.5);
    }
}
