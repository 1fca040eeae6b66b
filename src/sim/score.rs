//! Score ledger with per-category buckets

use serde::{Deserialize, Serialize};

/// Points per second survived
pub const TIME_POINTS_PER_SECOND: f64 = 5.0;
/// Time points factor while any negative power-up is active
pub const NEGATIVE_TIME_BONUS: f64 = 2.0;
pub const ASTEROID_POINTS: f64 = 120.0;
pub const DEBRIS_POINTS: f64 = 80.0;
pub const ALIEN_POINTS: f64 = 160.0;
/// Awarded when the cloaked craft passes through a hazard
pub const PHASE_POINTS: f64 = 60.0;
/// Awarded when a negative power-up runs out
pub const NEGATIVE_SURVIVAL_POINTS: f64 = 200.0;

/// Bucket a score award is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    Time,
    Destroyed,
    Phased,
    Negative,
    Misc,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::Time,
        ScoreCategory::Destroyed,
        ScoreCategory::Phased,
        ScoreCategory::Negative,
        ScoreCategory::Misc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScoreCategory::Time => "time",
            ScoreCategory::Destroyed => "destroyed",
            ScoreCategory::Phased => "phased",
            ScoreCategory::Negative => "negative",
            ScoreCategory::Misc => "misc",
        }
    }

    /// Unknown names fall into `Misc`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.name() == name)
            .unwrap_or(ScoreCategory::Misc)
    }
}

/// Points per bucket, as shown on the game-over screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub time: f64,
    pub destroyed: f64,
    pub phased: f64,
    pub negative: f64,
    pub misc: f64,
}

impl ScoreBreakdown {
    fn bucket_mut(&mut self, category: ScoreCategory) -> &mut f64 {
        match category {
            ScoreCategory::Time => &mut self.time,
            ScoreCategory::Destroyed => &mut self.destroyed,
            ScoreCategory::Phased => &mut self.phased,
            ScoreCategory::Negative => &mut self.negative,
            ScoreCategory::Misc => &mut self.misc,
        }
    }
}

/// Running score for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLedger {
    pub total: f64,
    pub buckets: ScoreBreakdown,
    pub multiplier: f64,
    pub destroyed_count: u32,
    pub phased_count: u32,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self {
            total: 0.0,
            buckets: ScoreBreakdown::default(),
            multiplier: 1.0,
            destroyed_count: 0,
            phased_count: 0,
        }
    }
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `points × multiplier` to the total and the bucket.
    /// Returns the amount actually credited.
    pub fn add(&mut self, points: f64, category: ScoreCategory) -> f64 {
        if !points.is_finite() {
            return 0.0;
        }
        let credited = points * self.multiplier;
        self.total += credited;
        *self.buckets.bucket_mut(category) += credited;
        credited
    }

    /// `add` with a category given by name
    pub fn add_named(&mut self, points: f64, category: &str) -> f64 {
        self.add(points, ScoreCategory::from_name(category))
    }

    pub fn record_destroyed(&mut self, points: f64) -> f64 {
        self.destroyed_count += 1;
        self.add(points, ScoreCategory::Destroyed)
    }

    pub fn record_phased(&mut self) -> f64 {
        self.phased_count += 1;
        self.add(PHASE_POINTS, ScoreCategory::Phased)
    }

    /// Survival points for `dt` seconds
    pub fn add_time(&mut self, dt: f32, negative_active: bool) {
        let mut points = TIME_POINTS_PER_SECOND * f64::from(dt);
        if negative_active {
            points *= NEGATIVE_TIME_BONUS;
        }
        self.add(points, ScoreCategory::Time);
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        self.buckets
    }

    /// Whole-point score used for the leaderboard
    pub fn final_score(&self) -> u64 {
        self.total.max(0.0).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_applies_to_total_and_bucket() {
        let mut ledger = ScoreLedger::new();
        ledger.multiplier = 2.0;
        let credited = ledger.add(100.0, ScoreCategory::Destroyed);
        assert_eq!(credited, 200.0);
        assert_eq!(ledger.total, 200.0);
        assert_eq!(ledger.breakdown().destroyed, 200.0);
    }

    #[test]
    fn test_unknown_category_goes_to_misc() {
        let mut ledger = ScoreLedger::new();
        ledger.add_named(40.0, "bonus-round");
        ledger.add_named(10.0, "phased");
        assert_eq!(ledger.buckets.misc, 40.0);
        assert_eq!(ledger.buckets.phased, 10.0);
        assert_eq!(ledger.total, 50.0);
    }

    #[test]
    fn test_time_points_double_under_negative() {
        let mut ledger = ScoreLedger::new();
        ledger.add_time(1.0, false);
        ledger.add_time(1.0, true);
        assert_eq!(ledger.buckets.time, 15.0);
    }

    #[test]
    fn test_counters_and_final_score() {
        let mut ledger = ScoreLedger::new();
        ledger.record_destroyed(ASTEROID_POINTS);
        ledger.record_phased();
        ledger.add(0.7, ScoreCategory::Misc);
        assert_eq!(ledger.destroyed_count, 1);
        assert_eq!(ledger.phased_count, 1);
        assert_eq!(ledger.final_score(), 180);
    }
}
