//! High score leaderboard
//!
//! Tracks the top 10 named scores. Storage lives in `persistence`.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest name accepted on the leaderboard (characters)
pub const MAX_NAME_CHARS: usize = 18;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's chosen name
    pub name: String,
    /// Final score (floored)
    pub score: u64,
    /// Host-formatted time the score was set
    pub when: String,
}

/// High score leaderboard, sorted best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a leaderboard from stored entries, restoring order and size
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.sort_by(Self::ordering);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    fn ordering(a: &HighScoreEntry, b: &HighScoreEntry) -> std::cmp::Ordering {
        b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
    }

    /// Normalize a typed name (trimmed, length-capped); None if empty
    pub fn clean_name(name: &str) -> Option<String> {
        let trimmed: String = name.trim().chars().take(MAX_NAME_CHARS).collect();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a named score, keeping the board sorted and trimmed.
    /// Returns the rank achieved (1-indexed) or None if it was rejected or fell off.
    pub fn submit(&mut self, name: &str, score: u64, when: &str) -> Option<usize> {
        let name = Self::clean_name(name)?;
        let entry = HighScoreEntry {
            name,
            score,
            when: when.to_string(),
        };

        self.entries.push(entry.clone());
        self.entries.sort_by(Self::ordering);
        self.entries.truncate(MAX_HIGH_SCORES);

        self.entries.iter().position(|e| *e == entry).map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}
