//! Best-effort persistence for high scores and the last used name
//!
//! Every call here swallows backend failures: a broken store leaves the
//! in-memory defaults in place and logs a warning, it never reaches the
//! simulation.

pub mod store;

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStore;
pub use store::{KeyValueStore, MemoryStore};

use crate::highscores::{HighScoreEntry, HighScores};

/// Storage key for the leaderboard
pub const HIGH_SCORES_KEY: &str = "orbital_high_scores";
/// Storage key for the last name typed into the save prompt
pub const LAST_NAME_KEY: &str = "orbital_last_name";

/// Wraps a backend with the collaborator contract used by the session
#[derive(Debug, Clone, Default)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the leaderboard (empty on any failure)
    pub fn load_high_scores(&self) -> HighScores {
        let raw = match self.store.read(HIGH_SCORES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return HighScores::new();
            }
            Err(err) => {
                log::warn!("Could not read high scores: {err}");
                return HighScores::new();
            }
        };

        match serde_json::from_str::<Vec<HighScoreEntry>>(&raw) {
            Ok(entries) => {
                log::info!("Loaded {} high scores", entries.len());
                HighScores::from_entries(entries)
            }
            Err(err) => {
                log::warn!("Ignoring corrupt high score data: {err}");
                HighScores::new()
            }
        }
    }

    /// Save the leaderboard (failures are logged and ignored)
    pub fn save_high_scores(&mut self, scores: &HighScores) {
        let json = match serde_json::to_string(&scores.entries) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Could not encode high scores: {err}");
                return;
            }
        };
        match self.store.write(HIGH_SCORES_KEY, &json) {
            Ok(()) => log::info!("High scores saved ({} entries)", scores.entries.len()),
            Err(err) => log::warn!("Could not save high scores: {err}"),
        }
    }

    /// Load the last used name (empty on any failure)
    pub fn load_last_name(&self) -> String {
        match self.store.read(LAST_NAME_KEY) {
            Ok(name) => name.unwrap_or_default(),
            Err(err) => {
                log::warn!("Could not read last name: {err}");
                String::new()
            }
        }
    }

    pub fn save_last_name(&mut self, name: &str) {
        if let Err(err) = self.store.write(LAST_NAME_KEY, name) {
            log::warn!("Could not save last name: {err}");
        }
    }
}
