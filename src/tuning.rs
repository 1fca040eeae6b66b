//! Balance overrides for testing and accessibility
//!
//! Loaded from JSON; every multiplier is clamped into a safe range before the
//! simulation sees it. Out-of-range values are corrected, never rejected.

use serde::{Deserialize, Deserializer, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::PowerUpKind;

/// Lowest multiplier the simulation will accept
pub const MIN_MULTIPLIER: f32 = 0.1;
/// Highest multiplier the simulation will accept
pub const MAX_MULTIPLIER: f32 = 5.0;

/// Raw tuning options as supplied by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    /// Master switch; when false every option below is ignored
    pub enabled: bool,
    /// Restrict pickups to these kinds (None = all kinds). Unknown names are
    /// dropped with a warning.
    #[serde(deserialize_with = "lenient_kinds")]
    pub allowed_powerup_kinds: Option<Vec<PowerUpKind>>,
    /// Hits never cost a life
    pub infinite_lives: bool,
    pub asteroid_speed_multiplier: f32,
    pub asteroid_size_multiplier: f32,
    pub asteroid_spawn_rate_multiplier: f32,
    pub power_up_spawn_rate_multiplier: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_powerup_kinds: None,
            infinite_lives: false,
            asteroid_speed_multiplier: 1.0,
            asteroid_size_multiplier: 1.0,
            asteroid_spawn_rate_multiplier: 1.0,
            power_up_spawn_rate_multiplier: 1.0,
        }
    }
}

/// Clamped values the simulation actually consumes
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveTuning {
    pub allowed_powerup_kinds: Vec<PowerUpKind>,
    pub infinite_lives: bool,
    pub asteroid_speed_multiplier: f32,
    pub asteroid_size_multiplier: f32,
    pub asteroid_spawn_rate_multiplier: f32,
    pub power_up_spawn_rate_multiplier: f32,
}

impl Default for EffectiveTuning {
    fn default() -> Self {
        Tuning::default().effective()
    }
}

/// Read a kind list, skipping entries that do not name a known kind
fn lenient_kinds<'de, D>(deserializer: D) -> Result<Option<Vec<PowerUpKind>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Vec<serde_json::Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let kinds = raw
        .into_iter()
        .filter_map(|value| {
            let kind = value.as_str().and_then(PowerUpKind::from_name);
            if kind.is_none() {
                log::warn!("Ignoring unknown power-up kind {value} in tuning");
            }
            kind
        })
        .collect();
    Ok(Some(kinds))
}

/// Clamp a multiplier into the safe range (non-finite values become 1.0)
pub fn clamp_multiplier(name: &str, value: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("Tuning {name} is not a number, using 1.0");
        return 1.0;
    }
    let clamped = value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER);
    if clamped != value {
        log::warn!("Tuning {name} = {value} clamped to {clamped}");
    }
    clamped
}

impl Tuning {
    /// Storage key
    const STORAGE_KEY: &'static str = "orbital_tuning";

    /// Parse tuning JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed tuning config: {err}");
                Self::default()
            }
        }
    }

    /// Resolve into clamped values; disabled tuning is neutral
    pub fn effective(&self) -> EffectiveTuning {
        if !self.enabled {
            return EffectiveTuning {
                allowed_powerup_kinds: PowerUpKind::ALL.to_vec(),
                infinite_lives: false,
                asteroid_speed_multiplier: 1.0,
                asteroid_size_multiplier: 1.0,
                asteroid_spawn_rate_multiplier: 1.0,
                power_up_spawn_rate_multiplier: 1.0,
            };
        }

        let allowed_powerup_kinds = match &self.allowed_powerup_kinds {
            Some(kinds) => {
                let mut kinds = kinds.clone();
                kinds.sort();
                kinds.dedup();
                kinds
            }
            None => PowerUpKind::ALL.to_vec(),
        };

        EffectiveTuning {
            allowed_powerup_kinds,
            infinite_lives: self.infinite_lives,
            asteroid_speed_multiplier: clamp_multiplier(
                "asteroidSpeedMultiplier",
                self.asteroid_speed_multiplier,
            ),
            asteroid_size_multiplier: clamp_multiplier(
                "asteroidSizeMultiplier",
                self.asteroid_size_multiplier,
            ),
            asteroid_spawn_rate_multiplier: clamp_multiplier(
                "asteroidSpawnRateMultiplier",
                self.asteroid_spawn_rate_multiplier,
            ),
            power_up_spawn_rate_multiplier: clamp_multiplier(
                "powerUpSpawnRateMultiplier",
                self.power_up_spawn_rate_multiplier,
            ),
        }
    }

    /// Load tuning from a store (defaults when absent or unreadable)
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded tuning overrides");
                Self::from_json(&json)
            }
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("Could not read tuning: {err}");
                Self::default()
            }
        }
    }

    /// Save tuning to a store (failures are logged and ignored)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(err) = store.write(Self::STORAGE_KEY, &json) {
                    log::warn!("Could not save tuning: {err}");
                }
            }
            Err(err) => log::warn!("Could not encode tuning: {err}"),
        }
    }
}
