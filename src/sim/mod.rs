//! Orbital Dash simulation core
//!
//! `tick` advances one `SimulationState` per host frame. A run is reproducible
//! from its seed and the sequence of intents and elapsed samples it receives;
//! entity lists keep spawn order and ids come from a single counter. Drawing
//! reads the state through `RenderSnapshot` only.

pub mod aliens;
pub mod bounds;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod hazards;
pub mod pickups;
pub mod player;
pub mod powerups;
pub mod projectiles;
pub mod rng;
pub mod run;
pub mod score;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod streaks;
pub mod tick;

pub use bounds::{Aabb, point_segment_distance};
pub use clock::{FrameClock, clamp_frame_delta};
pub use difficulty::DifficultyScaler;
pub use player::{MovementIntent, Player};
pub use powerups::{EffectCategory, Modifiers, PowerUpKind, PowerUpTimer, PowerUpTimers};
pub use rng::{GameRng, RandomSource};
pub use run::{DamageTier, HitOutcome, Lives, RunPhase, RunState};
pub use score::{ScoreBreakdown, ScoreCategory, ScoreLedger};
pub use snapshot::{PowerUpMeter, RenderSnapshot, RunSummary, SpriteInstance};
pub use spawner::{SpawnTimer, effective_interval};
pub use state::{SimEvent, SimulationState};
pub use tick::{TickInput, tick};
