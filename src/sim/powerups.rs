//! Power-up kinds, timers and the modifiers they produce
//!
//! Every timed kind owns at most one `PowerUpTimer`. Picking a kind up again
//! refreshes it. Timers only ever count down, clamp at zero and report the
//! >0 to 0 transition exactly once as an expiry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::tuning::EffectiveTuning;

/// Hazard speed factor while Slow is active
pub const SLOW_SPEED_SCALE: f32 = 0.55;
/// Hazard speed factor while Black Hole is active
pub const BLACK_HOLE_SPEED_SCALE: f32 = 1.35;
/// Hazard size factor while Solar Flare is active
pub const SOLAR_FLARE_SIZE_SCALE: f32 = 1.3;
/// Score factor while Multiplier is active
pub const MULTIPLIER_SCORE_SCALE: f64 = 2.0;

/// Seeker missiles fired over one activation
pub const SEEKER_SHOT_COUNT: u32 = 6;

/// Orbital beam geometry
pub const BEAM_LENGTH: f32 = 900.0;
pub const BEAM_THICKNESS: f32 = 10.0;
pub const BEAM_WINDOWS: u32 = 3;
/// Fraction of each window during which the beam is lit
pub const BEAM_ACTIVE_FRACTION: f32 = 0.6;
pub const BEAM_SWEEP_START_DEG: f32 = -50.0;
pub const BEAM_SWEEP_END_DEG: f32 = 50.0;
/// Most entities of one category the beam may destroy in a single tick
pub const BEAM_MAX_KILLS_PER_TICK: usize = 3;

/// Hazard oscillation while Wave is active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSettings {
    pub amplitude: f32,
    pub speed: f32,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            amplitude: 42.0,
            speed: 2.6,
        }
    }
}

/// Every kind of collectible power-up
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    ExtraLife,
    Cloak,
    Blaster,
    Slow,
    Multiplier,
    SeekerMissiles,
    MissileBarrage,
    OrbitalLaser,
    BlackHole,
    SolarFlare,
    Wave,
    AsteroidSplitter,
    SpaceDust,
}

/// What a power-up does while it is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCategory {
    OneShot,
    Capability,
    SpeedModifying,
    SizeModifying,
    ScoreModifying,
    HazardInjecting,
    OffenseGranting,
}

impl PowerUpKind {
    pub const COUNT: usize = 13;

    pub const ALL: [PowerUpKind; Self::COUNT] = [
        PowerUpKind::ExtraLife,
        PowerUpKind::Cloak,
        PowerUpKind::Blaster,
        PowerUpKind::Slow,
        PowerUpKind::Multiplier,
        PowerUpKind::SeekerMissiles,
        PowerUpKind::MissileBarrage,
        PowerUpKind::OrbitalLaser,
        PowerUpKind::BlackHole,
        PowerUpKind::SolarFlare,
        PowerUpKind::Wave,
        PowerUpKind::AsteroidSplitter,
        PowerUpKind::SpaceDust,
    ];

    /// Slot in per-kind tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Active duration in seconds; None for one-shot kinds
    pub fn duration(self) -> Option<f32> {
        match self {
            PowerUpKind::ExtraLife => None,
            PowerUpKind::Cloak => Some(6.0),
            PowerUpKind::Blaster => Some(9.0),
            PowerUpKind::Slow => Some(7.0),
            PowerUpKind::Multiplier => Some(10.0),
            PowerUpKind::SeekerMissiles => Some(6.0),
            PowerUpKind::MissileBarrage => Some(5.0),
            PowerUpKind::OrbitalLaser => Some(6.0),
            PowerUpKind::BlackHole => Some(7.0),
            PowerUpKind::SolarFlare => Some(7.0),
            PowerUpKind::Wave => Some(8.0),
            PowerUpKind::AsteroidSplitter => Some(8.0),
            PowerUpKind::SpaceDust => Some(8.0),
        }
    }

    pub fn category(self) -> EffectCategory {
        match self {
            PowerUpKind::ExtraLife => EffectCategory::OneShot,
            PowerUpKind::Cloak | PowerUpKind::Blaster => EffectCategory::Capability,
            PowerUpKind::Slow | PowerUpKind::BlackHole => EffectCategory::SpeedModifying,
            PowerUpKind::SolarFlare => EffectCategory::SizeModifying,
            PowerUpKind::Multiplier => EffectCategory::ScoreModifying,
            PowerUpKind::Wave | PowerUpKind::AsteroidSplitter | PowerUpKind::SpaceDust => {
                EffectCategory::HazardInjecting
            }
            PowerUpKind::SeekerMissiles
            | PowerUpKind::MissileBarrage
            | PowerUpKind::OrbitalLaser => EffectCategory::OffenseGranting,
        }
    }

    /// Negative kinds hurt the player but pay out when they expire
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            PowerUpKind::BlackHole
                | PowerUpKind::SolarFlare
                | PowerUpKind::Wave
                | PowerUpKind::AsteroidSplitter
                | PowerUpKind::SpaceDust
        )
    }

    /// Stable external name (matches the serialized form)
    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::ExtraLife => "extraLife",
            PowerUpKind::Cloak => "cloak",
            PowerUpKind::Blaster => "blaster",
            PowerUpKind::Slow => "slow",
            PowerUpKind::Multiplier => "multiplier",
            PowerUpKind::SeekerMissiles => "seekerMissiles",
            PowerUpKind::MissileBarrage => "missileBarrage",
            PowerUpKind::OrbitalLaser => "orbitalLaser",
            PowerUpKind::BlackHole => "blackHole",
            PowerUpKind::SolarFlare => "solarFlare",
            PowerUpKind::Wave => "wave",
            PowerUpKind::AsteroidSplitter => "asteroidSplitter",
            PowerUpKind::SpaceDust => "spaceDust",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Relative spawn weight. Positive and negative kinds each make up half.
    pub fn weight(self) -> f32 {
        match self {
            PowerUpKind::ExtraLife => 0.12,
            PowerUpKind::Cloak => 0.09,
            PowerUpKind::Blaster => 0.08,
            PowerUpKind::Slow => 0.06,
            PowerUpKind::Multiplier => 0.05,
            PowerUpKind::SeekerMissiles => 0.04,
            PowerUpKind::MissileBarrage => 0.03,
            PowerUpKind::OrbitalLaser => 0.03,
            PowerUpKind::BlackHole => 0.14,
            PowerUpKind::SolarFlare => 0.10,
            PowerUpKind::Wave => 0.10,
            PowerUpKind::AsteroidSplitter => 0.08,
            PowerUpKind::SpaceDust => 0.08,
        }
    }

    /// Weighted pick among the allowed kinds; None if nothing is allowed
    pub fn roll(rng: &mut impl RandomSource, allowed: &[PowerUpKind]) -> Option<Self> {
        let total: f32 = allowed.iter().map(|kind| kind.weight()).sum();
        if allowed.is_empty() || total <= 0.0 {
            return None;
        }
        let mut pick = rng.unit() * total;
        for &kind in allowed {
            pick -= kind.weight();
            if pick < 0.0 {
                return Some(kind);
            }
        }
        allowed.last().copied()
    }
}

/// Countdown for one active kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTimer {
    pub remaining: f32,
    pub total: f32,
}

impl PowerUpTimer {
    pub fn new(total: f32) -> Self {
        Self {
            remaining: total,
            total,
        }
    }

    /// Fraction of the duration left, in [0, 1]
    pub fn ratio(&self) -> f32 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.total).clamp(0.0, 1.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.total - self.remaining
    }
}

/// Shot cadence for seeker missiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeekerVolley {
    pub shots_remaining: u32,
    pub cooldown: f32,
    pub interval: f32,
}

impl SeekerVolley {
    fn arm(duration: f32) -> Self {
        Self {
            shots_remaining: SEEKER_SHOT_COUNT,
            cooldown: 0.0,
            interval: duration / SEEKER_SHOT_COUNT as f32,
        }
    }

    /// Advance the cooldown. Returns true when a missile should launch.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.shots_remaining == 0 {
            return false;
        }
        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            self.shots_remaining -= 1;
            self.cooldown += self.interval;
            return true;
        }
        false
    }
}

/// One lit beam segment of the orbital laser
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
}

/// Beam for the current point of an orbital-laser activation, if lit
pub fn orbital_beam(timer: &PowerUpTimer, origin: Vec2) -> Option<BeamSegment> {
    if timer.total <= 0.0 || timer.remaining <= 0.0 {
        return None;
    }
    let window = timer.total / BEAM_WINDOWS as f32;
    let elapsed = timer.elapsed().max(0.0);
    let index = ((elapsed / window).floor() as u32).min(BEAM_WINDOWS - 1);
    let local = (elapsed - index as f32 * window) / window;
    if local >= BEAM_ACTIVE_FRACTION {
        return None;
    }

    let sweep = local / BEAM_ACTIVE_FRACTION;
    let angle = crate::lerp(BEAM_SWEEP_START_DEG, BEAM_SWEEP_END_DEG, sweep).to_radians();
    let dir = Vec2::new(angle.cos(), angle.sin());
    Some(BeamSegment {
        start: origin,
        end: origin + dir * BEAM_LENGTH,
        thickness: BEAM_THICKNESS,
    })
}

/// Per-kind timer table plus uptime statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpTimers {
    slots: [Option<PowerUpTimer>; PowerUpKind::COUNT],
    uptime: [f32; PowerUpKind::COUNT],
    pub seeker: SeekerVolley,
}

impl Default for PowerUpTimers {
    fn default() -> Self {
        Self {
            slots: [None; PowerUpKind::COUNT],
            uptime: [0.0; PowerUpKind::COUNT],
            seeker: SeekerVolley::default(),
        }
    }
}

impl PowerUpTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start or refresh a timed kind. One-shot kinds are ignored here.
    pub fn activate(&mut self, kind: PowerUpKind) {
        let Some(duration) = kind.duration() else {
            return;
        };
        self.slots[kind.index()] = Some(PowerUpTimer::new(duration));
        if kind == PowerUpKind::SeekerMissiles {
            self.seeker = SeekerVolley::arm(duration);
        }
    }

    /// Count every active timer down by `dt`, returning kinds that expired
    /// on this call (in kind order)
    pub fn decay(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        if dt <= 0.0 {
            return expired;
        }
        for kind in PowerUpKind::ALL {
            let slot = &mut self.slots[kind.index()];
            let Some(timer) = slot else {
                continue;
            };
            let consumed = dt.min(timer.remaining);
            timer.remaining = (timer.remaining - dt).max(0.0);
            self.uptime[kind.index()] += consumed;
            if timer.remaining <= 0.0 {
                *slot = None;
                expired.push(kind);
            }
        }
        if !self.is_active(PowerUpKind::SeekerMissiles) {
            self.seeker = SeekerVolley::default();
        }
        expired
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&PowerUpTimer> {
        self.slots[kind.index()].as_ref()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// remaining / total for the kind, 0 when inactive
    pub fn ratio(&self, kind: PowerUpKind) -> f32 {
        self.get(kind).map_or(0.0, PowerUpTimer::ratio)
    }

    pub fn any_negative_active(&self) -> bool {
        PowerUpKind::ALL
            .into_iter()
            .any(|kind| kind.is_negative() && self.is_active(kind))
    }

    /// Active kinds with their ratios, in kind order
    pub fn active(&self) -> Vec<(PowerUpKind, f32)> {
        PowerUpKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|timer| (kind, timer.ratio())))
            .collect()
    }

    /// Seconds each kind has been active this run
    pub fn uptime(&self, kind: PowerUpKind) -> f32 {
        self.uptime[kind.index()]
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Combined effect of every active power-up and the tuning overrides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub hazard_speed_scale: f32,
    pub hazard_size_scale: f32,
    pub can_fire: bool,
    pub cloaked: bool,
    pub wave: Option<WaveSettings>,
    pub splitter: bool,
    pub space_dust: bool,
}

impl Modifiers {
    pub fn from_timers(timers: &PowerUpTimers, tuning: &EffectiveTuning) -> Self {
        let mut speed = tuning.asteroid_speed_multiplier;
        if timers.is_active(PowerUpKind::Slow) {
            speed *= SLOW_SPEED_SCALE;
        }
        if timers.is_active(PowerUpKind::BlackHole) {
            speed *= BLACK_HOLE_SPEED_SCALE;
        }

        let mut size = tuning.asteroid_size_multiplier;
        if timers.is_active(PowerUpKind::SolarFlare) {
            size *= SOLAR_FLARE_SIZE_SCALE;
        }

        Self {
            hazard_speed_scale: speed,
            hazard_size_scale: size,
            can_fire: timers.is_active(PowerUpKind::Blaster),
            cloaked: timers.is_active(PowerUpKind::Cloak),
            wave: timers
                .is_active(PowerUpKind::Wave)
                .then(WaveSettings::default),
            splitter: timers.is_active(PowerUpKind::AsteroidSplitter),
            space_dust: timers.is_active(PowerUpKind::SpaceDust),
        }
    }
}
