//! Drawable handles supplied by the host before a run starts
//!
//! The simulation never looks inside a handle; it only checks that the
//! required kinds are present and records which sprite variant each entity
//! uses so the drawing side can resolve it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StartupError;
use crate::sim::PowerUpKind;

/// Opaque reference to a host-owned drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

/// Entity categories the drawing collaborator renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawableKind {
    Player,
    Asteroid,
    Debris,
    PowerUp,
    Alien,
    AlienLaser,
    Bullet,
    Missile,
    Streak,
    Explosion,
}

impl DrawableKind {
    /// Kinds that must have at least one handle before `start_run`
    pub const REQUIRED: [DrawableKind; 4] = [
        DrawableKind::Player,
        DrawableKind::Asteroid,
        DrawableKind::Alien,
        DrawableKind::PowerUp,
    ];
}

/// Handles per drawable kind, plus optional per-power-up icons
#[derive(Debug, Clone, Default)]
pub struct AssetManifest {
    handles: HashMap<DrawableKind, Vec<AssetHandle>>,
    icons: HashMap<PowerUpKind, AssetHandle>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite variant for a kind (variants are indexed in insertion order)
    pub fn with(mut self, kind: DrawableKind, handle: AssetHandle) -> Self {
        self.insert(kind, handle);
        self
    }

    pub fn insert(&mut self, kind: DrawableKind, handle: AssetHandle) {
        self.handles.entry(kind).or_default().push(handle);
    }

    /// Register the icon drawn inside a pickup of the given kind
    pub fn with_icon(mut self, kind: PowerUpKind, handle: AssetHandle) -> Self {
        self.icons.insert(kind, handle);
        self
    }

    /// Number of sprite variants registered for a kind
    pub fn variant_count(&self, kind: DrawableKind) -> usize {
        self.handles.get(&kind).map_or(0, Vec::len)
    }

    /// Resolve the handle for a kind/variant pair (wraps out-of-range variants)
    pub fn handle(&self, kind: DrawableKind, variant: usize) -> Option<AssetHandle> {
        let variants = self.handles.get(&kind)?;
        if variants.is_empty() {
            return None;
        }
        Some(variants[variant % variants.len()])
    }

    pub fn icon(&self, kind: PowerUpKind) -> Option<AssetHandle> {
        self.icons.get(&kind).copied()
    }

    /// Check that every required kind has a handle
    pub fn validate(&self) -> Result<(), StartupError> {
        for kind in DrawableKind::REQUIRED {
            if self.variant_count(kind) == 0 {
                return Err(StartupError::MissingDrawable(kind));
            }
        }
        Ok(())
    }
}
