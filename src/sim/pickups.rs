//! Collectible power-up orbs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::powerups::PowerUpKind;
use super::rng::RandomSource;
use super::spawner::{EntityIds, SpawnTimer};

pub const MAX_PICKUPS: usize = 2;
const PICKUP_SPEED: f32 = 170.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PowerUpKind,
    pub radius: f32,
    pub pos: Vec2,
    pub speed: f32,
    pub bob_phase: f32,
}

impl Pickup {
    fn spawn(id: u32, kind: PowerUpKind, field: Vec2, rng: &mut impl RandomSource) -> Self {
        let radius = 18.0 + rng.unit() * 10.0;
        Self {
            id,
            kind,
            radius,
            pos: Vec2::new(
                field.x + radius + 40.0,
                80.0 + rng.unit() * (field.y - 160.0),
            ),
            speed: PICKUP_SPEED,
            bob_phase: 0.0,
        }
    }

    /// Drift left with a gentle vertical bob
    pub fn update(&mut self, dt: f32) {
        self.pos.x -= self.speed * dt;
        self.bob_phase += dt * 3.0;
        self.pos.y += self.bob_phase.sin() * 12.0 * dt;
    }

    pub fn is_off_field(&self) -> bool {
        self.pos.x < -self.radius - 40.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupField {
    pub pickups: Vec<Pickup>,
    timer: SpawnTimer,
}

impl PickupField {
    pub fn new(rng: &mut impl RandomSource) -> Self {
        Self {
            pickups: Vec::new(),
            timer: SpawnTimer::new(5.0, 8.5, MAX_PICKUPS, rng),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        field: Vec2,
        allowed: &[PowerUpKind],
        spawn_rate: f32,
        ids: &mut EntityIds,
        rng: &mut impl RandomSource,
    ) {
        if self.timer.tick(dt, self.pickups.len(), spawn_rate, rng) {
            if let Some(kind) = PowerUpKind::roll(rng, allowed) {
                self.pickups.push(Pickup::spawn(ids.next(), kind, field, rng));
            }
        }

        for pickup in &mut self.pickups {
            pickup.update(dt);
        }
        self.pickups.retain(|p| !p.is_off_field());
    }

    pub fn clear(&mut self, rng: &mut impl RandomSource) {
        self.pickups.clear();
        self.timer.reset(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_size;
    use crate::sim::rng::GameRng;

    #[test]
    fn test_spawns_within_delay_window_and_caps() {
        let mut rng = GameRng::new(21);
        let mut ids = EntityIds::default();
        let mut field = PickupField::new(&mut rng);

        // Nothing before the minimum delay
        for _ in 0..90 {
            field.update(0.05, field_size(), &PowerUpKind::ALL, 1.0, &mut ids, &mut rng);
        }
        assert!(field.pickups.is_empty());

        // At least one by the maximum delay
        for _ in 0..90 {
            field.update(0.05, field_size(), &PowerUpKind::ALL, 1.0, &mut ids, &mut rng);
        }
        assert!(!field.pickups.is_empty());
        assert!(field.pickups.len() <= MAX_PICKUPS);
    }

    #[test]
    fn test_only_allowed_kinds_spawn() {
        let mut rng = GameRng::new(4);
        let mut ids = EntityIds::default();
        let mut field = PickupField::new(&mut rng);
        for _ in 0..2000 {
            field.update(0.05, field_size(), &[PowerUpKind::Blaster], 5.0, &mut ids, &mut rng);
            assert!(field.pickups.iter().all(|p| p.kind == PowerUpKind::Blaster));
        }
    }

    #[test]
    fn test_pickup_leaves_field() {
        let mut rng = GameRng::new(1);
        let mut pickup = Pickup::spawn(0, PowerUpKind::Slow, field_size(), &mut rng);
        while !pickup.is_off_field() {
            pickup.update(0.05);
        }
        assert!(pickup.pos.x < 0.0);
    }
}
