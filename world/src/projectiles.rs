//! Projectiles launched by Default towers.

use burrow_defence_core::{CellCoord, CellPoint, ProjectileSnapshot};

/// Flight speed in cells per second.
pub(crate) const PROJECTILE_SPEED: f32 = 17.0;

/// Squared distance to the target at which a projectile counts as arrived.
const ARRIVAL_DISTANCE_SQUARED: f32 = 0.05;

/// Squared distance within which an arrived projectile captures an enemy.
pub(crate) const CAPTURE_DISTANCE_SQUARED: f32 = 1.0;

/// Projectile flying towards a frozen target cell.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) position: CellPoint,
    pub(crate) target: CellCoord,
    pub(crate) speed: f32,
    pub(crate) damage: u32,
}

impl Projectile {
    pub(crate) fn launch(origin: CellPoint, target: CellCoord, damage: u32) -> Self {
        Self {
            position: origin,
            target,
            speed: PROJECTILE_SPEED,
            damage,
        }
    }

    /// Moves towards the target, snapping onto it when this step would reach it.
    pub(crate) fn advance(&mut self, dt: f32) {
        let dx = self.target.column() as f32 - self.position.column();
        let dy = self.target.row() as f32 - self.position.row();
        let distance = (dx * dx + dy * dy).sqrt();
        let step = self.speed * dt;
        if distance <= step || distance < 1e-3 {
            self.position = self.target.to_point();
            return;
        }
        let scale = step / distance;
        self.position = CellPoint::new(
            self.position.column() + dx * scale,
            self.position.row() + dy * scale,
        );
    }

    pub(crate) fn has_arrived(&self) -> bool {
        self.position.distance_squared_to(self.target) <= ARRIVAL_DISTANCE_SQUARED
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            target: self.target,
            damage: self.damage,
        }
    }
}
