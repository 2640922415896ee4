//! Enemy state stored inside the world.

use burrow_defence_core::{EnemyId, EnemyTier, Health, MAX_SLEEP_SECONDS};

/// Live enemy walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) tier: EnemyTier,
    pub(crate) progress: f32,
    pub(crate) speed: f32,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) lane_offset: i32,
    pub(crate) sleep_timer: f32,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, tier: EnemyTier, max_hp: u32, speed: f32, lane_offset: i32) -> Self {
        let max_health = Health::new(max_hp.max(1));
        Self {
            id,
            tier,
            progress: 0.0,
            speed,
            health: max_health,
            max_health,
            lane_offset,
            sleep_timer: 0.0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Advances the enemy by `dt` seconds, or burns down its sleep instead.
    pub(crate) fn advance(&mut self, dt: f32, max_progress: f32) {
        if self.sleep_timer > 0.0 {
            self.sleep_timer = (self.sleep_timer - dt).max(0.0);
            return;
        }
        self.progress = (self.progress + self.speed * dt).min(max_progress);
    }

    /// Extends the sleep timer up to the shared cap and returns the new value.
    pub(crate) fn extend_sleep(&mut self, duration: f32) -> f32 {
        self.sleep_timer = (self.sleep_timer + duration.max(0.0)).min(MAX_SLEEP_SECONDS);
        self.sleep_timer
    }

    /// Pushes the enemy back along the path and returns the new progress.
    pub(crate) fn knock_back(&mut self, distance: f32) -> f32 {
        self.progress = (self.progress - distance.max(0.0)).max(0.0);
        self.progress
    }
}
