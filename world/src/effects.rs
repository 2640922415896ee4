//! Cosmetic area effects and their lifetimes.

use burrow_defence_core::{AreaEffect, CellCoord, TowerKind};

/// Seconds a hit marker stays visible, keyed by the attack that caused it.
pub(crate) fn hit_marker_seconds(source: TowerKind) -> f32 {
    match source {
        TowerKind::Default => 0.28,
        TowerKind::Fat => 0.22,
        TowerKind::Galactic => 0.2,
        TowerKind::Thunder | TowerKind::Kitty | TowerKind::Catatonic => 0.18,
    }
}

/// Ordered collection of live effects.
#[derive(Debug, Default)]
pub(crate) struct EffectLog {
    effects: Vec<AreaEffect>,
}

impl EffectLog {
    pub(crate) fn push(&mut self, effect: AreaEffect) {
        self.effects.push(effect);
    }

    pub(crate) fn mark_hit(&mut self, cell: CellCoord, source: TowerKind) {
        self.effects.push(AreaEffect::HitMarker {
            cell,
            time_left: hit_marker_seconds(source),
        });
    }

    /// Advances every effect and drops the expired ones.
    pub(crate) fn decay(&mut self, dt: f32) {
        self.effects.retain_mut(|effect| effect.advance(dt));
    }

    pub(crate) fn clear(&mut self) {
        self.effects.clear();
    }

    pub(crate) fn as_slice(&self) -> &[AreaEffect] {
        &self.effects
    }
}
