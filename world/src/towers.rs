//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use burrow_defence_core::{CellCoord, CellRect, TowerId, TowerKind, TowerSnapshot, TowerStats};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Region of cells occupied by the tower.
    pub(crate) region: CellRect,
    /// Indicates whether the one-time upgrade was bought.
    pub(crate) upgraded: bool,
    /// Seconds until the tower may fire again.
    pub(crate) cooldown: f32,
}

impl TowerState {
    pub(crate) fn stats(&self) -> TowerStats {
        self.kind.stats(self.upgraded)
    }

    /// Effective pulse radius when the tower is a Catatonic.
    pub(crate) fn pulse_radius(&self) -> Option<f32> {
        pulse_radius(self.kind, self.upgraded)
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            region: self.region,
            upgraded: self.upgraded,
            cooldown: self.cooldown,
            stats: self.stats(),
        }
    }
}

/// Tower lifted off the board while the player chooses a new location.
#[derive(Clone, Debug)]
pub(crate) struct HeldTower {
    pub(crate) tower: TowerState,
    pub(crate) original: CellCoord,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Allocates the identifier for the next constructed tower.
    pub(crate) fn allocate(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, tower: TowerState) {
        let _ = self.entries.insert(tower.id, tower);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the tower whose footprint covers the cell.
    pub(crate) fn find_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.region.contains(cell))
            .map(|tower| tower.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Removes every tower; identifiers keep counting upwards.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Effective pulse radius for a kind, or `None` when the kind emits no pulse.
pub(crate) fn pulse_radius(kind: TowerKind, upgraded: bool) -> Option<f32> {
    match kind {
        TowerKind::Catatonic => Some(kind.stats(upgraded).range),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(registry: &mut TowerRegistry, kind: TowerKind, origin: CellCoord) -> TowerId {
        let id = registry.allocate();
        registry.insert(TowerState {
            id,
            kind,
            region: CellRect::square(origin, kind.footprint()),
            upgraded: false,
            cooldown: 0.0,
        });
        id
    }

    #[test]
    fn registry_allocates_monotonic_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = tower(&mut registry, TowerKind::Default, CellCoord::new(1, 1));
        let second = tower(&mut registry, TowerKind::Fat, CellCoord::new(4, 4));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);

        registry.clear();
        assert_eq!(registry.iter().count(), 0);
        assert_eq!(registry.allocate().get(), 2);
    }

    #[test]
    fn lookup_covers_whole_footprint() {
        let mut registry = TowerRegistry::new();
        let fat = tower(&mut registry, TowerKind::Fat, CellCoord::new(4, 4));
        assert_eq!(registry.find_at(CellCoord::new(5, 5)), Some(fat));
        assert_eq!(registry.find_at(CellCoord::new(6, 5)), None);
    }

    #[test]
    fn only_catatonic_towers_pulse() {
        assert_eq!(pulse_radius(TowerKind::Catatonic, false), Some(2.5));
        assert_eq!(pulse_radius(TowerKind::Catatonic, true), Some(3.5));
        assert_eq!(pulse_radius(TowerKind::Fat, false), None);
    }
}
