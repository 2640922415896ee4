#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets from world snapshots.
//!
//! Targeting always prefers the living enemy that advanced furthest along the
//! path. The workspace keeps a scratch copy of enemy hit points so that
//! attacks resolved earlier within a tick can retire enemies before later
//! towers choose their targets.

use burrow_defence_core::{CellCoord, CellPoint, EnemyId, EnemyView, Reach};

/// Upper bound on the projectiles an upgraded Default tower fires per shot.
pub const MULTISHOT_LIMIT: usize = 3;

/// Enemy considered by the targeting workspace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Progress along the path.
    pub progress: f32,
    /// Scratch hit points, reduced as attacks are resolved within a tick.
    pub hp: u32,
}

impl Candidate {
    /// Reports whether the scratch hit points are above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<Candidate>,
    ordering: Vec<usize>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the enemies of the current tick into the workspace.
    ///
    /// Enumeration order follows the view, which is spawn order.
    pub fn prepare(&mut self, enemies: &EnemyView) {
        self.candidates.clear();
        self.candidates.extend(enemies.iter().map(|enemy| Candidate {
            id: enemy.id,
            cell: enemy.cell,
            progress: enemy.progress,
            hp: enemy.health.get(),
        }));
    }

    /// Living candidates in enumeration order.
    pub fn living(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().filter(|candidate| candidate.is_alive())
    }

    /// Selects the most advanced living enemy within reach of the origin.
    ///
    /// Ties keep the enemy enumerated first.
    #[must_use]
    pub fn select(&self, origin: CellPoint, reach: Reach) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for candidate in self.living() {
            if !reach.admits(origin, candidate.cell) {
                continue;
            }
            match best {
                Some(existing) if candidate.progress <= existing.progress => {}
                _ => best = Some(*candidate),
            }
        }
        best
    }

    /// Selects up to [`MULTISHOT_LIMIT`] living enemies within reach: the
    /// least advanced, the middle one and the most advanced.
    ///
    /// The output buffer is cleared before it is populated.
    pub fn spread(&mut self, origin: CellPoint, reach: Reach, out: &mut Vec<Candidate>) {
        out.clear();
        self.ordering.clear();
        for (index, candidate) in self.candidates.iter().enumerate() {
            if candidate.is_alive() && reach.admits(origin, candidate.cell) {
                self.ordering.push(index);
            }
        }
        if self.ordering.is_empty() {
            return;
        }

        let candidates = &self.candidates;
        self.ordering.sort_by(|a, b| {
            candidates[*a]
                .progress
                .total_cmp(&candidates[*b].progress)
        });

        let count = self.ordering.len();
        let picks: [usize; MULTISHOT_LIMIT] = [0, count / 2, count - 1];
        for pick in picks {
            let candidate = self.candidates[self.ordering[pick]];
            if !out.iter().any(|existing| existing.id == candidate.id) {
                out.push(candidate);
            }
        }
    }

    /// Reports whether any living enemy stands on one of the provided cells.
    #[must_use]
    pub fn any_within(&self, cells: &[CellCoord]) -> bool {
        self.living().any(|candidate| cells.contains(&candidate.cell))
    }

    /// Subtracts damage from an enemy's scratch hit points.
    pub fn strike(&mut self, id: EnemyId, amount: u32) {
        if let Some(candidate) = self
            .candidates
            .iter_mut()
            .find(|candidate| candidate.id == id)
        {
            candidate.hp = candidate.hp.saturating_sub(amount);
        }
    }
}
