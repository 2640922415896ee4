#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns jump destinations to mobile towers.
//!
//! Every ready mobile tower proposes the cells within jump reach from which
//! its swipe would connect with a living enemy. Proposals are committed one
//! tower at a time against a shared reservation mask, so no two towers can
//! claim the same destination within a tick.

use burrow_defence_core::{
    geometry::swipe_area, BoardSize, CellCoord, CellRect, Command, EnemyView, PathMaskView,
    TowerId, TowerSnapshot, TowerView,
};
use burrow_defence_system_tower_targeting::TowerTargeting;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Euclidean distance, in cells, a mobile tower may cover in one jump.
pub const JUMP_REACH: f32 = 3.0;

/// Configuration parameters required to construct the jump planner.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Destination chosen for a mobile tower during the latest pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Tower that was planned.
    pub tower: TowerId,
    /// Origin cell occupied before the jump.
    pub from: CellCoord,
    /// Origin cell the tower ends the pass on.
    pub to: CellCoord,
}

/// Jump planner that reuses masks and scratch buffers between ticks.
#[derive(Debug)]
pub struct JumpPlanner {
    rng: ChaCha8Rng,
    targeting: TowerTargeting,
    blocked: Vec<bool>,
    reserved: Vec<Option<TowerId>>,
    jumpers: Vec<TowerSnapshot>,
    candidates: Vec<CellCoord>,
    assignments: Vec<Assignment>,
}

impl JumpPlanner {
    /// Creates a new jump planner with empty scratch buffers.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            targeting: TowerTargeting::new(),
            blocked: Vec::new(),
            reserved: Vec::new(),
            jumpers: Vec::new(),
            candidates: Vec::new(),
            assignments: Vec::new(),
        }
    }

    /// Plans jumps for every ready mobile tower and emits a
    /// `Command::RelocateTower` for each tower whose destination differs from
    /// its current origin.
    ///
    /// `held_origin` is the footprint a lifted tower returns to on cancel; it
    /// stays blocked while the tower is held.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        enemies: &EnemyView,
        path: PathMaskView<'_>,
        held_origin: Option<CellRect>,
        out: &mut Vec<Command>,
    ) {
        self.assignments.clear();
        self.jumpers.clear();
        self.jumpers.extend(
            towers
                .iter()
                .filter(|tower| tower.is_mobile() && tower.is_ready())
                .copied(),
        );
        if self.jumpers.is_empty() {
            return;
        }

        let board = path.board();
        self.targeting.prepare(enemies);
        self.rebuild_masks(towers, path, held_origin);
        self.jumpers.shuffle(&mut self.rng);

        for index in 0..self.jumpers.len() {
            let jumper = self.jumpers[index];
            let from = jumper.region.origin();
            self.collect_candidates(&jumper, board);
            self.candidates.shuffle(&mut self.rng);

            let to = match self.candidates.first() {
                Some(cell) => *cell,
                None => from,
            };
            if let Some(slot) = board.index(to) {
                self.reserved[slot] = Some(jumper.id);
            }
            self.assignments.push(Assignment {
                tower: jumper.id,
                from,
                to,
            });
            if to != from {
                out.push(Command::RelocateTower {
                    tower: jumper.id,
                    destination: to,
                });
            }
        }
    }

    /// Assignments produced by the latest call to [`JumpPlanner::handle`], in
    /// processing order.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    fn rebuild_masks(
        &mut self,
        towers: &TowerView,
        path: PathMaskView<'_>,
        held_origin: Option<CellRect>,
    ) {
        let board = path.board();
        let cell_count = board.cell_count();
        self.blocked.clear();
        self.blocked.resize(cell_count, false);
        self.reserved.clear();
        self.reserved.resize(cell_count, None);

        for cell in board.cells() {
            if path.is_path(cell) {
                self.block(board, cell);
            }
        }

        for tower in towers.iter() {
            if self.jumpers.iter().any(|jumper| jumper.id == tower.id) {
                continue;
            }
            for cell in tower.region.cells() {
                self.block(board, cell);
            }
        }
        if let Some(region) = held_origin {
            for cell in region.cells() {
                self.block(board, cell);
            }
        }

        for jumper in &self.jumpers {
            for cell in jumper.region.cells() {
                if let Some(slot) = board.index(cell) {
                    self.reserved[slot] = Some(jumper.id);
                }
            }
        }
    }

    fn block(&mut self, board: BoardSize, cell: CellCoord) {
        if let Some(slot) = board.index(cell) {
            self.blocked[slot] = true;
        }
    }

    fn collect_candidates(&mut self, jumper: &TowerSnapshot, board: BoardSize) {
        self.candidates.clear();
        let from = jumper.region.origin();
        let reach = JUMP_REACH.floor() as i64;
        let reach_squared = JUMP_REACH * JUMP_REACH;
        let swipe_reach = jumper.kind.reach(jumper.stats.range);

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 > reach_squared {
                    continue;
                }
                let Some(cell) = from.offset(dx, dy, board) else {
                    continue;
                };
                let Some(slot) = board.index(cell) else {
                    continue;
                };
                if self.blocked[slot] {
                    continue;
                }
                if matches!(self.reserved[slot], Some(owner) if owner != jumper.id) {
                    continue;
                }

                let center = cell.to_point();
                let Some(target) = self.targeting.select(center, swipe_reach) else {
                    continue;
                };
                if self
                    .targeting
                    .any_within(&swipe_area(center, target.cell, board))
                {
                    self.candidates.push(cell);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_defence_core::{EnemyId, EnemySnapshot, EnemyTier, Health, TowerKind};

    const BOARD: BoardSize = BoardSize::new(48, 28);

    fn kitty(id: u32, origin: (u32, u32), upgraded: bool, cooldown: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Kitty,
            region: CellRect::square(CellCoord::new(origin.0, origin.1), 1),
            upgraded,
            cooldown,
            stats: TowerKind::Kitty.stats(upgraded),
        }
    }

    fn enemy(id: u32, cell: (u32, u32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            tier: EnemyTier::Standard,
            cell: CellCoord::new(cell.0, cell.1),
            progress: id as f32,
            health: Health::new(5),
            max_health: Health::new(5),
            sleep_timer: 0.0,
        }
    }

    fn plan(
        planner: &mut JumpPlanner,
        towers: Vec<TowerSnapshot>,
        enemies: Vec<EnemySnapshot>,
        mask: &[bool],
    ) -> Vec<Command> {
        let mut out = Vec::new();
        planner.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            PathMaskView::new(BOARD, mask),
            None,
            &mut out,
        );
        out
    }

    #[test]
    fn plain_or_cooling_kittys_are_not_planned() {
        let mask = vec![false; BOARD.cell_count()];
        let mut planner = JumpPlanner::new(Config::new(1));
        let out = plan(
            &mut planner,
            vec![kitty(0, (10, 10), false, 0.0), kitty(1, (14, 10), true, 0.4)],
            vec![enemy(1, (12, 12))],
            &mask,
        );
        assert!(out.is_empty());
        assert!(planner.assignments().is_empty());
    }

    #[test]
    fn tower_without_reachable_enemy_stays_put() {
        let mask = vec![false; BOARD.cell_count()];
        let mut planner = JumpPlanner::new(Config::new(1));
        let out = plan(
            &mut planner,
            vec![kitty(0, (2, 2), true, 0.0)],
            vec![enemy(1, (40, 20))],
            &mask,
        );
        assert!(out.is_empty());
        assert_eq!(
            planner.assignments(),
            &[Assignment {
                tower: TowerId::new(0),
                from: CellCoord::new(2, 2),
                to: CellCoord::new(2, 2),
            }]
        );
    }

    #[test]
    fn competing_towers_receive_distinct_destinations() {
        let mask = vec![false; BOARD.cell_count()];
        for seed in 0..16 {
            let mut planner = JumpPlanner::new(Config::new(seed));
            let _ = plan(
                &mut planner,
                vec![
                    kitty(0, (10, 10), true, 0.0),
                    kitty(1, (11, 10), true, 0.0),
                    kitty(2, (10, 11), true, 0.0),
                    kitty(3, (11, 11), true, -0.5),
                ],
                vec![enemy(1, (13, 13))],
                &mask,
            );
            let assignments = planner.assignments();
            assert_eq!(assignments.len(), 4);
            for (index, first) in assignments.iter().enumerate() {
                for second in &assignments[index + 1..] {
                    assert_ne!(first.to, second.to);
                }
            }
        }
    }

    #[test]
    fn destinations_avoid_path_and_static_towers() {
        let mut mask = vec![false; BOARD.cell_count()];
        for column in 0..48 {
            if let Some(slot) = BOARD.index(CellCoord::new(column, 12)) {
                mask[slot] = true;
            }
        }
        let fat = TowerSnapshot {
            id: TowerId::new(5),
            kind: TowerKind::Fat,
            region: CellRect::square(CellCoord::new(8, 9), 2),
            upgraded: false,
            cooldown: 0.0,
            stats: TowerKind::Fat.stats(false),
        };
        for seed in 0..16 {
            let mut planner = JumpPlanner::new(Config::new(seed));
            let _ = plan(
                &mut planner,
                vec![kitty(0, (10, 10), true, 0.0), kitty(1, (12, 10), true, 0.0), fat],
                vec![enemy(1, (11, 12)), enemy(2, (14, 12))],
                &mask,
            );
            for assignment in planner.assignments() {
                assert_ne!(assignment.to.row(), 12);
                assert!(!fat.region.contains(assignment.to));
            }
        }
    }

    #[test]
    fn held_origin_and_repeated_passes_keep_blocking() {
        let mask = vec![false; BOARD.cell_count()];
        let held = CellRect::square(CellCoord::new(11, 9), 2);
        let towers = TowerView::from_snapshots(vec![
            kitty(0, (10, 10), true, 0.0),
            kitty(1, (14, 10), false, 0.0),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, (12, 12)), enemy(2, (9, 13))]);
        for seed in 0..8 {
            let mut planner = JumpPlanner::new(Config::new(seed));
            for _ in 0..4 {
                let mut out = Vec::new();
                planner.handle(
                    &towers,
                    &enemies,
                    PathMaskView::new(BOARD, &mask),
                    Some(held),
                    &mut out,
                );
                let assignment = planner.assignments()[0];
                assert!(!held.contains(assignment.to));
                assert_ne!(assignment.to, CellCoord::new(14, 10));
            }
        }
    }

    #[test]
    fn jumps_stay_within_reach() {
        let mask = vec![false; BOARD.cell_count()];
        let mut planner = JumpPlanner::new(Config::new(9));
        let out = plan(
            &mut planner,
            vec![kitty(0, (10, 10), true, 0.0)],
            vec![enemy(1, (20, 10))],
            &mask,
        );
        let assignment = planner.assignments()[0];
        let dx = assignment.to.column() as f32 - 10.0;
        let dy = assignment.to.row() as f32 - 10.0;
        assert!(dx * dx + dy * dy <= JUMP_REACH * JUMP_REACH);
        if assignment.to != assignment.from {
            assert_eq!(
                out,
                vec![Command::RelocateTower {
                    tower: TowerId::new(0),
                    destination: assignment.to,
                }]
            );
        }
    }
}
