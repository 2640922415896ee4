//! Static path geometry derived from a map definition.

use burrow_defence_core::{BoardSize, CellCoord, MapDefinition};

/// Path cell sequence and dilated occupancy mask for the active map.
#[derive(Clone, Debug)]
pub(crate) struct PathModel {
    board: BoardSize,
    cells: Vec<CellCoord>,
    mask: Vec<bool>,
}

impl PathModel {
    /// Builds the path from the map anchors and dilates it by the corridor width.
    pub(crate) fn build(board: BoardSize, map: &MapDefinition) -> Self {
        debug_assert!(map.is_axis_aligned(), "map anchors must be axis aligned");

        let mut cells = Vec::new();
        for pair in map.anchors.windows(2) {
            append_segment(pair[0], pair[1], &mut cells);
        }

        let mut mask = vec![false; board.cell_count()];
        let spread = i64::from(map.path_width.max(1) - 1);
        for cell in &cells {
            for dy in -spread..=spread {
                for dx in -spread..=spread {
                    if let Some(index) = cell.offset(dx, dy, board).and_then(|c| board.index(c)) {
                        mask[index] = true;
                    }
                }
            }
        }

        Self { board, cells, mask }
    }

    pub(crate) fn board(&self) -> BoardSize {
        self.board
    }

    /// Reports whether the cell belongs to the dilated path.
    pub(crate) fn is_path(&self, cell: CellCoord) -> bool {
        self.board
            .index(cell)
            .and_then(|index| self.mask.get(index).copied())
            .unwrap_or(false)
    }

    pub(crate) fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub(crate) fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the centre-line sequence.
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Largest progress value an enemy may hold.
    pub(crate) fn max_progress(&self) -> f32 {
        self.len().saturating_sub(1) as f32
    }

    /// Index of the sequence cell for the provided progress, clamped to the path.
    fn index_at(&self, progress: f32) -> usize {
        let clamped = progress.floor().clamp(0.0, self.max_progress());
        clamped as usize
    }

    /// Cell occupied by an enemy at the provided progress and lane.
    ///
    /// The lane displaces the centre-line cell along the perpendicular of the
    /// local segment direction, clamped onto the board.
    pub(crate) fn lane_cell(&self, progress: f32, lane_offset: i32) -> CellCoord {
        let index = self.index_at(progress);
        let Some(base) = self.cells.get(index).copied() else {
            return CellCoord::new(0, 0);
        };
        let (dx, dy) = self.direction_at(index);
        let (perp_x, perp_y) = (-dy, dx);
        let offset = i64::from(lane_offset);
        self.board.clamp(
            i64::from(base.column()) + perp_x * offset,
            i64::from(base.row()) + perp_y * offset,
        )
    }

    /// Unit direction of travel at the provided sequence index.
    fn direction_at(&self, index: usize) -> (i64, i64) {
        let here = self.cells[index];
        let (from, to) = if let Some(next) = self.cells.get(index + 1) {
            (here, *next)
        } else if index > 0 {
            (self.cells[index - 1], here)
        } else {
            return (0, 0);
        };
        let dx = i64::from(to.column()) - i64::from(from.column());
        let dy = i64::from(to.row()) - i64::from(from.row());
        (dx.signum(), dy.signum())
    }
}

/// Appends every cell from `from` to `to` inclusive; diagonal pairs add nothing.
fn append_segment(from: CellCoord, to: CellCoord, cells: &mut Vec<CellCoord>) {
    if from.row() == to.row() {
        let row = from.row();
        if from.column() <= to.column() {
            cells.extend((from.column()..=to.column()).map(|column| CellCoord::new(column, row)));
        } else {
            cells.extend(
                (to.column()..=from.column())
                    .rev()
                    .map(|column| CellCoord::new(column, row)),
            );
        }
    } else if from.column() == to.column() {
        let column = from.column();
        if from.row() <= to.row() {
            cells.extend((from.row()..=to.row()).map(|row| CellCoord::new(column, row)));
        } else {
            cells.extend(
                (to.row()..=from.row())
                    .rev()
                    .map(|row| CellCoord::new(column, row)),
            );
        }
    }
}
