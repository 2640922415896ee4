//! Attack shapes shared by the combat resolver and the jump planner.
//!
//! Every shape is expressed over integer cells so that hit tests agree exactly
//! with the cells reported for presentation.

use crate::{BoardSize, CellCoord, CellPoint};

/// Depth of a swipe measured in cells along the dominant axis.
pub const SWIPE_DEPTH: i64 = 6;

/// Lateral offsets covered by a swipe, relative to the dominant axis.
pub const SWIPE_LATERAL: std::ops::RangeInclusive<i64> = -2..=1;

/// Distance between two samples of a traced beam.
const BEAM_STEP: f32 = 0.5;

/// Upper bound on the samples traced for a single beam.
const BEAM_MAX_SAMPLES: usize = 120;

/// Returns `-1`, `0` or `1` according to the sign of the value.
#[must_use]
pub fn signum(value: f32) -> i64 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Cells covered by a melee swipe from `center` towards `target`.
///
/// The swipe runs along the dominant axis of the direction to the target
/// (horizontal wins ties) and skips cells that fall off the board.
#[must_use]
pub fn swipe_area(center: CellPoint, target: CellCoord, board: BoardSize) -> Vec<CellCoord> {
    let dx = target.column() as f32 - center.column();
    let dy = target.row() as f32 - center.row();
    let horizontal = dx.abs() >= dy.abs();
    let (primary_x, primary_y) = if horizontal {
        (signum(dx), 0)
    } else {
        (0, signum(dy))
    };
    let (perp_x, perp_y) = if horizontal {
        (0, primary_x)
    } else {
        (-primary_y, 0)
    };
    let origin_x = center.column().round() as i64;
    let origin_y = center.row().round() as i64;

    let mut cells = Vec::new();
    for step in 1..=SWIPE_DEPTH {
        for lateral in SWIPE_LATERAL {
            let column = origin_x + primary_x * step + perp_x * lateral;
            let row = origin_y + primary_y * step + perp_y * lateral;
            if let Some(cell) = board.cell_at(column, row) {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Straight laser fired from a tower centre through a target cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: CellPoint,
    direction_x: f32,
    direction_y: f32,
}

impl Ray {
    /// Forward projection below which a cell counts as behind the tower.
    pub const BACKWARD_TOLERANCE: f32 = -0.2;

    /// Maximum perpendicular distance from the ray at which a cell is hit.
    pub const HALF_WIDTH: f32 = 0.35;

    /// Aims a ray from the origin through the target cell.
    #[must_use]
    pub fn aimed(origin: CellPoint, target: CellCoord) -> Self {
        let dx = target.column() as f32 - origin.column();
        let dy = target.row() as f32 - origin.row();
        let length = (dx * dx + dy * dy).sqrt().max(0.001);
        Self {
            origin,
            direction_x: dx / length,
            direction_y: dy / length,
        }
    }

    /// Reports whether the beam passes through the cell.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        let vx = cell.column() as f32 - self.origin.column();
        let vy = cell.row() as f32 - self.origin.row();
        let forward = vx * self.direction_x + vy * self.direction_y;
        if forward < Self::BACKWARD_TOLERANCE {
            return false;
        }
        let lateral = (vx * self.direction_y - vy * self.direction_x).abs();
        lateral <= Self::HALF_WIDTH
    }

    /// Cells sampled along the beam at half-cell steps until it leaves the board.
    #[must_use]
    pub fn trace(&self, board: BoardSize) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        let mut x = self.origin.column();
        let mut y = self.origin.row();
        for _ in 0..BEAM_MAX_SAMPLES {
            match board.cell_at(x.round() as i64, y.round() as i64) {
                Some(cell) => cells.push(cell),
                None => break,
            }
            x += self.direction_x * BEAM_STEP;
            y += self.direction_y * BEAM_STEP;
        }
        cells
    }
}

/// Cone burst aimed from a tower centre towards a target cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cone {
    ray: Ray,
    range: f32,
    min_cosine: f32,
}

impl Cone {
    /// Half-angle of the cone in degrees.
    pub const HALF_ANGLE_DEGREES: f32 = 30.0;

    /// Aims a cone of the provided range from the origin towards the target.
    #[must_use]
    pub fn aimed(origin: CellPoint, target: CellCoord, range: f32) -> Self {
        Self {
            ray: Ray::aimed(origin, target),
            range,
            min_cosine: Self::HALF_ANGLE_DEGREES.to_radians().cos(),
        }
    }

    /// Reports whether the cell lies inside the cone.
    #[must_use]
    pub fn covers(&self, cell: CellCoord) -> bool {
        let distance_squared = self.ray.origin.distance_squared_to(cell);
        if distance_squared > self.range * self.range {
            return false;
        }
        if distance_squared <= f32::EPSILON {
            return true;
        }
        let vx = cell.column() as f32 - self.ray.origin.column();
        let vy = cell.row() as f32 - self.ray.origin.row();
        let cosine = (vx * self.ray.direction_x + vy * self.ray.direction_y) / distance_squared.sqrt();
        cosine >= self.min_cosine
    }

    /// Cells inside the cone that lie on the board.
    #[must_use]
    pub fn cells(&self, board: BoardSize) -> Vec<CellCoord> {
        let reach = self.range.ceil() as i64;
        let origin_x = self.ray.origin.column().round() as i64;
        let origin_y = self.ray.origin.row().round() as i64;
        let mut cells = Vec::new();
        for row in (origin_y - reach)..=(origin_y + reach) {
            for column in (origin_x - reach)..=(origin_x + reach) {
                if let Some(cell) = board.cell_at(column, row) {
                    if self.covers(cell) {
                        cells.push(cell);
                    }
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_runs_along_dominant_axis() {
        let board = BoardSize::new(48, 28);
        let cells = swipe_area(CellPoint::new(10.0, 10.0), CellCoord::new(14, 11), board);
        assert_eq!(cells.len(), 24);
        assert!(cells.contains(&CellCoord::new(11, 10)));
        assert!(cells.contains(&CellCoord::new(16, 11)));
        assert!(cells.contains(&CellCoord::new(13, 8)));
        assert!(!cells.contains(&CellCoord::new(17, 10)));
        assert!(!cells.contains(&CellCoord::new(10, 10)));
    }

    #[test]
    fn swipe_clips_at_board_edge() {
        let board = BoardSize::new(48, 28);
        let cells = swipe_area(CellPoint::new(0.0, 0.0), CellCoord::new(0, 5), board);
        assert!(cells.iter().all(|cell| board.contains(*cell)));
        assert_eq!(cells.len(), 18);
    }

    #[test]
    fn ray_hits_cells_in_front_only() {
        let ray = Ray::aimed(CellPoint::new(5.0, 5.0), CellCoord::new(10, 5));
        assert!(ray.covers(CellCoord::new(20, 5)));
        assert!(ray.covers(CellCoord::new(5, 5)));
        assert!(!ray.covers(CellCoord::new(3, 5)));
        assert!(!ray.covers(CellCoord::new(8, 6)));
    }

    #[test]
    fn beam_trace_stops_at_board_edge() {
        let board = BoardSize::new(10, 10);
        let ray = Ray::aimed(CellPoint::new(2.0, 2.0), CellCoord::new(5, 2));
        let cells = ray.trace(board);
        assert_eq!(cells.first(), Some(&CellCoord::new(2, 2)));
        assert_eq!(cells.last(), Some(&CellCoord::new(9, 2)));
    }

    #[test]
    fn cone_respects_angle_and_range() {
        let cone = Cone::aimed(CellPoint::new(0.0, 0.0), CellCoord::new(4, 0), 6.0);
        assert!(cone.covers(CellCoord::new(5, 1)));
        assert!(!cone.covers(CellCoord::new(2, 3)));
        assert!(!cone.covers(CellCoord::new(7, 0)));
        assert!(cone.cells(BoardSize::new(48, 28)).contains(&CellCoord::new(4, 2)));
    }
}
