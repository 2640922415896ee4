//! Footprint validation shared by purchases, drops and jumps.

use burrow_defence_core::{ActionError, CellCoord, CellPoint, CellRect, TowerKind};

use crate::{path::PathModel, towers::pulse_radius};

/// Footprint already claimed on the board.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Obstacle {
    pub(crate) region: CellRect,
    pub(crate) pulse_radius: Option<f32>,
}

/// Validates a footprint for a tower of the provided kind.
///
/// Checks run in a fixed order: board bounds, path cells, overlap with other
/// footprints and finally pulse separation. The first failure is reported.
pub(crate) fn validate(
    path: &PathModel,
    obstacles: impl IntoIterator<Item = Obstacle>,
    kind: TowerKind,
    origin: CellCoord,
    upgraded: bool,
) -> Result<CellRect, ActionError> {
    let region = CellRect::square(origin, kind.footprint());
    if !region.fits(path.board()) {
        return Err(ActionError::OutOfBounds);
    }
    if region.cells().any(|cell| path.is_path(cell)) {
        return Err(ActionError::OnPath);
    }

    let pulse = pulse_radius(kind, upgraded);
    let center = region.center();
    let mut too_close = false;
    for obstacle in obstacles {
        if obstacle.region.overlaps(&region) {
            return Err(ActionError::Occupied);
        }
        if let Some(own) = pulse {
            too_close |= crowds(center, own, &obstacle);
        }
    }
    if too_close {
        return Err(ActionError::PulseTooClose);
    }
    Ok(region)
}

/// Re-checks pulse separation for a tower that keeps its footprint.
///
/// Bounds, path and overlap were settled when `region` was placed; only the
/// pulse radius can grow, so only separation is checked.
pub(crate) fn check_separation(
    region: CellRect,
    pulse: Option<f32>,
    obstacles: impl IntoIterator<Item = Obstacle>,
) -> Result<(), ActionError> {
    let Some(own) = pulse else {
        return Ok(());
    };
    let center = region.center();
    if obstacles
        .into_iter()
        .any(|obstacle| crowds(center, own, &obstacle))
    {
        Err(ActionError::PulseTooClose)
    } else {
        Ok(())
    }
}

fn crowds(center: CellPoint, own: f32, obstacle: &Obstacle) -> bool {
    let Some(other) = obstacle.pulse_radius else {
        return false;
    };
    let other_center = obstacle.region.center();
    let dx = other_center.column() - center.column();
    let dy = other_center.row() - center.row();
    let minimum = own + other;
    dx * dx + dy * dy < minimum * minimum
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_defence_core::{BoardSize, MapDefinition};

    fn path() -> PathModel {
        let map = MapDefinition::new(vec![CellCoord::new(0, 5), CellCoord::new(19, 5)], 1);
        PathModel::build(BoardSize::new(20, 12), &map)
    }

    fn pulse_at(origin: CellCoord) -> Obstacle {
        Obstacle {
            region: CellRect::square(origin, 1),
            pulse_radius: Some(2.5),
        }
    }

    #[test]
    fn rejects_path_and_bounds() {
        let path = path();
        assert_eq!(
            validate(&path, [], TowerKind::Default, CellCoord::new(3, 5), false),
            Err(ActionError::OnPath)
        );
        assert_eq!(
            validate(&path, [], TowerKind::Fat, CellCoord::new(3, 4), false),
            Err(ActionError::OnPath)
        );
        assert_eq!(
            validate(&path, [], TowerKind::Fat, CellCoord::new(19, 0), false),
            Err(ActionError::OutOfBounds)
        );
        assert!(validate(&path, [], TowerKind::Fat, CellCoord::new(3, 6), false).is_ok());
    }

    #[test]
    fn rejects_overlap_with_large_footprints() {
        let fat = Obstacle {
            region: CellRect::square(CellCoord::new(3, 7), 2),
            pulse_radius: None,
        };
        assert_eq!(
            validate(&path(), [fat], TowerKind::Default, CellCoord::new(4, 8), false),
            Err(ActionError::Occupied)
        );
        assert!(validate(&path(), [fat], TowerKind::Default, CellCoord::new(5, 8), false).is_ok());
    }

    #[test]
    fn pulse_towers_keep_their_distance() {
        let existing = pulse_at(CellCoord::new(2, 8));
        assert_eq!(
            validate(&path(), [existing], TowerKind::Catatonic, CellCoord::new(6, 8), false),
            Err(ActionError::PulseTooClose)
        );
        assert!(validate(&path(), [existing], TowerKind::Catatonic, CellCoord::new(7, 8), false).is_ok());
        assert!(validate(&path(), [existing], TowerKind::Default, CellCoord::new(3, 8), false).is_ok());
        assert_eq!(
            validate(&path(), [existing], TowerKind::Catatonic, CellCoord::new(7, 8), true),
            Err(ActionError::PulseTooClose)
        );
    }

    #[test]
    fn separation_recheck_only_looks_at_pulses() {
        let region = CellRect::square(CellCoord::new(7, 8), 1);
        let existing = pulse_at(CellCoord::new(2, 8));
        let wall = Obstacle {
            region,
            pulse_radius: None,
        };
        assert_eq!(check_separation(region, Some(2.5), [existing, wall]), Ok(()));
        assert_eq!(
            check_separation(region, pulse_radius(TowerKind::Catatonic, true), [existing]),
            Err(ActionError::PulseTooClose)
        );
        assert_eq!(check_separation(region, None, [pulse_at(CellCoord::new(7, 9))]), Ok(()));
    }
}
