//! Built-in map catalogue.

use burrow_defence_core::{CellCoord, MapDefinition};

const CATALOGUE: [(&[(u32, u32)], u32); 10] = [
    (&[(0, 14), (12, 14), (12, 4), (30, 4), (30, 23), (47, 23)], 1),
    (&[(0, 3), (10, 3), (10, 12), (25, 12), (25, 22), (47, 22)], 2),
    (&[(0, 24), (15, 24), (15, 6), (32, 6), (32, 14), (47, 14)], 1),
    (
        &[(0, 14), (8, 14), (8, 6), (20, 6), (20, 20), (35, 20), (35, 5), (47, 5)],
        3,
    ),
    (&[(0, 8), (14, 8), (14, 22), (28, 22), (28, 6), (47, 6)], 2),
    (
        &[(0, 14), (10, 14), (10, 3), (20, 3), (20, 24), (40, 24), (40, 8), (47, 8)],
        2,
    ),
    (&[(0, 23), (18, 23), (18, 5), (46, 5), (46, 14)], 1),
    (&[(0, 4), (8, 4), (8, 24), (24, 24), (24, 4), (47, 4)], 2),
    (
        &[(0, 14), (12, 14), (12, 6), (22, 6), (22, 21), (34, 21), (34, 5), (47, 5)],
        2,
    ),
    (&[(0, 2), (16, 2), (16, 25), (30, 25), (30, 7), (47, 7)], 3),
];

/// Returns the ten built-in maps in campaign order.
#[must_use]
pub fn standard_maps() -> Vec<MapDefinition> {
    CATALOGUE
        .iter()
        .map(|(anchors, width)| {
            MapDefinition::new(
                anchors
                    .iter()
                    .map(|&(column, row)| CellCoord::new(column, row))
                    .collect(),
                *width,
            )
        })
        .collect()
}
