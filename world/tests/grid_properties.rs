use proptest::prelude::*;
use tower_defence_core::{CellCoord, TowerId, Vector2};
use tower_defence_world::{CellState, Grid};

const ROWS: u32 = 10;
const COLS: u32 = 15;
const TILE: f32 = 64.0;

fn cells(raw: &[(i32, i32)]) -> Vec<CellCoord> {
    raw.iter().map(|(row, col)| CellCoord::new(*row, *col)).collect()
}

proptest! {
    #[test]
    fn buildable_exactly_when_in_bounds_and_empty(
        row in -3i32..13,
        col in -3i32..18,
        path in prop::collection::vec((0i32..10, 0i32..15), 0..24),
    ) {
        let mut grid = Grid::new(ROWS, COLS, TILE);
        grid.mark_path(&cells(&path));
        let cell = CellCoord::new(row, col);

        let expected = grid.in_bounds(cell) && grid.cell(cell) == Some(CellState::Empty);
        prop_assert_eq!(grid.can_build_at(cell), expected);

        let placed = grid.place_tower(cell, TowerId::new(1));
        prop_assert_eq!(placed, expected);
        if placed {
            prop_assert!(!grid.can_build_at(cell));
            prop_assert_eq!(grid.cell(cell), Some(CellState::Tower(TowerId::new(1))));
        }
    }

    #[test]
    fn path_to_world_is_deterministic_and_centred(
        path in prop::collection::vec((0i32..10, 0i32..15), 0..32),
    ) {
        let grid = Grid::new(ROWS, COLS, TILE);
        let path = cells(&path);

        let first = grid.path_to_world(&path);
        let second = grid.path_to_world(&path);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), path.len());
        for (cell, waypoint) in path.iter().zip(&first) {
            let expected = Vector2::new(
                cell.col() as f32 * TILE + TILE / 2.0,
                cell.row() as f32 * TILE + TILE / 2.0,
            );
            prop_assert_eq!(*waypoint, expected);
        }
    }

    #[test]
    fn world_to_cell_inverts_cell_center(row in 0i32..10, col in 0i32..15) {
        let grid = Grid::new(ROWS, COLS, TILE);
        let cell = CellCoord::new(row, col);
        prop_assert_eq!(grid.world_to_cell(grid.cell_center(cell)), cell);
        prop_assert_eq!(grid.world_to_cell(grid.cell_to_world(cell)), cell);
    }
}
