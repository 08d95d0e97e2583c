//! Cell grid that records occupancy and converts between cell and world space.

use tower_defence_core::{CellCoord, CellKind, GridSnapshot, TowerId, Vector2};

/// Occupancy of a single cell.
///
/// The tower reference only exists on the `Tower` variant, so a cell can
/// never point at a tower while reporting a different kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Free cell available for construction.
    Empty,
    /// Cell that belongs to the enemy path.
    Path,
    /// Cell occupied by the referenced tower.
    Tower(TowerId),
    /// Cell that can never host a tower.
    Blocked,
}

impl CellState {
    /// Occupancy category of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Empty => CellKind::Empty,
            Self::Path => CellKind::Path,
            Self::Tower(_) => CellKind::Tower,
            Self::Blocked => CellKind::Blocked,
        }
    }

    /// Tower hosted by the cell, if any.
    #[must_use]
    pub const fn tower(&self) -> Option<TowerId> {
        match self {
            Self::Tower(tower) => Some(*tower),
            _ => None,
        }
    }
}

/// Fixed-size grid of square cells laid out row by row.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    cols: u32,
    tile_size: f32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid where every cell is empty.
    #[must_use]
    pub fn new(rows: u32, cols: u32, tile_size: f32) -> Self {
        let count = rows as usize * cols as usize;
        Self {
            rows,
            cols,
            tile_size,
            cells: vec![CellState::Empty; count],
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Edge length of a cell in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let col = u32::try_from(cell.col()).ok()?;
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Occupancy of the cell, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Cell containing the world position. No clamping is applied, so
    /// positions outside the grid map to out-of-bounds coordinates.
    #[must_use]
    pub fn world_to_cell(&self, position: Vector2) -> CellCoord {
        let row = (position.y / self.tile_size).floor() as i32;
        let col = (position.x / self.tile_size).floor() as i32;
        CellCoord::new(row, col)
    }

    /// Top-left corner of the cell in world space.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> Vector2 {
        Vector2::new(
            cell.col() as f32 * self.tile_size,
            cell.row() as f32 * self.tile_size,
        )
    }

    /// Centre of the cell in world space.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vector2 {
        let half = self.tile_size / 2.0;
        self.cell_to_world(cell) + Vector2::new(half, half)
    }

    /// Reports whether a tower may be built on the cell.
    #[must_use]
    pub fn can_build_at(&self, cell: CellCoord) -> bool {
        matches!(self.cell(cell), Some(CellState::Empty))
    }

    /// Places the tower on the cell when it is buildable.
    ///
    /// Returns `false` and leaves the grid untouched otherwise.
    pub fn place_tower(&mut self, cell: CellCoord, tower: TowerId) -> bool {
        if !self.can_build_at(cell) {
            return false;
        }
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = CellState::Tower(tower);
                true
            }
            None => false,
        }
    }

    /// Frees the cell and returns the tower that occupied it.
    pub fn remove_tower(&mut self, cell: CellCoord) -> Option<TowerId> {
        let index = self.index(cell)?;
        let tower = self.cells[index].tower()?;
        self.cells[index] = CellState::Empty;
        Some(tower)
    }

    /// Marks every in-bounds cell of the sequence as path.
    ///
    /// Connectivity of the sequence is not validated.
    pub fn mark_path(&mut self, cells: &[CellCoord]) {
        for cell in cells {
            if let Some(index) = self.index(*cell) {
                self.cells[index] = CellState::Path;
            }
        }
    }

    /// Marks an empty cell as permanently unbuildable.
    pub fn set_blocked(&mut self, cell: CellCoord) -> bool {
        match self.index(cell) {
            Some(index) if self.cells[index] == CellState::Empty => {
                self.cells[index] = CellState::Blocked;
                true
            }
            _ => false,
        }
    }

    /// Reports whether the cell belongs to the path.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        matches!(self.cell(cell), Some(CellState::Path))
    }

    /// Converts a cell sequence into the centres of its cells, order preserved.
    #[must_use]
    pub fn path_to_world(&self, cells: &[CellCoord]) -> Vec<Vector2> {
        cells.iter().map(|cell| self.cell_center(*cell)).collect()
    }

    /// In-bounds orthogonal neighbours ordered up, down, left, right.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> Vec<CellCoord> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(|(dr, dc)| {
                let row = cell.row().checked_add(dr)?;
                let col = cell.col().checked_add(dc)?;
                Some(CellCoord::new(row, col))
            })
            .filter(|neighbor| self.in_bounds(*neighbor))
            .collect()
    }

    /// Frees every tower cell and returns the towers that were removed.
    pub fn clear_towers(&mut self) -> Vec<TowerId> {
        let mut removed = Vec::new();
        for cell in &mut self.cells {
            if let CellState::Tower(tower) = *cell {
                removed.push(tower);
                *cell = CellState::Empty;
            }
        }
        removed
    }

    /// Captures the occupancy of every cell.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            tile_size: self.tile_size,
            cells: self.cells.iter().map(CellState::kind).collect(),
        }
    }
}
