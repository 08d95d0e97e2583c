//! Serializable views of the simulation used for presentation and saves.

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, CellKind, EnemyId, GameState, ProjectileId, Rgb, TowerId, TowerTypeId, Vector2,
};

/// Picture of the entire simulation at the end of a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Active game state.
    pub state: GameState,
    /// Current one-based wave number, zero before the first wave.
    pub wave: u32,
    /// Whether the current wave is still running.
    pub wave_in_progress: bool,
    /// Gold held by the player.
    pub gold: u32,
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Tower type used by click placements.
    pub selected: Option<TowerTypeId>,
    /// Grid occupancy.
    pub grid: GridSnapshot,
    /// Towers ordered by identifier.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Splash explosions still animating.
    pub explosions: Vec<ExplosionSnapshot>,
}

/// Row-major occupancy of the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
    /// Edge length of a cell in pixels.
    pub tile_size: f32,
    /// Occupancy of every cell, row by row.
    pub cells: Vec<CellKind>,
}

impl GridSnapshot {
    /// Occupancy of the provided cell, when it lies inside the grid.
    #[must_use]
    pub fn cell_kind(&self, cell: CellCoord) -> Option<CellKind> {
        let row = u32::try_from(cell.row()).ok()?;
        let col = u32::try_from(cell.col()).ok()?;
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = usize::try_from(row * self.cols + col).ok()?;
        self.cells.get(index).copied()
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
}

/// Presentation data of a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier of the tower.
    pub id: TowerId,
    /// Catalogue entry of the tower.
    pub kind: TowerTypeId,
    /// Cell hosting the tower.
    pub cell: CellCoord,
    /// Top-left corner in pixels.
    pub position: Vector2,
    /// Edge length in pixels.
    pub size: f32,
    /// Body colour.
    pub color: Rgb,
    /// Barrel and outline colour.
    pub barrel_color: Rgb,
    /// Barrel heading in radians.
    pub angle: f32,
    /// Targeting range, when the tower shoots.
    pub range: Option<f32>,
    /// Slow aura radius, when the tower has one.
    pub slow_range: Option<f32>,
    /// Kills credited to the tower.
    pub kills: u32,
    /// Damage dealt by the tower.
    pub total_damage: f32,
}

/// Presentation data of an enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Centre position in pixels.
    pub position: Vector2,
    /// Width and height in pixels.
    pub size: Vector2,
    /// Remaining health.
    pub health: f32,
    /// Health at spawn.
    pub max_health: f32,
    /// Body colour.
    pub color: Rgb,
    /// Whether a slow is active.
    pub slowed: bool,
    /// Whether a poison is active.
    pub poisoned: bool,
}

/// Presentation data of a projectile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Centre position in pixels.
    pub position: Vector2,
    /// Edge length in pixels.
    pub size: f32,
    /// Fill colour.
    pub color: Rgb,
}

/// Presentation data of a splash explosion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplosionSnapshot {
    /// Impact point.
    pub position: Vector2,
    /// Full radius of the explosion.
    pub radius: f32,
    /// Animation progress within `[0, 1]`.
    pub progress: f32,
}

/// Placement feedback for the cell under the cursor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementPreview {
    /// Cell under the cursor.
    pub cell: CellCoord,
    /// Tower type that would be built.
    pub kind: TowerTypeId,
    /// Whether the cell accepts a tower.
    pub buildable: bool,
    /// Whether the player can pay for the tower.
    pub affordable: bool,
    /// Targeting range of the tower that would be built.
    pub range: f32,
}
