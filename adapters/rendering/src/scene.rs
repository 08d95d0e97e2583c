//! Frame descriptions derived from simulation snapshots.

use glam::Vec2;
use tower_defence_core::{
    CellKind, GameSnapshot, GameState, PlacementPreview, TowerTypeId, Vector2,
};

use crate::Color;

/// Grid lines and cell occupancy.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
    /// Edge length of a cell in pixels.
    pub tile_size: f32,
    /// Occupancy of every cell, row by row.
    pub cells: Vec<CellKind>,
    /// Colour of the cell outlines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Width of the grid in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    /// Height of the grid in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Top-left corner of every cell paired with its occupancy, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Vec2, CellKind)> + '_ {
        let cols = self.cols.max(1) as usize;
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let row = (index / cols) as f32;
            let col = (index % cols) as f32;
            (Vec2::new(col, row) * self.tile_size, *kind)
        })
    }
}

/// Tower drawn on the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Catalogue entry, used to pick sprites.
    pub kind: TowerTypeId,
    /// Top-left corner in pixels.
    pub top_left: Vec2,
    /// Edge length in pixels.
    pub size: f32,
    /// Body colour.
    pub color: Color,
    /// Barrel and outline colour.
    pub barrel_color: Color,
    /// Barrel heading in radians.
    pub angle: f32,
    /// Targeting range, when the tower shoots.
    pub range: Option<f32>,
    /// Slow aura radius, when the tower has one.
    pub slow_range: Option<f32>,
}

impl TowerPresentation {
    /// Centre of the tower in pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.top_left + Vec2::splat(self.size * 0.5)
    }
}

/// Enemy drawn on the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Centre in pixels.
    pub center: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
    /// Body colour.
    pub color: Color,
    /// Remaining health as a fraction of the maximum.
    pub health: f32,
    /// Whether a slow is active.
    pub slowed: bool,
    /// Whether a poison is active.
    pub poisoned: bool,
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Centre in pixels.
    pub center: Vec2,
    /// Edge length in pixels.
    pub size: f32,
    /// Fill colour.
    pub color: Color,
}

/// Fading splash explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionPresentation {
    /// Impact point in pixels.
    pub center: Vec2,
    /// Full radius in pixels.
    pub radius: f32,
    /// Animation progress within `[0, 1]`.
    pub progress: f32,
}

/// Highlight for the cell under the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewPresentation {
    /// Top-left corner of the cell in pixels.
    pub top_left: Vec2,
    /// Edge length in pixels.
    pub size: f32,
    /// Whether a click would build a tower.
    pub valid: bool,
    /// Targeting range of the tower that would be built.
    pub range: f32,
}

/// Player resources shown over the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Gold held by the player.
    pub gold: u32,
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Current wave.
    pub wave: u32,
    /// Tower type used by click placements.
    pub selected: Option<TowerTypeId>,
    /// Active game state.
    pub state: GameState,
}

impl Hud {
    /// Text lines drawn in the top-left corner.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Gold: {}", self.gold),
            format!("Lives: {}", self.lives),
            format!("Score: {}", self.score),
            format!("Wave: {}", self.wave),
        ];
        if let Some(kind) = self.selected {
            lines.push(format!("Tower: {kind}"));
        }
        lines
    }

    /// Banner drawn across the play area, when the state calls for one.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        match self.state {
            GameState::Loading => Some("Loading..."),
            GameState::Menu => Some("Tower Defence"),
            GameState::Paused => Some("Paused"),
            GameState::Quiz => Some("Quiz time!"),
            GameState::GameOver => Some("Game Over"),
            GameState::Playing => None,
        }
    }
}

/// Everything a backend draws for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Play area.
    pub grid: GridPresentation,
    /// Towers in identifier order.
    pub towers: Vec<TowerPresentation>,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Splash explosions still animating.
    pub explosions: Vec<ExplosionPresentation>,
    /// Cursor highlight, when placement is possible.
    pub preview: Option<PreviewPresentation>,
    /// Player resources.
    pub hud: Hud,
    /// Whether tower ranges are drawn.
    pub debug: bool,
}

impl Scene {
    /// Outline colour of grid cells.
    pub const GRID_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.1);

    /// Builds the frame description of a snapshot.
    #[must_use]
    pub fn from_snapshot(
        snapshot: &GameSnapshot,
        preview: Option<&PlacementPreview>,
        debug: bool,
    ) -> Self {
        let tile = snapshot.grid.tile_size;
        Self {
            grid: GridPresentation {
                rows: snapshot.grid.rows,
                cols: snapshot.grid.cols,
                tile_size: tile,
                cells: snapshot.grid.cells.clone(),
                line_color: Self::GRID_LINE_COLOR,
            },
            towers: snapshot
                .towers
                .iter()
                .map(|tower| TowerPresentation {
                    kind: tower.kind,
                    top_left: to_vec2(tower.position),
                    size: tower.size,
                    color: Color::from_rgb(tower.color),
                    barrel_color: Color::from_rgb(tower.barrel_color),
                    angle: tower.angle,
                    range: tower.range,
                    slow_range: tower.slow_range,
                })
                .collect(),
            enemies: snapshot
                .enemies
                .iter()
                .map(|enemy| EnemyPresentation {
                    center: to_vec2(enemy.position),
                    size: to_vec2(enemy.size),
                    color: Color::from_rgb(enemy.color),
                    health: health_fraction(enemy.health, enemy.max_health),
                    slowed: enemy.slowed,
                    poisoned: enemy.poisoned,
                })
                .collect(),
            projectiles: snapshot
                .projectiles
                .iter()
                .map(|projectile| ProjectilePresentation {
                    center: to_vec2(projectile.position),
                    size: projectile.size,
                    color: Color::from_rgb(projectile.color),
                })
                .collect(),
            explosions: snapshot
                .explosions
                .iter()
                .map(|explosion| ExplosionPresentation {
                    center: to_vec2(explosion.position),
                    radius: explosion.radius,
                    progress: explosion.progress.clamp(0.0, 1.0),
                })
                .collect(),
            preview: preview.map(|preview| PreviewPresentation {
                top_left: Vec2::new(preview.cell.col() as f32, preview.cell.row() as f32) * tile,
                size: tile,
                valid: preview.buildable && preview.affordable,
                range: preview.range,
            }),
            hud: Hud {
                gold: snapshot.gold,
                lives: snapshot.lives,
                score: snapshot.score,
                wave: snapshot.wave,
                selected: snapshot.selected,
                state: snapshot.state,
            },
            debug,
        }
    }
}

/// Converts a simulation vector into a drawing vector.
#[must_use]
pub fn to_vec2(vector: Vector2) -> Vec2 {
    Vec2::new(vector.x, vector.y)
}

fn health_fraction(health: f32, max_health: f32) -> f32 {
    if max_health <= 0.0 {
        return 0.0;
    }
    (health / max_health).clamp(0.0, 1.0)
}
