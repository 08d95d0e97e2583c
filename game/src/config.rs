//! Level and session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_defence_core::{CellCoord, TowerCatalogue};
use tower_defence_system_waves::WaveConfig;

/// Everything needed to build a [`crate::TowerDefenceGame`].
///
/// Missing fields fall back to the standard level, so a TOML override only
/// needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid rows.
    pub rows: u32,
    /// Number of grid columns.
    pub cols: u32,
    /// Edge length of a cell in pixels.
    pub tile_size: f32,
    /// Gold available when a session starts.
    pub starting_gold: u32,
    /// Lives available when a session starts.
    pub starting_lives: u32,
    /// Corner cells of the enemy path, walked in order.
    pub path: Vec<CellCoord>,
    /// Cells that can never host a tower.
    pub blocked: Vec<CellCoord>,
    /// Delay between entering play and the first wave, in milliseconds.
    pub first_wave_delay_ms: u64,
    /// Delay between a completed wave and the intermission, in milliseconds.
    pub intermission_delay_ms: u64,
    /// Whether a quiz runs between waves.
    pub quiz_between_waves: bool,
    /// Quiz rounds left unanswered for this long complete without reward.
    pub quiz_timeout_ms: Option<u64>,
    /// Largest frame delta fed to the simulation, in milliseconds.
    pub max_frame_delta_ms: u64,
    /// Wave growth tunables.
    pub wave: WaveConfig,
    /// Buildable tower types.
    pub towers: TowerCatalogue,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 15,
            tile_size: 64.0,
            starting_gold: 500,
            starting_lives: 20,
            path: vec![
                CellCoord::new(5, 0),
                CellCoord::new(5, 3),
                CellCoord::new(2, 3),
                CellCoord::new(2, 7),
                CellCoord::new(7, 7),
                CellCoord::new(7, 11),
                CellCoord::new(4, 11),
                CellCoord::new(4, 14),
            ],
            blocked: Vec::new(),
            first_wave_delay_ms: 2000,
            intermission_delay_ms: 2000,
            quiz_between_waves: false,
            quiz_timeout_ms: None,
            max_frame_delta_ms: 100,
            wave: WaveConfig::default(),
            towers: TowerCatalogue::standard(),
        }
    }
}

impl GameConfig {
    /// Parses a configuration from TOML, filling unspecified fields with defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, GameError> {
        Ok(toml::from_str(source)?)
    }

    /// Delay before the first wave.
    #[must_use]
    pub const fn first_wave_delay(&self) -> Duration {
        Duration::from_millis(self.first_wave_delay_ms)
    }

    /// Delay between a completed wave and the intermission.
    #[must_use]
    pub const fn intermission_delay(&self) -> Duration {
        Duration::from_millis(self.intermission_delay_ms)
    }

    /// Largest frame delta fed to the simulation.
    #[must_use]
    pub const fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }

    /// Time after which an unanswered quiz completes on its own.
    #[must_use]
    pub fn quiz_timeout(&self) -> Option<Duration> {
        self.quiz_timeout_ms.map(Duration::from_millis)
    }

    /// Every cell the path crosses, corners included.
    ///
    /// Straight runs between consecutive corners are filled in; a diagonal step
    /// contributes only its end corner.
    #[must_use]
    pub fn path_cells(&self) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = self.path.first().copied().into_iter().collect();
        for pair in self.path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let step_row = (to.row() - from.row()).signum();
            let step_col = (to.col() - from.col()).signum();
            if step_row != 0 && step_col != 0 {
                cells.push(to);
                continue;
            }
            let mut cell = from;
            while cell != to {
                cell = CellCoord::new(cell.row() + step_row, cell.col() + step_col);
                cells.push(cell);
            }
        }
        cells
    }

    /// Checks that the configuration describes a playable level.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 || !(self.tile_size > 0.0) {
            return Err(GameError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
                tile_size: self.tile_size,
            });
        }
        if self.path.is_empty() {
            return Err(GameError::EmptyPath);
        }
        let in_bounds = |cell: &CellCoord| {
            u32::try_from(cell.row()).is_ok_and(|row| row < self.rows)
                && u32::try_from(cell.col()).is_ok_and(|col| col < self.cols)
        };
        if let Some(cell) = self.path.iter().chain(&self.blocked).find(|cell| !in_bounds(cell)) {
            return Err(GameError::CellOutOfBounds { cell: *cell });
        }
        Ok(())
    }
}

/// Reasons a game cannot be built from its configuration.
#[derive(Debug, Error)]
pub enum GameError {
    /// The grid has no cells or a non-positive tile size.
    #[error("invalid grid {rows}x{cols} with tile size {tile_size}")]
    InvalidGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
        /// Requested tile size.
        tile_size: f32,
    },
    /// The level has no enemy path.
    #[error("the enemy path is empty")]
    EmptyPath,
    /// A path or blocked cell lies outside the grid.
    #[error("cell {cell} lies outside the grid")]
    CellOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// The TOML source could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_keep_defaults_for_missing_fields() {
        let config = GameConfig::from_toml_str(
            r#"
            starting_gold = 1000
            quiz_between_waves = true

            [wave]
            base_enemy_count = 2
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.starting_gold, 1000);
        assert!(config.quiz_between_waves);
        assert_eq!(config.wave.base_enemy_count, 2);
        assert_eq!(config.wave.enemies_per_wave, 3);
        assert_eq!(config.rows, 10);
        assert_eq!(config.towers.len(), 4);
    }

    #[test]
    fn paths_are_read_as_cell_tables() {
        let config = GameConfig::from_toml_str(
            r#"
            path = [{ row = 1, col = 0 }, { row = 1, col = 4 }]
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.path, vec![CellCoord::new(1, 0), CellCoord::new(1, 4)]);
    }

    #[test]
    fn path_cells_fill_straight_runs() {
        let config = GameConfig {
            path: vec![CellCoord::new(5, 0), CellCoord::new(5, 2), CellCoord::new(3, 2)],
            ..GameConfig::default()
        };

        assert_eq!(
            config.path_cells(),
            vec![
                CellCoord::new(5, 0),
                CellCoord::new(5, 1),
                CellCoord::new(5, 2),
                CellCoord::new(4, 2),
                CellCoord::new(3, 2),
            ]
        );
    }

    #[test]
    fn malformed_toml_is_reported() {
        let error = GameConfig::from_toml_str("rows = \"ten\"").expect_err("type mismatch");
        assert!(matches!(error, GameError::Config(_)));
    }

    #[test]
    fn validation_rejects_unplayable_levels() {
        let mut config = GameConfig::default();
        config.path.clear();
        assert!(matches!(config.validate(), Err(GameError::EmptyPath)));

        let mut config = GameConfig::default();
        config.tile_size = 0.0;
        assert!(matches!(config.validate(), Err(GameError::InvalidGrid { .. })));

        let mut config = GameConfig::default();
        config.blocked.push(CellCoord::new(10, 0));
        assert!(matches!(
            config.validate(),
            Err(GameError::CellOutOfBounds { .. })
        ));

        assert!(GameConfig::default().validate().is_ok());
    }
}
