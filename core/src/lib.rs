#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tower defence simulation.
//!
//! This crate defines the vocabulary that connects adapters, the world
//! entities and the pure systems. Adapters submit [`Command`] values
//! describing desired mutations, systems report what happened through
//! [`Event`] values, and the orchestrator republishes every event on an
//! [`EventBus`] so external listeners can observe the simulation.

mod bus;
mod catalogue;
mod event;
mod snapshot;
mod vector;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bus::{EventBus, ListenerId};
pub use catalogue::{
    ComponentKind, ComponentSpec, PoisonConfig, ShootingConfig, SlowConfig, SplashConfig,
    TowerCatalogue, TowerType, TowerTypeId,
};
pub use event::{Event, EventKind, KillCause, QuizDifficulty};
pub use snapshot::{
    EnemySnapshot, ExplosionSnapshot, GameSnapshot, GridSnapshot, PlacementPreview,
    ProjectileSnapshot, TowerSnapshot,
};
pub use vector::{Aabb, Vector2};

/// Commands that express all permissible mutations of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests placement of a tower of the provided type on a grid cell.
    PlaceTower {
        /// Catalogue entry describing the tower to construct.
        kind: TowerTypeId,
        /// Cell that should host the tower.
        cell: CellCoord,
    },
    /// Requests removal of the tower occupying the provided cell.
    RemoveTower {
        /// Cell currently hosting the tower.
        cell: CellCoord,
    },
    /// Selects the tower type used by subsequent click placements.
    SelectTower {
        /// Catalogue entry that becomes the active selection.
        kind: TowerTypeId,
    },
    /// Requests the next wave to begin immediately.
    StartWave,
    /// Forces the game state machine into the provided state.
    SetState {
        /// State that should become active.
        state: GameState,
    },
    /// Toggles between the playing and paused states.
    TogglePause,
    /// Reports that the intermission quiz finished and awards its gold.
    CompleteQuiz {
        /// Gold earned by answering the quiz.
        gold: u32,
    },
    /// Requests a projectile to be launched on behalf of a tower.
    LaunchProjectile {
        /// Tower that fired the projectile and receives credit for its hits.
        tower: TowerId,
        /// World position where the projectile starts.
        origin: Vector2,
        /// Velocity of the projectile in pixels per second.
        velocity: Vector2,
        /// Damage dealt to the first enemy struck.
        damage: f32,
        /// Distance after which the projectile expires without hitting.
        max_distance: f32,
        /// Colour used to draw the projectile.
        color: Rgb,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column indices.
///
/// Coordinates are signed so that conversions from world positions outside
/// the grid stay representable; bounds checks live on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: i32,
    col: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index, growing downwards.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index, growing to the right.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Occupancy category of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Free cell available for construction.
    Empty,
    /// Cell that belongs to the enemy path.
    Path,
    /// Cell occupied by a tower.
    Tower,
    /// Cell that can never host a tower.
    Blocked,
}

/// Opaque RGB colour used by entities and catalogue entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel intensity.
    pub red: u8,
    /// Green channel intensity.
    pub green: u8,
    /// Blue channel intensity.
    pub blue: u8,
}

impl Rgb {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);
    /// Orange.
    pub const ORANGE: Self = Self::new(255, 165, 0);
    /// Purple.
    pub const PURPLE: Self = Self::new(128, 0, 128);
    /// Dark red.
    pub const DARK_RED: Self = Self::new(139, 0, 0);
    /// Crimson.
    pub const CRIMSON: Self = Self::new(220, 20, 60);
    /// Neutral gray.
    pub const GRAY: Self = Self::new(128, 128, 128);
    /// Dark blue.
    pub const DARK_BLUE: Self = Self::new(0, 0, 139);
    /// Yellow.
    pub const YELLOW: Self = Self::new(255, 255, 0);
    /// Light blue.
    pub const LIGHT_BLUE: Self = Self::new(173, 216, 230);
    /// Blue.
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// Cyan.
    pub const CYAN: Self = Self::new(0, 255, 255);
    /// Dark orange.
    pub const DARK_ORANGE: Self = Self::new(255, 140, 0);
    /// Green.
    pub const GREEN: Self = Self::new(0, 128, 0);
    /// Dark green.
    pub const DARK_GREEN: Self = Self::new(0, 100, 0);
    /// Lime.
    pub const LIME: Self = Self::new(0, 255, 0);
}

/// High-level state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Assets are loading; nothing simulates yet.
    Loading,
    /// The main menu is shown.
    Menu,
    /// The simulation is running.
    Playing,
    /// The simulation is frozen until resumed.
    Paused,
    /// An intermission quiz is active between waves.
    Quiz,
    /// The player ran out of lives.
    GameOver,
}

impl GameState {
    /// Every state in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Loading,
        Self::Menu,
        Self::Playing,
        Self::Paused,
        Self::Quiz,
        Self::GameOver,
    ];

    /// Canonical upper-case name of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Menu => "MENU",
            Self::Playing => "PLAYING",
            Self::Paused => "PAUSED",
            Self::Quiz => "QUIZ",
            Self::GameOver => "GAME_OVER",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a state name does not match any [`GameState`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown game state `{0}`")]
pub struct UnknownStateError(pub String);

impl FromStr for GameState {
    type Err = UnknownStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|state| state.name() == normalized)
            .ok_or_else(|| UnknownStateError(value.to_owned()))
    }
}

/// Reasons a tower placement request can be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    #[error("cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Cell that was requested.
        cell: CellCoord,
    },
    /// The requested cell already hosts a tower, path or blocker.
    #[error("cell {cell} is not free for construction")]
    Occupied {
        /// Cell that was requested.
        cell: CellCoord,
    },
    /// The catalogue has no entry for the requested tower type.
    #[error("unknown tower type `{0}`")]
    UnknownTowerType(String),
    /// The player cannot afford the requested tower.
    #[error("tower costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Price of the requested tower.
        cost: u32,
        /// Gold held by the player.
        available: u32,
    },
    /// A click placement was attempted without a selected tower type.
    #[error("no tower type is selected")]
    NothingSelected,
}

/// Input snapshot gathered by adapters before each simulation tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Cursor position expressed in world pixels, when the pointer is over the view.
    pub cursor: Option<Vector2>,
    /// Whether the primary button was pressed on this frame.
    pub primary_click: bool,
    /// Digit key pressed on this frame, used for tower selection.
    pub tower_hotkey: Option<u8>,
    /// Whether the pause key was pressed on this frame.
    pub pause_toggle: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn game_state_parses_loose_names() {
        assert_eq!("playing".parse::<GameState>(), Ok(GameState::Playing));
        assert_eq!("GAME_OVER".parse::<GameState>(), Ok(GameState::GameOver));
        assert_eq!("game-over".parse::<GameState>(), Ok(GameState::GameOver));
        assert_eq!(
            "victory".parse::<GameState>(),
            Err(UnknownStateError("victory".to_owned()))
        );
    }

    #[test]
    fn game_state_display_matches_name() {
        for state in GameState::ALL {
            assert_eq!(state.to_string(), state.name());
            assert_eq!(state.name().parse::<GameState>(), Ok(state));
        }
    }

    #[test]
    fn placement_errors_describe_the_problem() {
        let error = PlacementError::InsufficientGold {
            cost: 150,
            available: 20,
        };
        assert_eq!(
            error.to_string(),
            "tower costs 150 gold but only 20 is available"
        );
        let error = PlacementError::Occupied {
            cell: CellCoord::new(2, 3),
        };
        assert_eq!(error.to_string(), "cell (2, 3) is not free for construction");
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
        assert_round_trip(&TowerId::new(7));
        assert_round_trip(&CellCoord::new(-1, 14));
        assert_round_trip(&GameState::Quiz);
        assert_round_trip(&Rgb::CRIMSON);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let decoded: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&decoded, value);
    }
}
