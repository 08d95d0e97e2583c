//! Domain events reported by the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    CellCoord, EnemyId, GameState, PlacementError, ProjectileId, TowerId, TowerTypeId, Vector2,
};

/// Mechanism that delivered a killing blow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KillCause {
    /// Direct projectile impact.
    Projectile,
    /// Secondary area damage around an impact.
    Splash,
    /// Damage over time tick.
    Poison,
}

/// Difficulty tier of an intermission quiz.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizDifficulty {
    /// Waves one and two.
    Easy,
    /// Waves three to five.
    Medium,
    /// Every later wave.
    Hard,
}

impl QuizDifficulty {
    /// Difficulty of the quiz held after the provided wave.
    #[must_use]
    pub const fn for_wave(wave: u32) -> Self {
        if wave <= 2 {
            Self::Easy
        } else if wave <= 5 {
            Self::Medium
        } else {
            Self::Hard
        }
    }
}

/// Events reported by systems and the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new enemy entered the path.
    EnemySpawned {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Spawn position.
        position: Vector2,
        /// Wave the enemy belongs to.
        wave: u32,
    },
    /// An enemy's health reached zero.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Tower credited with the kill, when it still exists.
        tower: Option<TowerId>,
        /// Position where the enemy died.
        position: Vector2,
        /// Gold awarded for the kill.
        gold: u32,
        /// Score awarded for the kill.
        score: u32,
        /// Mechanism that delivered the killing blow.
        cause: KillCause,
    },
    /// An enemy walked past the final waypoint.
    EnemyReachedEnd {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Lives the player loses.
        damage: u32,
    },
    /// A projectile struck an enemy.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Tower that launched the projectile.
        tower: TowerId,
        /// Damage dealt by the impact.
        damage: f32,
    },
    /// Area damage was dealt around an impact point.
    SplashDamage {
        /// Tower responsible for the splash.
        tower: TowerId,
        /// Impact point.
        position: Vector2,
        /// Radius of the affected area.
        radius: f32,
        /// Damage dealt to each secondary target.
        damage: f32,
        /// Number of secondary targets damaged.
        enemies_hit: u32,
    },
    /// A slow aura pulse reached an enemy.
    SlowApplied {
        /// Tower emitting the aura.
        tower: TowerId,
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Speed multiplier applied.
        amount: f32,
    },
    /// Poison was attached to an enemy.
    PoisonApplied {
        /// Tower that applied the poison.
        tower: TowerId,
        /// Enemy that was poisoned.
        enemy: EnemyId,
        /// Damage dealt per tick.
        damage_per_tick: f32,
    },
    /// A poison tick damaged an enemy.
    PoisonTick {
        /// Tower that applied the poison.
        tower: TowerId,
        /// Enemy that was damaged.
        enemy: EnemyId,
        /// Damage dealt by the tick.
        damage: f32,
    },
    /// A tower fired at a target.
    TowerShoot {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the tower aimed at.
        target: EnemyId,
        /// Launch position.
        origin: Vector2,
    },
    /// A tower was constructed.
    TowerBuilt {
        /// Identifier of the new tower.
        tower: TowerId,
        /// Catalogue entry used.
        kind: TowerTypeId,
        /// Cell hosting the tower.
        cell: CellCoord,
        /// Gold spent.
        cost: u32,
    },
    /// A tower was demolished.
    TowerRemoved {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Cell that became free.
        cell: CellCoord,
    },
    /// The active tower selection changed.
    TowerSelected {
        /// Selected catalogue entry.
        kind: TowerTypeId,
        /// Price of the selection.
        cost: u32,
    },
    /// A placement request was refused.
    PlacementRejected {
        /// Cell that was requested.
        cell: CellCoord,
        /// Reason for the refusal.
        reason: PlacementError,
    },
    /// A wave started spawning.
    WaveStart {
        /// One-based wave number.
        wave: u32,
        /// Number of enemies the wave will spawn.
        enemies: u32,
    },
    /// Every enemy of the wave was spawned and removed.
    WaveComplete {
        /// One-based wave number.
        wave: u32,
        /// Gold bonus awarded for clearing the wave.
        bonus: u32,
    },
    /// The player's gold changed.
    GoldChanged {
        /// Gold after the change.
        gold: u32,
    },
    /// The player's lives changed.
    LivesChanged {
        /// Lives after the change.
        lives: u32,
    },
    /// The player's score changed.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// The game state machine transitioned.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// An intermission quiz started.
    QuizStarted {
        /// Wave that was just cleared.
        wave: u32,
        /// Difficulty of the quiz.
        difficulty: QuizDifficulty,
    },
    /// The intermission quiz finished.
    QuizCompleted {
        /// Gold awarded for the answers.
        gold: u32,
    },
    /// The player ran out of lives.
    GameOver {
        /// Wave reached.
        wave: u32,
        /// Final score.
        score: u32,
    },
}

impl Event {
    /// Topic under which the event is published.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::EnemySpawned { .. } => EventKind::EnemySpawned,
            Self::EnemyKilled { .. } => EventKind::EnemyKilled,
            Self::EnemyReachedEnd { .. } => EventKind::EnemyReachedEnd,
            Self::ProjectileHit { .. } => EventKind::ProjectileHit,
            Self::SplashDamage { .. } => EventKind::SplashDamage,
            Self::SlowApplied { .. } => EventKind::SlowApplied,
            Self::PoisonApplied { .. } => EventKind::PoisonApplied,
            Self::PoisonTick { .. } => EventKind::PoisonTick,
            Self::TowerShoot { .. } => EventKind::TowerShoot,
            Self::TowerBuilt { .. } => EventKind::TowerBuilt,
            Self::TowerRemoved { .. } => EventKind::TowerRemoved,
            Self::TowerSelected { .. } => EventKind::TowerSelected,
            Self::PlacementRejected { .. } => EventKind::PlacementRejected,
            Self::WaveStart { .. } => EventKind::WaveStart,
            Self::WaveComplete { .. } => EventKind::WaveComplete,
            Self::GoldChanged { .. } => EventKind::GoldChanged,
            Self::LivesChanged { .. } => EventKind::LivesChanged,
            Self::ScoreChanged { .. } => EventKind::ScoreChanged,
            Self::StateChanged { .. } => EventKind::StateChanged,
            Self::QuizStarted { .. } => EventKind::QuizStarted,
            Self::QuizCompleted { .. } => EventKind::QuizCompleted,
            Self::GameOver { .. } => EventKind::GameOver,
        }
    }
}

/// Topic identifying a family of [`Event`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// See [`Event::EnemySpawned`].
    EnemySpawned,
    /// See [`Event::EnemyKilled`].
    EnemyKilled,
    /// See [`Event::EnemyReachedEnd`].
    EnemyReachedEnd,
    /// See [`Event::ProjectileHit`].
    ProjectileHit,
    /// See [`Event::SplashDamage`].
    SplashDamage,
    /// See [`Event::SlowApplied`].
    SlowApplied,
    /// See [`Event::PoisonApplied`].
    PoisonApplied,
    /// See [`Event::PoisonTick`].
    PoisonTick,
    /// See [`Event::TowerShoot`].
    TowerShoot,
    /// See [`Event::TowerBuilt`].
    TowerBuilt,
    /// See [`Event::TowerRemoved`].
    TowerRemoved,
    /// See [`Event::TowerSelected`].
    TowerSelected,
    /// See [`Event::PlacementRejected`].
    PlacementRejected,
    /// See [`Event::WaveStart`].
    WaveStart,
    /// See [`Event::WaveComplete`].
    WaveComplete,
    /// See [`Event::GoldChanged`].
    GoldChanged,
    /// See [`Event::LivesChanged`].
    LivesChanged,
    /// See [`Event::ScoreChanged`].
    ScoreChanged,
    /// See [`Event::StateChanged`].
    StateChanged,
    /// See [`Event::QuizStarted`].
    QuizStarted,
    /// See [`Event::QuizCompleted`].
    QuizCompleted,
    /// See [`Event::GameOver`].
    GameOver,
}

impl EventKind {
    /// Camel-case topic name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EnemySpawned => "enemySpawned",
            Self::EnemyKilled => "enemyKilled",
            Self::EnemyReachedEnd => "enemyReachedEnd",
            Self::ProjectileHit => "projectileHit",
            Self::SplashDamage => "splashDamage",
            Self::SlowApplied => "slowApplied",
            Self::PoisonApplied => "poisonApplied",
            Self::PoisonTick => "poisonTick",
            Self::TowerShoot => "towerShoot",
            Self::TowerBuilt => "towerBuilt",
            Self::TowerRemoved => "towerRemoved",
            Self::TowerSelected => "towerSelected",
            Self::PlacementRejected => "placementRejected",
            Self::WaveStart => "waveStart",
            Self::WaveComplete => "waveComplete",
            Self::GoldChanged => "goldChanged",
            Self::LivesChanged => "livesChanged",
            Self::ScoreChanged => "scoreChanged",
            Self::StateChanged => "stateChanged",
            Self::QuizStarted => "quizStarted",
            Self::QuizCompleted => "quizCompleted",
            Self::GameOver => "gameOver",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
