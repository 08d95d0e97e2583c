//! Session orchestrator wiring the systems together.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use tower_defence_core::{
    Command, Event, EventBus, ExplosionSnapshot, FrameInput, GameSnapshot, GameState,
    PlacementError, PlacementPreview, QuizDifficulty, Vector2,
};
use tower_defence_system_game_state::{GameStateManager, Transition};
use tower_defence_system_projectiles::ProjectileManager;
use tower_defence_system_towers::TowerManager;
use tower_defence_system_waves::WaveManager;
use tower_defence_world::{Enemy, Grid, Projectile, Tower};
use tracing::{debug, info};

use crate::{
    economy::Economy,
    schedule::{ScheduledAction, Scheduler},
    GameConfig, GameError,
};

/// Intermission quiz waiting for its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizRound {
    /// Wave that was just cleared.
    pub wave: u32,
    /// Difficulty of the questions.
    pub difficulty: QuizDifficulty,
    /// Time the round has been open.
    pub elapsed: Duration,
}

/// A complete tower defence session.
///
/// The game owns the grid, every system and the player's economy. Systems
/// report through a shared event buffer; at the end of every entry point the
/// buffer is dispatched, which applies the economic consequences of each event
/// and then republishes it on the [`EventBus`].
pub struct TowerDefenceGame {
    config: GameConfig,
    grid: Grid,
    state: GameStateManager,
    waves: WaveManager,
    towers: TowerManager,
    projectiles: ProjectileManager,
    economy: Economy,
    scheduler: Scheduler,
    quiz: Option<QuizRound>,
    bus: EventBus,
    commands: Vec<Command>,
    pending: Vec<Event>,
    recent: Vec<Event>,
}

impl TowerDefenceGame {
    /// Builds a session in the loading state.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let mut grid = Grid::new(config.rows, config.cols, config.tile_size);
        grid.mark_path(&config.path_cells());
        for cell in &config.blocked {
            if !grid.set_blocked(*cell) {
                debug!(%cell, "blocked cell overlaps the path");
            }
        }
        let path: Arc<[Vector2]> = Arc::from(grid.path_to_world(&config.path));
        let waves = WaveManager::new(config.wave.clone(), path);
        let economy = Economy::new(config.starting_gold, config.starting_lives);

        Ok(Self {
            config,
            grid,
            state: GameStateManager::new(),
            waves,
            towers: TowerManager::new(),
            projectiles: ProjectileManager::new(),
            economy,
            scheduler: Scheduler::new(),
            quiz: None,
            bus: EventBus::new(),
            commands: Vec::new(),
            pending: Vec::new(),
            recent: Vec::new(),
        })
    }

    /// Configuration the session was built from.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Placement grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Active game state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state.current()
    }

    /// Gold, lives and score.
    #[must_use]
    pub const fn economy(&self) -> Economy {
        self.economy
    }

    /// Wave system.
    #[must_use]
    pub const fn waves(&self) -> &WaveManager {
        &self.waves
    }

    /// Tower system.
    #[must_use]
    pub const fn towers(&self) -> &TowerManager {
        &self.towers
    }

    /// Projectile system.
    #[must_use]
    pub const fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    /// Intermission quiz currently open.
    #[must_use]
    pub const fn quiz(&self) -> Option<QuizRound> {
        self.quiz
    }

    /// Time left before the next scheduled wave or quiz.
    #[must_use]
    pub fn next_scheduled(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Events dispatched by the most recent call into the game.
    #[must_use]
    pub fn recent_events(&self) -> &[Event] {
        &self.recent
    }

    /// Bus on which every dispatched event is republished.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Leaves the loading state and schedules the first wave.
    ///
    /// Returns `false` when the session already started.
    pub fn start(&mut self) -> bool {
        self.recent.clear();
        if !self.state.is_loading() {
            debug!(state = %self.state.current(), "session already started");
            return false;
        }
        self.economy.announce(&mut self.pending);
        let _ = self.transition(GameState::Playing);
        self.dispatch();
        true
    }

    /// Advances the session by one frame.
    ///
    /// Within a tick enemies move first, then towers act, then projectiles fly
    /// and resolve their hits, then dead enemies are removed and wave
    /// completion is checked. Events are dispatched last.
    pub fn update(&mut self, dt: Duration, input: &FrameInput) {
        self.recent.clear();
        let dt = dt.min(self.config.max_frame_delta());

        if self.state.is_quiz_active() {
            self.advance_quiz(dt);
            self.dispatch();
            return;
        }
        if input.pause_toggle {
            let _ = self.toggle_pause();
        }
        if !self.state.should_update() {
            self.dispatch();
            return;
        }

        self.handle_input(input);
        for action in self.scheduler.advance(dt) {
            self.run(action);
        }
        if !self.state.should_update() {
            self.dispatch();
            return;
        }

        self.waves.update(dt, &mut self.pending);
        self.towers.update(
            dt,
            self.waves.enemies_mut(),
            &mut self.commands,
            &mut self.pending,
        );
        self.projectiles.handle(&self.commands);
        self.commands.clear();
        self.projectiles.update(
            dt,
            self.waves.enemies_mut(),
            self.towers.registry_mut(),
            &mut self.pending,
        );
        let _ = self.waves.cleanup();
        let _ = self.waves.check_wave_complete(&mut self.pending);

        self.dispatch();
    }

    /// Applies an externally issued command.
    ///
    /// Placement and selection failures are returned after being reported as
    /// events; every other command succeeds, possibly as a no-op.
    pub fn apply(&mut self, command: Command) -> Result<(), PlacementError> {
        self.recent.clear();
        let result = match command {
            Command::PlaceTower { kind, cell } => self
                .towers
                .try_build(
                    kind,
                    cell,
                    self.economy.gold(),
                    &mut self.grid,
                    &self.config.towers,
                    &mut self.pending,
                )
                .map(|_| ()),
            Command::RemoveTower { cell } => {
                if self
                    .towers
                    .remove_tower(cell, &mut self.grid, &mut self.pending)
                    .is_none()
                {
                    debug!(%cell, "no tower to remove");
                }
                Ok(())
            }
            Command::SelectTower { kind } => {
                if self.towers.select(kind, &self.config.towers, &mut self.pending) {
                    Ok(())
                } else {
                    Err(PlacementError::UnknownTowerType(kind.key().to_owned()))
                }
            }
            Command::StartWave => {
                self.scheduler.cancel(ScheduledAction::StartWave);
                self.scheduler.cancel(ScheduledAction::BeginQuiz);
                let _ = self.waves.start_wave(&mut self.pending);
                Ok(())
            }
            Command::SetState { state } => {
                let _ = self.transition(state);
                Ok(())
            }
            Command::TogglePause => {
                let _ = self.toggle_pause();
                Ok(())
            }
            Command::CompleteQuiz { gold } => {
                let _ = self.complete_quiz(gold);
                Ok(())
            }
            Command::LaunchProjectile { tower, .. } => {
                debug!(tower = tower.get(), "ignoring external projectile launch");
                Ok(())
            }
        };
        self.dispatch();
        result
    }

    /// Restores the starting economy, removes every entity and resumes play.
    ///
    /// Bus listeners are dropped before the reset is announced.
    pub fn reset(&mut self) {
        self.recent.clear();
        self.pending.clear();
        self.commands.clear();
        self.economy = Economy::new(self.config.starting_gold, self.config.starting_lives);
        self.waves.reset();
        self.towers.reset();
        self.projectiles.reset();
        let _ = self.grid.clear_towers();
        self.scheduler.clear();
        self.quiz = None;
        self.bus.clear(None);
        info!("session reset");

        self.economy.announce(&mut self.pending);
        let transition = self.transition(GameState::Playing);
        if !transition.starts_first_wave() {
            self.scheduler
                .schedule(self.config.first_wave_delay(), ScheduledAction::StartWave);
        }
        self.dispatch();
    }

    /// Captures the session for presentation or saving.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let wave = self.waves.state();
        GameSnapshot {
            state: self.state.current(),
            wave: wave.current_wave,
            wave_in_progress: wave.in_progress,
            gold: self.economy.gold(),
            lives: self.economy.lives(),
            score: self.economy.score(),
            selected: self.towers.selected(),
            grid: self.grid.snapshot(),
            towers: self.towers.towers().iter().map(Tower::snapshot).collect(),
            enemies: self
                .waves
                .enemies()
                .iter()
                .filter(|enemy| !enemy.is_marked())
                .map(Enemy::snapshot)
                .collect(),
            projectiles: self
                .projectiles
                .projectiles()
                .iter()
                .map(Projectile::snapshot)
                .collect(),
            explosions: self
                .towers
                .towers()
                .iter()
                .flat_map(|tower| tower.explosions())
                .map(|explosion| ExplosionSnapshot {
                    position: explosion.position(),
                    radius: explosion.radius(),
                    progress: explosion.progress(),
                })
                .collect(),
        }
    }

    /// Describes what a click at the cursor would build.
    ///
    /// Only available while playing and while the cursor is over the grid.
    #[must_use]
    pub fn placement_preview(&self, cursor: Vector2) -> Option<PlacementPreview> {
        if !self.state.is_playing() {
            return None;
        }
        let cell = self.grid.world_to_cell(cursor);
        self.towers
            .preview(cell, self.economy.gold(), &self.grid, &self.config.towers)
    }

    fn transition(&mut self, state: GameState) -> Transition {
        let transition = self.state.set_state(state, &mut self.pending);
        if transition.starts_first_wave() {
            self.scheduler
                .schedule(self.config.first_wave_delay(), ScheduledAction::StartWave);
        }
        transition
    }

    fn toggle_pause(&mut self) -> bool {
        match self.state.current() {
            GameState::Playing => {
                let _ = self.transition(GameState::Paused);
                true
            }
            GameState::Paused => {
                let _ = self.transition(GameState::Playing);
                true
            }
            state => {
                debug!(%state, "pause toggle ignored");
                false
            }
        }
    }

    fn handle_input(&mut self, input: &FrameInput) {
        if let Some(digit) = input.tower_hotkey {
            let _ = self
                .towers
                .handle_hotkey(digit, &self.config.towers, &mut self.pending);
        }
        if !input.primary_click {
            return;
        }
        if let Some(cursor) = input.cursor {
            let cell = self.grid.world_to_cell(cursor);
            let _ = self.towers.build_selected(
                cell,
                self.economy.gold(),
                &mut self.grid,
                &self.config.towers,
                &mut self.pending,
            );
        }
    }

    fn run(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::StartWave => {
                let _ = self.waves.start_wave(&mut self.pending);
            }
            ScheduledAction::BeginQuiz => self.begin_quiz(),
        }
    }

    fn begin_quiz(&mut self) {
        let wave = self.waves.state().current_wave;
        let difficulty = QuizDifficulty::for_wave(wave);
        let _ = self.transition(GameState::Quiz);
        self.quiz = Some(QuizRound {
            wave,
            difficulty,
            elapsed: Duration::ZERO,
        });
        info!(wave, ?difficulty, "quiz started");
        self.pending.push(Event::QuizStarted { wave, difficulty });
    }

    fn advance_quiz(&mut self, dt: Duration) {
        let timed_out = match self.quiz.as_mut() {
            Some(round) => {
                round.elapsed = round.elapsed.saturating_add(dt);
                self.config
                    .quiz_timeout()
                    .is_some_and(|limit| round.elapsed >= limit)
            }
            None => false,
        };
        if timed_out {
            info!("quiz timed out");
            let _ = self.complete_quiz(0);
        }
    }

    fn complete_quiz(&mut self, gold: u32) -> bool {
        if !self.state.is_quiz_active() {
            debug!(gold, "no quiz to complete");
            return false;
        }
        self.quiz = None;
        info!(gold, "quiz completed");
        self.pending.push(Event::QuizCompleted { gold });
        let _ = self.transition(GameState::Playing);
        self.scheduler
            .schedule(self.config.intermission_delay(), ScheduledAction::StartWave);
        true
    }

    fn game_over(&mut self) {
        let _ = self.transition(GameState::GameOver);
        self.scheduler.clear();
        self.quiz = None;
        let wave = self.waves.state().current_wave;
        let score = self.economy.score();
        info!(wave, score, "game over");
        self.pending.push(Event::GameOver { wave, score });
    }

    fn dispatch(&mut self) {
        let mut queue: VecDeque<Event> = self.pending.drain(..).collect();
        while let Some(event) = queue.pop_front() {
            self.consume(&event);
            queue.extend(self.pending.drain(..));
            self.bus.publish(&event);
            self.recent.push(event);
        }
    }

    fn consume(&mut self, event: &Event) {
        match event {
            Event::EnemyKilled { gold, score, .. } => {
                self.economy.earn(*gold, &mut self.pending);
                self.economy.add_score(*score, &mut self.pending);
            }
            Event::EnemyReachedEnd { damage, .. } => {
                self.economy.lose_lives(*damage, &mut self.pending);
                if self.economy.is_depleted() && !self.state.is(GameState::GameOver) {
                    self.game_over();
                }
            }
            Event::TowerBuilt { cost, .. } => self.economy.spend(*cost, &mut self.pending),
            Event::WaveComplete { bonus, .. } => {
                self.economy.earn(*bonus, &mut self.pending);
                if self.state.is(GameState::GameOver) {
                    return;
                }
                let action = if self.config.quiz_between_waves {
                    ScheduledAction::BeginQuiz
                } else {
                    ScheduledAction::StartWave
                };
                self.scheduler
                    .schedule(self.config.intermission_delay(), action);
            }
            Event::QuizCompleted { gold } => self.economy.earn(*gold, &mut self.pending),
            _ => {}
        }
    }
}
