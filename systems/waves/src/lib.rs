#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave system that spawns enemies on a fixed cadence and tracks completion.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tower_defence_core::{EnemyId, Event, Rgb, Vector2};
use tower_defence_world::{Enemy, EnemyStats};
use tracing::{debug, info, warn};

/// Tunables describing how waves grow.
///
/// Every stat scales linearly with the one-based wave number `w`, for example
/// `health = base_health + health_per_wave * (w - 1)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies spawned by the first wave.
    pub base_enemy_count: u32,
    /// Additional enemies per later wave.
    pub enemies_per_wave: u32,
    /// Delay between two spawns in milliseconds.
    pub spawn_interval_ms: u64,
    /// Enemy health on the first wave.
    pub base_health: f32,
    /// Additional health per later wave.
    pub health_per_wave: f32,
    /// Enemy speed on the first wave, in pixels per second.
    pub base_speed: f32,
    /// Additional speed per later wave.
    pub speed_per_wave: f32,
    /// Gold per kill on the first wave.
    pub base_gold: u32,
    /// Additional gold per later wave.
    pub gold_per_wave: u32,
    /// Score per kill on the first wave.
    pub base_score: u32,
    /// Additional score per later wave.
    pub score_per_wave: u32,
    /// Completion bonus independent of the wave number.
    pub base_bonus: u32,
    /// Completion bonus per wave number.
    pub bonus_per_wave: u32,
    /// Edge length of enemy bodies in pixels.
    pub enemy_size: f32,
    /// Enemy colours cycled by wave.
    pub colors: Vec<Rgb>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            base_enemy_count: 5,
            enemies_per_wave: 3,
            spawn_interval_ms: 1000,
            base_health: 100.0,
            health_per_wave: 20.0,
            base_speed: 80.0,
            speed_per_wave: 10.0,
            base_gold: 25,
            gold_per_wave: 5,
            base_score: 10,
            score_per_wave: 2,
            base_bonus: 50,
            bonus_per_wave: 10,
            enemy_size: 32.0,
            colors: vec![Rgb::RED, Rgb::ORANGE, Rgb::PURPLE, Rgb::DARK_RED, Rgb::CRIMSON],
        }
    }
}

impl WaveConfig {
    /// Delay between two spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Number of enemies spawned by the wave.
    #[must_use]
    pub fn enemy_count(&self, wave: u32) -> u32 {
        let step = wave.saturating_sub(1);
        self.base_enemy_count
            .saturating_add(self.enemies_per_wave.saturating_mul(step))
    }

    /// Gold awarded for clearing the wave.
    #[must_use]
    pub fn completion_bonus(&self, wave: u32) -> u32 {
        self.base_bonus
            .saturating_add(self.bonus_per_wave.saturating_mul(wave))
    }

    /// Attributes of enemies spawned during the wave.
    #[must_use]
    pub fn enemy_stats(&self, wave: u32) -> EnemyStats {
        let step = wave.saturating_sub(1);
        let color = if self.colors.is_empty() {
            Rgb::RED
        } else {
            self.colors[step as usize % self.colors.len()]
        };
        EnemyStats {
            health: self.base_health + self.health_per_wave * step as f32,
            speed: self.base_speed + self.speed_per_wave * step as f32,
            gold_value: self
                .base_gold
                .saturating_add(self.gold_per_wave.saturating_mul(step)),
            score_value: self
                .base_score
                .saturating_add(self.score_per_wave.saturating_mul(step)),
            color,
            size: self.enemy_size,
        }
    }
}

/// Progress of the current wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveState {
    /// One-based number of the latest wave, zero before the first.
    pub current_wave: u32,
    /// Whether the wave still spawns or has enemies alive.
    pub in_progress: bool,
    /// Enemies spawned so far in the wave.
    pub enemies_spawned: u32,
    /// Enemies the wave spawns in total.
    pub enemies_to_spawn: u32,
    /// Time accumulated towards the next spawn.
    pub spawn_timer: Duration,
}

/// Owner of the active enemies and of wave progression.
#[derive(Debug)]
pub struct WaveManager {
    config: WaveConfig,
    path: Arc<[Vector2]>,
    state: WaveState,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
}

impl WaveManager {
    /// Creates a manager that spawns enemies on the provided waypoint path.
    #[must_use]
    pub fn new(config: WaveConfig, path: Arc<[Vector2]>) -> Self {
        Self {
            config,
            path,
            state: WaveState::default(),
            enemies: Vec::new(),
            next_enemy_id: 0,
        }
    }

    /// Tunables used by the manager.
    #[must_use]
    pub const fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Progress of the current wave.
    #[must_use]
    pub const fn state(&self) -> WaveState {
        self.state
    }

    /// Waypoints shared by every enemy.
    #[must_use]
    pub fn path(&self) -> &Arc<[Vector2]> {
        &self.path
    }

    /// Active enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Active enemies in spawn order, mutably.
    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    /// Starts the next wave.
    ///
    /// Returns `false` without side effects while a wave is in progress.
    pub fn start_wave(&mut self, out: &mut Vec<Event>) -> bool {
        if self.state.in_progress {
            debug!(wave = self.state.current_wave, "wave already in progress");
            return false;
        }

        let wave = self.state.current_wave.saturating_add(1);
        let enemies = self.config.enemy_count(wave);
        self.state = WaveState {
            current_wave: wave,
            in_progress: true,
            enemies_spawned: 0,
            enemies_to_spawn: enemies,
            spawn_timer: Duration::ZERO,
        };
        info!(wave, enemies, "wave started");
        out.push(Event::WaveStart { wave, enemies });
        true
    }

    /// Spawns one enemy of the current wave on the first waypoint.
    pub fn spawn_enemy(&mut self, out: &mut Vec<Event>) -> Option<EnemyId> {
        let wave = self.state.current_wave.max(1);
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.state.enemies_spawned = self.state.enemies_spawned.saturating_add(1);

        let Some(enemy) = Enemy::new(id, Arc::clone(&self.path), self.config.enemy_stats(wave))
        else {
            warn!(wave, "cannot spawn enemy on an empty path");
            return None;
        };
        out.push(Event::EnemySpawned {
            enemy: id,
            position: enemy.position(),
            wave,
        });
        self.enemies.push(enemy);
        Some(id)
    }

    /// Runs the spawn timer, then advances every enemy.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.state.in_progress && self.state.enemies_spawned < self.state.enemies_to_spawn {
            self.state.spawn_timer = self.state.spawn_timer.saturating_add(dt);
            if self.state.spawn_timer >= self.config.spawn_interval() {
                self.state.spawn_timer = Duration::ZERO;
                let _ = self.spawn_enemy(out);
            }
        }

        for enemy in &mut self.enemies {
            enemy.update(dt, out);
        }
    }

    /// Drops enemies flagged for deletion and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| !enemy.is_marked());
        before - self.enemies.len()
    }

    /// Ends the wave once every enemy was spawned and none remain.
    ///
    /// Emits [`Event::WaveComplete`] and returns `true` on the call that ends it.
    pub fn check_wave_complete(&mut self, out: &mut Vec<Event>) -> bool {
        if !self.state.in_progress {
            return false;
        }
        if self.state.enemies_spawned < self.state.enemies_to_spawn || !self.enemies.is_empty() {
            return false;
        }

        self.state.in_progress = false;
        let wave = self.state.current_wave;
        let bonus = self.config.completion_bonus(wave);
        info!(wave, bonus, "wave complete");
        out.push(Event::WaveComplete { wave, bonus });
        true
    }

    /// Forgets every enemy and restarts from wave zero.
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.state = WaveState::default();
        self.next_enemy_id = 0;
    }
}
