//! Path-following enemies and the timed status effects attached to them.

use std::{sync::Arc, time::Duration};

use tower_defence_core::{Aabb, EnemyId, EnemySnapshot, Event, Rgb, TowerId, Vector2};

use crate::{Anchor, Body};

/// Distance at which an enemy counts as having reached its waypoint.
pub const WAYPOINT_EPSILON: f32 = 5.0;

/// Lives removed when an enemy reaches the end of the path.
pub const LEAK_DAMAGE: u32 = 1;

/// Attributes assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health at spawn.
    pub health: f32,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Gold awarded when the enemy is killed.
    pub gold_value: u32,
    /// Score awarded when the enemy is killed.
    pub score_value: u32,
    /// Body colour.
    pub color: Rgb,
    /// Edge length of the square body in pixels.
    pub size: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            speed: 80.0,
            gold_value: 25,
            score_value: 10,
            color: Rgb::RED,
            size: 32.0,
        }
    }
}

/// Lifecycle of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStatus {
    /// Walking the path.
    Alive,
    /// Health reached zero.
    Dead,
    /// Walked past the final waypoint.
    ReachedEnd,
}

/// Slow or poison applied by a tower, measured in simulation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEffect {
    source: TowerId,
    magnitude: f32,
    remaining: Duration,
    tick_interval: Duration,
    tick_accumulator: Duration,
}

impl TimedEffect {
    /// Tower that applied the effect.
    #[must_use]
    pub const fn source(&self) -> TowerId {
        self.source
    }

    /// Speed multiplier for slows, damage per tick for poisons.
    #[must_use]
    pub const fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Time left before the effect expires.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Enemy walking the shared waypoint path.
#[derive(Clone, Debug)]
pub struct Enemy {
    id: EnemyId,
    body: Body,
    path: Arc<[Vector2]>,
    waypoint: usize,
    velocity: Vector2,
    speed: f32,
    speed_multiplier: f32,
    health: f32,
    max_health: f32,
    slows: Vec<TimedEffect>,
    poisons: Vec<TimedEffect>,
    gold_value: u32,
    score_value: u32,
    color: Rgb,
    status: EnemyStatus,
}

impl Enemy {
    /// Spawns an enemy on the first waypoint, heading for the second.
    ///
    /// Returns `None` when the path has no waypoints.
    #[must_use]
    pub fn new(id: EnemyId, path: Arc<[Vector2]>, stats: EnemyStats) -> Option<Self> {
        let start = *path.first()?;
        Some(Self {
            id,
            body: Body::new(start, stats.size, stats.size, Anchor::Center),
            path,
            waypoint: 1,
            velocity: Vector2::ZERO,
            speed: stats.speed,
            speed_multiplier: 1.0,
            health: stats.health,
            max_health: stats.health,
            slows: Vec::new(),
            poisons: Vec::new(),
            gold_value: stats.gold_value,
            score_value: stats.score_value,
            color: stats.color,
            status: EnemyStatus::Alive,
        })
    }

    /// Identifier of the enemy.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Centre of the enemy.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.body.position()
    }

    /// Bounding box of the enemy.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Velocity applied on the last update, in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Base speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Multiplier applied by the strongest active slow.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Gold awarded for the kill.
    #[must_use]
    pub const fn gold_value(&self) -> u32 {
        self.gold_value
    }

    /// Score awarded for the kill.
    #[must_use]
    pub const fn score_value(&self) -> u32 {
        self.score_value
    }

    /// Index of the waypoint the enemy is heading to.
    #[must_use]
    pub const fn waypoint_index(&self) -> usize {
        self.waypoint
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> EnemyStatus {
        self.status
    }

    /// Reports whether the enemy awaits removal.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.body.is_marked()
    }

    /// Reports whether the enemy can still be targeted and damaged.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive && !self.body.is_marked() && self.health > 0.0
    }

    /// Active slows.
    #[must_use]
    pub fn slow_effects(&self) -> &[TimedEffect] {
        &self.slows
    }

    /// Active poisons.
    #[must_use]
    pub fn poison_effects(&self) -> &[TimedEffect] {
        &self.poisons
    }

    /// Flags the enemy for removal without changing its status.
    pub fn mark_for_deletion(&mut self) {
        self.body.mark_for_deletion();
    }

    /// Advances effects and movement by `dt`.
    ///
    /// Emits [`Event::EnemyReachedEnd`] on the tick the final waypoint is passed.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if !self.is_alive() {
            return;
        }

        age_effects(&mut self.slows, dt);
        age_effects(&mut self.poisons, dt);
        self.recompute_speed_multiplier();

        let Some(target) = self.path.get(self.waypoint).copied() else {
            self.reach_end(out);
            return;
        };

        let offset = target - self.position();
        let distance = offset.length();
        match offset.normalize() {
            Some(direction) => {
                let speed = self.speed * self.speed_multiplier;
                let travel = (speed * dt.as_secs_f32()).min(distance);
                self.velocity = direction * speed;
                self.body.translate(direction, travel);
            }
            None => self.velocity = Vector2::ZERO,
        }

        if self.position().distance_to(target) < WAYPOINT_EPSILON {
            self.waypoint += 1;
            if self.waypoint >= self.path.len() {
                self.reach_end(out);
            }
        }
    }

    fn reach_end(&mut self, out: &mut Vec<Event>) {
        self.status = EnemyStatus::ReachedEnd;
        self.velocity = Vector2::ZERO;
        self.body.mark_for_deletion();
        out.push(Event::EnemyReachedEnd {
            enemy: self.id,
            damage: LEAK_DAMAGE,
        });
    }

    /// Subtracts health and reports whether this call killed the enemy.
    ///
    /// Calls on dead, leaked or marked enemies are ignored and return `false`,
    /// so a kill is reported exactly once.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health > 0.0 {
            return false;
        }
        self.status = EnemyStatus::Dead;
        self.velocity = Vector2::ZERO;
        self.body.mark_for_deletion();
        true
    }

    /// Applies a slow, refreshing any slow previously applied by the same tower.
    pub fn apply_slow(&mut self, source: TowerId, magnitude: f32, duration: Duration) {
        let magnitude = magnitude.clamp(f32::MIN_POSITIVE, 1.0);
        upsert_effect(
            &mut self.slows,
            TimedEffect {
                source,
                magnitude,
                remaining: duration,
                tick_interval: Duration::ZERO,
                tick_accumulator: Duration::ZERO,
            },
        );
        self.recompute_speed_multiplier();
    }

    /// Applies a poison, refreshing any poison previously applied by the same tower.
    pub fn apply_poison(
        &mut self,
        source: TowerId,
        damage_per_tick: f32,
        duration: Duration,
        tick_interval: Duration,
    ) {
        upsert_effect(
            &mut self.poisons,
            TimedEffect {
                source,
                magnitude: damage_per_tick,
                remaining: duration,
                tick_interval,
                tick_accumulator: Duration::ZERO,
            },
        );
    }

    /// Reports whether a poison from the tower is active.
    #[must_use]
    pub fn has_poison_from(&self, source: TowerId) -> bool {
        self.poisons.iter().any(|effect| effect.source == source)
    }

    /// Accumulates `dt` on the tower's poison and returns the damage due, if a
    /// tick elapsed. Damage is not applied here.
    pub fn advance_poison(&mut self, source: TowerId, dt: Duration) -> Option<f32> {
        let effect = self
            .poisons
            .iter_mut()
            .find(|effect| effect.source == source)?;
        effect.tick_accumulator = effect.tick_accumulator.saturating_add(dt);
        if effect.tick_accumulator < effect.tick_interval {
            return None;
        }
        effect.tick_accumulator = effect.tick_accumulator.saturating_sub(effect.tick_interval);
        Some(effect.magnitude)
    }

    fn recompute_speed_multiplier(&mut self) {
        self.speed_multiplier = self
            .slows
            .iter()
            .map(TimedEffect::magnitude)
            .fold(1.0, f32::min);
    }

    /// Captures presentation data.
    #[must_use]
    pub fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position(),
            size: Vector2::new(self.body.width(), self.body.height()),
            health: self.health,
            max_health: self.max_health,
            color: self.color,
            slowed: !self.slows.is_empty(),
            poisoned: !self.poisons.is_empty(),
        }
    }
}

fn age_effects(effects: &mut Vec<TimedEffect>, dt: Duration) {
    for effect in effects.iter_mut() {
        effect.remaining = effect.remaining.saturating_sub(dt);
    }
    effects.retain(|effect| !effect.remaining.is_zero());
}

fn upsert_effect(effects: &mut Vec<TimedEffect>, effect: TimedEffect) {
    match effects
        .iter_mut()
        .find(|existing| existing.source == effect.source)
    {
        Some(existing) => {
            existing.magnitude = effect.magnitude;
            existing.remaining = effect.remaining;
            existing.tick_interval = effect.tick_interval;
        }
        None => effects.push(effect),
    }
}
