//! Behaviours composed into towers.

use std::{collections::BTreeSet, time::Duration};

use tower_defence_core::{
    Command, ComponentKind, ComponentSpec, EnemyId, Event, KillCause, PoisonConfig, ProjectileId,
    ShootingConfig, SlowConfig, SplashConfig, TowerId, Vector2,
};
use tracing::debug;

use crate::Enemy;

/// Kill and damage counters of a tower.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TowerStats {
    /// Enemies killed by the tower.
    pub kills: u32,
    /// Damage dealt by the tower.
    pub total_damage: f32,
}

/// Targeting state of a tower's barrel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aim {
    /// Enemy currently tracked, if any.
    pub target: Option<EnemyId>,
    /// Barrel heading in radians.
    pub angle: f32,
}

/// Tower-owned state a component may read or update.
#[derive(Debug)]
pub struct TowerFrame<'a> {
    /// Tower executing the component.
    pub tower: TowerId,
    /// Centre of the tower.
    pub center: Vector2,
    /// Counters credited with damage and kills.
    pub stats: &'a mut TowerStats,
    /// Barrel state updated by launchers.
    pub aim: &'a mut Aim,
}

/// Simulation state shared with components during a tower update.
#[derive(Debug)]
pub struct CombatContext<'a> {
    /// Active enemies in spawn order.
    pub enemies: &'a mut [Enemy],
    /// Commands requested by components.
    pub commands: &'a mut Vec<Command>,
    /// Events reported by components.
    pub events: &'a mut Vec<Event>,
}

/// Projectile impact forwarded to the source tower's components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// Projectile that struck.
    pub projectile: ProjectileId,
    /// Index of the struck enemy in the enemy slice.
    pub enemy_index: usize,
    /// Identifier of the struck enemy.
    pub enemy: EnemyId,
    /// Impact point.
    pub position: Vector2,
    /// Damage dealt by the projectile.
    pub damage: f32,
    /// Whether the impact killed the enemy.
    pub lethal: bool,
}

/// Projectile launcher state.
#[derive(Clone, Debug, PartialEq)]
pub struct Shooting {
    config: ShootingConfig,
    cooldown: Duration,
}

impl Shooting {
    /// Launcher parameters.
    #[must_use]
    pub const fn config(&self) -> &ShootingConfig {
        &self.config
    }

    /// Time left before the launcher may fire again.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn update(&mut self, dt: Duration, frame: &mut TowerFrame<'_>, ctx: &mut CombatContext<'_>) {
        self.cooldown = self.cooldown.saturating_sub(dt);
        if !self.cooldown.is_zero() {
            return;
        }

        let Some(index) = closest_enemy(ctx.enemies, frame.center, self.config.range) else {
            frame.aim.target = None;
            return;
        };
        let target = &ctx.enemies[index];
        let Some(direction) = (target.position() - frame.center).normalize() else {
            return;
        };

        frame.aim.target = Some(target.id());
        frame.aim.angle = direction.angle();
        ctx.commands.push(Command::LaunchProjectile {
            tower: frame.tower,
            origin: frame.center,
            velocity: direction * self.config.projectile_speed,
            damage: self.config.damage,
            max_distance: self.config.max_projectile_distance(),
            color: self.config.projectile_color,
        });
        ctx.events.push(Event::TowerShoot {
            tower: frame.tower,
            target: target.id(),
            origin: frame.center,
        });
        self.cooldown = self.config.fire_rate();
    }
}

/// Area slow aura state.
#[derive(Clone, Debug, PartialEq)]
pub struct Slow {
    config: SlowConfig,
    timer: Duration,
}

impl Slow {
    /// Aura parameters.
    #[must_use]
    pub const fn config(&self) -> &SlowConfig {
        &self.config
    }

    fn update(&mut self, dt: Duration, frame: &TowerFrame<'_>, ctx: &mut CombatContext<'_>) {
        self.timer = self.timer.saturating_add(dt);
        if self.timer < self.config.tick_rate() {
            return;
        }
        self.timer = Duration::ZERO;

        for enemy in ctx.enemies.iter_mut() {
            if !enemy.is_alive() || enemy.position().distance_to(frame.center) > self.config.range {
                continue;
            }
            enemy.apply_slow(frame.tower, self.config.slow_amount, self.config.duration());
            ctx.events.push(Event::SlowApplied {
                tower: frame.tower,
                enemy: enemy.id(),
                amount: self.config.slow_amount,
            });
        }
    }
}

/// Animated splash explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    position: Vector2,
    radius: f32,
    age: Duration,
    lifetime: Duration,
}

impl Explosion {
    /// Impact point.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Full radius of the explosion.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Animation progress within `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.lifetime.is_zero() {
            return 1.0;
        }
        (self.age.as_secs_f32() / self.lifetime.as_secs_f32()).min(1.0)
    }
}

/// Area damage state.
#[derive(Clone, Debug, PartialEq)]
pub struct Splash {
    config: SplashConfig,
    explosions: Vec<Explosion>,
}

impl Splash {
    /// Area damage parameters.
    #[must_use]
    pub const fn config(&self) -> &SplashConfig {
        &self.config
    }

    /// Explosions still animating.
    #[must_use]
    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    fn update(&mut self, dt: Duration) {
        for explosion in &mut self.explosions {
            explosion.age = explosion.age.saturating_add(dt);
        }
        self.explosions
            .retain(|explosion| explosion.age < explosion.lifetime);
    }

    fn on_projectile_hit(
        &mut self,
        frame: &mut TowerFrame<'_>,
        impact: &Impact,
        enemies: &mut [Enemy],
        events: &mut Vec<Event>,
    ) {
        let damage = self.config.splash_damage(impact.damage);
        let mut enemies_hit = 0;
        if damage > 0.0 {
            for (index, enemy) in enemies.iter_mut().enumerate() {
                if index == impact.enemy_index || !enemy.is_alive() {
                    continue;
                }
                if enemy.position().distance_to(impact.position) > self.config.splash_radius {
                    continue;
                }
                let lethal = enemy.take_damage(damage);
                frame.stats.total_damage += damage;
                enemies_hit += 1;
                if lethal {
                    frame.stats.kills += 1;
                    events.push(Event::EnemyKilled {
                        enemy: enemy.id(),
                        tower: Some(frame.tower),
                        position: enemy.position(),
                        gold: enemy.gold_value(),
                        score: enemy.score_value(),
                        cause: KillCause::Splash,
                    });
                }
            }
        }

        events.push(Event::SplashDamage {
            tower: frame.tower,
            position: impact.position,
            radius: self.config.splash_radius,
            damage,
            enemies_hit,
        });
        self.explosions.push(Explosion {
            position: impact.position,
            radius: self.config.splash_radius,
            age: Duration::ZERO,
            lifetime: self.config.explosion_lifetime(),
        });
    }
}

/// Damage over time state.
#[derive(Clone, Debug, PartialEq)]
pub struct Poison {
    config: PoisonConfig,
    tracked: BTreeSet<EnemyId>,
}

impl Poison {
    /// Damage over time parameters.
    #[must_use]
    pub const fn config(&self) -> &PoisonConfig {
        &self.config
    }

    /// Number of enemies currently poisoned by the tower.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    fn update(&mut self, dt: Duration, frame: &mut TowerFrame<'_>, ctx: &mut CombatContext<'_>) {
        let tower = frame.tower;
        let enemies = &*ctx.enemies;
        self.tracked.retain(|id| {
            enemies
                .iter()
                .any(|enemy| enemy.id() == *id && enemy.is_alive() && enemy.has_poison_from(tower))
        });

        for enemy in ctx.enemies.iter_mut() {
            if !self.tracked.contains(&enemy.id()) {
                continue;
            }
            let Some(damage) = enemy.advance_poison(tower, dt) else {
                continue;
            };
            let lethal = enemy.take_damage(damage);
            frame.stats.total_damage += damage;
            ctx.events.push(Event::PoisonTick {
                tower,
                enemy: enemy.id(),
                damage,
            });
            if lethal {
                frame.stats.kills += 1;
                ctx.events.push(Event::EnemyKilled {
                    enemy: enemy.id(),
                    tower: Some(tower),
                    position: enemy.position(),
                    gold: enemy.gold_value(),
                    score: enemy.score_value(),
                    cause: KillCause::Poison,
                });
            }
        }
    }

    fn on_projectile_hit(
        &mut self,
        frame: &TowerFrame<'_>,
        impact: &Impact,
        enemies: &mut [Enemy],
        events: &mut Vec<Event>,
    ) {
        let Some(enemy) = enemies.get_mut(impact.enemy_index) else {
            return;
        };
        if !enemy.is_alive() {
            return;
        }
        enemy.apply_poison(
            frame.tower,
            self.config.poison_damage,
            self.config.duration(),
            self.config.tick_rate(),
        );
        let _ = self.tracked.insert(enemy.id());
        events.push(Event::PoisonApplied {
            tower: frame.tower,
            enemy: enemy.id(),
            damage_per_tick: self.config.poison_damage,
        });
    }
}

/// Behaviour variant carried by a component.
#[derive(Clone, Debug, PartialEq)]
pub enum Behaviour {
    /// Projectile launcher.
    Shooting(Shooting),
    /// Periodic area slow.
    Slow(Slow),
    /// Area damage on projectile impact.
    Splash(Splash),
    /// Damage over time on projectile impact.
    Poison(Poison),
}

/// Behaviour attached to a tower together with its enabled flag.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    enabled: bool,
    behaviour: Behaviour,
}

impl Component {
    /// Instantiates an enabled component from its catalogue description.
    #[must_use]
    pub fn from_spec(spec: &ComponentSpec) -> Self {
        let behaviour = match *spec {
            ComponentSpec::Shooting(config) => Behaviour::Shooting(Shooting {
                config,
                cooldown: Duration::ZERO,
            }),
            ComponentSpec::Slow(config) => Behaviour::Slow(Slow {
                config,
                timer: Duration::ZERO,
            }),
            ComponentSpec::Splash(config) => Behaviour::Splash(Splash {
                config,
                explosions: Vec::new(),
            }),
            ComponentSpec::Poison(config) => Behaviour::Poison(Poison {
                config,
                tracked: BTreeSet::new(),
            }),
        };
        Self {
            enabled: true,
            behaviour,
        }
    }

    /// Discriminant of the behaviour.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self.behaviour {
            Behaviour::Shooting(_) => ComponentKind::Shooting,
            Behaviour::Slow(_) => ComponentKind::Slow,
            Behaviour::Splash(_) => ComponentKind::Splash,
            Behaviour::Poison(_) => ComponentKind::Poison,
        }
    }

    /// Behaviour and its runtime state.
    #[must_use]
    pub const fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }

    /// Reports whether the component takes part in updates and hooks.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables the component.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn on_add(&mut self, tower: TowerId) {
        self.reset();
        debug!(tower = tower.get(), component = ?self.kind(), "component attached");
    }

    pub(crate) fn on_remove(&mut self, tower: TowerId) {
        self.reset();
        debug!(tower = tower.get(), component = ?self.kind(), "component detached");
    }

    fn reset(&mut self) {
        match &mut self.behaviour {
            Behaviour::Shooting(shooting) => shooting.cooldown = Duration::ZERO,
            Behaviour::Slow(slow) => slow.timer = Duration::ZERO,
            Behaviour::Splash(splash) => splash.explosions.clear(),
            Behaviour::Poison(poison) => poison.tracked.clear(),
        }
    }

    pub(crate) fn update(
        &mut self,
        dt: Duration,
        frame: &mut TowerFrame<'_>,
        ctx: &mut CombatContext<'_>,
    ) {
        if !self.enabled {
            return;
        }
        match &mut self.behaviour {
            Behaviour::Shooting(shooting) => shooting.update(dt, frame, ctx),
            Behaviour::Slow(slow) => slow.update(dt, frame, ctx),
            Behaviour::Splash(splash) => splash.update(dt),
            Behaviour::Poison(poison) => poison.update(dt, frame, ctx),
        }
    }

    pub(crate) fn on_projectile_hit(
        &mut self,
        frame: &mut TowerFrame<'_>,
        impact: &Impact,
        enemies: &mut [Enemy],
        events: &mut Vec<Event>,
    ) {
        if !self.enabled {
            return;
        }
        match &mut self.behaviour {
            Behaviour::Splash(splash) => splash.on_projectile_hit(frame, impact, enemies, events),
            Behaviour::Poison(poison) => {
                if !impact.lethal {
                    poison.on_projectile_hit(frame, impact, enemies, events);
                }
            }
            Behaviour::Shooting(_) | Behaviour::Slow(_) => {}
        }
    }
}

fn closest_enemy(enemies: &[Enemy], origin: Vector2, range: f32) -> Option<usize> {
    let mut best = None;
    let mut best_distance = range;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_alive() {
            continue;
        }
        let distance = enemy.position().distance_to(origin);
        if distance < best_distance {
            best_distance = distance;
            best = Some(index);
        }
    }
    best
}
