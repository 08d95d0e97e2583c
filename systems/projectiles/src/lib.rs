#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile system that launches queued projectiles, moves them and resolves
//! their impacts against the active enemies.

use std::time::Duration;

use tower_defence_core::{Command, Event, KillCause, ProjectileId};
use tower_defence_world::{Enemy, Impact, Projectile, TowerRegistry};
use tracing::trace;

/// Owner of every projectile in flight.
#[derive(Debug, Default)]
pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
}

impl ProjectileManager {
    /// Creates a manager without projectiles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Projectiles in launch order.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Launches a projectile for every [`Command::LaunchProjectile`].
    ///
    /// Other commands are ignored.
    pub fn handle(&mut self, commands: &[Command]) {
        for command in commands {
            if let Command::LaunchProjectile {
                tower,
                origin,
                velocity,
                damage,
                max_distance,
                color,
            } = *command
            {
                let id = ProjectileId::new(self.next_projectile_id);
                self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
                self.projectiles.push(Projectile::new(
                    id,
                    tower,
                    origin,
                    velocity,
                    damage,
                    max_distance,
                    color,
                ));
            }
        }
    }

    /// Moves every projectile and resolves collisions.
    ///
    /// Each projectile strikes at most one enemy: the first live enemy, in
    /// iteration order, whose bounding box overlaps its own. Spent projectiles
    /// are dropped before returning.
    pub fn update(
        &mut self,
        dt: Duration,
        enemies: &mut [Enemy],
        towers: &mut TowerRegistry,
        out: &mut Vec<Event>,
    ) {
        for projectile in &mut self.projectiles {
            if !projectile.advance(dt) {
                continue;
            }
            let bounds = projectile.aabb();
            let Some(index) = enemies
                .iter()
                .position(|enemy| enemy.is_alive() && enemy.aabb().intersects(&bounds))
            else {
                continue;
            };
            resolve_hit(projectile, index, enemies, towers, out);
        }

        self.projectiles.retain(|projectile| !projectile.is_marked());
    }

    /// Drops every projectile.
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.next_projectile_id = 0;
    }
}

fn resolve_hit(
    projectile: &mut Projectile,
    index: usize,
    enemies: &mut [Enemy],
    towers: &mut TowerRegistry,
    out: &mut Vec<Event>,
) {
    let source = projectile.source();
    let damage = projectile.damage();
    let enemy = &mut enemies[index];
    let enemy_id = enemy.id();
    let lethal = enemy.take_damage(damage);
    let tower = towers.get_mut(source);
    trace!(
        projectile = projectile.id().get(),
        enemy = enemy_id.get(),
        damage,
        lethal,
        "projectile hit"
    );

    if lethal {
        out.push(Event::EnemyKilled {
            enemy: enemy_id,
            tower: tower.as_ref().map(|tower| tower.id()),
            position: enemy.position(),
            gold: enemy.gold_value(),
            score: enemy.score_value(),
            cause: KillCause::Projectile,
        });
    }

    if let Some(tower) = tower {
        let impact = Impact {
            projectile: projectile.id(),
            enemy_index: index,
            enemy: enemy_id,
            position: projectile.position(),
            damage,
            lethal,
        };
        tower.resolve_hit(&impact, enemies, out);
    }

    projectile.mark_for_deletion();
    out.push(Event::ProjectileHit {
        projectile: projectile.id(),
        enemy: enemy_id,
        tower: source,
        damage,
    });
}
