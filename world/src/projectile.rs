//! Projectiles launched by towers.

use std::time::Duration;

use tower_defence_core::{Aabb, ProjectileId, ProjectileSnapshot, Rgb, TowerId, Vector2};

use crate::{Anchor, Body};

/// Edge length of a projectile in pixels.
pub const PROJECTILE_SIZE: f32 = 8.0;

/// Projectile travelling in a straight line until it hits or expires.
#[derive(Clone, Debug)]
pub struct Projectile {
    id: ProjectileId,
    body: Body,
    velocity: Vector2,
    damage: f32,
    source: TowerId,
    distance_traveled: f32,
    max_distance: f32,
    color: Rgb,
}

impl Projectile {
    /// Creates a projectile centred on `origin`.
    #[must_use]
    pub fn new(
        id: ProjectileId,
        source: TowerId,
        origin: Vector2,
        velocity: Vector2,
        damage: f32,
        max_distance: f32,
        color: Rgb,
    ) -> Self {
        Self {
            id,
            body: Body::new(origin, PROJECTILE_SIZE, PROJECTILE_SIZE, Anchor::Center),
            velocity,
            damage,
            source,
            distance_traveled: 0.0,
            max_distance,
            color,
        }
    }

    /// Identifier of the projectile.
    #[must_use]
    pub const fn id(&self) -> ProjectileId {
        self.id
    }

    /// Tower credited with the projectile's hits.
    #[must_use]
    pub const fn source(&self) -> TowerId {
        self.source
    }

    /// Centre of the projectile.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.body.position()
    }

    /// Velocity in pixels per second.
    #[must_use]
    pub const fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Damage dealt on impact.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Distance covered since launch.
    #[must_use]
    pub const fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Bounding box of the projectile.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        self.body.aabb()
    }

    /// Reports whether the projectile awaits removal.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.body.is_marked()
    }

    /// Flags the projectile for removal.
    pub fn mark_for_deletion(&mut self) {
        self.body.mark_for_deletion();
    }

    /// Moves the projectile and expires it once it exceeds its range.
    ///
    /// Returns `true` while the projectile is still in flight.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.is_marked() {
            return false;
        }
        let seconds = dt.as_secs_f32();
        self.body.translate(self.velocity, seconds);
        self.distance_traveled += self.velocity.length() * seconds;
        if self.distance_traveled > self.max_distance {
            self.body.mark_for_deletion();
            return false;
        }
        true
    }

    /// Captures presentation data.
    #[must_use]
    pub fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position(),
            size: self.body.width(),
            color: self.color,
        }
    }
}
