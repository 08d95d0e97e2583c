//! Static catalogue describing every constructible tower type.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{PlacementError, Rgb};

/// Identifier of a tower type listed in the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerTypeId {
    /// Single-target cannon.
    Cannon,
    /// Shooter with an area slow aura.
    Ice,
    /// Shooter whose hits damage nearby enemies.
    Splash,
    /// Shooter whose hits apply damage over time.
    Poison,
}

impl TowerTypeId {
    /// Every tower type in hotkey order.
    pub const ALL: [Self; 4] = [Self::Cannon, Self::Ice, Self::Splash, Self::Poison];

    /// Lower-case catalogue key of the tower type.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Cannon => "cannon",
            Self::Ice => "ice",
            Self::Splash => "splash",
            Self::Poison => "poison",
        }
    }

    /// Digit key that selects the tower type.
    #[must_use]
    pub const fn hotkey(&self) -> u8 {
        match self {
            Self::Cannon => 1,
            Self::Ice => 2,
            Self::Splash => 3,
            Self::Poison => 4,
        }
    }

    /// Resolves a digit key into a tower type.
    #[must_use]
    pub fn from_hotkey(digit: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.hotkey() == digit)
    }
}

impl fmt::Display for TowerTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TowerTypeId {
    type Err = PlacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == normalized)
            .ok_or_else(|| PlacementError::UnknownTowerType(value.to_owned()))
    }
}

/// Discriminant of a tower component, used for lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Projectile launcher.
    Shooting,
    /// Periodic area slow.
    Slow,
    /// Area damage on projectile impact.
    Splash,
    /// Damage over time on projectile impact.
    Poison,
}

/// Projectile launcher parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShootingConfig {
    /// Damage dealt by each projectile.
    pub damage: f32,
    /// Cooldown between shots in milliseconds.
    pub fire_rate_ms: u64,
    /// Maximum targeting distance in pixels.
    pub range: f32,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
    /// Colour of launched projectiles.
    pub projectile_color: Rgb,
}

impl ShootingConfig {
    /// Cooldown between shots.
    #[must_use]
    pub const fn fire_rate(&self) -> Duration {
        Duration::from_millis(self.fire_rate_ms)
    }

    /// Distance a projectile may travel before expiring.
    #[must_use]
    pub fn max_projectile_distance(&self) -> f32 {
        self.range * 1.5
    }
}

/// Area slow aura parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowConfig {
    /// Radius of the aura in pixels.
    pub range: f32,
    /// Speed multiplier applied to slowed enemies, within `(0, 1]`.
    pub slow_amount: f32,
    /// Lifetime of each application in milliseconds.
    pub duration_ms: u64,
    /// Interval between aura pulses in milliseconds.
    pub tick_rate_ms: u64,
}

impl SlowConfig {
    /// Lifetime of each application.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Interval between aura pulses.
    #[must_use]
    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Area damage parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplashConfig {
    /// Radius around the impact point in pixels.
    pub splash_radius: f32,
    /// Fraction of the projectile damage dealt to secondary targets.
    pub splash_damage_percent: f32,
    /// Lifetime of the explosion visual in milliseconds.
    #[serde(default = "default_explosion_ms")]
    pub explosion_ms: u64,
}

fn default_explosion_ms() -> u64 {
    300
}

impl SplashConfig {
    /// Damage dealt to each secondary target for the provided projectile damage.
    #[must_use]
    pub fn splash_damage(&self, projectile_damage: f32) -> f32 {
        (projectile_damage * self.splash_damage_percent).floor()
    }

    /// Lifetime of the explosion visual.
    #[must_use]
    pub const fn explosion_lifetime(&self) -> Duration {
        Duration::from_millis(self.explosion_ms)
    }
}

/// Damage over time parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoisonConfig {
    /// Lifetime of the poison in milliseconds.
    pub poison_duration_ms: u64,
    /// Damage dealt on every tick.
    pub poison_damage: f32,
    /// Interval between ticks in milliseconds.
    pub tick_rate_ms: u64,
    /// Reach of the poison, reported for presentation.
    pub range: f32,
}

impl PoisonConfig {
    /// Lifetime of the poison.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.poison_duration_ms)
    }

    /// Interval between ticks.
    #[must_use]
    pub const fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Declarative description of a component attached to a tower type.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "lowercase")]
pub enum ComponentSpec {
    /// Projectile launcher.
    Shooting(ShootingConfig),
    /// Periodic area slow.
    Slow(SlowConfig),
    /// Area damage on projectile impact.
    Splash(SplashConfig),
    /// Damage over time on projectile impact.
    Poison(PoisonConfig),
}

impl ComponentSpec {
    /// Discriminant of the described component.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Shooting(_) => ComponentKind::Shooting,
            Self::Slow(_) => ComponentKind::Slow,
            Self::Splash(_) => ComponentKind::Splash,
            Self::Poison(_) => ComponentKind::Poison,
        }
    }
}

/// Catalogue entry describing a constructible tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerType {
    /// Identifier of the entry.
    pub id: TowerTypeId,
    /// Display name.
    pub name: String,
    /// Short description shown in menus.
    pub description: String,
    /// Gold required to build the tower.
    pub cost: u32,
    /// Body colour of the tower.
    pub color: Rgb,
    /// Barrel and outline colour of the tower.
    pub barrel_color: Rgb,
    /// Components instantiated for every tower of this type.
    pub components: Vec<ComponentSpec>,
}

impl TowerType {
    /// Shooting parameters of the type, when it has a launcher.
    #[must_use]
    pub fn shooting(&self) -> Option<&ShootingConfig> {
        self.components.iter().find_map(|spec| match spec {
            ComponentSpec::Shooting(config) => Some(config),
            _ => None,
        })
    }

    /// Reports whether the type carries a component of the provided kind.
    #[must_use]
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|spec| spec.kind() == kind)
    }
}

/// Keyed collection of tower types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerCatalogue {
    types: Vec<TowerType>,
}

impl TowerCatalogue {
    /// Creates a catalogue from explicit entries.
    #[must_use]
    pub fn new(types: Vec<TowerType>) -> Self {
        Self { types }
    }

    /// Builds the standard four-tower catalogue.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            TowerType {
                id: TowerTypeId::Cannon,
                name: "Cannon Tower".to_owned(),
                description: "Basic shooting tower".to_owned(),
                cost: 100,
                color: Rgb::GRAY,
                barrel_color: Rgb::DARK_BLUE,
                components: vec![ComponentSpec::Shooting(ShootingConfig {
                    damage: 50.0,
                    fire_rate_ms: 1000,
                    range: 200.0,
                    projectile_speed: 600.0,
                    projectile_color: Rgb::YELLOW,
                })],
            },
            TowerType {
                id: TowerTypeId::Ice,
                name: "Ice Tower".to_owned(),
                description: "Slows enemies and shoots".to_owned(),
                cost: 150,
                color: Rgb::LIGHT_BLUE,
                barrel_color: Rgb::BLUE,
                components: vec![
                    ComponentSpec::Shooting(ShootingConfig {
                        damage: 30.0,
                        fire_rate_ms: 1200,
                        range: 180.0,
                        projectile_speed: 500.0,
                        projectile_color: Rgb::CYAN,
                    }),
                    ComponentSpec::Slow(SlowConfig {
                        range: 150.0,
                        slow_amount: 0.5,
                        duration_ms: 3000,
                        tick_rate_ms: 500,
                    }),
                ],
            },
            TowerType {
                id: TowerTypeId::Splash,
                name: "Splash Tower".to_owned(),
                description: "Area damage on hit".to_owned(),
                cost: 200,
                color: Rgb::ORANGE,
                barrel_color: Rgb::DARK_ORANGE,
                components: vec![
                    ComponentSpec::Shooting(ShootingConfig {
                        damage: 40.0,
                        fire_rate_ms: 1500,
                        range: 220.0,
                        projectile_speed: 400.0,
                        projectile_color: Rgb::ORANGE,
                    }),
                    ComponentSpec::Splash(SplashConfig {
                        splash_radius: 80.0,
                        splash_damage_percent: 0.5,
                        explosion_ms: default_explosion_ms(),
                    }),
                ],
            },
            TowerType {
                id: TowerTypeId::Poison,
                name: "Poison Tower".to_owned(),
                description: "Damage over time".to_owned(),
                cost: 175,
                color: Rgb::GREEN,
                barrel_color: Rgb::DARK_GREEN,
                components: vec![
                    ComponentSpec::Shooting(ShootingConfig {
                        damage: 20.0,
                        fire_rate_ms: 1000,
                        range: 200.0,
                        projectile_speed: 500.0,
                        projectile_color: Rgb::LIME,
                    }),
                    ComponentSpec::Poison(PoisonConfig {
                        poison_duration_ms: 5000,
                        poison_damage: 10.0,
                        tick_rate_ms: 500,
                        range: 200.0,
                    }),
                ],
            },
        ])
    }

    /// Looks up an entry by its key, ignoring case. Unknown keys yield `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TowerType> {
        let kind = key.parse::<TowerTypeId>().ok()?;
        self.get_kind(kind)
    }

    /// Looks up an entry by identifier.
    #[must_use]
    pub fn get_kind(&self, kind: TowerTypeId) -> Option<&TowerType> {
        self.types.iter().find(|entry| entry.id == kind)
    }

    /// Iterates over every entry in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerType> {
        self.types.iter()
    }

    /// Number of entries in the catalogue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Reports whether the catalogue holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TowerCatalogue {
    fn default() -> Self {
        Self::standard()
    }
}
