//! Towers as containers of composable behaviours.

use std::time::Duration;

use tower_defence_core::{
    CellCoord, ComponentKind, Event, Rgb, TowerId, TowerSnapshot, TowerType, TowerTypeId, Vector2,
};

use crate::{
    Aim, Anchor, Behaviour, Body, CombatContext, Component, Enemy, Explosion, Impact, TowerFrame,
    TowerStats,
};

/// Tower placed on a grid cell.
///
/// The tower itself holds no combat logic; every behaviour lives in its
/// components, which it updates in insertion order.
#[derive(Clone, Debug)]
pub struct Tower {
    id: TowerId,
    kind: TowerTypeId,
    name: String,
    cell: CellCoord,
    body: Body,
    color: Rgb,
    barrel_color: Rgb,
    components: Vec<Component>,
    stats: TowerStats,
    aim: Aim,
}

impl Tower {
    /// Builds a tower and attaches every component listed by the catalogue entry.
    #[must_use]
    pub fn from_type(
        id: TowerId,
        cell: CellCoord,
        top_left: Vector2,
        size: f32,
        tower_type: &TowerType,
    ) -> Self {
        let mut tower = Self {
            id,
            kind: tower_type.id,
            name: tower_type.name.clone(),
            cell,
            body: Body::new(top_left, size, size, Anchor::TopLeft),
            color: tower_type.color,
            barrel_color: tower_type.barrel_color,
            components: Vec::with_capacity(tower_type.components.len()),
            stats: TowerStats::default(),
            aim: Aim::default(),
        };
        for spec in &tower_type.components {
            tower.add_component(Component::from_spec(spec));
        }
        tower
    }

    /// Identifier of the tower.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Catalogue entry the tower was built from.
    #[must_use]
    pub const fn kind(&self) -> TowerTypeId {
        self.kind
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell hosting the tower.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Top-left corner of the tower.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.body.position()
    }

    /// Centre of the tower, used as the firing origin.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.body.center()
    }

    /// Kill and damage counters.
    #[must_use]
    pub const fn stats(&self) -> TowerStats {
        self.stats
    }

    /// Barrel state.
    #[must_use]
    pub const fn aim(&self) -> Aim {
        self.aim
    }

    /// Components in insertion order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Attaches a component and runs its `on_add` hook.
    pub fn add_component(&mut self, mut component: Component) {
        component.on_add(self.id);
        self.components.push(component);
    }

    /// Detaches the first component of the kind, running its `on_remove` hook.
    pub fn remove_component(&mut self, kind: ComponentKind) -> Option<Component> {
        let index = self
            .components
            .iter()
            .position(|component| component.kind() == kind)?;
        let mut component = self.components.remove(index);
        component.on_remove(self.id);
        Some(component)
    }

    /// First component of the kind.
    #[must_use]
    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.kind() == kind)
    }

    /// First component of the kind, mutably.
    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut Component> {
        self.components
            .iter_mut()
            .find(|component| component.kind() == kind)
    }

    /// Runs every component's `on_remove` hook before the tower is demolished.
    pub fn detach_all(&mut self) {
        for component in &mut self.components {
            component.on_remove(self.id);
        }
    }

    /// Credits the tower with a kill.
    pub fn register_kill(&mut self) {
        self.stats.kills += 1;
    }

    /// Credits the tower with dealt damage.
    pub fn register_damage(&mut self, damage: f32) {
        self.stats.total_damage += damage;
    }

    /// Forwards the tick to every enabled component.
    pub fn update(&mut self, dt: Duration, ctx: &mut CombatContext<'_>) {
        let center = self.body.center();
        let mut frame = TowerFrame {
            tower: self.id,
            center,
            stats: &mut self.stats,
            aim: &mut self.aim,
        };
        for component in &mut self.components {
            component.update(dt, &mut frame, ctx);
        }
    }

    /// Resolves the tower-side consequences of one of its projectiles striking.
    ///
    /// Poison attaches to surviving targets first, then the kill and damage are
    /// credited, and splash damage is dealt last.
    pub fn resolve_hit(&mut self, impact: &Impact, enemies: &mut [Enemy], events: &mut Vec<Event>) {
        self.run_hit_hooks(ComponentKind::Poison, impact, enemies, events);
        if impact.lethal {
            self.register_kill();
        }
        self.register_damage(impact.damage);
        self.run_hit_hooks(ComponentKind::Splash, impact, enemies, events);
    }

    fn run_hit_hooks(
        &mut self,
        kind: ComponentKind,
        impact: &Impact,
        enemies: &mut [Enemy],
        events: &mut Vec<Event>,
    ) {
        let center = self.body.center();
        let mut frame = TowerFrame {
            tower: self.id,
            center,
            stats: &mut self.stats,
            aim: &mut self.aim,
        };
        for component in &mut self.components {
            if component.kind() == kind {
                component.on_projectile_hit(&mut frame, impact, enemies, events);
            }
        }
    }

    /// Targeting range of the first launcher.
    #[must_use]
    pub fn range(&self) -> Option<f32> {
        self.components
            .iter()
            .find_map(|component| match component.behaviour() {
                Behaviour::Shooting(shooting) => Some(shooting.config().range),
                _ => None,
            })
    }

    /// Radius of the first slow aura.
    #[must_use]
    pub fn slow_range(&self) -> Option<f32> {
        self.components
            .iter()
            .find_map(|component| match component.behaviour() {
                Behaviour::Slow(slow) => Some(slow.config().range),
                _ => None,
            })
    }

    /// Splash explosions still animating.
    pub fn explosions(&self) -> impl Iterator<Item = &Explosion> {
        self.components
            .iter()
            .filter_map(|component| match component.behaviour() {
                Behaviour::Splash(splash) => Some(splash.explosions()),
                _ => None,
            })
            .flatten()
    }

    /// Captures presentation data.
    #[must_use]
    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            position: self.position(),
            size: self.body.width(),
            color: self.color,
            barrel_color: self.barrel_color,
            angle: self.aim.angle,
            range: self.range(),
            slow_range: self.slow_range(),
            kills: self.stats.kills,
            total_damage: self.stats.total_damage,
        }
    }
}
