use std::{sync::Arc, time::Duration};

use tower_defence_core::{
    CellCoord, Command, ComponentKind, EnemyId, Event, KillCause, ProjectileId, TowerCatalogue,
    TowerId, TowerTypeId, Vector2,
};
use tower_defence_world::{
    Behaviour, CombatContext, Enemy, EnemyStats, Impact, Tower,
};

const TOWER_CELL: CellCoord = CellCoord::new(4, 2);
const TOWER_TOP_LEFT: Vector2 = Vector2::new(128.0, 256.0);
const TOWER_CENTER: Vector2 = Vector2::new(160.0, 288.0);

fn tower(kind: TowerTypeId) -> Tower {
    let catalogue = TowerCatalogue::standard();
    let tower_type = catalogue.get_kind(kind).expect("catalogue entry");
    Tower::from_type(TowerId::new(1), TOWER_CELL, TOWER_TOP_LEFT, 64.0, tower_type)
}

fn enemy_at(id: u32, position: Vector2) -> Enemy {
    let path: Arc<[Vector2]> = Arc::from(vec![position, position + Vector2::new(1_000.0, 0.0)]);
    Enemy::new(EnemyId::new(id), path, EnemyStats::default()).expect("non-empty path")
}

struct Harness {
    enemies: Vec<Enemy>,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Harness {
    fn new(enemies: Vec<Enemy>) -> Self {
        Self {
            enemies,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    fn tick(&mut self, tower: &mut Tower, dt: Duration) {
        let mut ctx = CombatContext {
            enemies: &mut self.enemies,
            commands: &mut self.commands,
            events: &mut self.events,
        };
        tower.update(dt, &mut ctx);
    }

    fn launches(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, Command::LaunchProjectile { .. }))
            .count()
    }
}

#[test]
fn towers_are_composed_from_their_catalogue_entry() {
    let ice = tower(TowerTypeId::Ice);

    assert_eq!(ice.components().len(), 2);
    assert!(ice.component(ComponentKind::Shooting).is_some());
    assert!(ice.component(ComponentKind::Slow).is_some());
    assert!(ice.component(ComponentKind::Poison).is_none());
    assert_eq!(ice.center(), TOWER_CENTER);
    assert_eq!(ice.range(), Some(180.0));
    assert_eq!(ice.slow_range(), Some(150.0));
}

#[test]
fn cannon_fires_at_the_closest_enemy_in_range() {
    let mut cannon = tower(TowerTypeId::Cannon);
    let mut harness = Harness::new(vec![
        enemy_at(1, TOWER_CENTER + Vector2::new(100.0, 0.0)),
        enemy_at(2, TOWER_CENTER + Vector2::new(40.0, 0.0)),
        enemy_at(3, TOWER_CENTER + Vector2::new(-250.0, 0.0)),
    ]);

    harness.tick(&mut cannon, Duration::from_millis(16));

    assert_eq!(
        harness.commands,
        vec![Command::LaunchProjectile {
            tower: TowerId::new(1),
            origin: TOWER_CENTER,
            velocity: Vector2::new(600.0, 0.0),
            damage: 50.0,
            max_distance: 300.0,
            color: tower_defence_core::Rgb::YELLOW,
        }]
    );
    assert_eq!(
        harness.events,
        vec![Event::TowerShoot {
            tower: TowerId::new(1),
            target: EnemyId::new(2),
            origin: TOWER_CENTER,
        }]
    );
    assert_eq!(cannon.aim().target, Some(EnemyId::new(2)));
    assert_eq!(cannon.aim().angle, 0.0);
}

#[test]
fn cannon_respects_its_fire_rate() {
    let mut cannon = tower(TowerTypeId::Cannon);
    let mut harness = Harness::new(vec![enemy_at(1, TOWER_CENTER + Vector2::new(0.0, 50.0))]);

    harness.tick(&mut cannon, Duration::from_millis(16));
    harness.tick(&mut cannon, Duration::from_millis(500));
    assert_eq!(harness.launches(), 1, "cooldown still running");

    harness.tick(&mut cannon, Duration::from_millis(500));
    assert_eq!(harness.launches(), 2, "cooldown elapsed after one second");
}

#[test]
fn enemies_out_of_range_or_dead_are_ignored() {
    let mut cannon = tower(TowerTypeId::Cannon);
    let mut dead = enemy_at(1, TOWER_CENTER + Vector2::new(10.0, 0.0));
    assert!(dead.take_damage(1_000.0));
    let mut harness = Harness::new(vec![
        dead,
        enemy_at(2, TOWER_CENTER + Vector2::new(200.0, 0.0)),
    ]);

    harness.tick(&mut cannon, Duration::from_millis(16));

    assert_eq!(harness.launches(), 0);
    assert_eq!(cannon.aim().target, None);
}

#[test]
fn disabled_components_do_not_run() {
    let mut cannon = tower(TowerTypeId::Cannon);
    cannon
        .component_mut(ComponentKind::Shooting)
        .expect("launcher")
        .set_enabled(false);
    let mut harness = Harness::new(vec![enemy_at(1, TOWER_CENTER + Vector2::new(30.0, 0.0))]);

    harness.tick(&mut cannon, Duration::from_millis(16));

    assert_eq!(harness.launches(), 0);
}

#[test]
fn ice_aura_slows_enemies_within_its_radius() {
    let mut ice = tower(TowerTypeId::Ice);
    let mut harness = Harness::new(vec![
        enemy_at(1, TOWER_CENTER + Vector2::new(100.0, 0.0)),
        enemy_at(2, TOWER_CENTER + Vector2::new(0.0, 170.0)),
    ]);

    harness.tick(&mut ice, Duration::from_millis(250));
    assert_eq!(harness.enemies[0].speed_multiplier(), 1.0, "aura waits a full tick");

    harness.tick(&mut ice, Duration::from_millis(250));

    assert_eq!(harness.enemies[0].speed_multiplier(), 0.5);
    assert_eq!(harness.enemies[1].speed_multiplier(), 1.0, "outside the aura");
    assert!(harness.events.contains(&Event::SlowApplied {
        tower: TowerId::new(1),
        enemy: EnemyId::new(1),
        amount: 0.5,
    }));
}

#[test]
fn splash_damages_neighbours_but_not_the_primary_target() {
    let mut splash = tower(TowerTypeId::Splash);
    let impact_point = Vector2::new(400.0, 100.0);
    let mut enemies = vec![
        enemy_at(1, impact_point),
        enemy_at(2, impact_point + Vector2::new(60.0, 0.0)),
        enemy_at(3, impact_point + Vector2::new(90.0, 0.0)),
    ];
    let mut events = Vec::new();
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(1),
        position: impact_point,
        damage: 40.0,
        lethal: false,
    };

    splash.resolve_hit(&impact, &mut enemies, &mut events);

    assert_eq!(enemies[0].health(), 100.0, "primary damage is applied by the caller");
    assert_eq!(enemies[1].health(), 80.0);
    assert_eq!(enemies[2].health(), 100.0);
    assert_eq!(splash.stats().total_damage, 60.0);
    assert!(events.contains(&Event::SplashDamage {
        tower: TowerId::new(1),
        position: impact_point,
        radius: 80.0,
        damage: 20.0,
        enemies_hit: 1,
    }));
    assert_eq!(splash.explosions().count(), 1);
}

#[test]
fn splash_explosions_fade_out() {
    let mut splash = tower(TowerTypeId::Splash);
    let mut enemies = vec![enemy_at(1, Vector2::new(800.0, 600.0))];
    let mut events = Vec::new();
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(1),
        position: Vector2::new(800.0, 600.0),
        damage: 40.0,
        lethal: false,
    };
    splash.resolve_hit(&impact, &mut enemies, &mut events);

    let mut harness = Harness::new(Vec::new());
    harness.tick(&mut splash, Duration::from_millis(150));
    let progress = splash.explosions().next().map(|e| e.progress());
    assert_eq!(progress, Some(0.5));

    harness.tick(&mut splash, Duration::from_millis(150));
    assert_eq!(splash.explosions().count(), 0);
}

#[test]
fn splash_kills_are_credited_to_the_tower() {
    let mut splash = tower(TowerTypeId::Splash);
    let mut weak = enemy_at(2, Vector2::new(420.0, 100.0));
    assert!(!weak.take_damage(90.0));
    let mut enemies = vec![enemy_at(1, Vector2::new(400.0, 100.0)), weak];
    let mut events = Vec::new();
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(1),
        position: Vector2::new(400.0, 100.0),
        damage: 40.0,
        lethal: true,
    };

    splash.resolve_hit(&impact, &mut enemies, &mut events);

    assert_eq!(splash.stats().kills, 2, "primary kill plus splash kill");
    let splash_kills = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EnemyKilled {
                    cause: KillCause::Splash,
                    ..
                }
            )
        })
        .count();
    assert_eq!(splash_kills, 1);
}

#[test]
fn poison_attaches_on_hit_and_ticks_over_time() {
    let mut poison = tower(TowerTypeId::Poison);
    let target = Vector2::new(900.0, 500.0);
    let mut harness = Harness::new(vec![enemy_at(7, target)]);
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(7),
        position: target,
        damage: 20.0,
        lethal: false,
    };

    poison.resolve_hit(&impact, &mut harness.enemies, &mut harness.events);
    assert!(harness.enemies[0].has_poison_from(TowerId::new(1)));

    harness.tick(&mut poison, Duration::from_millis(500));

    assert_eq!(harness.enemies[0].health(), 90.0);
    assert!(harness.events.contains(&Event::PoisonTick {
        tower: TowerId::new(1),
        enemy: EnemyId::new(7),
        damage: 10.0,
    }));
    assert_eq!(poison.stats().total_damage, 30.0);
}

#[test]
fn poison_kills_are_reported_once() {
    let mut poison = tower(TowerTypeId::Poison);
    let target = Vector2::new(900.0, 500.0);
    let mut harness = Harness::new(vec![enemy_at(7, target)]);
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(7),
        position: target,
        damage: 20.0,
        lethal: false,
    };
    poison.resolve_hit(&impact, &mut harness.enemies, &mut harness.events);
    assert!(!harness.enemies[0].take_damage(95.0));

    for _ in 0..4 {
        harness.tick(&mut poison, Duration::from_millis(500));
    }

    let kills: Vec<_> = harness
        .events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .collect();
    assert_eq!(kills.len(), 1);
    assert!(matches!(
        kills[0],
        Event::EnemyKilled {
            cause: KillCause::Poison,
            gold: 25,
            ..
        }
    ));
    assert_eq!(poison.stats().kills, 1);
}

#[test]
fn lethal_hits_do_not_attach_poison() {
    let mut poison = tower(TowerTypeId::Poison);
    let target = Vector2::new(900.0, 500.0);
    let mut enemies = vec![enemy_at(7, target)];
    let mut events = Vec::new();
    assert!(enemies[0].take_damage(100.0));
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(7),
        position: target,
        damage: 20.0,
        lethal: true,
    };

    poison.resolve_hit(&impact, &mut enemies, &mut events);

    assert!(!enemies[0].has_poison_from(TowerId::new(1)));
    assert_eq!(poison.stats().kills, 1);
}

#[test]
fn removing_a_component_runs_its_lifecycle_hook() {
    let mut poison = tower(TowerTypeId::Poison);
    let target = Vector2::new(900.0, 500.0);
    let mut enemies = vec![enemy_at(7, target)];
    let mut events = Vec::new();
    let impact = Impact {
        projectile: ProjectileId::new(0),
        enemy_index: 0,
        enemy: EnemyId::new(7),
        position: target,
        damage: 20.0,
        lethal: false,
    };
    poison.resolve_hit(&impact, &mut enemies, &mut events);

    let removed = poison
        .remove_component(ComponentKind::Poison)
        .expect("poison component");

    match removed.behaviour() {
        Behaviour::Poison(state) => assert_eq!(state.tracked_count(), 0),
        other => panic!("unexpected behaviour {other:?}"),
    }
    assert!(poison.component(ComponentKind::Poison).is_none());
    assert_eq!(poison.components().len(), 1);
}
