use std::{sync::Arc, time::Duration};

use tower_defence_core::{Event, Rgb, Vector2};
use tower_defence_system_waves::{WaveConfig, WaveManager};

const SECOND: Duration = Duration::from_secs(1);

fn manager() -> WaveManager {
    let path: Arc<[Vector2]> = Arc::from(vec![
        Vector2::new(32.0, 352.0),
        Vector2::new(224.0, 352.0),
        Vector2::new(224.0, 160.0),
    ]);
    WaveManager::new(WaveConfig::default(), path)
}

fn kill_all(manager: &mut WaveManager) {
    for enemy in manager.enemies_mut() {
        let _ = enemy.take_damage(f32::MAX);
    }
}

#[test]
fn starting_a_wave_announces_its_size() {
    let mut manager = manager();
    let mut events = Vec::new();

    assert!(manager.start_wave(&mut events));

    assert_eq!(events, vec![Event::WaveStart { wave: 1, enemies: 5 }]);
    let state = manager.state();
    assert!(state.in_progress);
    assert_eq!(state.enemies_to_spawn, 5);
    assert_eq!(state.enemies_spawned, 0);
}

#[test]
fn start_wave_is_a_no_op_while_a_wave_runs() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));

    assert!(!manager.start_wave(&mut events));

    assert_eq!(events.len(), 1);
    assert_eq!(manager.state().current_wave, 1);
}

#[test]
fn enemies_spawn_once_per_interval() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));

    manager.update(Duration::from_millis(999), &mut events);
    assert!(manager.enemies().is_empty());

    manager.update(Duration::from_millis(1), &mut events);
    assert_eq!(manager.enemies().len(), 1);
    let spawned_at = events.iter().find_map(|event| match event {
        Event::EnemySpawned {
            position, wave: 1, ..
        } => Some(*position),
        _ => None,
    });
    assert_eq!(spawned_at, Some(Vector2::new(32.0, 352.0)));

    // The new enemy takes its first step in the same update.
    let enemy = &manager.enemies()[0];
    assert_eq!(enemy.waypoint_index(), 1);
    assert_eq!(enemy.position().y, 352.0);
    assert!(enemy.position().x > 32.0 && enemy.position().x < 33.0);
}

#[test]
fn spawning_stops_at_the_wave_size() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));

    for _ in 0..10 {
        manager.update(SECOND, &mut events);
    }

    assert_eq!(manager.state().enemies_spawned, 5);
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, 5);
}

#[test]
fn wave_is_not_complete_before_every_enemy_spawned() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));
    manager.update(SECOND, &mut events);
    kill_all(&mut manager);
    assert_eq!(manager.cleanup(), 1);

    assert!(manager.enemies().is_empty());
    assert!(!manager.check_wave_complete(&mut events));
}

#[test]
fn wave_completes_once_all_enemies_are_spawned_and_gone() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));
    for _ in 0..5 {
        manager.update(SECOND, &mut events);
    }
    assert!(!manager.check_wave_complete(&mut events), "enemies still alive");

    kill_all(&mut manager);
    assert_eq!(manager.cleanup(), 5);
    events.clear();

    assert!(manager.check_wave_complete(&mut events));
    assert_eq!(events, vec![Event::WaveComplete { wave: 1, bonus: 60 }]);
    assert!(!manager.check_wave_complete(&mut events), "completion fires once");
    assert!(!manager.state().in_progress);
}

#[test]
fn later_waves_scale_linearly() {
    let config = WaveConfig::default();
    let stats = config.enemy_stats(3);

    assert_eq!(config.enemy_count(1), 5);
    assert_eq!(config.enemy_count(3), 11);
    assert_eq!(stats.health, 140.0);
    assert_eq!(stats.speed, 100.0);
    assert_eq!(stats.gold_value, 35);
    assert_eq!(stats.score_value, 14);
    assert_eq!(stats.color, Rgb::PURPLE);
    assert_eq!(config.enemy_stats(6).color, Rgb::RED, "colours cycle");
    assert_eq!(config.completion_bonus(3), 80);
}

#[test]
fn next_wave_starts_after_completion() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));
    for _ in 0..5 {
        manager.update(SECOND, &mut events);
    }
    kill_all(&mut manager);
    let _ = manager.cleanup();
    assert!(manager.check_wave_complete(&mut events));

    assert!(manager.start_wave(&mut events));
    assert_eq!(manager.state().current_wave, 2);
    assert_eq!(manager.state().enemies_to_spawn, 8);
}

#[test]
fn leaking_enemies_are_reported_and_cleaned_up() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));
    manager.update(SECOND, &mut events);

    for _ in 0..400 {
        manager.update(Duration::from_millis(16), &mut events);
    }

    let leaks = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyReachedEnd { damage: 1, .. }))
        .count();
    assert!(leaks >= 1);
    assert!(manager.cleanup() >= 1);
}

#[test]
fn reset_forgets_enemies_and_waves() {
    let mut manager = manager();
    let mut events = Vec::new();
    assert!(manager.start_wave(&mut events));
    manager.update(SECOND, &mut events);

    manager.reset();

    assert!(manager.enemies().is_empty());
    assert_eq!(manager.state().current_wave, 0);
    assert!(!manager.state().in_progress);
}
