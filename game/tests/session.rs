use std::{cell::RefCell, rc::Rc, time::Duration};

use tower_defence_core::{
    CellCoord, CellKind, Command, Event, EventKind, FrameInput, GameState, PlacementError,
    QuizDifficulty, TowerTypeId, Vector2,
};
use tower_defence_game::{GameConfig, GameError, TowerDefenceGame};

const TICK: Duration = Duration::from_millis(16);

fn short_level() -> GameConfig {
    let mut config = GameConfig {
        path: vec![CellCoord::new(0, 0), CellCoord::new(0, 2)],
        ..GameConfig::default()
    };
    config.wave.base_enemy_count = 1;
    config
}

fn started(config: GameConfig) -> TowerDefenceGame {
    let mut game = TowerDefenceGame::new(config).expect("valid level");
    assert!(game.start());
    game
}

/// Ticks until the predicate holds, collecting every dispatched event.
fn run_until<F>(game: &mut TowerDefenceGame, max_ticks: usize, mut done: F) -> Vec<Event>
where
    F: FnMut(&TowerDefenceGame) -> bool,
{
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        game.update(TICK, &FrameInput::default());
        events.extend_from_slice(game.recent_events());
        if done(game) {
            return events;
        }
    }
    panic!("condition not reached within {max_ticks} ticks");
}

fn wave_cleared(game: &TowerDefenceGame, wave: u32) -> bool {
    let state = game.waves().state();
    state.current_wave == wave && !state.in_progress
}

#[test]
fn unplayable_levels_are_rejected() {
    let config = GameConfig {
        path: Vec::new(),
        ..GameConfig::default()
    };
    assert!(matches!(
        TowerDefenceGame::new(config),
        Err(GameError::EmptyPath)
    ));
}

#[test]
fn starting_announces_the_economy_and_enters_play() {
    let mut game = TowerDefenceGame::new(GameConfig::default()).expect("valid level");
    assert_eq!(game.state(), GameState::Loading);

    assert!(game.start());

    assert_eq!(game.state(), GameState::Playing);
    let events = game.recent_events();
    assert!(events.contains(&Event::GoldChanged { gold: 500 }));
    assert!(events.contains(&Event::LivesChanged { lives: 20 }));
    assert!(events.contains(&Event::StateChanged {
        from: GameState::Loading,
        to: GameState::Playing,
    }));
    assert!(!game.start(), "second start is ignored");
}

#[test]
fn first_wave_starts_after_the_delay() {
    let mut game = started(GameConfig::default());

    for _ in 0..124 {
        game.update(TICK, &FrameInput::default());
    }
    assert_eq!(game.waves().state().current_wave, 0);

    game.update(TICK, &FrameInput::default());
    assert_eq!(game.waves().state().current_wave, 1);
    assert!(game
        .recent_events()
        .contains(&Event::WaveStart { wave: 1, enemies: 5 }));
}

#[test]
fn long_frames_are_capped() {
    let mut game = started(GameConfig::default());

    game.update(Duration::from_secs(5), &FrameInput::default());

    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(1900)));
}

#[test]
fn building_charges_the_tower_cost() {
    let mut game = started(GameConfig::default());

    let result = game.apply(Command::PlaceTower {
        kind: TowerTypeId::Cannon,
        cell: CellCoord::new(4, 2),
    });

    assert_eq!(result, Ok(()));
    assert_eq!(game.economy().gold(), 400);
    assert!(game.recent_events().contains(&Event::GoldChanged { gold: 400 }));
    assert_eq!(game.towers().towers().len(), 1);
}

#[test]
fn path_cells_between_corners_cannot_host_towers() {
    let mut game = started(GameConfig::default());
    let cell = CellCoord::new(5, 1);

    let result = game.apply(Command::PlaceTower {
        kind: TowerTypeId::Cannon,
        cell,
    });

    assert_eq!(result, Err(PlacementError::Occupied { cell }));
    assert_eq!(game.economy().gold(), 500);
    assert!(game.towers().towers().is_empty());
}

#[test]
fn gold_limits_construction() {
    let config = GameConfig {
        starting_gold: 150,
        ..GameConfig::default()
    };
    let mut game = started(config);

    assert!(game
        .apply(Command::PlaceTower {
            kind: TowerTypeId::Cannon,
            cell: CellCoord::new(0, 0),
        })
        .is_ok());
    let second = game.apply(Command::PlaceTower {
        kind: TowerTypeId::Cannon,
        cell: CellCoord::new(0, 1),
    });

    assert_eq!(
        second,
        Err(PlacementError::InsufficientGold {
            cost: 100,
            available: 50,
        })
    );
    assert_eq!(game.economy().gold(), 50);
}

#[test]
fn hotkeys_and_clicks_place_the_selected_tower() {
    let mut game = started(GameConfig::default());
    let input = FrameInput {
        cursor: Some(Vector2::new(150.0, 40.0)),
        primary_click: true,
        tower_hotkey: Some(2),
        pause_toggle: false,
    };

    game.update(TICK, &input);

    let placed = game.towers().towers().iter().next().expect("tower placed");
    assert_eq!(placed.kind(), TowerTypeId::Ice);
    assert_eq!(placed.cell(), CellCoord::new(0, 2));
    assert_eq!(game.economy().gold(), 350);
}

#[test]
fn cannon_defends_the_standard_corridor() {
    let mut config = GameConfig {
        path: vec![
            CellCoord::new(5, 0),
            CellCoord::new(5, 3),
            CellCoord::new(2, 3),
            CellCoord::new(2, 7),
        ],
        ..GameConfig::default()
    };
    config.wave.base_enemy_count = 1;
    let mut game = started(config);
    assert!(game
        .apply(Command::PlaceTower {
            kind: TowerTypeId::Cannon,
            cell: CellCoord::new(4, 2),
        })
        .is_ok());

    let events = run_until(&mut game, 2000, |game| wave_cleared(game, 1));

    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    let leaks = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyReachedEnd { .. }))
        .count();
    let shots = events
        .iter()
        .filter(|event| matches!(event, Event::TowerShoot { .. }))
        .count();
    assert_eq!(kills, 1);
    assert_eq!(leaks, 0);
    assert_eq!(shots, 2, "two 50 damage shells kill a 100 health enemy");

    let economy = game.economy();
    let cannon = game.towers().towers().iter().next().expect("cannon");
    assert_eq!(cannon.stats().kills, 1);
    assert_eq!(economy.gold(), 400 + 25 + 60);
    assert_eq!(economy.score(), 10);
    assert_eq!(economy.lives(), 20);
}

#[test]
fn leaks_cost_lives_and_completed_waves_pay_a_bonus() {
    let mut game = started(short_level());

    let events = run_until(&mut game, 1000, |game| wave_cleared(game, 1));

    assert!(events.contains(&Event::LivesChanged { lives: 19 }));
    assert!(events.contains(&Event::WaveComplete { wave: 1, bonus: 60 }));
    assert_eq!(game.economy().gold(), 560);
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(2000)));

    for _ in 0..125 {
        game.update(TICK, &FrameInput::default());
    }
    assert_eq!(game.waves().state().current_wave, 2);
}

#[test]
fn running_out_of_lives_ends_the_game() {
    let config = GameConfig {
        starting_lives: 1,
        ..short_level()
    };
    let mut game = started(config);

    let events = run_until(&mut game, 1000, |game| game.state() == GameState::GameOver);

    assert!(events.contains(&Event::LivesChanged { lives: 0 }));
    assert!(events.contains(&Event::StateChanged {
        from: GameState::Playing,
        to: GameState::GameOver,
    }));
    assert!(events.contains(&Event::GameOver { wave: 1, score: 0 }));

    game.update(TICK, &FrameInput::default());
    assert!(game.recent_events().is_empty());
    assert_eq!(game.next_scheduled(), None);
}

#[test]
fn quiz_runs_between_waves_when_enabled() {
    let config = GameConfig {
        quiz_between_waves: true,
        ..short_level()
    };
    let mut game = started(config);
    let _ = run_until(&mut game, 1000, |game| wave_cleared(game, 1));

    let events = run_until(&mut game, 200, |game| game.state() == GameState::Quiz);
    assert!(events.contains(&Event::QuizStarted {
        wave: 1,
        difficulty: QuizDifficulty::Easy,
    }));
    assert_eq!(game.quiz().map(|round| round.wave), Some(1));

    assert!(game.apply(Command::CompleteQuiz { gold: 30 }).is_ok());

    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.economy().gold(), 590);
    assert!(game.recent_events().contains(&Event::QuizCompleted { gold: 30 }));
    assert_eq!(game.quiz(), None);
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(2000)));
}

#[test]
fn starting_a_wave_early_skips_the_pending_quiz() {
    let config = GameConfig {
        quiz_between_waves: true,
        ..short_level()
    };
    let mut game = started(config);
    let _ = run_until(&mut game, 1000, |game| wave_cleared(game, 1));
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(2000)));

    assert!(game.apply(Command::StartWave).is_ok());
    assert_eq!(game.next_scheduled(), None);

    let mut events = Vec::new();
    for _ in 0..120 {
        game.update(TICK, &FrameInput::default());
        events.extend_from_slice(game.recent_events());
    }

    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.quiz(), None);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::QuizStarted { .. })));
}

#[test]
fn unanswered_quizzes_time_out_without_reward() {
    let config = GameConfig {
        quiz_between_waves: true,
        quiz_timeout_ms: Some(1000),
        ..short_level()
    };
    let mut game = started(config);
    let _ = run_until(&mut game, 1000, |game| wave_cleared(game, 1));
    let _ = run_until(&mut game, 200, |game| game.state() == GameState::Quiz);
    let gold = game.economy().gold();

    let events = run_until(&mut game, 63, |game| game.state() == GameState::Playing);

    assert!(events.contains(&Event::QuizCompleted { gold: 0 }));
    assert_eq!(game.economy().gold(), gold);
}

#[test]
fn pausing_freezes_the_schedule() {
    let mut game = started(GameConfig::default());
    let toggle = FrameInput {
        pause_toggle: true,
        ..FrameInput::default()
    };

    game.update(TICK, &toggle);
    assert_eq!(game.state(), GameState::Paused);
    for _ in 0..200 {
        game.update(TICK, &FrameInput::default());
    }
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(2000)));

    game.update(TICK, &toggle);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(1984)));
}

#[test]
fn manual_wave_start_replaces_the_scheduled_one() {
    let mut game = started(GameConfig::default());

    assert!(game.apply(Command::StartWave).is_ok());

    assert_eq!(game.waves().state().current_wave, 1);
    assert_eq!(game.next_scheduled(), None);
}

#[test]
fn bus_listeners_observe_dispatched_events_until_reset() {
    let mut game = started(GameConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _ = game.bus_mut().subscribe(EventKind::GoldChanged, move |event| {
        if let Event::GoldChanged { gold } = event {
            sink.borrow_mut().push(*gold);
        }
    });

    assert!(game
        .apply(Command::PlaceTower {
            kind: TowerTypeId::Splash,
            cell: CellCoord::new(1, 1),
        })
        .is_ok());
    assert_eq!(*seen.borrow(), vec![300]);

    game.reset();

    assert_eq!(*seen.borrow(), vec![300], "listeners are cleared first");
    assert!(!game.bus_mut().has_listeners(EventKind::GoldChanged));
    assert_eq!(game.economy().gold(), 500);
    assert!(game.towers().towers().is_empty());
    assert!(game.grid().can_build_at(CellCoord::new(1, 1)));
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.next_scheduled(), Some(Duration::from_millis(2000)));
}

#[test]
fn snapshot_reflects_the_session() {
    let mut game = started(GameConfig::default());
    assert!(game
        .apply(Command::PlaceTower {
            kind: TowerTypeId::Poison,
            cell: CellCoord::new(4, 2),
        })
        .is_ok());
    let _ = run_until(&mut game, 300, |game| !game.waves().enemies().is_empty());

    let snapshot = game.snapshot();

    assert_eq!(snapshot.state, GameState::Playing);
    assert_eq!(snapshot.wave, 1);
    assert!(snapshot.wave_in_progress);
    assert_eq!(snapshot.gold, 325);
    assert_eq!(snapshot.towers.len(), 1);
    assert_eq!(snapshot.enemies.len(), 1);
    assert_eq!(snapshot.grid.cells.len(), 150);
    assert_eq!(
        snapshot.grid.cell_kind(CellCoord::new(4, 2)),
        Some(CellKind::Tower)
    );
    assert_eq!(
        snapshot.grid.cell_kind(CellCoord::new(5, 2)),
        Some(CellKind::Path)
    );
}

#[test]
fn placement_preview_follows_the_cursor() {
    let mut game = TowerDefenceGame::new(GameConfig::default()).expect("valid level");
    assert!(game.placement_preview(Vector2::new(10.0, 10.0)).is_none());
    assert!(game.start());

    let free = game
        .placement_preview(Vector2::new(10.0, 10.0))
        .expect("cursor over the grid");
    assert!(free.buildable);
    assert!(free.affordable);
    assert_eq!(free.cell, CellCoord::new(0, 0));

    let path = game
        .placement_preview(Vector2::new(100.0, 350.0))
        .expect("cursor over the grid");
    assert!(!path.buildable);

    assert!(game.placement_preview(Vector2::new(-5.0, 10.0)).is_none());
}

#[test]
fn menu_state_suspends_the_simulation() {
    let mut game = started(GameConfig::default());

    assert!(game
        .apply(Command::SetState {
            state: GameState::Menu,
        })
        .is_ok());
    for _ in 0..200 {
        game.update(TICK, &FrameInput::default());
    }

    assert_eq!(game.waves().state().current_wave, 0);
}
