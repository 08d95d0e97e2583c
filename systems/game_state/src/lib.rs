#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game-state machine tracking which phase of a session is active.

use tower_defence_core::{Event, GameState, UnknownStateError};
use tracing::{info, warn};

/// Record of a single state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State that was active before the change.
    pub from: GameState,
    /// State that is active after the change.
    pub to: GameState,
}

impl Transition {
    /// Reports whether the change leaves loading for play, which kicks off the
    /// first wave.
    #[must_use]
    pub const fn starts_first_wave(&self) -> bool {
        matches!(
            (self.from, self.to),
            (GameState::Loading, GameState::Playing)
        )
    }
}

/// Owner of the active [`GameState`].
#[derive(Debug)]
pub struct GameStateManager {
    current: GameState,
    previous: Option<GameState>,
}

impl Default for GameStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateManager {
    /// Creates a manager in the loading state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: GameState::Loading,
            previous: None,
        }
    }

    /// Active state.
    #[must_use]
    pub const fn current(&self) -> GameState {
        self.current
    }

    /// State that was active before the last transition.
    #[must_use]
    pub const fn previous(&self) -> Option<GameState> {
        self.previous
    }

    /// Switches to the provided state unconditionally.
    ///
    /// Re-entering the active state is still reported as a transition.
    pub fn set_state(&mut self, state: GameState, out: &mut Vec<Event>) -> Transition {
        let from = self.current;
        self.previous = Some(from);
        self.current = state;
        info!(%from, to = %state, "game state changed");
        out.push(Event::StateChanged { from, to: state });
        Transition { from, to: state }
    }

    /// Switches to the state with the provided name.
    ///
    /// Names are matched ignoring case, so `GAME_OVER` and `game_over` are
    /// equivalent. Unknown names leave the state untouched.
    pub fn set_state_named(
        &mut self,
        name: &str,
        out: &mut Vec<Event>,
    ) -> Result<Transition, UnknownStateError> {
        match name.parse::<GameState>() {
            Ok(state) => Ok(self.set_state(state, out)),
            Err(error) => {
                warn!(name, "ignoring unknown game state");
                Err(error)
            }
        }
    }

    /// Restores the state that was active before the last transition.
    pub fn return_to_previous(&mut self, out: &mut Vec<Event>) -> Option<Transition> {
        let previous = self.previous?;
        Some(self.set_state(previous, out))
    }

    /// Reports whether the provided state is active.
    #[must_use]
    pub fn is(&self, state: GameState) -> bool {
        self.current == state
    }

    /// Reports whether the simulation is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is(GameState::Playing)
    }

    /// Reports whether an intermission quiz is active.
    #[must_use]
    pub fn is_quiz_active(&self) -> bool {
        self.is(GameState::Quiz)
    }

    /// Reports whether the session is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is(GameState::Loading)
    }

    /// Reports whether entities should advance this tick.
    #[must_use]
    pub fn should_update(&self) -> bool {
        self.is_playing()
    }
}
