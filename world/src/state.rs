//! Win/loss state machine.

use path_defence_core::GameState;

/// Tracks whether the encounter is still being played.
///
/// `GameOver` and `Victory` absorb: once entered, no evaluation leaves them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameStateMachine {
    state: GameState,
}

impl GameStateMachine {
    /// Creates a machine in the `Playing` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GameState::Playing,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Applies the end-of-tick transitions and returns the state entered, if any.
    ///
    /// Running out of lives is checked before victory, so a tick that satisfies
    /// both ends the game as lost.
    pub fn evaluate(&mut self, lives: u32, waves_finished: bool, live_enemies: usize) -> Option<GameState> {
        if self.state.is_terminal() {
            return None;
        }

        let next = if lives == 0 {
            GameState::GameOver
        } else if waves_finished && live_enemies == 0 {
            GameState::Victory
        } else {
            return None;
        };

        self.state = next;
        Some(next)
    }

    /// Returns to `Playing`.
    pub fn reset(&mut self) {
        self.state = GameState::Playing;
    }
}
