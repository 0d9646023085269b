//! Game phase state machine.
//!
//! Tracks where a game is in its round cycle and validates transitions.
//!
//! # State Diagram
//!
//! ```text
//!                    start (from any phase)
//!        ┌──────────────────────────────────────────┐
//!        │                                          ▼
//! ┌──────────────┐                          ┌──────────────┐
//! │     Idle     │                          │  Presenting  │◀─────────┐
//! └──────────────┘                          └──────┬───────┘          │
//!        ▲                                         │ presentation     │
//!        │ dismiss                                 │ finished         │ settled
//!        │                                         ▼                  │
//! ┌──────────────┐        mistake           ┌──────────────┐   ┌──────┴───────┐
//! │   GameOver   │◀─────────────────────────│AwaitingInput │──▶│RoundComplete │
//! └──────────────┘                          └──────────────┘   └──────────────┘
//!                                                  sequence matched
//! ```

use std::fmt;

use serde::Serialize;

/// Where the game is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No game running
    #[default]
    Idle,

    /// The target sequence is being played back
    Presenting,

    /// Waiting for the player to repeat the sequence
    AwaitingInput,

    /// Sequence reproduced, pausing before the next round
    RoundComplete,

    /// The player made a mistake
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::AwaitingInput => "awaiting_input",
            Self::RoundComplete => "round_complete",
            Self::GameOver => "game_over",
        }
    }

    /// Input is only processed while awaiting it.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    /// Check if a game is under way.
    pub fn is_running(&self) -> bool {
        matches!(
            self,
            Self::Presenting | Self::AwaitingInput | Self::RoundComplete
        )
    }

    /// Settings may only change between games.
    pub fn allows_settings_change(&self) -> bool {
        !self.is_running()
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    PresentationFinished,
    SequenceMatched,
    Mistake,
    Settled,
    Dismiss,
}

/// Error when a phase transition is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: GamePhase,
    pub event: PhaseEvent,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} via {:?}: {}",
            self.from, self.event, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// Phase state machine.
#[derive(Debug, Clone, Default)]
pub struct PhaseMachine {
    phase: GamePhase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Apply an event, returning the new machine or an error.
    pub fn apply(&self, event: PhaseEvent) -> Result<Self, InvalidTransition> {
        Ok(Self {
            phase: self.transition(event)?,
        })
    }

    /// Apply an event in place, returning error if invalid.
    pub fn apply_mut(&mut self, event: PhaseEvent) -> Result<GamePhase, InvalidTransition> {
        self.phase = self.transition(event)?;
        Ok(self.phase)
    }

    fn transition(&self, event: PhaseEvent) -> Result<GamePhase, InvalidTransition> {
        use GamePhase::*;
        use PhaseEvent::*;

        let invalid = |reason: &'static str| InvalidTransition {
            from: self.phase,
            event,
            reason,
        };

        match (self.phase, event) {
            // Start doubles as restart
            (_, Start) => Ok(Presenting),

            (Presenting, PresentationFinished) => Ok(AwaitingInput),
            (_, PresentationFinished) => Err(invalid("Nothing is being presented")),

            (AwaitingInput, SequenceMatched) => Ok(RoundComplete),
            (_, SequenceMatched) => Err(invalid("Not awaiting input")),

            (AwaitingInput, Mistake) => Ok(GameOver),
            (_, Mistake) => Err(invalid("Not awaiting input")),

            (RoundComplete, Settled) => Ok(Presenting),
            (_, Settled) => Err(invalid("No round to advance")),

            (GameOver, Dismiss) => Ok(Idle),
            (_, Dismiss) => Err(invalid("Game is not over")),
        }
    }

    pub fn accepts_input(&self) -> bool {
        self.phase.accepts_input()
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }
}
