//! State management module for Simon.
//!
//! This module provides the core state types:
//!
//! - `symbol` - The four pads and where new ones come from
//! - `difficulty` - Difficulty levels and their playback pace
//! - `phase` - Phase state machine (what may happen next?)
//! - `playback` - Generation-tagged cue scheduling on a logical clock
//! - `events` - Notifications for the view layer
//! - `game` - The game session tying the above together
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                                Game                                  │
//! │                                                                      │
//! │   submit_input ──▶ ┌──────────────┐        ┌───────────────────┐     │
//! │   start        ──▶ │ PhaseMachine │        │ PlaybackScheduler │     │
//! │   set_difficulty   │              │◀─cues──│                   │     │
//! │                    │ Idle         │        │ (due, seq) →      │     │
//! │                    │ Presenting   │──────▶ │   generation, cue │     │
//! │                    │ AwaitingInput│ present│                   │     │
//! │                    │ RoundComplete│  echo  └─────────▲─────────┘     │
//! │                    │ GameOver     │                  │ advance       │
//! │                    └──────┬───────┘                                  │
//! │                           │                                          │
//! │         ┌─────────────────┼─────────────────┐                        │
//! │         ▼                 ▼                 ▼                        │
//! │   AudioBackend       ScoreStore       GameEvent queue ──▶ view       │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use simon_state::state::{Game, GameEvent};
//!
//! let mut game = Game::new(&GameConfig::default());
//! game.start();
//!
//! // In the host's frame loop
//! game.advance(frame_time);
//! for event in game.drain_events() {
//!     render(event);
//! }
//! ```

pub mod difficulty;
pub mod events;
pub mod game;
pub mod phase;
pub mod playback;
pub mod symbol;

// Re-export commonly used types
pub use difficulty::{Difficulty, Timing};
pub use events::GameEvent;
pub use game::{Game, GameError, GameSnapshot, InputOutcome};
pub use phase::{GamePhase, InvalidTransition, PhaseEvent, PhaseMachine};
pub use playback::{
    Cue, FeedbackSource, FiredCue, Generation, Pacing, PlaybackScheduler, TimerHandle,
};
pub use symbol::{RandomSymbols, ScriptedSymbols, Symbol, SymbolSource, UnknownSymbol};
