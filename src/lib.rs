//! Simon State Library
//!
//! This crate provides the game logic for Simon, the memory game where the
//! machine plays a growing sequence of colored flashes and tones and the
//! player repeats it.
//!
//! # Overview
//!
//! - **Game State Machine** - Round counter, target sequence, input buffer
//!   and difficulty, with validated phase transitions and an input lock.
//!
//! - **Playback Scheduling** - Timed, cancellable flashes on a logical clock.
//!   Every cue is tagged with a generation so a restart can never be
//!   disturbed by feedback from the game it replaced.
//!
//! - **Audio** - An injected tone backend; silent by default, rodio with the
//!   `playback` feature.
//!
//! - **High Score** - One persisted integer behind a small store trait.
//!
//! # Design Principles
//!
//! 1. **No rendering** - The crate emits events; a view draws them.
//!
//! 2. **No blocking** - The host advances the clock from its own loop.
//!
//! 3. **Locked input is not an error** - Presses while the sequence plays are
//!    silently dropped.
//!
//! 4. **Degrade, don't abort** - Missing audio or an unreadable score file
//!    never stops a game.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use simon_state::{
//!     config::GameConfig,
//!     score::MemoryScoreStore,
//!     state::{Game, GamePhase, InputOutcome, ScriptedSymbols, Symbol},
//! };
//!
//! let script = ScriptedSymbols::new([Symbol::Green, Symbol::Red]).unwrap();
//! let mut game = Game::new(&GameConfig::default())
//!     .with_symbols(script)
//!     .with_store(MemoryScoreStore::with_score(1));
//!
//! game.start();
//! assert_eq!(game.sequence(), &[Symbol::Green]);
//!
//! // Presses during playback are ignored
//! assert_eq!(game.submit_input(Symbol::Green), InputOutcome::Ignored);
//!
//! game.advance(Duration::from_secs(5));
//! assert_eq!(game.phase(), GamePhase::AwaitingInput);
//! assert_eq!(
//!     game.submit_input(Symbol::Green),
//!     InputOutcome::RoundComplete { round: 1 }
//! );
//!
//! game.advance(Duration::from_secs(5));
//! assert_eq!(game.sequence(), &[Symbol::Green, Symbol::Red]);
//!
//! game.submit_input(Symbol::Blue);
//! assert_eq!(game.phase(), GamePhase::GameOver);
//! assert_eq!(game.high_score(), 1);
//! ```

pub mod audio;
pub mod config;
pub mod input;
pub mod score;
pub mod state;

pub use config::GameConfig;
pub use state::{Game, GameEvent, GamePhase, Symbol};
