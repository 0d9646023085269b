//! Game state management.
//!
//! Owns the target sequence, the player's input for the current round, the
//! round counter and the high score, and drives the phase machine from
//! player input and scheduler cues.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::difficulty::Difficulty;
use super::events::GameEvent;
use super::phase::{GamePhase, InvalidTransition, PhaseEvent, PhaseMachine};
use super::playback::{Cue, FeedbackSource, Generation, Pacing, PlaybackScheduler};
use super::symbol::{RandomSymbols, Symbol, SymbolSource};
use crate::audio::{AudioBackend, SilentAudio, Tone};
use crate::config::GameConfig;
use crate::input::{Command, KeyMap};
use crate::score::{JsonFileScoreStore, MemoryScoreStore, ScoreStore};

/// What happened to a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input is locked; nothing changed
    Ignored,
    /// Correct so far, `remaining` presses to go
    Accepted { remaining: usize },
    /// Sequence reproduced; `round` rounds completed
    RoundComplete { round: u32 },
    /// Wrong pad
    Mistake { expected: Symbol },
}

/// Game errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot change settings while a game is {0}")]
    GameInProgress(GamePhase),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// What a view needs to draw the board and status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub round: u32,
    /// Length of the target sequence
    pub length: usize,
    pub input_length: usize,
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub locked: bool,
    pub generation: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// A single-player game session.
pub struct Game {
    phase: PhaseMachine,

    /// Target pattern, one symbol longer each round
    sequence: Vec<Symbol>,

    /// Presses in the current round, always a prefix of `sequence`
    input: Vec<Symbol>,

    /// Rounds completed in the current game
    round: u32,

    high_score: u32,

    difficulty: Difficulty,

    pacing: Pacing,

    keys: KeyMap,

    /// High score slot used by `with_score_file`
    score_slot: String,

    scheduler: PlaybackScheduler,

    symbols: Box<dyn SymbolSource>,

    audio: Box<dyn AudioBackend>,

    store: Box<dyn ScoreStore>,

    /// Notifications not yet drained by the view
    events: Vec<GameEvent>,

    /// When the current game started
    pub started_at: Option<DateTime<Utc>>,

    /// When the last game ended
    pub ended_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Create a game with random symbols, no sound and an in-memory score.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: PhaseMachine::new(),
            sequence: Vec::new(),
            input: Vec::new(),
            round: 0,
            high_score: 0,
            difficulty: config.difficulty,
            pacing: config.pacing(),
            keys: config.keys.clone(),
            score_slot: config.score_slot.clone(),
            scheduler: PlaybackScheduler::new(),
            symbols: Box::new(RandomSymbols::from_entropy()),
            audio: Box::new(SilentAudio),
            store: Box::new(MemoryScoreStore::new()),
            events: Vec::new(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn with_symbols(mut self, symbols: impl SymbolSource + 'static) -> Self {
        self.symbols = Box::new(symbols);
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioBackend>) -> Self {
        self.audio = audio;
        self
    }

    /// Use `store` for the high score, loading it right away.
    ///
    /// A store that cannot be read counts as a high score of 0.
    pub fn with_store(mut self, store: impl ScoreStore + 'static) -> Self {
        self.high_score = match store.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("could not load high score, starting from 0: {}", e);
                0
            }
        };
        self.store = Box::new(store);
        self.events.push(GameEvent::HighScoreLoaded {
            high_score: self.high_score,
        });
        self
    }

    /// Keep the high score in a JSON file, in the configured slot.
    pub fn with_score_file(self, path: impl Into<PathBuf>) -> Self {
        let store = JsonFileScoreStore::with_slot(path, self.score_slot.clone());
        self.with_store(store)
    }

    // Accessors

    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn input(&self) -> &[Symbol] {
        &self.input
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub fn generation(&self) -> Generation {
        self.scheduler.generation()
    }

    /// Input is ignored unless the game is awaiting it.
    pub fn is_locked(&self) -> bool {
        !self.phase.accepts_input()
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Logical time since the game was created.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// How long the host may wait before calling [`Game::advance`].
    pub fn time_until_next(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Take all pending notifications, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // Operations

    /// Start a new game, abandoning any game in flight.
    pub fn start(&mut self) -> Generation {
        let restarted = self.phase.is_running();
        let generation = self.scheduler.begin_generation();
        self.transition(PhaseEvent::Start);

        self.round = 0;
        self.sequence.clear();
        self.input.clear();
        self.started_at = Some(Utc::now());
        self.ended_at = None;

        log::info!(
            "game {} started on {}{}",
            generation,
            self.difficulty,
            if restarted { " (restart)" } else { "" }
        );
        self.events.push(GameEvent::GameStarted {
            generation,
            difficulty: self.difficulty,
            restarted,
        });
        self.events.push(GameEvent::LightsCleared);

        self.begin_round();
        generation
    }

    /// Record a press. Ignored unless the game is awaiting input.
    pub fn submit_input(&mut self, symbol: Symbol) -> InputOutcome {
        if !self.phase.accepts_input() {
            log::trace!("ignoring {} while {}", symbol, self.phase());
            return InputOutcome::Ignored;
        }

        let index = self.input.len();
        let Some(&expected) = self.sequence.get(index) else {
            return InputOutcome::Ignored;
        };

        self.input.push(symbol);
        self.scheduler.echo(symbol, self.pacing.echo);
        self.pump(self.scheduler.now());

        if symbol != expected {
            self.game_over(expected, symbol);
            return InputOutcome::Mistake { expected };
        }

        if self.input.len() == self.sequence.len() {
            self.round += 1;
            self.transition(PhaseEvent::SequenceMatched);
            log::debug!("round {} complete", self.round);
            self.events.push(GameEvent::RoundCompleted { round: self.round });
            self.scheduler.after(self.pacing.settle, Cue::SettleComplete);
            return InputOutcome::RoundComplete { round: self.round };
        }

        let remaining = self.sequence.len() - self.input.len();
        self.events.push(GameEvent::InputAccepted {
            symbol,
            index,
            remaining,
        });
        InputOutcome::Accepted { remaining }
    }

    /// Choose the difficulty for the next game.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        let phase = self.phase();
        if !phase.allows_settings_change() {
            return Err(GameError::GameInProgress(phase));
        }
        if self.difficulty != difficulty {
            self.difficulty = difficulty;
            log::debug!("difficulty set to {}", difficulty);
            self.events.push(GameEvent::DifficultyChanged { difficulty });
        }
        Ok(())
    }

    /// Close the game-over banner and return to idle.
    ///
    /// The final round stays readable until the next start.
    pub fn dismiss(&mut self) -> Result<(), GameError> {
        self.phase.apply_mut(PhaseEvent::Dismiss)?;
        Ok(())
    }

    /// Move the clock forward, firing every cue that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let deadline = self.scheduler.now().saturating_add(elapsed);
        self.pump(deadline);
        self.scheduler.advance_clock(deadline);
    }

    /// Apply a command. Returns false if it had no effect.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Press(symbol) => self.submit_input(symbol) != InputOutcome::Ignored,
            Command::Start if self.is_running() => false,
            Command::Start | Command::Restart => {
                self.start();
                true
            }
            Command::Dismiss => self.dismiss().is_ok(),
            Command::SetDifficulty(difficulty) => self.set_difficulty(difficulty).is_ok(),
        }
    }

    /// Look up a key in the bindings and apply its command.
    pub fn handle_key(&mut self, key: char) -> bool {
        match self.keys.command_for(key) {
            Some(command) => self.apply(command),
            None => false,
        }
    }

    // Internals

    fn transition(&mut self, event: PhaseEvent) -> bool {
        let from = self.phase();
        match self.phase.apply_mut(event) {
            Ok(to) => {
                log::debug!("{} -> {} via {:?}", from, to, event);
                true
            }
            Err(e) => {
                log::debug!("{}", e);
                false
            }
        }
    }

    /// Extend the sequence and present it. The phase must already be Presenting.
    fn begin_round(&mut self) {
        self.sequence.push(self.symbols.next_symbol());
        self.input.clear();
        self.events.push(GameEvent::RoundStarted {
            round: self.round,
            length: self.sequence.len(),
        });
        let total = self.scheduler.present(
            &self.sequence,
            self.difficulty.timing(),
            self.pacing.lead_in,
        );
        log::debug!(
            "presenting {} symbols over {:?}",
            self.sequence.len(),
            total
        );
    }

    fn game_over(&mut self, expected: Symbol, pressed: Symbol) {
        self.transition(PhaseEvent::Mistake);
        self.ended_at = Some(Utc::now());
        self.play(Tone::error(), self.pacing.game_over_tone);

        let final_round = self.round;
        let new_high_score = final_round > self.high_score;
        if new_high_score {
            self.high_score = final_round;
            if let Err(e) = self.store.save(final_round) {
                log::warn!("could not save high score {}: {}", final_round, e);
            }
        }

        log::info!(
            "game over at round {} (pressed {}, expected {}){}",
            final_round,
            pressed,
            expected,
            if new_high_score { ", new high score" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            final_round,
            high_score: self.high_score,
            new_high_score,
            expected,
            pressed,
        });
    }

    fn pump(&mut self, deadline: Duration) {
        while let Some(fired) = self.scheduler.poll(deadline) {
            self.handle_cue(fired.cue);
        }
    }

    fn handle_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Activate {
                symbol,
                duration,
                source,
            } => {
                self.play(symbol.tone(), duration);
                self.events.push(GameEvent::LightOn {
                    symbol,
                    duration,
                    echo: source == FeedbackSource::Echo,
                });
            }
            Cue::Deactivate { symbol } => {
                self.events.push(GameEvent::LightOff { symbol });
            }
            Cue::PresentationComplete => {
                if self.transition(PhaseEvent::PresentationFinished) {
                    self.events.push(GameEvent::InputUnlocked {
                        length: self.sequence.len(),
                    });
                }
            }
            Cue::SettleComplete => {
                if self.transition(PhaseEvent::Settled) {
                    self.begin_round();
                }
            }
        }
    }

    /// Play a tone, going silent for good if the backend fails.
    fn play(&mut self, tone: Tone, duration: Duration) {
        if let Err(e) = self.audio.play(tone, duration) {
            log::warn!(
                "{} audio failed, continuing without sound: {}",
                self.audio.name(),
                e
            );
            self.audio = Box::new(SilentAudio);
        }
    }

    /// Current state for the view.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase(),
            round: self.round,
            length: self.sequence.len(),
            input_length: self.input.len(),
            high_score: self.high_score,
            difficulty: self.difficulty,
            locked: self.is_locked(),
            generation: self.generation().0,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Convert game state to a JSON snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase())
            .field("round", &self.round)
            .field("sequence", &self.sequence)
            .field("input", &self.input)
            .field("high_score", &self.high_score)
            .field("difficulty", &self.difficulty)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingAudio;
    use crate::audio::ERROR_TONE_HZ;
    use crate::score::ScoreError;
    use crate::state::symbol::ScriptedSymbols;
    use pretty_assertions::assert_eq;

    use crate::state::symbol::Symbol::*;

    /// Long enough for any presentation in these tests to finish.
    const PLENTY: Duration = Duration::from_secs(60);

    fn scripted(script: &[Symbol]) -> Game {
        let _ = env_logger::builder().is_test(true).try_init();
        Game::new(&GameConfig::default())
            .with_symbols(ScriptedSymbols::new(script.to_vec()).unwrap())
    }

    /// Run the presentation until input unlocks.
    fn present(game: &mut Game) {
        game.advance(PLENTY);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
    }

    /// Let the settle delay pass and the next presentation play.
    fn next_round(game: &mut Game) {
        game.advance(PLENTY);
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<u32, ScoreError> {
            Err(ScoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }

        fn save(&mut self, _score: u32) -> Result<(), ScoreError> {
            Err(ScoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }
    }

    #[test]
    fn test_game_new() {
        let game = Game::new(&GameConfig::default());
        assert_eq!(game.phase(), GamePhase::Idle);
        assert_eq!(game.round(), 0);
        assert!(game.sequence().is_empty());
        assert!(game.is_locked());
        assert_eq!(game.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_start_presents_one_symbol() {
        let mut game = scripted(&[Green]);
        game.start();

        assert_eq!(game.phase(), GamePhase::Presenting);
        assert_eq!(game.sequence(), &[Green]);
        assert_eq!(game.round(), 0);
        assert!(game.is_locked());
    }

    #[test]
    fn test_unlocks_exactly_when_presentation_ends() {
        let mut game = scripted(&[Green]);
        game.start();

        // lead-in 500 + pause 300 + flash 500
        game.advance(Duration::from_millis(1_299));
        assert!(game.is_locked());
        game.advance(Duration::from_millis(1));
        assert!(!game.is_locked());
    }

    #[test]
    fn test_worked_example() {
        let store = MemoryScoreStore::with_score(1);
        let mut game = scripted(&[Green, Red, Blue]).with_store(store.clone());
        assert_eq!(game.high_score(), 1);

        game.start();
        assert_eq!(game.sequence(), &[Green]);
        present(&mut game);
        assert_eq!(game.submit_input(Green), InputOutcome::RoundComplete { round: 1 });
        assert_eq!(game.phase(), GamePhase::RoundComplete);

        next_round(&mut game);
        assert_eq!(game.round(), 1);
        assert_eq!(game.sequence(), &[Green, Red]);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);

        assert_eq!(game.submit_input(Green), InputOutcome::Accepted { remaining: 1 });
        assert_eq!(game.submit_input(Red), InputOutcome::RoundComplete { round: 2 });

        next_round(&mut game);
        assert_eq!(game.sequence(), &[Green, Red, Blue]);
        assert_eq!(game.submit_input(Green), InputOutcome::Accepted { remaining: 2 });
        assert_eq!(game.submit_input(Yellow), InputOutcome::Mistake { expected: Red });

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.round(), 2);
        assert_eq!(game.high_score(), 2);
        assert_eq!(store.score(), 2);

        let over = game
            .drain_events()
            .into_iter()
            .find(|e| matches!(e, GameEvent::GameOver { .. }))
            .unwrap();
        assert_eq!(
            over,
            GameEvent::GameOver {
                final_round: 2,
                high_score: 2,
                new_high_score: true,
                expected: Red,
                pressed: Yellow,
            }
        );
    }

    #[test]
    fn test_sequence_length_matches_round() {
        let mut game = Game::new(&GameConfig::default())
            .with_symbols(RandomSymbols::seeded(3));
        game.start();

        for n in 1..=8usize {
            assert_eq!(game.sequence().len(), n);
            assert_eq!(game.round() as usize, n - 1);
            present(&mut game);

            let target = game.sequence().to_vec();
            for symbol in target {
                game.submit_input(symbol);
            }
            assert_eq!(game.round() as usize, n);
            assert!(game.input().len() == n);
            next_round(&mut game);
            assert!(game.input().is_empty());
        }
    }

    #[test]
    fn test_first_press_wrong_ends_game() {
        let mut game = scripted(&[Blue]);
        game.start();
        present(&mut game);

        assert_eq!(game.submit_input(Red), InputOutcome::Mistake { expected: Blue });
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.round(), 0);
        assert!(game.is_locked());
    }

    #[test]
    fn test_input_ignored_while_locked() {
        let mut game = scripted(&[Green, Red]);

        // Idle
        assert_eq!(game.submit_input(Green), InputOutcome::Ignored);

        // Presenting, even mid-flash
        game.start();
        game.advance(Duration::from_millis(900));
        assert_eq!(game.phase(), GamePhase::Presenting);
        let before = (game.sequence().to_vec(), game.round());
        assert_eq!(game.submit_input(Green), InputOutcome::Ignored);
        assert!(game.input().is_empty());
        assert_eq!((game.sequence().to_vec(), game.round()), before);

        // RoundComplete
        present(&mut game);
        game.submit_input(Green);
        assert_eq!(game.phase(), GamePhase::RoundComplete);
        assert_eq!(game.submit_input(Red), InputOutcome::Ignored);
        assert_eq!(game.input(), &[Green]);
        assert_eq!(game.round(), 1);

        // GameOver
        next_round(&mut game);
        game.submit_input(Blue);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.submit_input(Green), InputOutcome::Ignored);
        assert_eq!(game.input(), &[Blue]);
    }

    #[test]
    fn test_high_score_only_on_strict_improvement() {
        let store = MemoryScoreStore::with_score(1);
        let mut game = scripted(&[Green]).with_store(store.clone());

        // Ends at round 1: equal, not greater
        game.start();
        present(&mut game);
        game.submit_input(Green);
        next_round(&mut game);
        game.submit_input(Red);
        assert_eq!(game.round(), 1);
        assert_eq!(game.high_score(), 1);
        assert_eq!(store.save_count(), 0);

        // Ends at round 0: never lowers it
        game.start();
        present(&mut game);
        game.submit_input(Red);
        assert_eq!(game.high_score(), 1);
        assert_eq!(store.score(), 1);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_restart_mid_presentation_drops_stale_cues() {
        let mut game = scripted(&[Green, Red, Yellow, Blue]);
        let first = game.start();
        present(&mut game);
        game.submit_input(Green);
        next_round(&mut game);
        game.submit_input(Green);
        game.submit_input(Red);
        next_round(&mut game);
        assert_eq!(game.sequence().len(), 3);

        // Second game is restarted while the old one is mid-presentation
        game.start();
        game.advance(Duration::from_millis(900));
        game.drain_events();

        let second = game.start();
        assert!(second > first);
        assert_eq!(game.round(), 0);
        assert_eq!(game.sequence().len(), 1);

        let restarted = game.drain_events();
        assert!(matches!(
            restarted[0],
            GameEvent::GameStarted {
                restarted: true,
                ..
            }
        ));

        // Only the new single-symbol presentation plays
        game.advance(PLENTY);
        let lights: Vec<GameEvent> = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LightOn { .. }))
            .collect();
        assert_eq!(lights.len(), 1);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_restart_during_settle_does_not_double_advance() {
        let mut game = scripted(&[Green, Blue]);
        game.start();
        present(&mut game);
        game.submit_input(Green);
        assert_eq!(game.phase(), GamePhase::RoundComplete);

        game.start();
        game.advance(PLENTY);
        // The old settle cue must not have extended the new sequence
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_difficulty_only_between_games() {
        let mut game = scripted(&[Green]);
        game.set_difficulty(Difficulty::Hard).unwrap();
        assert_eq!(game.difficulty(), Difficulty::Hard);

        game.start();
        assert_eq!(
            game.set_difficulty(Difficulty::Easy),
            Err(GameError::GameInProgress(GamePhase::Presenting))
        );
        assert_eq!(game.difficulty(), Difficulty::Hard);

        present(&mut game);
        game.submit_input(Red);
        game.set_difficulty(Difficulty::Easy).unwrap();
        assert_eq!(game.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_hard_presents_faster() {
        let mut game = scripted(&[Green]);
        game.set_difficulty(Difficulty::Hard).unwrap();
        game.start();

        // lead-in 500 + pause 150 + flash 350
        game.advance(Duration::from_millis(1_000));
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_feedback_events_and_tones() {
        let audio = RecordingAudio::default();
        let mut game = scripted(&[Yellow]).with_audio(Box::new(audio.clone()));
        game.start();
        present(&mut game);

        let events = game.drain_events();
        let kinds: Vec<&str> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "game_started",
                "lights_cleared",
                "round_started",
                "light_on",
                "light_off",
                "input_unlocked"
            ]
        );

        game.submit_input(Yellow);
        let echo = game.drain_events();
        assert_eq!(
            echo[0],
            GameEvent::LightOn {
                symbol: Yellow,
                duration: Duration::from_millis(250),
                echo: true,
            }
        );

        next_round(&mut game);
        game.submit_input(Green);
        let freqs = audio.frequencies();
        assert_eq!(freqs.last().copied(), Some(ERROR_TONE_HZ));
        assert_eq!(freqs[0], Yellow.frequency_hz());
    }

    #[test]
    fn test_audio_failure_degrades_to_silence() {
        let mut game = scripted(&[Red]).with_audio(Box::new(RecordingAudio::failing()));
        game.start();
        present(&mut game);
        assert_eq!(game.submit_input(Red), InputOutcome::RoundComplete { round: 1 });
    }

    #[test]
    fn test_broken_store_degrades() {
        let mut game = scripted(&[Red]).with_store(BrokenStore);
        assert_eq!(game.high_score(), 0);

        game.start();
        present(&mut game);
        game.submit_input(Red);
        next_round(&mut game);
        game.submit_input(Blue);

        // Save failed, the in-memory high score still moves
        assert_eq!(game.high_score(), 1);
    }

    #[test]
    fn test_dismiss() {
        let mut game = scripted(&[Red]);
        assert!(matches!(game.dismiss(), Err(GameError::Transition(_))));

        // Clear one round, then miss the second
        game.start();
        present(&mut game);
        game.submit_input(Red);
        next_round(&mut game);
        game.submit_input(Blue);
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.dismiss().unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);
        // The final round stays readable until the next start
        assert_eq!(game.round(), 1);
        assert_eq!(game.sequence().len(), 2);

        game.start();
        assert_eq!(game.round(), 0);
    }

    #[test]
    fn test_keyboard_commands() {
        let mut game = scripted(&[Green]);
        assert!(game.handle_key('3'));
        assert_eq!(game.difficulty(), Difficulty::Hard);

        assert!(game.handle_key(' '));
        let generation = game.generation();
        // Space does nothing while a game is running
        assert!(!game.handle_key(' '));
        assert_eq!(game.generation(), generation);
        assert!(!game.handle_key('1'));

        present(&mut game);
        assert!(game.handle_key('Q'));
        assert_eq!(game.round(), 1);
        assert!(!game.handle_key('x'));

        // Restart is always honoured
        assert!(game.apply(Command::Restart));
        assert!(game.generation() > generation);
    }

    #[test]
    fn test_snapshot_json() {
        let mut game = scripted(&[Blue]);
        game.start();
        let json = game.to_json();
        assert_eq!(json["phase"], "presenting");
        assert_eq!(json["length"], 1);
        assert_eq!(json["locked"], true);
        assert_eq!(json["difficulty"], "normal");
    }

    #[test]
    fn test_snapshot() {
        let mut game = scripted(&[Yellow]).with_store(MemoryScoreStore::with_score(4));
        assert_eq!(
            game.snapshot(),
            GameSnapshot {
                phase: GamePhase::Idle,
                round: 0,
                length: 0,
                input_length: 0,
                high_score: 4,
                difficulty: Difficulty::Normal,
                locked: true,
                generation: game.generation().0,
                started_at: None,
                ended_at: None,
            }
        );

        game.start();
        present(&mut game);
        game.submit_input(Yellow);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, GamePhase::RoundComplete);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.length, 1);
        assert_eq!(snapshot.input_length, 1);
        assert!(snapshot.locked);
        assert!(snapshot.started_at.is_some());
        assert_eq!(snapshot.ended_at, None);
        assert_eq!(game.to_json()["phase"], "round_complete");
    }

    #[test]
    fn test_high_score_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut game = scripted(&[Green, Red]).with_score_file(&path);
        game.start();
        present(&mut game);
        game.submit_input(Green);
        next_round(&mut game);
        game.submit_input(Green);
        game.submit_input(Red);
        next_round(&mut game);
        game.submit_input(Blue);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.high_score(), 2);

        // A fresh session on the same file
        let mut reopened = scripted(&[Green]).with_score_file(&path);
        assert_eq!(reopened.high_score(), 2);
        assert_eq!(
            reopened.drain_events().first(),
            Some(&GameEvent::HighScoreLoaded { high_score: 2 })
        );

        // A shorter game leaves the file alone
        reopened.start();
        present(&mut reopened);
        reopened.submit_input(Red);
        assert_eq!(JsonFileScoreStore::new(&path).load().unwrap(), 2);
    }

    #[test]
    fn test_score_file_uses_configured_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let config = GameConfig {
            score_slot: "alice".to_string(),
            ..GameConfig::default()
        };

        let mut game = Game::new(&config)
            .with_symbols(ScriptedSymbols::new(vec![Blue]).unwrap())
            .with_score_file(&path);
        game.start();
        present(&mut game);
        game.submit_input(Blue);
        next_round(&mut game);
        game.submit_input(Red);
        assert_eq!(game.high_score(), 1);

        assert_eq!(JsonFileScoreStore::with_slot(&path, "alice").load().unwrap(), 1);
        assert_eq!(JsonFileScoreStore::new(&path).load().unwrap(), 0);
    }

    #[test]
    fn test_advance_saturates_clock() {
        let mut game = scripted(&[Red]);
        game.start();
        game.advance(Duration::MAX);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
        assert_eq!(game.now(), Duration::MAX);

        // Further time cannot overflow the clock
        game.advance(Duration::from_secs(1));
        assert_eq!(game.now(), Duration::MAX);

        // A restart at the end of time still presents and unlocks
        game.start();
        assert_eq!(game.phase(), GamePhase::Presenting);
        assert_eq!(game.time_until_next(), Some(Duration::ZERO));
        game.advance(Duration::ZERO);
        assert_eq!(game.phase(), GamePhase::AwaitingInput);
    }
}
