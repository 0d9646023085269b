//! Timed, cancellable feedback.
//!
//! The scheduler runs on a logical clock that the host advances. Work is
//! queued as [`Cue`]s due at a point on that clock, and each cue carries the
//! [`Generation`] that was current when it was queued. Starting a new game
//! begins a new generation; cues from older generations never fire.
//!
//! A presentation of `n` symbols looks like this (`p` = pause, `f` = flash):
//!
//! ```text
//! |-- lead-in --|-- p --|== f ==|-- p --|== f ==| ... |-- p --|== f ==|
//!                       on      off     on      off           on      off
//!                                                                     complete
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::difficulty::Timing;
use super::symbol::Symbol;

/// Delay before the first symbol of a presentation.
pub const DEFAULT_LEAD_IN: Duration = Duration::from_millis(500);

/// Pause between a completed round and the next presentation.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Length of the flash echoing a player's press.
pub const DEFAULT_ECHO_DURATION: Duration = Duration::from_millis(250);

/// Length of the game-over buzz.
pub const DEFAULT_GAME_OVER_TONE: Duration = Duration::from_millis(500);

/// Fixed delays that do not depend on difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub lead_in: Duration,
    pub settle: Duration,
    pub echo: Duration,
    pub game_over_tone: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            lead_in: DEFAULT_LEAD_IN,
            settle: DEFAULT_SETTLE_DELAY,
            echo: DEFAULT_ECHO_DURATION,
            game_over_tone: DEFAULT_GAME_OVER_TONE,
        }
    }
}

/// Monotonic tag identifying one game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Why a pad is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackSource {
    /// Part of the target sequence
    Presentation { index: usize },
    /// Echo of the player's own press
    Echo,
}

/// Something to do at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Light a pad and sound its tone
    Activate {
        symbol: Symbol,
        duration: Duration,
        source: FeedbackSource,
    },
    /// Turn a pad off
    Deactivate { symbol: Symbol },
    /// Every symbol of the presentation has been shown
    PresentationComplete,
    /// The pause after a completed round is over
    SettleComplete,
}

/// Handle to a single queued cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    pub due: Duration,
    pub seq: u64,
    pub generation: Generation,
}

/// A cue that has become due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredCue {
    pub at: Duration,
    pub generation: Generation,
    pub cue: Cue,
}

#[derive(Debug, Clone)]
struct ScheduledCue {
    generation: Generation,
    cue: Cue,
}

/// Queue of generation-tagged cues on a logical clock.
#[derive(Debug, Clone, Default)]
pub struct PlaybackScheduler {
    /// Current logical time
    now: Duration,

    generation: Generation,

    /// Sequence number for ordering cues due at the same instant
    next_seq: u64,

    /// Cues keyed by (due, seq)
    pending: BTreeMap<(Duration, u64), ScheduledCue>,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of cues still queued.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Supersede everything queued so far.
    pub fn begin_generation(&mut self) -> Generation {
        let dropped = self.pending.len();
        self.pending.clear();
        self.generation = self.generation.next();
        log::debug!(
            "playback {} begins, dropped {} queued cues",
            self.generation,
            dropped
        );
        self.generation
    }

    /// Queue a cue at an absolute time. Times in the past fire on the next poll.
    pub fn at(&mut self, due: Duration, cue: Cue) -> TimerHandle {
        self.next_seq += 1;
        let handle = TimerHandle {
            due,
            seq: self.next_seq,
            generation: self.generation,
        };
        self.pending.insert(
            (due, handle.seq),
            ScheduledCue {
                generation: self.generation,
                cue,
            },
        );
        handle
    }

    /// Queue a cue relative to now.
    pub fn after(&mut self, delay: Duration, cue: Cue) -> TimerHandle {
        self.at(self.now.saturating_add(delay), cue)
    }

    /// Queue a full presentation of `sequence`.
    ///
    /// Returns the time until [`Cue::PresentationComplete`] fires, which is
    /// `lead_in + len * (pause + flash)`.
    pub fn present(&mut self, sequence: &[Symbol], timing: Timing, lead_in: Duration) -> Duration {
        let start = self.now.saturating_add(lead_in);
        let mut cursor = start;

        for (index, &symbol) in sequence.iter().enumerate() {
            let on = cursor.saturating_add(timing.pause);
            let off = on.saturating_add(timing.flash);
            self.at(
                on,
                Cue::Activate {
                    symbol,
                    duration: timing.flash,
                    source: FeedbackSource::Presentation { index },
                },
            );
            self.at(off, Cue::Deactivate { symbol });
            cursor = off;
        }

        self.at(cursor, Cue::PresentationComplete);
        cursor - self.now
    }

    /// Light a pad right away for a fixed time.
    ///
    /// Returns the handle of the deactivation.
    pub fn echo(&mut self, symbol: Symbol, duration: Duration) -> TimerHandle {
        self.at(
            self.now,
            Cue::Activate {
                symbol,
                duration,
                source: FeedbackSource::Echo,
            },
        );
        self.after(duration, Cue::Deactivate { symbol })
    }

    /// Cancel one queued cue. Returns false if it already fired or was dropped.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&(handle.due, handle.seq)).is_some()
    }

    /// Pop the earliest cue due at or before `deadline`.
    ///
    /// The clock moves to the cue's due time. Cues from a superseded
    /// generation are discarded.
    pub fn poll(&mut self, deadline: Duration) -> Option<FiredCue> {
        loop {
            let (&(due, seq), _) = self.pending.iter().next()?;
            if due > deadline {
                return None;
            }
            let scheduled = self.pending.remove(&(due, seq))?;
            self.now = self.now.max(due);

            if scheduled.generation != self.generation {
                log::trace!(
                    "discarding stale {:?} from {} (current {})",
                    scheduled.cue,
                    scheduled.generation,
                    self.generation
                );
                continue;
            }

            return Some(FiredCue {
                at: due,
                generation: scheduled.generation,
                cue: scheduled.cue,
            });
        }
    }

    /// Move the clock forward without firing anything.
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Time until the next queued cue, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .keys()
            .next()
            .map(|&(due, _)| due.saturating_sub(self.now))
    }

    /// Fire everything due within `elapsed` and move the clock.
    pub fn drain(&mut self, elapsed: Duration) -> Vec<FiredCue> {
        let deadline = self.now.saturating_add(elapsed);
        let mut fired = Vec::new();
        while let Some(cue) = self.poll(deadline) {
            fired.push(cue);
        }
        self.advance_clock(deadline);
        fired
    }
}
