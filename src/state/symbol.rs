//! Symbols the player has to repeat, and where new ones come from.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::audio::Tone;

/// One of the four pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Symbol {
    /// Board order: top-left, top-right, bottom-left, bottom-right.
    pub const ALL: [Symbol; 4] = [Symbol::Green, Symbol::Red, Symbol::Yellow, Symbol::Blue];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
        }
    }

    /// Pitch of the pad: C4, E4, G4, C5.
    pub fn frequency_hz(&self) -> f32 {
        match self {
            Self::Green => 261.6,
            Self::Red => 329.6,
            Self::Yellow => 392.0,
            Self::Blue => 523.2,
        }
    }

    pub fn tone(&self) -> Tone {
        Tone::sine(self.frequency_hz())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a symbol name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown symbol: {0}")]
pub struct UnknownSymbol(pub String);

impl FromStr for Symbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::ALL
            .into_iter()
            .find(|sym| sym.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

/// Supplies the symbol appended at the start of each round.
pub trait SymbolSource {
    fn next_symbol(&mut self) -> Symbol;
}

/// Uniform, independent picks. Repeats are allowed.
#[derive(Debug, Clone)]
pub struct RandomSymbols<R = StdRng> {
    rng: R,
}

impl RandomSymbols<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSymbols<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SymbolSource for RandomSymbols<R> {
    fn next_symbol(&mut self) -> Symbol {
        Symbol::ALL[self.rng.gen_range(0..Symbol::ALL.len())]
    }
}

/// Plays back a fixed list of symbols, cycling when exhausted.
///
/// Useful for replays and tutorials where the pattern is known in advance.
#[derive(Debug, Clone)]
pub struct ScriptedSymbols {
    script: VecDeque<Symbol>,
}

impl ScriptedSymbols {
    /// Returns `None` for an empty script.
    pub fn new(script: impl IntoIterator<Item = Symbol>) -> Option<Self> {
        let script: VecDeque<Symbol> = script.into_iter().collect();
        if script.is_empty() {
            None
        } else {
            Some(Self { script })
        }
    }
}

impl SymbolSource for ScriptedSymbols {
    fn next_symbol(&mut self) -> Symbol {
        // Never empty, see `new`.
        let next = self.script[0];
        self.script.rotate_left(1);
        next
    }
}
