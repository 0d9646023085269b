//! Difficulty levels and the playback pace they map to.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pace of a presentation: a gap before each flash, then the flash itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub pause: Duration,
    pub flash: Duration,
}

impl Timing {
    pub const fn from_millis(pause: u64, flash: u64) -> Self {
        Self {
            pause: Duration::from_millis(pause),
            flash: Duration::from_millis(flash),
        }
    }

    /// Time taken by one symbol.
    pub fn step(&self) -> Duration {
        self.pause + self.flash
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    pub fn timing(&self) -> Timing {
        match self {
            Self::Easy => Timing::from_millis(400, 800),
            Self::Normal => Timing::from_millis(300, 500),
            Self::Hard => Timing::from_millis(150, 350),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal() {
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }

    #[test]
    fn test_harder_is_faster() {
        let steps: Vec<Duration> = Difficulty::ALL.iter().map(|d| d.timing().step()).collect();
        assert!(steps[0] > steps[1]);
        assert!(steps[1] > steps[2]);
    }

    #[test]
    fn test_normal_timing() {
        let timing = Difficulty::Normal.timing();
        assert_eq!(timing.pause, Duration::from_millis(300));
        assert_eq!(timing.flash, Duration::from_millis(500));
        assert_eq!(timing.step(), Duration::from_millis(800));
    }
}
