//! Notifications for the view layer.

use std::time::Duration;

use super::difficulty::Difficulty;
use super::playback::Generation;
use super::symbol::Symbol;

/// Something a view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The stored high score was read
    HighScoreLoaded { high_score: u32 },

    /// A new game began; `restarted` if it replaced one in flight
    GameStarted {
        generation: Generation,
        difficulty: Difficulty,
        restarted: bool,
    },

    /// Every pad should go dark
    LightsCleared,

    /// A presentation of `length` symbols is about to play
    RoundStarted { round: u32, length: usize },

    LightOn {
        symbol: Symbol,
        duration: Duration,
        echo: bool,
    },

    LightOff { symbol: Symbol },

    /// The player may now repeat the sequence
    InputUnlocked { length: usize },

    /// A correct press that did not finish the sequence
    InputAccepted {
        symbol: Symbol,
        index: usize,
        remaining: usize,
    },

    /// The sequence was reproduced
    RoundCompleted { round: u32 },

    GameOver {
        final_round: u32,
        high_score: u32,
        new_high_score: bool,
        expected: Symbol,
        pressed: Symbol,
    },

    DifficultyChanged { difficulty: Difficulty },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HighScoreLoaded { .. } => "high_score_loaded",
            Self::GameStarted { .. } => "game_started",
            Self::LightsCleared => "lights_cleared",
            Self::RoundStarted { .. } => "round_started",
            Self::LightOn { .. } => "light_on",
            Self::LightOff { .. } => "light_off",
            Self::InputUnlocked { .. } => "input_unlocked",
            Self::InputAccepted { .. } => "input_accepted",
            Self::RoundCompleted { .. } => "round_completed",
            Self::GameOver { .. } => "game_over",
            Self::DifficultyChanged { .. } => "difficulty_changed",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = match self {
            Self::HighScoreLoaded { high_score } => serde_json::json!({
                "high_score": high_score
            }),
            Self::GameStarted {
                generation,
                difficulty,
                restarted,
            } => serde_json::json!({
                "generation": generation.0,
                "difficulty": difficulty.as_str(),
                "restarted": restarted
            }),
            Self::LightsCleared => serde_json::json!({}),
            Self::RoundStarted { round, length } => serde_json::json!({
                "round": round,
                "length": length
            }),
            Self::LightOn {
                symbol,
                duration,
                echo,
            } => serde_json::json!({
                "symbol": symbol.as_str(),
                "duration_ms": duration.as_millis() as u64,
                "echo": echo
            }),
            Self::LightOff { symbol } => serde_json::json!({
                "symbol": symbol.as_str()
            }),
            Self::InputUnlocked { length } => serde_json::json!({
                "length": length
            }),
            Self::InputAccepted {
                symbol,
                index,
                remaining,
            } => serde_json::json!({
                "symbol": symbol.as_str(),
                "index": index,
                "remaining": remaining
            }),
            Self::RoundCompleted { round } => serde_json::json!({
                "round": round
            }),
            Self::GameOver {
                final_round,
                high_score,
                new_high_score,
                expected,
                pressed,
            } => serde_json::json!({
                "final_round": final_round,
                "high_score": high_score,
                "new_high_score": new_high_score,
                "expected": expected.as_str(),
                "pressed": pressed.as_str()
            }),
            Self::DifficultyChanged { difficulty } => serde_json::json!({
                "difficulty": difficulty.as_str()
            }),
        };
        obj["type"] = serde_json::json!(self.kind());
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_carries_type() {
        let event = GameEvent::GameOver {
            final_round: 2,
            high_score: 2,
            new_high_score: true,
            expected: Symbol::Blue,
            pressed: Symbol::Red,
        };
        let json = event.to_json();
        assert_eq!(json["type"], "game_over");
        assert_eq!(json["final_round"], 2);
        assert_eq!(json["pressed"], "red");
    }

    #[test]
    fn test_unit_event_json() {
        let json = GameEvent::LightsCleared.to_json();
        assert_eq!(json, serde_json::json!({"type": "lights_cleared"}));
    }
}
