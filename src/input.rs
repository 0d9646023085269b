//! Keyboard bindings.
//!
//! Pointer and touch input map straight to [`Command::Press`]; keys go
//! through a [`KeyMap`] first.

use serde::{Deserialize, Serialize};

use crate::state::{Difficulty, Symbol};

/// Something the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Activate a pad
    Press(Symbol),
    /// Begin a game, only honoured when none is running
    Start,
    /// Begin a game, abandoning any game in flight
    Restart,
    /// Close the game-over banner
    Dismiss,
    /// Choose a difficulty for the next game
    SetDifficulty(Difficulty),
}

/// One key per command. Matching ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub green: char,
    pub red: char,
    pub yellow: char,
    pub blue: char,
    pub start: char,
    pub easy: char,
    pub normal: char,
    pub hard: char,
}

impl Default for KeyMap {
    fn default() -> Self {
        // Pads follow the board layout on the left hand
        Self {
            green: 'q',
            red: 'w',
            yellow: 'a',
            blue: 's',
            start: ' ',
            easy: '1',
            normal: '2',
            hard: '3',
        }
    }
}

impl KeyMap {
    pub fn bindings(&self) -> [(char, Command); 8] {
        [
            (self.green, Command::Press(Symbol::Green)),
            (self.red, Command::Press(Symbol::Red)),
            (self.yellow, Command::Press(Symbol::Yellow)),
            (self.blue, Command::Press(Symbol::Blue)),
            (self.start, Command::Start),
            (self.easy, Command::SetDifficulty(Difficulty::Easy)),
            (self.normal, Command::SetDifficulty(Difficulty::Normal)),
            (self.hard, Command::SetDifficulty(Difficulty::Hard)),
        ]
    }

    pub fn command_for(&self, key: char) -> Option<Command> {
        self.bindings()
            .into_iter()
            .find(|(bound, _)| bound.eq_ignore_ascii_case(&key))
            .map(|(_, command)| command)
    }

    /// Key bound to a pad, for on-screen hints.
    pub fn key_for(&self, symbol: Symbol) -> char {
        match symbol {
            Symbol::Green => self.green,
            Symbol::Red => self.red,
            Symbol::Yellow => self.yellow,
            Symbol::Blue => self.blue,
        }
    }

    /// First key bound to more than one command.
    pub fn find_conflict(&self) -> Option<char> {
        let keys: Vec<char> = self
            .bindings()
            .iter()
            .map(|(k, _)| k.to_ascii_lowercase())
            .collect();
        keys.iter()
            .enumerate()
            .find(|&(i, &k)| keys[i + 1..].contains(&k))
            .map(|(_, k)| *k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyMap::default();
        assert_eq!(keys.command_for('q'), Some(Command::Press(Symbol::Green)));
        assert_eq!(keys.command_for('S'), Some(Command::Press(Symbol::Blue)));
        assert_eq!(keys.command_for(' '), Some(Command::Start));
        assert_eq!(
            keys.command_for('3'),
            Some(Command::SetDifficulty(Difficulty::Hard))
        );
        assert_eq!(keys.command_for('z'), None);
    }

    #[test]
    fn test_key_for_round_trips() {
        let keys = KeyMap::default();
        for symbol in Symbol::ALL {
            assert_eq!(
                keys.command_for(keys.key_for(symbol)),
                Some(Command::Press(symbol))
            );
        }
    }

    #[test]
    fn test_conflicts() {
        assert_eq!(KeyMap::default().find_conflict(), None);

        let keys = KeyMap {
            blue: 'Q',
            ..KeyMap::default()
        };
        assert_eq!(keys.find_conflict(), Some('q'));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let keys: KeyMap = serde_json::from_str(r#"{"green": "j"}"#).unwrap();
        assert_eq!(keys.green, 'j');
        assert_eq!(keys.red, 'w');
    }
}
