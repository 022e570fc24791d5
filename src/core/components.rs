use serde::{Deserialize, Serialize};

/// Colour family a piece belongs to; pieces of the same value match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MatchValue {
    Yellow,
    Blue,
    Magenta,
    Indigo,
    Green,
    Teal,
    Red,
    Cyan,
    Wild,
}

impl MatchValue {
    /// Regular colours a board may deal out (excludes `Wild`).
    pub const COLORS: [MatchValue; 8] = [
        MatchValue::Yellow,
        MatchValue::Blue,
        MatchValue::Magenta,
        MatchValue::Indigo,
        MatchValue::Green,
        MatchValue::Teal,
        MatchValue::Red,
        MatchValue::Cyan,
    ];
}

/// A cleared piece as seen by scoring and collection goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePiece {
    pub match_value: MatchValue,
    pub score_value: u32,
}

impl GamePiece {
    pub fn new(match_value: MatchValue, score_value: u32) -> Self {
        Self {
            match_value,
            score_value,
        }
    }
}

impl Default for GamePiece {
    fn default() -> Self {
        Self {
            match_value: MatchValue::Yellow,
            score_value: 20,
        }
    }
}
