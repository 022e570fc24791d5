use serde::Deserialize;

use crate::core::components::MatchValue;
use crate::core::error::SessionError;

use super::layout::{first_out_of_bounds, PieceSpec, TileSpec};

/// Which budget bounds a level. Exactly one is active per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterMode {
    Moves,
    Timer,
}

/// Budget as written in level data: a move count or a number of seconds.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LevelCounter {
    Moves(u32),
    Timer(u32),
}

impl LevelCounter {
    pub fn mode(&self) -> CounterMode {
        match self {
            LevelCounter::Moves(_) => CounterMode::Moves,
            LevelCounter::Timer(_) => CounterMode::Timer,
        }
    }

    pub fn budget(&self) -> u32 {
        match *self {
            LevelCounter::Moves(n) | LevelCounter::Timer(n) => n,
        }
    }
}

impl Default for LevelCounter {
    fn default() -> Self {
        LevelCounter::Moves(20)
    }
}

/// Quota of a specific piece colour the player must clear.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CollectionGoalSpec {
    pub piece: MatchValue,
    pub count: u32,
}

/// Static per-level data. Read-only once a session has been configured from it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub starting_tiles: Vec<TileSpec>,
    pub starting_pieces: Vec<PieceSpec>,
    pub score_goals: Vec<u32>,
    pub counter: LevelCounter,
    pub collection_goals: Vec<CollectionGoalSpec>,
    pub chance_for_collectible: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "Untitled".into(),
            width: 7,
            height: 9,
            starting_tiles: Vec::new(),
            starting_pieces: Vec::new(),
            score_goals: vec![1000, 2000, 3000],
            counter: LevelCounter::default(),
            collection_goals: Vec::new(),
            chance_for_collectible: 0.0,
        }
    }
}

impl LevelConfig {
    pub fn counter_mode(&self) -> CounterMode {
        self.counter.mode()
    }

    /// Score required for the top star; the threshold that ends a level early.
    pub fn final_score_goal(&self) -> u32 {
        self.score_goals.last().copied().unwrap_or(0)
    }

    /// Hard errors that make the level unplayable.
    pub fn check(&self) -> Result<(), SessionError> {
        let name = self.name.as_str();
        if self.width == 0 || self.height == 0 {
            return Err(SessionError::invalid_level(
                name,
                format!("board dimensions must be > 0 (got {}x{})", self.width, self.height),
            ));
        }
        if self.score_goals.is_empty() {
            return Err(SessionError::invalid_level(name, "score_goals empty"));
        }
        if self.score_goals.windows(2).any(|w| w[0] > w[1]) {
            return Err(SessionError::invalid_level(
                name,
                format!("score_goals must be ascending (got {:?})", self.score_goals),
            ));
        }
        if self.counter.budget() == 0 {
            return Err(SessionError::invalid_level(
                name,
                format!("{:?} budget must be > 0", self.counter_mode()),
            ));
        }
        if let Some(c) = first_out_of_bounds(&self.starting_tiles, self.width, self.height) {
            return Err(SessionError::invalid_level(
                name,
                format!("starting tile at ({}, {}) outside board", c.x, c.y),
            ));
        }
        if let Some(c) = first_out_of_bounds(&self.starting_pieces, self.width, self.height) {
            return Err(SessionError::invalid_level(
                name,
                format!("starting piece at ({}, {}) outside board", c.x, c.y),
            ));
        }
        Ok(())
    }

    /// Soft issues worth logging; the level still plays.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if !(0.0..=1.0).contains(&self.chance_for_collectible) {
            w.push(format!(
                "{}: chance_for_collectible {} outside 0..1 (clamped by the board)",
                self.name, self.chance_for_collectible
            ));
        }
        if self.collection_goals.iter().any(|g| g.count == 0) {
            w.push(format!("{}: collection goal with count 0 is always complete", self.name));
        }
        if self
            .starting_tiles
            .iter()
            .any(|t| t.kind == super::layout::TileKind::Breakable && t.breakable_value == 0)
        {
            w.push(format!(
                "{}: breakable tile with breakable_value 0 starts already broken",
                self.name
            ));
        }
        w
    }
}
