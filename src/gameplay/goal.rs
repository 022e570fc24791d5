//! Win/lose evaluation for a level.
//!
//! `GoalEvaluator` is what the session polls each tick. `LevelGoal` is the stock
//! implementation: a counter variant (moves XOR timer) combined with a rule variant
//! (score only, or score plus collection quotas).

use std::fmt;
use std::time::Duration;

use crate::core::components::{GamePiece, MatchValue};
use crate::core::level::{CollectionGoalSpec, CounterMode, LevelConfig, LevelCounter};

/// Capability the session needs from whatever owns the level's goals.
pub trait GoalEvaluator {
    /// Reset all progress from level data.
    fn configure(&mut self, level: &LevelConfig);
    fn counter_mode(&self) -> CounterMode;
    fn is_game_over(&self) -> bool;
    fn is_winner(&self) -> bool;
    /// `None` in timer mode.
    fn moves_left(&self) -> Option<u32>;
    /// `None` in moves mode.
    fn time_left(&self) -> Option<Duration>;
    fn start_countdown(&mut self);
    fn pause_countdown(&mut self);
    /// Advance a running countdown.
    fn tick(&mut self, dt: Duration);
    fn add_time(&mut self, seconds: u32);
    fn decrement_move(&mut self);
    fn update_score_stars(&mut self, score: u32);
    fn score_stars(&self) -> u32;
    fn update_collection_goals(&mut self, piece: &GamePiece);
    fn summary(&self) -> GoalSummary;
}

/// Text-ready description of what the player must achieve, shown on the intro screen.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSummary {
    pub level_name: String,
    pub score_goal: u32,
    pub counter: LevelCounter,
    pub collections: Vec<CollectionGoalSpec>,
}

impl fmt::Display for GoalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score goal\n{}", self.score_goal)?;
        match self.counter {
            LevelCounter::Moves(n) => write!(f, "\n{n} moves")?,
            LevelCounter::Timer(s) => write!(f, "\n{s} seconds")?,
        }
        for g in &self.collections {
            write!(f, "\ncollect {} {:?}", g.count, g.piece)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Counter {
    Moves { left: u32 },
    Timer { left: Duration, running: bool },
}

impl Counter {
    fn from_level(counter: LevelCounter) -> Self {
        match counter {
            LevelCounter::Moves(n) => Counter::Moves { left: n },
            LevelCounter::Timer(s) => Counter::Timer {
                left: Duration::from_secs(s as u64),
                running: false,
            },
        }
    }

    fn exhausted(&self) -> bool {
        match self {
            Counter::Moves { left } => *left == 0,
            Counter::Timer { left, .. } => left.is_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionGoal {
    pub piece: MatchValue,
    pub remaining: u32,
}

impl CollectionGoal {
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GoalRule {
    Scored,
    Collected(Vec<CollectionGoal>),
}

impl GoalRule {
    fn from_level(specs: &[CollectionGoalSpec]) -> Self {
        if specs.is_empty() {
            GoalRule::Scored
        } else {
            GoalRule::Collected(
                specs
                    .iter()
                    .map(|g| CollectionGoal {
                        piece: g.piece,
                        remaining: g.count,
                    })
                    .collect(),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelGoal {
    level_name: String,
    score_goals: Vec<u32>,
    initial_counter: LevelCounter,
    counter: Counter,
    rule: GoalRule,
    score: u32,
    stars: u32,
}

impl LevelGoal {
    pub fn from_level(level: &LevelConfig) -> Self {
        Self {
            level_name: level.name.clone(),
            score_goals: level.score_goals.clone(),
            initial_counter: level.counter,
            counter: Counter::from_level(level.counter),
            rule: GoalRule::from_level(&level.collection_goals),
            score: 0,
            stars: 0,
        }
    }

    pub fn counter(&self) -> &Counter {
        &self.counter
    }

    pub fn rule(&self) -> &GoalRule {
        &self.rule
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn first_goal(&self) -> u32 {
        self.score_goals.first().copied().unwrap_or(0)
    }

    fn final_goal(&self) -> u32 {
        self.score_goals.last().copied().unwrap_or(0)
    }

    fn collections_complete(&self) -> bool {
        match &self.rule {
            GoalRule::Scored => true,
            GoalRule::Collected(goals) => goals.iter().all(CollectionGoal::is_complete),
        }
    }
}

impl Default for LevelGoal {
    fn default() -> Self {
        Self::from_level(&LevelConfig::default())
    }
}

impl GoalEvaluator for LevelGoal {
    fn configure(&mut self, level: &LevelConfig) {
        *self = Self::from_level(level);
    }

    fn counter_mode(&self) -> CounterMode {
        match self.counter {
            Counter::Moves { .. } => CounterMode::Moves,
            Counter::Timer { .. } => CounterMode::Timer,
        }
    }

    fn is_game_over(&self) -> bool {
        let reached_top = self.score >= self.final_goal();
        let finished_early = match &self.rule {
            GoalRule::Scored => reached_top,
            GoalRule::Collected(_) => self.collections_complete() && reached_top,
        };
        finished_early || self.counter.exhausted()
    }

    fn is_winner(&self) -> bool {
        self.score >= self.first_goal() && self.collections_complete()
    }

    fn moves_left(&self) -> Option<u32> {
        match self.counter {
            Counter::Moves { left } => Some(left),
            Counter::Timer { .. } => None,
        }
    }

    fn time_left(&self) -> Option<Duration> {
        match self.counter {
            Counter::Timer { left, .. } => Some(left),
            Counter::Moves { .. } => None,
        }
    }

    fn start_countdown(&mut self) {
        if let Counter::Timer { running, .. } = &mut self.counter {
            *running = true;
        }
    }

    fn pause_countdown(&mut self) {
        if let Counter::Timer { running, .. } = &mut self.counter {
            *running = false;
        }
    }

    fn tick(&mut self, dt: Duration) {
        if let Counter::Timer { left, running: true } = &mut self.counter {
            *left = left.saturating_sub(dt);
        }
    }

    fn add_time(&mut self, seconds: u32) {
        if let Counter::Timer { left, .. } = &mut self.counter {
            *left += Duration::from_secs(seconds as u64);
        }
    }

    fn decrement_move(&mut self) {
        if let Counter::Moves { left } = &mut self.counter {
            *left = left.saturating_sub(1);
        }
    }

    fn update_score_stars(&mut self, score: u32) {
        self.score = score;
        self.stars = self.score_goals.iter().filter(|g| score >= **g).count() as u32;
    }

    fn score_stars(&self) -> u32 {
        self.stars
    }

    fn update_collection_goals(&mut self, piece: &GamePiece) {
        if let GoalRule::Collected(goals) = &mut self.rule {
            for g in goals.iter_mut().filter(|g| g.piece == piece.match_value) {
                g.remaining = g.remaining.saturating_sub(1);
            }
        }
    }

    fn summary(&self) -> GoalSummary {
        let collections = match &self.rule {
            GoalRule::Scored => Vec::new(),
            GoalRule::Collected(goals) => goals
                .iter()
                .map(|g| CollectionGoalSpec {
                    piece: g.piece,
                    count: g.remaining,
                })
                .collect(),
        };
        GoalSummary {
            level_name: self.level_name.clone(),
            score_goal: self.final_goal(),
            counter: self.initial_counter,
            collections,
        }
    }
}
