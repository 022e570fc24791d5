//! Level session controller.
//!
//! One session takes the level selected by the saved level index through
//! `Intro -> Playing -> Settling -> Resolved` and ends with an outcome telling
//! the host what to load next. Nothing here blocks: every wait is "stay in the
//! same stage" until a later `tick` sees the exit condition hold. At most one
//! phase transition happens per tick.
//!
//! Collaborators are injected at construction:
//! - `Board`: configured from level data, set up after the intro, polled while settling.
//! - `GoalEvaluator`: polled every `Playing` tick for game-over / winner.
//! - `PresentationSink`: told what to show; answers only via `begin_game` / `reload_scene`.
//! - `ProgressStore`: level index read at start, written on a win.

use bevy::prelude::*;
use std::time::Duration;

use crate::app::presentation::{PresentationSink, ResultIcon, ResultKind, ResultScreen};
use crate::core::components::GamePiece;
use crate::core::config::TimingConfig;
use crate::core::error::SessionError;
use crate::core::level::{CounterMode, LevelConfig, ProgressStore, WorldConfig};
use crate::gameplay::board::Board;
use crate::gameplay::goal::GoalEvaluator;
use crate::gameplay::score::ScoreKeeper;

/// What the host should do once a session has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// Lost: play the same level again.
    ReloadLevel(usize),
    /// Won: play this level next. `restart` loads it even if saving progress failed.
    AdvanceLevel(usize),
    /// No level left to play; route to the menu.
    GameComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Intro,
    Playing,
    Settling,
    Resolved,
    Ended(SessionOutcome),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionFlags {
    pub is_ready_to_begin: bool,
    pub is_game_over: bool,
    pub is_winner: bool,
    pub is_ready_to_reload: bool,
}

#[derive(Debug, Clone)]
enum IntroStep {
    AwaitReady,
    FadeDelay(Timer),
}

#[derive(Debug, Clone)]
enum SettleStep {
    SwapDelay(Timer),
    AwaitBoard,
    Grace(Timer),
}

#[derive(Debug, Clone)]
enum ResolveStep {
    Linger(Timer),
    AwaitReload,
}

#[derive(Debug, Clone)]
enum Stage {
    Intro(IntroStep),
    Playing,
    Settling(SettleStep),
    Resolved(ResolveStep),
    Ended(SessionOutcome),
}

impl Stage {
    fn phase(&self) -> SessionPhase {
        match self {
            Stage::Intro(_) => SessionPhase::Intro,
            Stage::Playing => SessionPhase::Playing,
            Stage::Settling(_) => SessionPhase::Settling,
            Stage::Resolved(_) => SessionPhase::Resolved,
            Stage::Ended(o) => SessionPhase::Ended(*o),
        }
    }
}

fn once(d: Duration) -> Timer {
    Timer::new(d, TimerMode::Once)
}

pub struct LevelSession<B, G, P, S> {
    world: WorldConfig,
    timings: TimingConfig,
    board: B,
    goal: G,
    presentation: P,
    progress: S,
    score: ScoreKeeper,
    level_index: usize,
    flags: SessionFlags,
    stage: Stage,
    pending_outcome: Option<SessionOutcome>,
    setup_error: Option<SessionError>,
    shown_seconds: Option<u32>,
    /// Advanced level index the store refused to save; wins over the stored one.
    unsaved_index: Option<usize>,
}

impl<B, G, P, S> LevelSession<B, G, P, S>
where
    B: Board,
    G: GoalEvaluator,
    P: PresentationSink,
    S: ProgressStore,
{
    /// Build a session and enter Intro for the saved level index.
    pub fn new(
        world: WorldConfig,
        timings: TimingConfig,
        board: B,
        goal: G,
        presentation: P,
        progress: S,
    ) -> Self {
        let mut session = Self {
            world,
            timings,
            board,
            goal,
            presentation,
            progress,
            score: ScoreKeeper::default(),
            level_index: 0,
            flags: SessionFlags::default(),
            stage: Stage::Intro(IntroStep::AwaitReady),
            pending_outcome: None,
            setup_error: None,
            shown_seconds: None,
            unsaved_index: None,
        };
        session.start();
        session
    }

    /// Discard all session state and start over from the saved level index
    /// (or the advanced index a failed save left in memory).
    pub fn restart(&mut self) {
        self.start();
    }

    fn start(&mut self) {
        self.flags = SessionFlags::default();
        self.score.reset();
        self.pending_outcome = None;
        self.setup_error = None;
        self.shown_seconds = None;
        self.level_index = match self.unsaved_index {
            Some(index) => index,
            None => self.progress.load_level_index(),
        };

        let checked = self
            .world
            .level(self.level_index)
            .and_then(|level| level.check().map(|()| level));
        let level = match checked {
            Ok(level) => level,
            Err(e) if e.is_configuration() => {
                error!(target: "session", "Session: setup aborted: {e}");
                self.stage = Stage::Intro(IntroStep::AwaitReady);
                self.setup_error = Some(e);
                return;
            }
            Err(e) => {
                warn!(target: "session", "Session: {e}; treating world '{}' as complete", self.world.name);
                self.stage = Stage::Ended(SessionOutcome::GameComplete);
                return;
            }
        };
        self.stage = Stage::Intro(IntroStep::AwaitReady);

        self.board.configure(level);
        self.goal.configure(level);
        info!(
            target: "session",
            "Session: level #{} '{}' ({:?} {}) configured",
            self.level_index,
            level.name,
            level.counter_mode(),
            level.counter.budget()
        );

        self.presentation.show_intro(&self.goal.summary());
        match self.goal.counter_mode() {
            CounterMode::Moves => {
                let left = self.goal.moves_left().unwrap_or(0);
                self.presentation.update_moves(left);
            }
            CounterMode::Timer => self.show_time_left(),
        }
    }

    /// Player acknowledged the intro. Idempotent.
    pub fn begin_game(&mut self) {
        if let Some(e) = &self.setup_error {
            warn!(target: "session", "Session: begin ignored, level not configured ({e})");
            return;
        }
        if !self.flags.is_ready_to_begin {
            debug!(target: "session", "Session: player ready to begin");
        }
        self.flags.is_ready_to_begin = true;
    }

    /// Player acknowledged the result screen. Idempotent.
    pub fn reload_scene(&mut self) {
        self.flags.is_ready_to_reload = true;
    }

    /// Advance by one scheduling tick and return the phase after it.
    pub fn tick(&mut self, dt: Duration) -> SessionPhase {
        let next = match &mut self.stage {
            Stage::Intro(step) => match step {
                IntroStep::AwaitReady => {
                    if self.setup_error.is_none() && self.flags.is_ready_to_begin {
                        self.presentation.fade_off();
                        *step = IntroStep::FadeDelay(once(self.timings.intro_fade()));
                    }
                    None
                }
                IntroStep::FadeDelay(t) => {
                    if t.tick(dt).finished() {
                        self.board.setup();
                        Some(Stage::Playing)
                    } else {
                        None
                    }
                }
            },
            Stage::Playing => {
                self.goal.tick(dt);
                report_time_left(&self.goal, &mut self.presentation, &mut self.shown_seconds);
                self.flags.is_game_over = self.goal.is_game_over();
                self.flags.is_winner = self.goal.is_winner();
                if self.flags.is_game_over {
                    Some(Stage::Settling(SettleStep::SwapDelay(once(
                        self.board.swap_delay(),
                    ))))
                } else {
                    None
                }
            }
            Stage::Settling(step) => match step {
                SettleStep::SwapDelay(t) => {
                    if t.tick(dt).finished() {
                        *step = SettleStep::AwaitBoard;
                    }
                    None
                }
                SettleStep::AwaitBoard => {
                    if !self.board.is_refilling() {
                        *step = SettleStep::Grace(once(self.timings.settle_grace()));
                    }
                    None
                }
                SettleStep::Grace(t) => {
                    if t.tick(dt).finished() {
                        Some(Stage::Resolved(ResolveStep::Linger(once(
                            self.timings.result_linger(),
                        ))))
                    } else {
                        None
                    }
                }
            },
            Stage::Resolved(step) => match step {
                ResolveStep::Linger(t) => {
                    if t.tick(dt).finished() {
                        self.presentation.fade_on();
                        *step = ResolveStep::AwaitReload;
                    }
                    None
                }
                ResolveStep::AwaitReload => {
                    if self.flags.is_ready_to_reload {
                        let outcome = self
                            .pending_outcome
                            .unwrap_or(SessionOutcome::ReloadLevel(self.level_index));
                        Some(Stage::Ended(outcome))
                    } else {
                        None
                    }
                }
            },
            Stage::Ended(_) => None,
        };

        if let Some(stage) = next {
            self.enter(stage);
        }
        self.phase()
    }

    fn enter(&mut self, stage: Stage) {
        let phase = stage.phase();
        self.stage = stage;
        let timed = self.goal.counter_mode() == CounterMode::Timer;
        match phase {
            SessionPhase::Intro => {}
            SessionPhase::Playing => {
                if timed {
                    self.goal.start_countdown();
                }
            }
            SessionPhase::Settling => {
                if timed {
                    self.presentation.fade_timer_off();
                    self.goal.pause_countdown();
                }
            }
            SessionPhase::Resolved => {
                self.flags.is_ready_to_reload = false;
                self.resolve();
            }
            SessionPhase::Ended(outcome) => {
                info!(target: "session", "Session: ended with {outcome:?}");
                return;
            }
        }
        debug!(target: "session", "Session: -> {phase:?}");
    }

    /// Pick the result screen; on a win with a next level, persist the advanced index.
    fn resolve(&mut self) {
        let score = self.score.current();
        let (screen, outcome) = if self.flags.is_winner {
            let caption = format!("you scored\n{score} points!");
            let next = self.level_index + 1;
            if next < self.world.level_count() {
                match self.progress.save_level_index(next) {
                    Ok(()) => self.unsaved_index = None,
                    Err(e) => {
                        error!(target: "session", "Session: failed to save progress, keeping level #{next} in memory: {e}");
                        self.unsaved_index = Some(next);
                    }
                }
                (
                    ResultScreen {
                        kind: ResultKind::Win,
                        caption,
                        icon: ResultIcon::GoalComplete,
                    },
                    SessionOutcome::AdvanceLevel(next),
                )
            } else {
                (
                    ResultScreen {
                        kind: ResultKind::GameComplete,
                        caption,
                        icon: ResultIcon::GoalComplete,
                    },
                    SessionOutcome::GameComplete,
                )
            }
        } else {
            let caption = match self.goal.counter_mode() {
                CounterMode::Timer => "Out of time!",
                CounterMode::Moves => "Out of moves!",
            };
            (
                ResultScreen {
                    kind: ResultKind::Lose,
                    caption: caption.to_string(),
                    icon: ResultIcon::GoalFailed,
                },
                SessionOutcome::ReloadLevel(self.level_index),
            )
        };
        info!(
            target: "session",
            "Session: level #{} resolved {:?} with score {score}",
            self.level_index,
            screen.kind
        );
        self.presentation.show_result(&screen);
        self.pending_outcome = Some(outcome);
    }

    fn show_time_left(&mut self) {
        report_time_left(&self.goal, &mut self.presentation, &mut self.shown_seconds);
    }

    /// Award points for a cleared piece and refresh the star rating.
    pub fn score_points(&mut self, piece: &GamePiece, multiplier: u32, bonus: u32) -> u32 {
        let total = self
            .score
            .add(ScoreKeeper::points_for(piece, multiplier, bonus));
        self.goal.update_score_stars(total);
        self.presentation
            .update_score_meter(total, self.goal.score_stars());
        total
    }

    /// Extend a timed level. Returns false (and does nothing) on move-limited levels.
    pub fn add_time(&mut self, seconds: u32) -> bool {
        if self.goal.counter_mode() != CounterMode::Timer {
            debug!(target: "session", "Session: add_time({seconds}) ignored on a moves level");
            return false;
        }
        self.goal.add_time(seconds);
        self.show_time_left();
        true
    }

    /// Spend one move on a move-limited level.
    pub fn use_move(&mut self) {
        if self.goal.counter_mode() != CounterMode::Moves {
            return;
        }
        self.goal.decrement_move();
        let left = self.goal.moves_left().unwrap_or(0);
        self.presentation.update_moves(left);
    }

    pub fn update_collection_goals(&mut self, piece: &GamePiece) {
        self.goal.update_collection_goals(piece);
    }

    pub fn phase(&self) -> SessionPhase {
        self.stage.phase()
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.stage {
            Stage::Ended(o) => Some(o),
            _ => None,
        }
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level(&self) -> Option<&LevelConfig> {
        self.world.level(self.level_index).ok()
    }

    pub fn world(&self) -> &WorldConfig {
        &self.world
    }

    pub fn timings(&self) -> &TimingConfig {
        &self.timings
    }

    pub fn setup_error(&self) -> Option<&SessionError> {
        self.setup_error.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score.current()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn goal(&self) -> &G {
        &self.goal
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn progress(&self) -> &S {
        &self.progress
    }
}

/// Push the countdown as whole seconds (rounded up) when that number changes.
fn report_time_left<G: GoalEvaluator, P: PresentationSink>(
    goal: &G,
    presentation: &mut P,
    shown: &mut Option<u32>,
) {
    let Some(left) = goal.time_left() else {
        return;
    };
    let secs = left.as_secs_f32().ceil() as u32;
    if *shown != Some(secs) {
        *shown = Some(secs);
        presentation.update_timer(secs);
    }
}

impl<B, G, P, S> Resource for LevelSession<B, G, P, S>
where
    B: Send + Sync + 'static,
    G: Send + Sync + 'static,
    P: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
}
