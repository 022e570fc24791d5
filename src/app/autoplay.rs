//! Headless board and a random player for it.
//!
//! `SimulatedBoard` stands in for the real grid: it keeps the level's tiles, fakes
//! a refill after every move and reports `is_refilling` until that finishes.
//! `AutoPlayer` acknowledges screens and makes a move every `move_interval`.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;
use std::time::Duration;

use crate::app::plugin::{BeginGame, ReloadScene, SessionSet};
use crate::app::presentation::{LogPresentation, PresentationSink};
use crate::app::session::{LevelSession, SessionPhase};
use crate::core::components::{GamePiece, MatchValue};
use crate::core::config::{AutoplayConfig, TimingConfig};
use crate::core::level::{CounterMode, FileProgress, LevelConfig, ProgressStore, TileKind};
use crate::gameplay::board::Board;
use crate::gameplay::goal::LevelGoal;
use crate::gameplay::tile::Tile;

/// Session type run by the headless binary.
pub type HeadlessSession = LevelSession<SimulatedBoard, LevelGoal, LogPresentation, FileProgress>;

#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    refill: Option<Timer>,
    refill_time: Duration,
    swap_delay: Duration,
    break_delay: Duration,
    live: bool,
}

impl SimulatedBoard {
    pub fn new(autoplay: &AutoplayConfig, timings: &TimingConfig) -> Self {
        Self {
            width: 0,
            height: 0,
            tiles: Vec::new(),
            refill: None,
            refill_time: autoplay.refill_time(),
            swap_delay: autoplay.swap_delay(),
            break_delay: timings.tile_break_delay(),
            live: false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// True once `setup` ran for the configured level.
    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn begin_refill(&mut self) {
        self.refill = Some(Timer::new(self.refill_time, TimerMode::Once));
    }

    /// Hit one random breakable tile. Returns its cell, if any was left.
    pub fn hit_random_breakable(&mut self, rng: &mut impl Rng) -> Option<UVec2> {
        let candidates: Vec<usize> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind() == TileKind::Breakable && t.breakable_value() > 0)
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let tile = &mut self.tiles[candidates[rng.gen_range(0..candidates.len())]];
        tile.break_tile();
        Some(UVec2::new(tile.x, tile.y))
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(t) = self.refill.as_mut() {
            if t.tick(dt).finished() {
                self.refill = None;
            }
        }
        for tile in &mut self.tiles {
            if tile.tick(dt) && tile.kind() == TileKind::Normal {
                debug!(target: "tile", "Tile ({}, {}) cleared", tile.x, tile.y);
            }
        }
    }
}

impl Board for SimulatedBoard {
    fn configure(&mut self, level: &LevelConfig) {
        self.width = level.width;
        self.height = level.height;
        self.tiles = level
            .starting_tiles
            .iter()
            .map(|spec| Tile::from_spec(spec).with_break_delay(self.break_delay))
            .collect();
        self.refill = None;
        self.live = false;
    }

    fn setup(&mut self) {
        self.live = true;
        debug!(
            target: "autoplay",
            "Board {}x{} live with {} special tiles",
            self.width,
            self.height,
            self.tiles.len()
        );
    }

    fn is_refilling(&self) -> bool {
        self.refill.is_some()
    }

    fn swap_delay(&self) -> Duration {
        self.swap_delay
    }
}

#[derive(Resource, Debug)]
pub struct AutoPlayer {
    timer: Timer,
    rng: StdRng,
    pub moves_made: u32,
}

impl AutoPlayer {
    pub fn new(cfg: &AutoplayConfig) -> Self {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            timer: Timer::new(cfg.move_interval(), TimerMode::Repeating),
            rng,
            moves_made: 0,
        }
    }

    /// One swap: spend the move, clear 3-5 random pieces, hit a tile, start a refill.
    pub fn play_move<P, S>(&mut self, session: &mut LevelSession<SimulatedBoard, LevelGoal, P, S>)
    where
        P: PresentationSink,
        S: ProgressStore,
    {
        self.moves_made += 1;
        session.use_move();
        let cleared = self.rng.gen_range(3..=5);
        let multiplier = self.rng.gen_range(1..=3);
        for _ in 0..cleared {
            let piece = GamePiece::new(
                MatchValue::COLORS[self.rng.gen_range(0..MatchValue::COLORS.len())],
                20,
            );
            session.score_points(&piece, multiplier, 0);
            session.update_collection_goals(&piece);
        }
        let timed = session.level().map(LevelConfig::counter_mode) == Some(CounterMode::Timer);
        if timed && self.rng.gen_bool(0.1) {
            session.add_time(5);
        }
        if let Some(cell) = session.board_mut().hit_random_breakable(&mut self.rng) {
            debug!(target: "autoplay", "move {} hit tile {cell}", self.moves_made);
        }
        session.board_mut().begin_refill();
    }
}

/// Plays whatever `LevelSession<SimulatedBoard, LevelGoal, P, S>` is present.
pub struct AutoplayPlugin<P, S> {
    _marker: PhantomData<fn() -> (P, S)>,
}

impl<P, S> Default for AutoplayPlugin<P, S> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<P, S> Plugin for AutoplayPlugin<P, S>
where
    P: PresentationSink + Send + Sync + 'static,
    S: ProgressStore + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        app.add_systems(Update, autoplay::<P, S>.before(SessionSet::Acknowledge));
    }
}

fn autoplay<P, S>(
    time: Res<Time>,
    player: Option<ResMut<AutoPlayer>>,
    session: Option<ResMut<LevelSession<SimulatedBoard, LevelGoal, P, S>>>,
    mut begin: EventWriter<BeginGame>,
    mut reload: EventWriter<ReloadScene>,
) where
    P: PresentationSink + Send + Sync + 'static,
    S: ProgressStore + Send + Sync + 'static,
{
    let (Some(mut player), Some(mut session)) = (player, session) else {
        return;
    };
    let dt = time.delta();
    session.board_mut().tick(dt);
    match session.phase() {
        SessionPhase::Intro => {
            if session.setup_error().is_none() && !session.flags().is_ready_to_begin {
                begin.write(BeginGame);
            }
        }
        SessionPhase::Playing => {
            player.timer.tick(dt);
            if player.timer.just_finished() && !session.board().is_refilling() {
                player.play_move(&mut *session);
            }
        }
        SessionPhase::Resolved => {
            if !session.flags().is_ready_to_reload {
                reload.write(ReloadScene);
            }
        }
        SessionPhase::Settling | SessionPhase::Ended(_) => {}
    }
}
