use std::fs;
use std::time::Duration;

use tile_matcher::app::presentation::{CueQueue, PresentationCue, ResultKind};
use tile_matcher::app::session::{LevelSession, SessionOutcome, SessionPhase};
use tile_matcher::core::components::{GamePiece, MatchValue};
use tile_matcher::core::config::TimingConfig;
use tile_matcher::core::level::{
    CollectionGoalSpec, FileProgress, LevelConfig, LevelCounter, ProgressStore, WorldConfig,
};
use tile_matcher::gameplay::board::Board;
use tile_matcher::gameplay::goal::LevelGoal;

const FRAME: Duration = Duration::from_millis(100);

/// Board that refills for a fixed number of ticks after each scripted move.
#[derive(Default)]
struct ScriptedBoard {
    refill_ticks: u32,
}

impl Board for ScriptedBoard {
    fn configure(&mut self, _level: &LevelConfig) {
        self.refill_ticks = 0;
    }
    fn setup(&mut self) {}
    fn is_refilling(&self) -> bool {
        self.refill_ticks > 0
    }
    fn swap_delay(&self) -> Duration {
        Duration::from_millis(200)
    }
}

type Session = LevelSession<ScriptedBoard, LevelGoal, CueQueue, FileProgress>;

fn world() -> WorldConfig {
    WorldConfig {
        version: 1,
        name: "Flow".into(),
        levels: vec![
            LevelConfig {
                name: "Warmup".into(),
                counter: LevelCounter::Moves(4),
                score_goals: vec![200, 400],
                ..Default::default()
            },
            LevelConfig {
                name: "Collect".into(),
                counter: LevelCounter::Moves(3),
                score_goals: vec![100],
                collection_goals: vec![CollectionGoalSpec {
                    piece: MatchValue::Blue,
                    count: 2,
                }],
                ..Default::default()
            },
        ],
    }
}

fn open(path: &std::path::Path) -> Session {
    LevelSession::new(
        world(),
        TimingConfig::default(),
        ScriptedBoard::default(),
        LevelGoal::default(),
        CueQueue::default(),
        FileProgress::new(path),
    )
}

/// Drive the session to an outcome (at most `max` ticks), making a move with
/// `piece` whenever the board is idle.
fn play(s: &mut Session, piece: GamePiece, max: usize) {
    s.begin_game();
    for _ in 0..max {
        if s.board().refill_ticks > 0 {
            s.board_mut().refill_ticks -= 1;
        }
        let phase = s.tick(FRAME);
        match phase {
            SessionPhase::Playing if !s.board().is_refilling() => {
                s.use_move();
                s.score_points(&piece, 1, 0);
                s.update_collection_goals(&piece);
                s.board_mut().refill_ticks = 2;
            }
            SessionPhase::Resolved => s.reload_scene(),
            SessionPhase::Ended(_) => return,
            _ => {}
        }
    }
}

#[test]
fn progress_survives_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.ron");

    let mut first = open(&path);
    assert_eq!(first.level_index(), 0);
    play(&mut first, GamePiece::new(MatchValue::Red, 100), 200);
    assert_eq!(first.outcome(), Some(SessionOutcome::AdvanceLevel(1)));
    assert_eq!(first.score(), 400);
    let saved = fs::read_to_string(&path).expect("progress written on win");
    assert!(saved.contains("current_level: 1"), "{saved}");

    // A fresh process resumes at the saved level.
    let mut second = open(&path);
    assert_eq!(second.level_index(), 1);
    assert_eq!(second.level().map(|l| l.name.as_str()), Some("Collect"));

    // Red pieces score but never fill the Blue quota: lose, retry same level.
    play(&mut second, GamePiece::new(MatchValue::Red, 100), 200);
    assert_eq!(second.outcome(), Some(SessionOutcome::ReloadLevel(1)));
    assert_eq!(FileProgress::new(&path).load_level_index(), 1);
    let lose = second.presentation().last_result().unwrap();
    assert_eq!(lose.kind, ResultKind::Lose);

    second.restart();
    play(&mut second, GamePiece::new(MatchValue::Blue, 100), 200);
    assert_eq!(second.outcome(), Some(SessionOutcome::GameComplete));
    assert_eq!(FileProgress::new(&path).load_level_index(), 1);
}

#[test]
fn finished_world_opens_as_game_complete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.ron");
    FileProgress::new(&path).save_level_index(2).unwrap();

    let s = open(&path);
    assert_eq!(s.phase(), SessionPhase::Ended(SessionOutcome::GameComplete));
    assert!(s.presentation().cues().is_empty());
}

#[test]
fn intro_cues_precede_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = open(&dir.path().join("progress.ron"));
    play(&mut s, GamePiece::new(MatchValue::Red, 100), 200);

    let cues = s.presentation().cues();
    assert!(matches!(&cues[0], PresentationCue::Intro(summary) if summary.level_name == "Warmup"));
    assert_eq!(cues[1], PresentationCue::MovesLeft(4));
    assert_eq!(cues[2], PresentationCue::FadeOff);
    let result_at = cues
        .iter()
        .position(|c| matches!(c, PresentationCue::Result(_)))
        .unwrap();
    let fade_on_at = cues.iter().position(|c| *c == PresentationCue::FadeOn).unwrap();
    assert!(result_at < fade_on_at);
}
