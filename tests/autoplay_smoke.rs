use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use tile_matcher::app::autoplay::{AutoPlayer, AutoplayPlugin, SimulatedBoard};
use tile_matcher::app::plugin::{LevelSessionPlugin, SessionEnded, SessionSet};
use tile_matcher::app::presentation::CueQueue;
use tile_matcher::app::session::{LevelSession, SessionOutcome};
use tile_matcher::core::config::{AutoplayConfig, TimingConfig};
use tile_matcher::core::level::{LevelConfig, LevelCounter, MemoryProgress, WorldConfig};
use tile_matcher::gameplay::goal::LevelGoal;

type Session = LevelSession<SimulatedBoard, LevelGoal, CueQueue, MemoryProgress>;

#[derive(Resource, Default)]
struct Outcomes(Vec<SessionOutcome>);

fn restart_until_complete(
    mut ended: EventReader<SessionEnded>,
    mut outcomes: ResMut<Outcomes>,
    mut session: ResMut<Session>,
) {
    for SessionEnded(outcome) in ended.read() {
        outcomes.0.push(*outcome);
        if *outcome != SessionOutcome::GameComplete {
            session.restart();
        }
    }
}

fn easy_level(name: &str) -> LevelConfig {
    LevelConfig {
        name: name.into(),
        counter: LevelCounter::Moves(10),
        score_goals: vec![200],
        ..Default::default()
    }
}

#[test]
fn auto_player_completes_a_small_world() {
    let cfg = AutoplayConfig {
        seed: Some(3),
        ..Default::default()
    };
    let timings = TimingConfig::default();
    let world = WorldConfig {
        version: 1,
        name: "Smoke".into(),
        levels: vec![easy_level("One"), easy_level("Two")],
    };
    let board = SimulatedBoard::new(&cfg, &timings);
    let session: Session = LevelSession::new(
        world,
        timings,
        board,
        LevelGoal::default(),
        CueQueue::default(),
        MemoryProgress::default(),
    );

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(50)))
        .insert_resource(AutoPlayer::new(&cfg))
        .insert_resource(session)
        .init_resource::<Outcomes>()
        .add_plugins(LevelSessionPlugin::<SimulatedBoard, LevelGoal, CueQueue, MemoryProgress>::default())
        .add_plugins(AutoplayPlugin::<CueQueue, MemoryProgress>::default())
        .add_systems(Update, restart_until_complete.after(SessionSet::Advance));

    for _ in 0..2000 {
        app.update();
        if app.world().resource::<Outcomes>().0.contains(&SessionOutcome::GameComplete) {
            break;
        }
    }

    assert_eq!(
        app.world().resource::<Outcomes>().0,
        vec![SessionOutcome::AdvanceLevel(1), SessionOutcome::GameComplete]
    );
    let session = app.world().resource::<Session>();
    assert_eq!(session.progress().current_level, 1);
    assert_eq!(session.progress().saves, 1);
    assert!(app.world().resource::<AutoPlayer>().moves_made >= 2);
}
