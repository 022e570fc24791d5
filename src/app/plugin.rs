use bevy::prelude::*;
use std::marker::PhantomData;

use crate::app::presentation::PresentationSink;
use crate::app::session::{LevelSession, SessionOutcome, SessionPhase};
use crate::core::level::ProgressStore;
use crate::gameplay::board::Board;
use crate::gameplay::goal::GoalEvaluator;
use crate::gameplay::tile::TilePlugin;

/// Player dismissed the intro screen.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct BeginGame;

/// Player dismissed the result screen.
#[derive(Event, Debug, Default, Clone, Copy)]
pub struct ReloadScene;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPhaseChanged {
    pub from: SessionPhase,
    pub to: SessionPhase,
}

/// The session finished; the host decides what to load next.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnded(pub SessionOutcome);

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum SessionSet {
    /// Player acknowledgements reach the session.
    Acknowledge,
    /// The session ticks and reports phase changes.
    Advance,
}

/// Drives a `LevelSession` resource once per `Update`.
///
/// The host inserts the session itself (it owns the collaborators); until then the
/// systems are no-ops.
pub struct LevelSessionPlugin<B, G, P, S> {
    _marker: PhantomData<fn() -> (B, G, P, S)>,
}

impl<B, G, P, S> Default for LevelSessionPlugin<B, G, P, S> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<B, G, P, S> Plugin for LevelSessionPlugin<B, G, P, S>
where
    B: Board + Send + Sync + 'static,
    G: GoalEvaluator + Send + Sync + 'static,
    P: PresentationSink + Send + Sync + 'static,
    S: ProgressStore + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TilePlugin>() {
            app.add_plugins(TilePlugin);
        }
        app.add_event::<BeginGame>()
            .add_event::<ReloadScene>()
            .add_event::<SessionPhaseChanged>()
            .add_event::<SessionEnded>()
            .configure_sets(Update, (SessionSet::Acknowledge, SessionSet::Advance).chain())
            .add_systems(
                Update,
                (
                    forward_acknowledgements::<B, G, P, S>.in_set(SessionSet::Acknowledge),
                    drive_session::<B, G, P, S>.in_set(SessionSet::Advance),
                ),
            );
    }
}

fn forward_acknowledgements<B, G, P, S>(
    mut begin: EventReader<BeginGame>,
    mut reload: EventReader<ReloadScene>,
    session: Option<ResMut<LevelSession<B, G, P, S>>>,
) where
    B: Board + Send + Sync + 'static,
    G: GoalEvaluator + Send + Sync + 'static,
    P: PresentationSink + Send + Sync + 'static,
    S: ProgressStore + Send + Sync + 'static,
{
    let Some(mut session) = session else {
        begin.clear();
        reload.clear();
        return;
    };
    if begin.read().count() > 0 {
        session.begin_game();
    }
    if reload.read().count() > 0 {
        session.reload_scene();
    }
}

fn drive_session<B, G, P, S>(
    time: Res<Time>,
    session: Option<ResMut<LevelSession<B, G, P, S>>>,
    mut last_seen: Local<Option<SessionPhase>>,
    mut changed: EventWriter<SessionPhaseChanged>,
    mut ended: EventWriter<SessionEnded>,
) where
    B: Board + Send + Sync + 'static,
    G: GoalEvaluator + Send + Sync + 'static,
    P: PresentationSink + Send + Sync + 'static,
    S: ProgressStore + Send + Sync + 'static,
{
    let Some(mut session) = session else {
        return;
    };
    let to = session.tick(time.delta());
    if *last_seen == Some(to) {
        return;
    }
    if let Some(from) = *last_seen {
        changed.write(SessionPhaseChanged { from, to });
    }
    // also covers a session created already ended (no level left)
    if let SessionPhase::Ended(outcome) = to {
        ended.write(SessionEnded(outcome));
    }
    *last_seen = Some(to);
}
