//! Headless session runner.
//!
//! Plays the configured world with the auto player until the world is complete or
//! `max_sessions` sessions have ended. Progress is saved like a real run, so a
//! second invocation resumes at the saved level.
//!
//!   cargo run -- --seed 7
//!   cargo run -- validate --world assets/levels/world.ron

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::{Args, Parser, Subcommand};

use tile_matcher::app::autoplay::{AutoPlayer, AutoplayPlugin, HeadlessSession, SimulatedBoard};
use tile_matcher::app::plugin::{LevelSessionPlugin, SessionEnded, SessionSet};
use tile_matcher::app::presentation::LogPresentation;
use tile_matcher::app::session::{LevelSession, SessionOutcome};
use tile_matcher::core::config::SessionConfig;
use tile_matcher::core::level::{FileProgress, WorldConfig};
use tile_matcher::gameplay::goal::LevelGoal;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tile-matching level sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    paths: Paths,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play sessions with the auto player (default).
    Run {
        /// RNG seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many ended sessions (0 = until the world is complete).
        #[arg(long)]
        max_sessions: Option<u32>,
    },
    /// Check config and world data, print warnings, exit.
    Validate,
}

#[derive(Args, Debug)]
struct Paths {
    #[arg(long, global = true, default_value = "assets/config/session.ron")]
    config: PathBuf,
    /// Overrides `world_path` from the config.
    #[arg(long, global = true)]
    world: Option<PathBuf>,
    /// Overrides `progress_path` from the config.
    #[arg(long, global = true)]
    progress: Option<PathBuf>,
}

#[derive(Resource, Debug)]
struct RunLimit {
    max_sessions: u32,
    ended: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (mut cfg, cfg_err) = SessionConfig::load_or_default(&cli.paths.config);
    if let Some(world) = &cli.paths.world {
        cfg.world_path = world.display().to_string();
    }
    if let Some(progress) = &cli.paths.progress {
        cfg.progress_path = progress.display().to_string();
    }

    match cli.command.unwrap_or(Command::Run {
        seed: None,
        max_sessions: None,
    }) {
        Command::Validate => validate(&cfg, cfg_err),
        Command::Run { seed, max_sessions } => {
            if seed.is_some() {
                cfg.autoplay.seed = seed;
            }
            if let Some(n) = max_sessions {
                cfg.autoplay.max_sessions = n;
            }
            run(cfg, cfg_err)
        }
    }
}

fn validate(cfg: &SessionConfig, cfg_err: Option<String>) -> Result<()> {
    if let Some(e) = cfg_err {
        println!("config: {e} (defaults used)");
    }
    for w in cfg.validate() {
        println!("config: {w}");
    }
    let world = WorldConfig::load_default(&cfg.world_path)
        .with_context(|| format!("loading world from {}", cfg.world_path))?;
    let warnings = world.validate();
    for w in &warnings {
        println!("world: {w}");
    }
    println!(
        "world '{}' ok: {} levels, {} warnings",
        world.name,
        world.level_count(),
        warnings.len()
    );
    Ok(())
}

fn run(cfg: SessionConfig, cfg_err: Option<String>) -> Result<()> {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
        LogPlugin::default(),
    ));
    if let Some(e) = cfg_err {
        warn!("Config load failed, using defaults: {e}");
    }
    for w in cfg.validate() {
        warn!("Config warning: {w}");
    }

    let world = WorldConfig::load_default(&cfg.world_path)
        .with_context(|| format!("loading world from {}", cfg.world_path))?;
    let board = SimulatedBoard::new(&cfg.autoplay, &cfg.timings);
    let session: HeadlessSession = LevelSession::new(
        world,
        cfg.timings.clone(),
        board,
        LevelGoal::default(),
        LogPresentation,
        FileProgress::new(&cfg.progress_path),
    );

    app.insert_resource(AutoPlayer::new(&cfg.autoplay))
        .insert_resource(RunLimit {
            max_sessions: cfg.autoplay.max_sessions,
            ended: 0,
        })
        .insert_resource(session)
        .add_plugins(LevelSessionPlugin::<SimulatedBoard, LevelGoal, LogPresentation, FileProgress>::default())
        .add_plugins(AutoplayPlugin::<LogPresentation, FileProgress>::default())
        .add_systems(Update, route_session_outcome.after(SessionSet::Advance));

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("session runner exited with code {code}")),
    }
}

/// Load the next session, or exit when the world is done or the run limit is hit.
fn route_session_outcome(
    mut ended: EventReader<SessionEnded>,
    mut limit: ResMut<RunLimit>,
    mut session: ResMut<HeadlessSession>,
    mut exit: EventWriter<AppExit>,
) {
    for SessionEnded(outcome) in ended.read() {
        limit.ended += 1;
        if *outcome == SessionOutcome::GameComplete {
            info!("World complete after {} sessions", limit.ended);
            exit.write(AppExit::Success);
            return;
        }
        if limit.max_sessions > 0 && limit.ended >= limit.max_sessions {
            info!("Stopping after {} sessions ({outcome:?})", limit.ended);
            exit.write(AppExit::Success);
            return;
        }
        session.restart();
    }
}
