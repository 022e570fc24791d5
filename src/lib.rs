pub mod app;
pub mod core;
pub mod gameplay;

// Curated re-exports
pub use app::autoplay::{AutoPlayer, AutoplayPlugin, HeadlessSession, SimulatedBoard};
pub use app::plugin::{BeginGame, LevelSessionPlugin, ReloadScene, SessionEnded, SessionPhaseChanged};
pub use app::presentation::{CueQueue, LogPresentation, PresentationSink};
pub use app::session::{LevelSession, SessionOutcome, SessionPhase};
pub use core::config::SessionConfig;
pub use core::error::SessionError;
pub use core::level::{FileProgress, MemoryProgress, ProgressStore, WorldConfig};
pub use gameplay::board::Board;
pub use gameplay::goal::{GoalEvaluator, LevelGoal};
pub use gameplay::tile::{BreakTile, Tile, TilePlugin};
