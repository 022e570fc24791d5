pub mod layout;
pub mod level;
pub mod progress;
pub mod world;

pub use layout::{PieceSpec, TileKind, TileSpec};
pub use level::{CollectionGoalSpec, CounterMode, LevelConfig, LevelCounter};
pub use progress::{FileProgress, MemoryProgress, ProgressStore};
pub use world::WorldConfig;
