//! Ordered level list a save file's level index points into.
//!
//! Source selection mirrors the build:
//! - feature `embedded_levels`: the default world is compiled in via `include_str!`
//!   and no filesystem access happens at runtime.
//! - otherwise: `WorldConfig::load_from_file` reads RON from disk
//!   (`assets/levels/world.ron` by default).

use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::core::error::SessionError;

use super::level::LevelConfig;

pub const DEFAULT_WORLD_RON: &str = include_str!("../../../assets/levels/world.ron");

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WorldConfig {
    pub version: u32,
    pub name: String,
    pub levels: Vec<LevelConfig>,
}

impl WorldConfig {
    pub fn from_ron_str(txt: &str, origin: &str) -> Result<Self, SessionError> {
        let world: WorldConfig = ron::from_str(txt).map_err(|e| SessionError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        if world.version != 1 {
            return Err(SessionError::UnsupportedVersion(world.version));
        }
        if world.levels.is_empty() {
            return Err(SessionError::EmptyWorld(world.name));
        }
        for w in world.validate() {
            warn!(target: "level", "World '{}': {w}", world.name);
        }
        info!(
            target: "level",
            "World '{}' loaded from {origin} ({} levels)",
            world.name,
            world.levels.len()
        );
        Ok(world)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&txt, &path.display().to_string())
    }

    /// World shipped with the crate.
    pub fn embedded() -> Result<Self, SessionError> {
        Self::from_ron_str(DEFAULT_WORLD_RON, "embedded world.ron")
    }

    /// Embedded world under `embedded_levels`, disk otherwise.
    pub fn load_default(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        if cfg!(feature = "embedded_levels") {
            Self::embedded()
        } else {
            Self::load_from_file(path)
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Result<&LevelConfig, SessionError> {
        self.levels.get(index).ok_or(SessionError::LevelOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        for (i, lvl) in self.levels.iter().enumerate() {
            if let Err(e) = lvl.check() {
                w.push(format!("level #{i}: {e}"));
            }
            w.extend(lvl.validate());
        }
        let mut names: Vec<&str> = self.levels.iter().map(|l| l.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|p| p[0] == p[1]) {
            w.push("duplicate level names".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_world_parses() {
        let world = WorldConfig::embedded().expect("embedded world");
        assert!(world.level_count() >= 2);
        assert!(world.validate().is_empty(), "{:?}", world.validate());
    }

    #[test]
    fn rejects_unknown_version() {
        let err = WorldConfig::from_ron_str("(version: 2, name: \"W\", levels: [(name: \"A\")])", "test")
            .unwrap_err();
        assert!(matches!(err, SessionError::UnsupportedVersion(2)));
    }

    #[test]
    fn rejects_empty_world() {
        let err =
            WorldConfig::from_ron_str("(version: 1, name: \"W\", levels: [])", "test").unwrap_err();
        assert!(matches!(err, SessionError::EmptyWorld(_)));
    }

    #[test]
    fn level_lookup_reports_out_of_range() {
        let world =
            WorldConfig::from_ron_str("(version: 1, name: \"W\", levels: [(name: \"A\")])", "test").unwrap();
        assert!(world.level(0).is_ok());
        assert!(matches!(
            world.level(1),
            Err(SessionError::LevelOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = WorldConfig::load_from_file("definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }
}
