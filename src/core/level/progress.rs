use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::error::SessionError;

/// Where the current level index survives between sessions.
pub trait ProgressStore {
    /// Stored index, or 0 when nothing has been saved yet.
    fn load_level_index(&self) -> usize;
    fn save_level_index(&mut self, index: usize) -> Result<(), SessionError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryProgress {
    pub current_level: usize,
    pub saves: usize,
}

impl MemoryProgress {
    pub fn at(current_level: usize) -> Self {
        Self {
            current_level,
            saves: 0,
        }
    }
}

impl ProgressStore for MemoryProgress {
    fn load_level_index(&self) -> usize {
        self.current_level
    }
    fn save_level_index(&mut self, index: usize) -> Result<(), SessionError> {
        self.current_level = index;
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
struct ProgressFile {
    current_level: usize,
}

/// RON document holding the current level index.
#[derive(Debug, Clone)]
pub struct FileProgress {
    path: PathBuf,
}

impl FileProgress {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ProgressFile, SessionError> {
        let txt = fs::read_to_string(&self.path).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        ron::from_str(&txt).map_err(|e| SessionError::Parse {
            origin: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl ProgressStore for FileProgress {
    fn load_level_index(&self) -> usize {
        if !self.path.exists() {
            return 0;
        }
        match self.read() {
            Ok(p) => p.current_level,
            Err(e) => {
                warn!(target: "level", "Progress: {e}; starting from level 0");
                0
            }
        }
    }

    fn save_level_index(&mut self, index: usize) -> Result<(), SessionError> {
        let doc = ProgressFile {
            current_level: index,
        };
        let txt = ron::ser::to_string_pretty(&doc, ron::ser::PrettyConfig::default())
            .map_err(|e| SessionError::Serialize(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| SessionError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, txt).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(target: "level", "Progress: saved current_level={index} to {}", self.path.display());
        Ok(())
    }
}
