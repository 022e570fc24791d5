use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced while loading or validating level data, config and saved progress.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("world '{0}' has no levels")]
    EmptyWorld(String),

    #[error("world version {0} unsupported (expected 1)")]
    UnsupportedVersion(u32),

    #[error("level index {index} out of range (world has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },

    #[error("level '{name}' is invalid: {reason}")]
    InvalidLevel { name: String, reason: String },

    #[error("io on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("serialize progress: {0}")]
    Serialize(String),
}

impl SessionError {
    pub(crate) fn invalid_level(name: &str, reason: impl Into<String>) -> Self {
        SessionError::InvalidLevel {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Configuration errors keep the session parked in Intro; everything else is a load failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidLevel { .. } | SessionError::EmptyWorld(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_both_numbers() {
        let e = SessionError::LevelOutOfRange { index: 4, count: 3 };
        let msg = e.to_string();
        assert!(msg.contains('4') && msg.contains('3'), "{msg}");
        assert!(!e.is_configuration());
    }

    #[test]
    fn invalid_level_is_configuration_error() {
        let e = SessionError::invalid_level("L1", "score_goals empty");
        assert!(e.is_configuration());
        assert_eq!(e.to_string(), "level 'L1' is invalid: score_goals empty");
    }
}
