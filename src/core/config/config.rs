use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::core::error::SessionError;

fn secs(v: f32) -> Duration {
    Duration::from_secs_f32(v.max(0.0))
}

/// Fixed waits inserted between session phases and tile visuals (seconds).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause after the intro screen fades off, before the board is set up.
    pub intro_fade: f32,
    /// Minimum wait after the board stops refilling, before the outcome is shown.
    pub settle_grace: f32,
    /// How long the result screen stays up before the screen fades on.
    pub result_linger: f32,
    /// Delay between a breakable tile being hit and its sprite changing.
    pub tile_break_delay: f32,
}
impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            intro_fade: 0.5,
            settle_grace: 0.5,
            result_linger: 1.0,
            tile_break_delay: 0.25,
        }
    }
}
impl TimingConfig {
    pub fn intro_fade(&self) -> Duration {
        secs(self.intro_fade)
    }
    pub fn settle_grace(&self) -> Duration {
        secs(self.settle_grace)
    }
    pub fn result_linger(&self) -> Duration {
        secs(self.result_linger)
    }
    pub fn tile_break_delay(&self) -> Duration {
        secs(self.tile_break_delay)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AutoplayConfig {
    pub move_interval: f32,
    pub refill_time: f32,
    pub swap_delay: f32,
    pub seed: Option<u64>,
    /// Stop after this many finished sessions (0 = until the world is complete).
    pub max_sessions: u32,
}
impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            move_interval: 0.4,
            refill_time: 0.3,
            swap_delay: 0.2,
            seed: None,
            max_sessions: 0,
        }
    }
}
impl AutoplayConfig {
    pub fn move_interval(&self) -> Duration {
        secs(self.move_interval)
    }
    pub fn refill_time(&self) -> Duration {
        secs(self.refill_time)
    }
    pub fn swap_delay(&self) -> Duration {
        secs(self.swap_delay)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub timings: TimingConfig,
    pub autoplay: AutoplayConfig,
    pub world_path: String,
    pub progress_path: String,
}
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timings: Default::default(),
            autoplay: Default::default(),
            world_path: "assets/levels/world.ron".into(),
            progress_path: "save/progress.ron".into(),
        }
    }
}

impl SessionConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&data).map_err(|e| SessionError::Parse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        let t = &self.timings;
        for (label, v) in [
            ("timings.intro_fade", t.intro_fade),
            ("timings.settle_grace", t.settle_grace),
            ("timings.result_linger", t.result_linger),
            ("timings.tile_break_delay", t.tile_break_delay),
        ] {
            if v < 0.0 {
                w.push(format!("{label} {v} negative -> treated as 0"));
            } else if v > 10.0 {
                w.push(format!("{label} {v} very long; the session will feel stalled"));
            }
        }
        if t.settle_grace == 0.0 {
            w.push("timings.settle_grace is 0; result screen may flicker in instantly".into());
        }
        let a = &self.autoplay;
        if a.move_interval <= 0.0 {
            w.push("autoplay.move_interval must be > 0 (one move per frame otherwise)".into());
        }
        if a.refill_time < 0.0 || a.swap_delay < 0.0 {
            w.push("autoplay refill/swap times negative -> treated as 0".into());
        }
        if self.world_path.trim().is_empty() {
            w.push("world_path empty".into());
        }
        if self.progress_path.trim().is_empty() {
            w.push("progress_path empty; progress cannot be saved".into());
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_timings() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.timings.intro_fade(), Duration::from_millis(500));
        assert_eq!(cfg.timings.settle_grace(), Duration::from_millis(500));
        assert_eq!(cfg.timings.result_linger(), Duration::from_secs(1));
        assert_eq!(cfg.timings.tile_break_delay(), Duration::from_millis(250));
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn negative_timings_clamp_and_warn() {
        let cfg = SessionConfig {
            timings: TimingConfig {
                intro_fade: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(cfg.timings.intro_fade(), Duration::ZERO);
        assert!(cfg.validate().iter().any(|w| w.contains("intro_fade")));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        fs::write(&path, "(timings: (settle_grace: 0.75), autoplay: (seed: Some(7)))").unwrap();
        let cfg = SessionConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg.timings.settle_grace, 0.75);
        assert_eq!(cfg.timings.intro_fade, 0.5);
        assert_eq!(cfg.autoplay.seed, Some(7));
        assert_eq!(cfg.world_path, "assets/levels/world.ron");
    }

    #[test]
    fn load_or_default_reports_error() {
        let (cfg, err) = SessionConfig::load_or_default("nope/session.ron");
        assert_eq!(cfg, SessionConfig::default());
        assert!(err.is_some());
    }
}
