pub mod config;

pub use config::{AutoplayConfig, SessionConfig, TimingConfig};
