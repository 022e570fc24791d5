use std::time::Duration;

use crate::core::level::LevelConfig;

/// The grid owner. Swapping, matching and refilling all happen behind this trait;
/// the session only configures it, starts it and waits for it to settle.
pub trait Board {
    /// Copy dimensions and starting layout from level data.
    fn configure(&mut self, level: &LevelConfig);
    /// Fill the grid and make it playable.
    fn setup(&mut self);
    fn is_refilling(&self) -> bool;
    /// Delay between a swap and the clear/refill it triggers.
    fn swap_delay(&self) -> Duration;
}
