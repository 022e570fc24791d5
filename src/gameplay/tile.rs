use bevy::prelude::*;
use std::time::Duration;

use crate::core::level::{TileKind, TileSpec};

/// Tint used for breakable tiles until they are cleared.
pub const BREAKABLE_TINT: Color = Color::srgb(0.55, 0.45, 0.35);

/// One board cell. Breakable cells soak up hits before turning normal.
#[derive(Component, Debug, Clone)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    kind: TileKind,
    breakable_value: u32,
    /// Damage value currently drawn (sprite index); lags `breakable_value` by the break delay.
    shown_value: u32,
    tint: Color,
    normal_color: Color,
    break_delay: Duration,
    pending: Option<Timer>,
}

impl Tile {
    pub fn new(x: u32, y: u32, kind: TileKind, breakable_value: u32) -> Self {
        let normal_color = Color::WHITE;
        Self {
            x,
            y,
            kind,
            breakable_value,
            shown_value: breakable_value,
            tint: if kind == TileKind::Breakable {
                BREAKABLE_TINT
            } else {
                normal_color
            },
            normal_color,
            break_delay: Duration::from_millis(250),
            pending: None,
        }
    }

    pub fn from_spec(spec: &TileSpec) -> Self {
        Self::new(spec.x, spec.y, spec.kind, spec.breakable_value)
    }

    pub fn with_break_delay(mut self, delay: Duration) -> Self {
        self.break_delay = delay;
        self
    }

    pub fn with_normal_color(mut self, color: Color) -> Self {
        if self.kind != TileKind::Breakable {
            self.tint = color;
        }
        self.normal_color = color;
        self
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn breakable_value(&self) -> u32 {
        self.breakable_value
    }

    pub fn shown_value(&self) -> u32 {
        self.shown_value
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Register a hit. Returns false when the tile is not breakable (no-op).
    pub fn break_tile(&mut self) -> bool {
        if self.kind != TileKind::Breakable {
            return false;
        }
        self.breakable_value = self.breakable_value.saturating_sub(1);
        self.pending = Some(Timer::new(self.break_delay, TimerMode::Once));
        true
    }

    /// Advance the delayed visual downgrade. Returns true on the tick the visual changes.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(timer) = self.pending.as_mut() else {
            return false;
        };
        if !timer.tick(dt).finished() {
            return false;
        }
        self.pending = None;
        self.shown_value = self.breakable_value;
        if self.breakable_value == 0 {
            self.kind = TileKind::Normal;
            self.tint = self.normal_color;
        }
        true
    }
}

/// Request a hit on the tile entity.
#[derive(Event, Debug, Clone, Copy)]
pub struct BreakTile(pub Entity);

pub struct TilePlugin;

impl Plugin for TilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BreakTile>().add_systems(
            Update,
            (apply_tile_hits, advance_breakable_tiles).chain(),
        );
    }
}

fn apply_tile_hits(mut hits: EventReader<BreakTile>, mut tiles: Query<&mut Tile>) {
    for BreakTile(entity) in hits.read() {
        if let Ok(mut tile) = tiles.get_mut(*entity) {
            if tile.break_tile() {
                debug!(
                    target: "tile",
                    "Tile ({}, {}) hit -> breakable_value={}",
                    tile.x,
                    tile.y,
                    tile.breakable_value()
                );
            }
        }
    }
}

fn advance_breakable_tiles(time: Res<Time>, mut tiles: Query<&mut Tile>) {
    let dt = time.delta();
    for mut tile in &mut tiles {
        if !tile.is_pending() {
            continue;
        }
        if tile.tick(dt) && tile.kind() == TileKind::Normal {
            info!(target: "tile", "Tile ({}, {}) broken -> Normal", tile.x, tile.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn two_hits_break_a_value_two_tile() {
        let mut t = Tile::new(1, 1, TileKind::Breakable, 2).with_break_delay(DELAY);
        assert!(t.break_tile());
        assert_eq!(t.breakable_value(), 1);
        assert_eq!(t.shown_value(), 2, "visual waits for the delay");
        assert!(!t.tick(Duration::from_millis(100)));
        assert!(t.tick(Duration::from_millis(150)));
        assert_eq!(t.shown_value(), 1);
        assert_eq!(t.kind(), TileKind::Breakable);

        assert!(t.break_tile());
        assert!(t.tick(DELAY));
        assert_eq!(t.breakable_value(), 0);
        assert_eq!(t.kind(), TileKind::Normal);
        assert_eq!(t.tint(), Color::WHITE);
    }

    #[test]
    fn hits_on_normal_tiles_are_noops() {
        let mut t = Tile::new(0, 0, TileKind::Breakable, 1).with_break_delay(DELAY);
        t.break_tile();
        t.tick(DELAY);
        assert_eq!(t.kind(), TileKind::Normal);
        assert!(!t.break_tile());
        assert!(!t.is_pending());
        assert_eq!(t.breakable_value(), 0);
        assert_eq!(t.kind(), TileKind::Normal);
    }

    #[test]
    fn value_never_underflows_while_pending() {
        let mut t = Tile::new(0, 0, TileKind::Breakable, 1).with_break_delay(DELAY);
        t.break_tile();
        t.break_tile();
        t.break_tile();
        assert_eq!(t.breakable_value(), 0);
        t.tick(DELAY);
        assert_eq!(t.kind(), TileKind::Normal);
    }

    #[test]
    fn obstacles_ignore_hits() {
        let mut t = Tile::new(2, 3, TileKind::Obstacle, 0);
        assert!(!t.break_tile());
        assert!(!t.tick(DELAY));
        assert_eq!(t.kind(), TileKind::Obstacle);
    }

    #[test]
    fn custom_normal_color_is_restored() {
        let blue = Color::srgb(0.1, 0.2, 0.9);
        let mut t = Tile::new(0, 0, TileKind::Breakable, 1)
            .with_break_delay(Duration::ZERO)
            .with_normal_color(blue);
        assert_eq!(t.tint(), BREAKABLE_TINT);
        t.break_tile();
        t.tick(Duration::ZERO);
        assert_eq!(t.tint(), blue);
    }

    #[test]
    fn plugin_breaks_tiles_through_events() {
        use bevy::time::TimeUpdateStrategy;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_plugins(TilePlugin);
        let e = app
            .world_mut()
            .spawn(Tile::new(0, 0, TileKind::Breakable, 1).with_break_delay(DELAY))
            .id();
        app.world_mut().send_event(BreakTile(e));
        for _ in 0..6 {
            app.update();
        }
        let tile = app.world().get::<Tile>(e).unwrap();
        assert_eq!(tile.kind(), TileKind::Normal);
        assert_eq!(tile.breakable_value(), 0);
    }
}
