use bevy::prelude::*;
use serde::Deserialize;

use crate::core::components::MatchValue;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub enum TileKind {
    #[default]
    Normal,
    Obstacle,
    Breakable,
}

/// Non-default tile placed at level start. Cells not listed are `Normal`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TileSpec {
    pub x: u32,
    pub y: u32,
    pub kind: TileKind,
    #[serde(default)]
    pub breakable_value: u32,
}

/// Piece placed at level start instead of a random fill.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PieceSpec {
    pub x: u32,
    pub y: u32,
    pub piece: MatchValue,
}

/// Grid-space position helper shared by tiles and pieces.
pub trait GridCell {
    fn cell(&self) -> UVec2;
}

impl GridCell for TileSpec {
    fn cell(&self) -> UVec2 {
        UVec2::new(self.x, self.y)
    }
}

impl GridCell for PieceSpec {
    fn cell(&self) -> UVec2 {
        UVec2::new(self.x, self.y)
    }
}

/// Returns the first entry whose cell lies outside a `width` x `height` grid.
pub fn first_out_of_bounds<T: GridCell>(items: &[T], width: u32, height: u32) -> Option<UVec2> {
    items
        .iter()
        .map(GridCell::cell)
        .find(|c| c.x >= width || c.y >= height)
}
