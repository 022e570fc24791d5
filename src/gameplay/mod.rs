pub mod board;
pub mod goal;
pub mod score;
pub mod tile;
