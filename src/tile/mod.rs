mod grid;

pub use grid::{Tile, TileGrid};
