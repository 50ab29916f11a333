mod points;
mod tile;
mod transform;

pub use tile::RasterTile;
pub use transform::GeoTransform;
