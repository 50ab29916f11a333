mod band_set;
mod crop_class;
mod date;
mod tile_id;

pub use band_set::BandSet;
pub use crop_class::{CropClass, UNLABELED};
pub use date::AcqDate;
pub use tile_id::TileId;
