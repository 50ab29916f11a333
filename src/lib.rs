#![doc = "Croppix public API"]
mod assemble;
mod cache;
mod geom;
mod io;
mod label;
mod pipeline;
mod raster;
mod source;
mod tile;
mod types;

#[doc(inline)]
pub use types::{AcqDate, BandSet, CropClass, TileId, UNLABELED};

#[doc(inline)]
pub use geom::{geodesic_area_m2, multi_geodesic_area_m2, BboxMetrics};

#[doc(inline)]
pub use tile::{Tile, TileGrid};

#[doc(inline)]
pub use raster::{GeoTransform, RasterTile};

#[doc(inline)]
pub use label::{LabelPolygon, LabelStore, PointLabeler};

#[doc(inline)]
pub use assemble::{merge_band_sets, merge_dates, merge_locations, GEOMETRY_COLUMNS, LABELS_COLUMN};

#[doc(inline)]
pub use source::{dates_near, ImagerySource, MemSource};

#[doc(inline)]
pub use cache::{CacheStore, DiskCache, MemCache};

#[doc(inline)]
pub use pipeline::{CorpusBuilder, LocationSpec, PipelineConfig, ProgressEvent};
