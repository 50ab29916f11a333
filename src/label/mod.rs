//! Ground-truth label polygons and point-in-polygon labeling.
mod bbox;
mod labeler;
mod polygon;
mod shp;
mod store;

use bbox::PolyBound;
pub use labeler::PointLabeler;
pub use polygon::LabelPolygon;
pub use store::LabelStore;
