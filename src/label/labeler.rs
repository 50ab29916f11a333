use anyhow::{anyhow, ensure, Result};
use geo::{BoundingRect, Contains, MultiPolygon, Point};
use polars::frame::DataFrame;
use rstar::{RTree, AABB};

use crate::types::{CropClass, UNLABELED};

use super::{LabelPolygon, PolyBound};

/// Point-in-polygon labeler over one location's ground-truth set.
///
/// Polygons are bucketed per class with an R-tree over their bounding
/// boxes, so each lookup only runs the exact containment test against
/// candidates whose bbox covers the point. Classes are evaluated in the
/// fixed priority order `Cultivated, Uncultivated, Other`; label sets
/// overlap at digitized boundaries, and the first containing class wins.
pub struct PointLabeler {
    buckets: Vec<ClassBucket>,
}

struct ClassBucket {
    class: CropClass,
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<PolyBound>,
}

impl ClassBucket {
    fn new(class: CropClass, shapes: Vec<MultiPolygon<f64>>) -> Self {
        let bounds = shapes.iter().enumerate()
            .filter_map(|(i, mp)| mp.bounding_rect().map(|rect| PolyBound::new(i, rect)))
            .collect();
        Self { class, shapes, rtree: RTree::bulk_load(bounds) }
    }

    fn contains(&self, point: Point<f64>) -> bool {
        self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .any(|bound| self.shapes[bound.idx()].contains(&point))
    }
}

impl PointLabeler {
    /// Build the labeler from one location's polygons. `binary` selects the
    /// cultivated/uncultivated class derivation; background ("other")
    /// locations pass false and all polygons become class Other.
    pub fn new(polygons: &[LabelPolygon], binary: bool) -> Self {
        let buckets = CropClass::priority()
            .into_iter()
            .map(|class| {
                let shapes = polygons.iter()
                    .filter(|p| p.crop_class(binary) == class)
                    .map(|p| p.geometry.clone())
                    .collect();
                ClassBucket::new(class, shapes)
            })
            .collect();
        Self { buckets }
    }

    /// Number of polygons per class, in priority order.
    pub fn class_counts(&self) -> [(CropClass, usize); 3] {
        [
            (self.buckets[0].class, self.buckets[0].shapes.len()),
            (self.buckets[1].class, self.buckets[1].shapes.len()),
            (self.buckets[2].class, self.buckets[2].shapes.len()),
        ]
    }

    /// Label one coordinate. Containment is interior-only (`geo::Contains`):
    /// a point exactly on a polygon edge is outside, for every class alike.
    pub fn label_point(&self, lon: f64, lat: f64) -> i32 {
        let point = Point::new(lon, lat);
        self.buckets.iter()
            .find(|bucket| bucket.contains(point))
            .map_or(UNLABELED, |bucket| bucket.class.code())
    }

    /// Label a batch of coordinates, same length and order as the input.
    pub fn label(&self, lats: &[f64], lons: &[f64]) -> Vec<i32> {
        lats.iter().zip(lons)
            .map(|(&lat, &lon)| self.label_point(lon, lat))
            .collect()
    }

    /// Label every row of a point table by its `latitude`/`longitude`
    /// columns. A table without both columns, or with null coordinates,
    /// is rejected; callers attach the offending location/date via
    /// `Context`.
    pub fn label_table(&self, df: &DataFrame) -> Result<Vec<i32>> {
        let lats = geometry_column(df, "latitude")?;
        let lons = geometry_column(df, "longitude")?;
        Ok(self.label(&lats, &lons))
    }
}

fn geometry_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df.column(name)
        .map_err(|_| anyhow!("point table is missing geometry column {:?}", name))?;
    let values = col.f64()?;
    ensure!(
        values.null_count() == 0,
        "geometry column {:?} contains {} null values",
        name, values.null_count(),
    );
    Ok(values.into_no_null_iter().collect())
}
