use anyhow::{anyhow, Result};
use geo::{BoundingRect, Distance, Geodesic, GeodesicArea, MultiPolygon, Point, Polygon, Rect};

/// Ellipsoidal (WGS84) area of a polygon in m².
/// Always non-negative regardless of ring orientation.
#[inline]
pub fn geodesic_area_m2(polygon: &Polygon<f64>) -> f64 {
    polygon.geodesic_area_signed().abs()
}

/// Ellipsoidal area of a MultiPolygon in m² (sum over parts).
#[inline]
pub fn multi_geodesic_area_m2(mp: &MultiPolygon<f64>) -> f64 {
    mp.0.iter().map(geodesic_area_m2).sum()
}

/// Geodesic measurements of an axis-aligned bounding box.
///
/// Width is measured along the southern edge and height along the western
/// edge, as ellipsoidal distances rather than coordinate differences.
/// Regions span tens of kilometres, where planar approximations in degree
/// space are materially wrong.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BboxMetrics {
    pub width_m: f64,
    pub height_m: f64,
    pub area_m2: f64,
    pub perimeter_m: f64,
    pub rect: Rect<f64>,
}

impl BboxMetrics {
    pub fn of_rect(rect: Rect<f64>) -> Self {
        let sw = Point::new(rect.min().x, rect.min().y);
        let se = Point::new(rect.max().x, rect.min().y);
        let nw = Point::new(rect.min().x, rect.max().y);
        let bbox_polygon = rect.to_polygon();
        Self {
            width_m: Geodesic.distance(sw, se).abs(),
            height_m: Geodesic.distance(sw, nw).abs(),
            area_m2: geodesic_area_m2(&bbox_polygon),
            perimeter_m: bbox_polygon.geodesic_perimeter().abs(),
            rect,
        }
    }

    pub fn of_polygon(polygon: &Polygon<f64>) -> Result<Self> {
        let rect = polygon.bounding_rect()
            .ok_or_else(|| anyhow!("cannot compute bounding box of empty polygon"))?;
        Ok(Self::of_rect(rect))
    }

    pub fn of_multi_polygon(mp: &MultiPolygon<f64>) -> Result<Self> {
        let rect = mp.bounding_rect()
            .ok_or_else(|| anyhow!("cannot compute bounding box of empty geometry"))?;
        Ok(Self::of_rect(rect))
    }
}
