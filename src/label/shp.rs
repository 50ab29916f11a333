use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile::PolygonRing;

/// Convert a shapefile polygon to a geo::MultiPolygon.
/// Shapefiles store each outer ring followed by that ring's holes.
pub(crate) fn shp_to_multipolygon(p: &shapefile::Polygon) -> MultiPolygon<f64> {
    /// Build a closed LineString from shapefile points.
    fn ring_to_line_string(points: &[shapefile::Point]) -> LineString<f64> {
        let mut coords: Vec<Coord<f64>> =
            points.iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
        LineString(coords)
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current: Option<(LineString<f64>, Vec<LineString<f64>>)> = None;

    for ring in p.rings() {
        match ring {
            PolygonRing::Outer(points) => {
                if let Some((exterior, holes)) = current.take() {
                    polys.push(Polygon::new(exterior, holes));
                }
                current = Some((ring_to_line_string(points), Vec::new()));
            }
            PolygonRing::Inner(points) => {
                // A hole before any outer ring is malformed; drop it.
                if let Some((_, holes)) = current.as_mut() {
                    holes.push(ring_to_line_string(points));
                }
            }
        }
    }
    if let Some((exterior, holes)) = current {
        polys.push(Polygon::new(exterior, holes));
    }

    MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use shapefile::{Point, PolygonRing};

    use super::shp_to_multipolygon;

    #[test]
    fn groups_holes_with_their_outer_ring() {
        let shp = shapefile::Polygon::with_rings(vec![
            PolygonRing::Outer(vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 4.0),
                Point::new(4.0, 4.0),
                Point::new(4.0, 0.0),
                Point::new(0.0, 0.0),
            ]),
            PolygonRing::Inner(vec![
                Point::new(1.0, 1.0),
                Point::new(2.0, 1.0),
                Point::new(2.0, 2.0),
                Point::new(1.0, 2.0),
                Point::new(1.0, 1.0),
            ]),
            PolygonRing::Outer(vec![
                Point::new(10.0, 0.0),
                Point::new(10.0, 1.0),
                Point::new(11.0, 1.0),
                Point::new(10.0, 0.0),
            ]),
        ]);

        let mp = shp_to_multipolygon(&shp);
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_eq!(mp.0[1].interiors().len(), 0);
    }
}
