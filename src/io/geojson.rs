use anyhow::{anyhow, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

/// Emit standard GeoJSON MultiPolygon coordinates:
/// `[[exterior, interior, ...], ...]` with rings as `[[x, y], ...]`.
pub(crate) fn multipolygon_to_coords(mp: &MultiPolygon<f64>) -> Value {
    let polygons: Vec<Value> = mp.0.iter().map(|polygon| {
        let mut rings = vec![ring_to_coords(polygon.exterior())];
        rings.extend(polygon.interiors().iter().map(ring_to_coords));
        json!(rings)
    }).collect();
    json!(polygons)
}

fn ring_to_coords(ring: &LineString<f64>) -> Value {
    json!(ring.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>())
}

/// Parse GeoJSON Polygon coordinates: `[exterior, interior, ...]`.
pub(crate) fn parse_polygon_coords(coords: &[Value]) -> Result<Polygon<f64>> {
    let exterior_coords = coords.first()
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow!("invalid Polygon: missing exterior ring"))?;
    let exterior = parse_ring_coords(exterior_coords)?;

    let interiors = coords[1..].iter()
        .filter_map(|v| v.as_array())
        .map(|ring| parse_ring_coords(ring))
        .collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse GeoJSON MultiPolygon coordinates: `[[exterior, interior, ...], ...]`.
pub(crate) fn parse_multipolygon_coords(coords: &[Value]) -> Result<MultiPolygon<f64>> {
    let polygons = coords.iter()
        .filter_map(|v| v.as_array())
        .map(|rings| parse_polygon_coords(rings))
        .collect::<Result<Vec<_>>>()?;
    Ok(MultiPolygon(polygons))
}

/// Parse a ring from `[[x, y], [x, y], ...]`, closing it if needed.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len());
    for coord_pair in coords {
        let pair = coord_pair.as_array()
            .filter(|a| a.len() >= 2)
            .ok_or_else(|| anyhow!("invalid coordinate pair: {coord_pair}"))?;
        let x = pair[0].as_f64().ok_or_else(|| anyhow!("invalid coordinate: x must be a number"))?;
        let y = pair[1].as_f64().ok_or_else(|| anyhow!("invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if !points.is_empty() && points[0] != points[points.len() - 1] {
        points.push(points[0]);
    }

    Ok(LineString(points))
}
