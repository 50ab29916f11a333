use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use geo::MultiPolygon;
use serde_json::{json, Map, Value};

use crate::io::geojson::{multipolygon_to_coords, parse_multipolygon_coords, parse_polygon_coords};
use crate::tile::TileGrid;

use super::{shp::shp_to_multipolygon, LabelPolygon};

/// Durable store of every delineated label polygon across sessions.
///
/// Persisted wholesale as a GeoJSON FeatureCollection (no partial update):
/// the on-disk file is the single source of truth, loaded at session start
/// and rewritten after append operations.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    polygons: Vec<LabelPolygon>,
}

impl LabelStore {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.polygons.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.polygons.is_empty() }
    #[inline] pub fn polygons(&self) -> &[LabelPolygon] { &self.polygons }

    pub fn push(&mut self, polygon: LabelPolygon) {
        self.polygons.push(polygon);
    }

    /// Polygons belonging to one location: state name equal to `location`
    /// (case-insensitive; label stores carry "Gaziera" for "gaziera") or
    /// `{location}_{i}` with a pure integer suffix, the per-polygon scheme
    /// the append operations write. The suffix must be all digits so that
    /// "gaziera" never absorbs a background sibling like
    /// "gaziera_other_1_3"; those belong to location "gaziera_other_1".
    pub fn for_location(&self, location: &str) -> Vec<LabelPolygon> {
        let prefix = format!("{location}_");
        self.polygons.iter()
            .filter(|p| {
                p.state.eq_ignore_ascii_case(location)
                    || p.state.strip_prefix(&prefix).is_some_and(|suffix| {
                        !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
                    })
            })
            .cloned()
            .collect()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read label store: {}", path.display()))?;
        Self::from_geojson_bytes(&bytes)
            .with_context(|| format!("Failed to parse label store: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_geojson_bytes()?)
            .with_context(|| format!("Failed to write label store: {}", path.display()))
    }

    pub fn from_geojson_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).context("invalid label store JSON")?;
        let features = value["features"].as_array()
            .ok_or_else(|| anyhow!("label store is not a FeatureCollection"))?;

        let mut polygons = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let geometry = feature_geometry(feature)
                .with_context(|| format!("label store feature {idx}"))?;
            let props = feature["properties"].as_object()
                .ok_or_else(|| anyhow!("label store feature {idx}: missing properties"))?;
            polygons.push(LabelPolygon::new(
                string_prop(props, "State").with_context(|| format!("label store feature {idx}"))?,
                int_prop(props, "Year").unwrap_or(-1),
                int_prop(props, "Rainfed").unwrap_or(-1),
                string_prop(props, "Crop_Type").with_context(|| format!("label store feature {idx}"))?,
                geometry,
            ));
        }
        Ok(Self { polygons })
    }

    pub fn to_geojson_bytes(&self) -> Result<Vec<u8>> {
        let features: Vec<Value> = self.polygons.iter().map(|p| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": multipolygon_to_coords(&p.geometry),
                },
                "properties": {
                    "State": p.state,
                    "Year": p.year,
                    "Rainfed": p.rainfed,
                    "Crop_Type": p.crop_type,
                    "Area_M2": p.area_m2,
                },
            })
        }).collect();

        let collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        serde_json::to_vec(&collection).context("Failed to serialize label store")
    }

    /// Append newly-delineated regions from an external GeoJSON file.
    /// MultiPolygon features are exploded into one entry per polygon, each
    /// named `{state_name}_{i}`, and stamped with the given attributes.
    /// Returns the number of entries appended.
    pub fn append_delineated_geojson(
        &mut self,
        bytes: &[u8],
        state_name: &str,
        crop_type: &str,
        rainfed: i32,
        year: i32,
    ) -> Result<usize> {
        let value: Value = serde_json::from_slice(bytes).context("invalid delineation JSON")?;
        let features = value["features"].as_array()
            .ok_or_else(|| anyhow!("delineation file is not a FeatureCollection"))?;

        let mut appended = 0;
        for (idx, feature) in features.iter().enumerate() {
            let geometry = feature_geometry(feature)
                .with_context(|| format!("delineation feature {idx}"))?;
            for polygon in geometry.0 {
                self.polygons.push(LabelPolygon::new(
                    format!("{state_name}_{appended}"),
                    year,
                    rainfed,
                    crop_type,
                    MultiPolygon(vec![polygon]),
                ));
                appended += 1;
            }
        }
        Ok(appended)
    }

    /// Append a generated tile grid as label regions, one entry per tile
    /// named by its tile id. Used to delineate "other"/background squares.
    pub fn append_tiles(&mut self, grid: &TileGrid, crop_type: &str, rainfed: i32, year: i32) -> usize {
        for tile in grid.iter() {
            self.polygons.push(LabelPolygon::new(
                tile.id.to_string(),
                year,
                rainfed,
                crop_type,
                MultiPolygon(vec![tile.polygon()]),
            ));
        }
        grid.len()
    }

    /// Append polygons from a delineated shapefile. Attribute fields
    /// `Crop_Type`, `Year` and `Rainfed` are taken from the record when
    /// present, the given defaults otherwise.
    pub fn append_shapefile(
        &mut self,
        path: &Path,
        state_name: &str,
        crop_type: &str,
        rainfed: i32,
        year: i32,
    ) -> Result<usize> {
        let mut reader = shapefile::Reader::from_path(path)
            .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

        let mut appended = 0;
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.context("Error reading shape+record")?;
            let polygon = match shape {
                shapefile::Shape::Polygon(p) => shp_to_multipolygon(&p),
                shapefile::Shape::NullShape => continue,
                _ => bail!("unsupported shape type in {} (only Polygon shapes are accepted)", path.display()),
            };
            self.polygons.push(LabelPolygon::new(
                format!("{state_name}_{appended}"),
                record_int(&record, "Year").unwrap_or(year),
                record_int(&record, "Rainfed").unwrap_or(rainfed),
                record_string(&record, "Crop_Type").unwrap_or_else(|| crop_type.to_string()),
                polygon,
            ));
            appended += 1;
        }
        Ok(appended)
    }
}

/// Pull a feature's geometry as a MultiPolygon (single polygons are
/// wrapped), rejecting other geometry types.
fn feature_geometry(feature: &Value) -> Result<MultiPolygon<f64>> {
    let geometry = feature["geometry"].as_object()
        .ok_or_else(|| anyhow!("missing geometry"))?;
    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing geometry coordinates"))?;
    match geometry["type"].as_str() {
        Some("MultiPolygon") => parse_multipolygon_coords(coords),
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon_coords(coords)?])),
        other => bail!("unsupported geometry type: {:?}", other),
    }
}

fn string_prop(props: &Map<String, Value>, key: &str) -> Result<String> {
    props.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing or non-string property {:?}", key))
}

fn int_prop(props: &Map<String, Value>, key: &str) -> Option<i32> {
    props.get(key)?.as_i64().map(|v| v as i32)
}

fn record_string(record: &shapefile::dbase::Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(shapefile::dbase::FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn record_int(record: &shapefile::dbase::Record, field: &str) -> Option<i32> {
    match record.get(field) {
        Some(shapefile::dbase::FieldValue::Numeric(Some(n))) => Some(*n as i32),
        _ => None,
    }
}
