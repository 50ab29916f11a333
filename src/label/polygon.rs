use geo::MultiPolygon;

use crate::geom::multi_geodesic_area_m2;
use crate::types::CropClass;

/// One ground-truth geometry with its delineation attributes, as persisted
/// in the label store.
#[derive(Debug, Clone)]
pub struct LabelPolygon {
    pub state: String,      // location/state name, e.g. "Gaziera" or "gaziera_other_3_12"
    pub year: i32,          // delineation year
    pub rainfed: i32,       // 1 rainfed, 0 irrigated, -1 unknown
    pub crop_type: String,  // free-text crop type; "Uncultivated" and "Other" are significant
    pub geometry: MultiPolygon<f64>,
    pub area_m2: f64,
}

impl LabelPolygon {
    pub fn new(
        state: impl Into<String>,
        year: i32,
        rainfed: i32,
        crop_type: impl Into<String>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        let area_m2 = multi_geodesic_area_m2(&geometry);
        Self { state: state.into(), year, rainfed, crop_type: crop_type.into(), geometry, area_m2 }
    }

    /// Categorical class derived from the crop type.
    ///
    /// In binary mode everything that is not explicitly "Uncultivated"
    /// counts as cultivated cropland; background locations instead label
    /// every polygon "Other".
    pub fn crop_class(&self, binary: bool) -> CropClass {
        if !binary {
            CropClass::Other
        } else if self.crop_type == "Uncultivated" {
            CropClass::Uncultivated
        } else {
            CropClass::Cultivated
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use crate::types::CropClass;

    use super::LabelPolygon;

    fn square() -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: 32.0, y: 14.0),
            (x: 32.01, y: 14.0),
            (x: 32.01, y: 14.01),
            (x: 32.0, y: 14.01),
            (x: 32.0, y: 14.0),
        ]])
    }

    #[test]
    fn class_derivation() {
        let sorghum = LabelPolygon::new("Gaziera", 2021, 0, "Sorghum", square());
        let fallow = LabelPolygon::new("Gaziera", 2021, 0, "Uncultivated", square());
        assert_eq!(sorghum.crop_class(true), CropClass::Cultivated);
        assert_eq!(fallow.crop_class(true), CropClass::Uncultivated);
        assert_eq!(sorghum.crop_class(false), CropClass::Other);
        assert_eq!(fallow.crop_class(false), CropClass::Other);
    }

    #[test]
    fn area_is_computed() {
        let p = LabelPolygon::new("Gaziera", 2021, 0, "Sorghum", square());
        // ~1.1km x 1.08km square
        assert!(p.area_m2 > 1.0e6 && p.area_m2 < 1.5e6, "area {}", p.area_m2);
    }
}
