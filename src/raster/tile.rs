use anyhow::{ensure, Result};
use ndarray::{Array3, ArrayView2};

use crate::types::{AcqDate, BandSet, TileId};

use super::GeoTransform;

/// A downloaded pixel grid for one (tile, date, band set), read-only after
/// construction. Band planes are stored `(band, row, col)` and must match
/// the band set's declared schema.
#[derive(Debug, Clone)]
pub struct RasterTile {
    tile: TileId,
    date: AcqDate,
    band_set: BandSet,
    bands: Array3<f64>,
    transform: GeoTransform,
}

impl RasterTile {
    pub fn new(
        tile: TileId,
        date: AcqDate,
        band_set: BandSet,
        bands: Array3<f64>,
        transform: GeoTransform,
    ) -> Result<Self> {
        let (band_count, height, width) = bands.dim();
        ensure!(
            band_count == band_set.band_count(),
            "raster for {tile} ({date}, {band_set}) has {band_count} band planes, schema declares {}",
            band_set.band_count(),
        );
        ensure!(
            width > 0 && height > 0,
            "raster for {tile} ({date}, {band_set}) has empty pixel grid ({width} x {height})",
        );
        Ok(Self { tile, date, band_set, bands, transform })
    }

    #[inline] pub fn tile(&self) -> &TileId { &self.tile }
    #[inline] pub fn date(&self) -> &AcqDate { &self.date }
    #[inline] pub fn band_set(&self) -> BandSet { self.band_set }
    #[inline] pub fn transform(&self) -> GeoTransform { self.transform }

    #[inline] pub fn band_count(&self) -> usize { self.bands.dim().0 }
    #[inline] pub fn height(&self) -> usize { self.bands.dim().1 }
    #[inline] pub fn width(&self) -> usize { self.bands.dim().2 }
    #[inline] pub fn pixel_count(&self) -> usize { self.width() * self.height() }

    /// One band plane as a `(row, col)` view.
    #[inline]
    pub fn band(&self, idx: usize) -> ArrayView2<'_, f64> {
        self.bands.index_axis(ndarray::Axis(0), idx)
    }

    /// Mean value of one band, e.g. for cloud-probability screening.
    pub fn band_mean(&self, idx: usize) -> f64 {
        self.band(idx).mean().unwrap_or(f64::NAN)
    }
}
