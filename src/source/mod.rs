//! External imagery-provider contract.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use geo::Rect;

use crate::raster::RasterTile;
use crate::types::{AcqDate, BandSet};

/// Read-only access to an imagery provider. The pipeline depends only on
/// this contract: downloading, authentication, retries and provider-side
/// caching all live behind it.
pub trait ImagerySource {
    /// Raster for one bounding box, acquisition date and band set.
    fn fetch(
        &self,
        bbox: &Rect<f64>,
        date: &AcqDate,
        band_set: BandSet,
        location: &str,
    ) -> Result<RasterTile>;

    /// Dates with imagery available over `bbox` during `year`, ascending.
    fn available_dates(&self, bbox: &Rect<f64>, year: i32) -> Result<Vec<AcqDate>>;
}

/// Dates close to a target date: same year and month, day within
/// `window_days` either side. Used to pick a usable acquisition near an
/// operator-chosen date.
pub fn dates_near(dates: &[AcqDate], target: &AcqDate, window_days: u32) -> Vec<AcqDate> {
    let lo = target.day().saturating_sub(window_days);
    let hi = target.day() + window_days;
    dates.iter()
        .filter(|d| d.year() == target.year() && d.month() == target.month())
        .filter(|d| (lo..=hi).contains(&d.day()))
        .cloned()
        .collect()
}

/// Imagery source backed by pre-loaded rasters, keyed by
/// (location, date, band set). Used in tests and for batches of tiles
/// already fetched by an external downloader.
#[derive(Default)]
pub struct MemSource {
    rasters: HashMap<(String, AcqDate, BandSet), RasterTile>,
}

impl MemSource {
    pub fn new() -> Self { Self::default() }

    /// Register a raster under `location`; date and band set come from the
    /// raster itself.
    pub fn insert(&mut self, location: &str, raster: RasterTile) {
        let key = (location.to_string(), raster.date().clone(), raster.band_set());
        self.rasters.insert(key, raster);
    }
}

impl ImagerySource for MemSource {
    fn fetch(
        &self,
        _bbox: &Rect<f64>,
        date: &AcqDate,
        band_set: BandSet,
        location: &str,
    ) -> Result<RasterTile> {
        self.rasters
            .get(&(location.to_string(), date.clone(), band_set))
            .cloned()
            .ok_or_else(|| anyhow!("no raster loaded for location={location} date={date} band_set={band_set}"))
    }

    fn available_dates(&self, _bbox: &Rect<f64>, year: i32) -> Result<Vec<AcqDate>> {
        let mut dates: Vec<AcqDate> = self.rasters.keys()
            .map(|(_, date, _)| date.clone())
            .filter(|date| date.year() == year)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }
}
