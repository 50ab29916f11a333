use anyhow::Result;
use polars::{frame::DataFrame, prelude::Column};

use super::RasterTile;

impl RasterTile {
    /// Flatten the raster into one row per pixel, row-major (row 0 left to
    /// right, then row 1, ...). Columns: `latitude`, `longitude`, then one
    /// named column per band in declaration order. Pure grid-to-table
    /// transform, agnostic to which band set produced the raster.
    pub fn to_points(&self) -> Result<DataFrame> {
        let n = self.pixel_count();
        let (width, height) = (self.width(), self.height());
        let transform = self.transform();

        let mut lats = Vec::with_capacity(n);
        let mut lons = Vec::with_capacity(n);
        for row in 0..height {
            for col in 0..width {
                let (lon, lat) = transform.apply(row, col);
                lats.push(lat);
                lons.push(lon);
            }
        }

        let mut columns = vec![
            Column::new("latitude".into(), lats),
            Column::new("longitude".into(), lons),
        ];
        for (idx, name) in self.band_set().band_names().iter().enumerate() {
            let plane = self.band(idx);
            let mut values = Vec::with_capacity(n);
            for row in 0..height {
                for col in 0..width {
                    values.push(plane[[row, col]]);
                }
            }
            columns.push(Column::new((*name).into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}
