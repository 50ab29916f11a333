use geo::Rect;

/// Affine pixel→geographic transform for a north-up raster.
///
/// `(row, col)` maps to the coordinate of that pixel's origin corner:
/// longitude advances by `pixel_width` per column, latitude by
/// `pixel_height` per row. For the usual top-down row order the origin is
/// the raster's north-west corner and `pixel_height` is negative. Row/col
/// order follows the source raster exactly; swapping the axes would mirror
/// or transpose every downstream table without any error being raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_lon: f64, origin_lat: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self { origin_lon, origin_lat, pixel_width, pixel_height }
    }

    /// Transform for a raster of `width` x `height` pixels covering `rect`,
    /// rows running north to south.
    pub fn north_up(rect: Rect<f64>, width: usize, height: usize) -> Self {
        Self {
            origin_lon: rect.min().x,
            origin_lat: rect.max().y,
            pixel_width: (rect.max().x - rect.min().x) / width as f64,
            pixel_height: -(rect.max().y - rect.min().y) / height as f64,
        }
    }

    /// Geographic coordinate of pixel `(row, col)` as `(lon, lat)`.
    #[inline]
    pub fn apply(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_lon + col as f64 * self.pixel_width,
            self.origin_lat + row as f64 * self.pixel_height,
        )
    }
}
