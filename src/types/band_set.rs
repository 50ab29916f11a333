use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Sentinel-2 band codes returned by the ALL evalscript, in declaration order.
const ALL_BANDS: [&str; 13] = [
    "B01", "B02", "B03", "B04", "B05", "B06", "B07", "B08", "B8A", "B09", "B10", "B11", "B12",
];

const TRUE_COLOR_BANDS: [&str; 3] = ["red", "green", "blue"];

/// A named band set ("evalscript"): which spectral bands or derived indices
/// a raster request returns. Each set has a fixed column schema; rasters with
/// band counts that don't match their declared set are rejected at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BandSet {
    All,        // 13 raw multispectral bands
    TrueColor,  // display RGB
    Fcover,     // fraction of green vegetation cover
    Ndvi,       // normalized difference vegetation index
    Clp,        // cloud probability
    Lai,        // leaf area index
    Cab,        // chlorophyll content
}

impl BandSet {
    /// Upper-case request code, matching the provider-side script names.
    pub fn to_str(&self) -> &'static str {
        match self {
            BandSet::All => "ALL",
            BandSet::TrueColor => "TRUECOLOR",
            BandSet::Fcover => "FCOVER",
            BandSet::Ndvi => "NDVI",
            BandSet::Clp => "CLP",
            BandSet::Lai => "LAI",
            BandSet::Cab => "CAB",
        }
    }

    /// Column names for this set's bands, in band declaration order.
    pub fn band_names(&self) -> &'static [&'static str] {
        match self {
            BandSet::All => &ALL_BANDS,
            BandSet::TrueColor => &TRUE_COLOR_BANDS,
            BandSet::Fcover => &["FCOVER"],
            BandSet::Ndvi => &["NDVI"],
            BandSet::Clp => &["CLP"],
            BandSet::Lai => &["LAI"],
            BandSet::Cab => &["CAB"],
        }
    }

    #[inline] pub fn band_count(&self) -> usize { self.band_names().len() }

    pub fn order() -> [BandSet; 7] {
        [
            BandSet::All,
            BandSet::TrueColor,
            BandSet::Fcover,
            BandSet::Ndvi,
            BandSet::Clp,
            BandSet::Lai,
            BandSet::Cab,
        ]
    }
}

impl fmt::Display for BandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for BandSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        BandSet::order()
            .into_iter()
            .find(|set| set.to_str() == s)
            .ok_or_else(|| anyhow!("unrecognized band set: {:?} (expected one of ALL, TRUECOLOR, FCOVER, NDVI, CLP, LAI, CAB)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::BandSet;

    #[test]
    fn band_counts() {
        assert_eq!(BandSet::All.band_count(), 13);
        assert_eq!(BandSet::TrueColor.band_count(), 3);
        assert_eq!(BandSet::Fcover.band_count(), 1);
        assert_eq!(BandSet::Ndvi.band_names(), &["NDVI"]);
    }

    #[test]
    fn parse_round_trip() {
        for set in BandSet::order() {
            assert_eq!(set.to_str().parse::<BandSet>().unwrap(), set);
        }
    }

    #[test]
    fn parse_unknown_is_descriptive() {
        let err = "SCL".parse::<BandSet>().unwrap_err();
        assert!(err.to_string().contains("unrecognized band set"));
    }
}
