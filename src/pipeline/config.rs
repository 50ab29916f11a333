use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::BandSet;

/// Explicit configuration for a corpus-assembly run. Passed by value into
/// the builder; nothing in the pipeline reads process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root of the processed-table cache.
    pub cache_root: PathBuf,
    /// Where the assembled training corpus is persisted.
    pub corpus_path: PathBuf,
    #[serde(default = "default_max_tile_m")]
    pub max_tile_width_m: f64,
    #[serde(default = "default_max_tile_m")]
    pub max_tile_height_m: f64,
    /// Band sets collected per location, merged column-wise in this order.
    #[serde(default = "default_band_sets")]
    pub band_sets: Vec<BandSet>,
    /// Abort the whole run on the first failed unit instead of skipping it.
    #[serde(default)]
    pub fail_fast: bool,
    /// Diagnostic verbosity (0 = silent).
    #[serde(default)]
    pub verbose: u8,
}

fn default_max_tile_m() -> f64 { 25_000.0 }

fn default_band_sets() -> Vec<BandSet> { vec![BandSet::All, BandSet::Fcover] }

impl PipelineConfig {
    pub fn new(cache_root: impl Into<PathBuf>, corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            corpus_path: corpus_path.into(),
            max_tile_width_m: default_max_tile_m(),
            max_tile_height_m: default_max_tile_m(),
            band_sets: default_band_sets(),
            fail_fast: false,
            verbose: 0,
        }
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("invalid pipeline config JSON")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read pipeline config: {}", path.display()))?;
        Self::from_json_bytes(&bytes)
    }
}
