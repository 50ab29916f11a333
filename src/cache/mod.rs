//! Existence-gated cache of processed (labeled, date-merged) tables.

use std::{collections::HashMap, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use polars::frame::DataFrame;
use walkdir::WalkDir;

use crate::io::parquet::{read_from_parquet_file, write_to_parquet_file};
use crate::types::BandSet;

/// Persisted processed tables, keyed by (location, band set).
///
/// Recomputing a processed table costs network and CPU, so existence in the
/// cache gates recomputation; the only way to force a refresh is an
/// explicit `invalidate`. A unit of work that failed is never stored, so it
/// is retried on the next run.
pub trait CacheStore {
    fn has(&self, location: &str, band_set: BandSet) -> bool;
    fn load(&self, location: &str, band_set: BandSet) -> Result<DataFrame>;
    fn store(&mut self, location: &str, band_set: BandSet, df: &DataFrame) -> Result<()>;
    fn invalidate(&mut self, location: &str, band_set: BandSet) -> Result<()>;
    /// Every (location, band set) currently cached.
    fn inventory(&self) -> Result<Vec<(String, BandSet)>>;
}

/// Disk cache laid out `{root}/{location}/processed_{BANDSET}.parquet`.
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn path(&self, location: &str, band_set: BandSet) -> PathBuf {
        self.root.join(location).join(format!("processed_{band_set}.parquet"))
    }
}

impl CacheStore for DiskCache {
    fn has(&self, location: &str, band_set: BandSet) -> bool {
        self.path(location, band_set).exists()
    }

    fn load(&self, location: &str, band_set: BandSet) -> Result<DataFrame> {
        read_from_parquet_file(&self.path(location, band_set))
            .with_context(|| format!("Failed to load cached table for {location}/{band_set}"))
    }

    fn store(&mut self, location: &str, band_set: BandSet, df: &DataFrame) -> Result<()> {
        let path = self.path(location, band_set);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_to_parquet_file(&path, df)
    }

    fn invalidate(&mut self, location: &str, band_set: BandSet) -> Result<()> {
        let path = self.path(location, band_set);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to invalidate {}", path.display()))?;
        }
        Ok(())
    }

    fn inventory(&self) -> Result<Vec<(String, BandSet)>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str() else { continue };
            let Some(code) = name.strip_prefix("processed_").and_then(|n| n.strip_suffix(".parquet")) else {
                continue;
            };
            let Ok(band_set) = code.parse::<BandSet>() else { continue };
            let location = entry.path().parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("cache entry outside a location directory: {}", entry.path().display()))?;
            entries.push((location.to_string(), band_set));
        }
        entries.sort();
        Ok(entries)
    }
}

/// In-memory cache for tests and one-shot runs.
#[derive(Default)]
pub struct MemCache {
    tables: HashMap<(String, BandSet), DataFrame>,
}

impl MemCache {
    pub fn new() -> Self { Self::default() }
}

impl CacheStore for MemCache {
    fn has(&self, location: &str, band_set: BandSet) -> bool {
        self.tables.contains_key(&(location.to_string(), band_set))
    }

    fn load(&self, location: &str, band_set: BandSet) -> Result<DataFrame> {
        self.tables.get(&(location.to_string(), band_set)).cloned()
            .ok_or_else(|| anyhow!("no cached table for {location}/{band_set}"))
    }

    fn store(&mut self, location: &str, band_set: BandSet, df: &DataFrame) -> Result<()> {
        self.tables.insert((location.to_string(), band_set), df.clone());
        Ok(())
    }

    fn invalidate(&mut self, location: &str, band_set: BandSet) -> Result<()> {
        self.tables.remove(&(location.to_string(), band_set));
        Ok(())
    }

    fn inventory(&self) -> Result<Vec<(String, BandSet)>> {
        let mut entries: Vec<_> = self.tables.keys().cloned().collect();
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use crate::types::BandSet;

    use super::{CacheStore, DiskCache, MemCache};

    fn table() -> DataFrame {
        df!("latitude" => [14.0], "longitude" => [32.0], "FCOVER" => [0.5]).unwrap()
    }

    #[test]
    fn disk_cache_round_trip_and_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path());

        assert!(!cache.has("gaziera", BandSet::Fcover));
        cache.store("gaziera", BandSet::Fcover, &table()).unwrap();
        assert!(cache.has("gaziera", BandSet::Fcover));
        assert_eq!(cache.load("gaziera", BandSet::Fcover).unwrap(), table());

        cache.invalidate("gaziera", BandSet::Fcover).unwrap();
        assert!(!cache.has("gaziera", BandSet::Fcover));
        // Invalidating a missing entry is fine.
        cache.invalidate("gaziera", BandSet::Fcover).unwrap();
    }

    #[test]
    fn disk_inventory_lists_cached_units() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = DiskCache::new(dir.path());
        cache.store("gaziera", BandSet::All, &table()).unwrap();
        cache.store("gaziera", BandSet::Fcover, &table()).unwrap();
        cache.store("gaziera_other_1", BandSet::Fcover, &table()).unwrap();
        // A stray file is ignored.
        std::fs::write(dir.path().join("gaziera").join("notes.txt"), b"x").unwrap();

        let inventory = cache.inventory().unwrap();
        assert_eq!(inventory, vec![
            ("gaziera".to_string(), BandSet::All),
            ("gaziera".to_string(), BandSet::Fcover),
            ("gaziera_other_1".to_string(), BandSet::Fcover),
        ]);
    }

    #[test]
    fn mem_cache_round_trip() {
        let mut cache = MemCache::new();
        cache.store("gaziera", BandSet::All, &table()).unwrap();
        assert!(cache.has("gaziera", BandSet::All));
        assert!(cache.load("gaziera", BandSet::Fcover).is_err());
        assert_eq!(cache.inventory().unwrap().len(), 1);
    }
}
