use anyhow::{bail, Context, Result};
use geo::Rect;
use polars::{frame::DataFrame, prelude::Column};

use crate::assemble::{merge_band_sets, merge_dates, merge_locations};
use crate::cache::CacheStore;
use crate::io::{csv::write_to_csv_file, parquet::write_to_parquet_file};
use crate::label::{LabelStore, PointLabeler};
use crate::source::ImagerySource;
use crate::tile::TileGrid;
use crate::types::{AcqDate, BandSet, UNLABELED};

use super::{PipelineConfig, ProgressEvent};

/// One region to collect into the corpus: a name (which also selects its
/// label polygons and labeling mode), its bounding box, and the
/// acquisition dates to merge.
#[derive(Debug, Clone)]
pub struct LocationSpec {
    pub name: String,
    pub region: Rect<f64>,
    pub dates: Vec<AcqDate>,
}

impl LocationSpec {
    pub fn new(name: impl Into<String>, region: Rect<f64>, dates: Vec<AcqDate>) -> Self {
        Self { name: name.into(), region, dates }
    }

    /// Collect a single tile as its own location, named by the tile id.
    pub fn from_tile(tile: &crate::tile::Tile, dates: Vec<AcqDate>) -> Self {
        Self { name: tile.id.to_string(), region: tile.rect, dates }
    }
}

/// Batch driver that turns locations into the persisted training corpus.
///
/// Unit of work is one (location, band set): either its processed table is
/// loaded from cache, or every tile and date is fetched, mapped to points,
/// date-merged, labeled and stored. A failed unit leaves no cache entry and
/// is retried next run; failed units are skipped with a diagnostic unless
/// the config says fail-fast.
pub struct CorpusBuilder<'a> {
    config: PipelineConfig,
    source: &'a dyn ImagerySource,
    cache: &'a mut dyn CacheStore,
    labels: &'a LabelStore,
    progress: Option<Box<dyn FnMut(&ProgressEvent) + 'a>>,
}

impl<'a> CorpusBuilder<'a> {
    pub fn new(
        config: PipelineConfig,
        source: &'a dyn ImagerySource,
        cache: &'a mut dyn CacheStore,
        labels: &'a LabelStore,
    ) -> Self {
        Self { config, source, cache, labels, progress: None }
    }

    /// Register a progress callback invoked between units of work.
    pub fn with_progress(mut self, callback: impl FnMut(&ProgressEvent) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    fn emit(&mut self, event: ProgressEvent) {
        if let Some(callback) = self.progress.as_mut() {
            callback(&event);
        }
    }

    /// Assemble, persist and return the training corpus for `locations`.
    pub fn run(&mut self, locations: &[LocationSpec]) -> Result<DataFrame> {
        let mut per_location: Vec<(String, DataFrame)> = Vec::new();

        for spec in locations {
            self.emit(ProgressEvent::LocationStarted { location: spec.name.clone() });
            if self.config.verbose > 0 {
                eprintln!("[assemble] location={}", spec.name);
            }

            let mut per_set: Vec<(BandSet, DataFrame)> = Vec::new();
            for band_set in self.config.band_sets.clone() {
                match self.processed_table(spec, band_set) {
                    Ok(table) => per_set.push((band_set, table)),
                    Err(err) => {
                        self.emit(ProgressEvent::UnitFailed {
                            location: spec.name.clone(),
                            band_set,
                            error: format!("{err:#}"),
                        });
                        if self.config.fail_fast {
                            return Err(err);
                        }
                        eprintln!(
                            "[assemble] unit failed: location={} band_set={band_set}: {err:#}",
                            spec.name
                        );
                    }
                }
            }
            if per_set.is_empty() {
                continue;
            }

            match merge_band_sets(&per_set)
                .with_context(|| format!("merging band sets for location={}", spec.name))
            {
                Ok(table) => per_location.push((spec.name.clone(), table)),
                Err(err) => {
                    self.emit(ProgressEvent::LocationFailed {
                        location: spec.name.clone(),
                        error: format!("{err:#}"),
                    });
                    if self.config.fail_fast {
                        return Err(err);
                    }
                    eprintln!("[assemble] location failed: {err:#}");
                }
            }
        }

        if per_location.is_empty() {
            bail!("no location produced a feature table");
        }
        let pairs: Vec<(&str, DataFrame)> = per_location.iter()
            .map(|(name, table)| (name.as_str(), table.clone()))
            .collect();
        let corpus = merge_locations(&pairs)?;
        self.emit(ProgressEvent::CorpusAssembled {
            rows: corpus.height(),
            columns: corpus.width(),
        });

        let path = &self.config.corpus_path;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Output format follows the configured extension; Parquet otherwise.
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            write_to_csv_file(path, &corpus)?;
        } else {
            write_to_parquet_file(path, &corpus)?;
        }
        if self.config.verbose > 0 {
            eprintln!(
                "[assemble] corpus {}x{} -> {}",
                corpus.height(), corpus.width(), self.config.corpus_path.display()
            );
        }
        Ok(corpus)
    }

    /// Processed (point-mapped, date-merged, labeled) table for one
    /// (location, band set), loaded from cache when present.
    fn processed_table(&mut self, spec: &LocationSpec, band_set: BandSet) -> Result<DataFrame> {
        let location = spec.name.as_str();
        if self.cache.has(location, band_set) {
            let table = self.cache.load(location, band_set)?;
            self.emit(ProgressEvent::TableReady {
                location: location.to_string(),
                band_set,
                cached: true,
                rows: table.height(),
            });
            return Ok(table);
        }

        if spec.dates.is_empty() {
            bail!("no acquisition dates for location={location}");
        }
        let mut dates = spec.dates.clone();
        dates.sort();
        dates.dedup();

        // Background ("other") locations label every polygon class Other.
        let binary = !location.contains("other");
        let labeler = PointLabeler::new(&self.labels.for_location(location), binary);

        let grid = TileGrid::build(
            location,
            spec.region,
            self.config.max_tile_width_m,
            self.config.max_tile_height_m,
        )?;
        if self.config.verbose > 1 {
            eprintln!("[assemble] location={location} band_set={band_set} tiles={}", grid.len());
        }

        let mut table: Option<DataFrame> = None;
        for tile in grid.iter() {
            let mut per_date: Vec<(AcqDate, DataFrame)> = Vec::with_capacity(dates.len());
            for date in &dates {
                let raster = self.source
                    .fetch(&tile.rect, date, band_set, location)
                    .with_context(|| format!(
                        "fetch failed: location={location} date={date} band_set={band_set} tile={}",
                        tile.id
                    ))?;
                per_date.push((date.clone(), raster.to_points()?));
            }
            let tile_table = merge_dates(&per_date)
                .with_context(|| format!(
                    "merging dates failed: location={location} band_set={band_set} tile={}",
                    tile.id
                ))?;
            for (date, _) in &per_date {
                self.emit(ProgressEvent::DateProcessed {
                    location: location.to_string(),
                    band_set,
                    date: date.clone(),
                });
            }
            match table.as_mut() {
                None => table = Some(tile_table),
                Some(merged) => { merged.vstack_mut(&tile_table)?; }
            }
        }
        let Some(mut table) = table else {
            bail!("tile grid is empty for location={location}");
        };

        let labels = labeler.label_table(&table)
            .with_context(|| format!("labeling failed: location={location} band_set={band_set}"))?;
        let labeled = labels.iter().filter(|&&label| label != UNLABELED).count();
        self.emit(ProgressEvent::LabelsAssigned {
            location: location.to_string(),
            band_set,
            labeled,
            unlabeled: labels.len() - labeled,
        });
        table.with_column(Column::new("Labels".into(), labels))?;

        self.cache.store(location, band_set, &table)?;
        self.emit(ProgressEvent::TableReady {
            location: location.to_string(),
            band_set,
            cached: false,
            rows: table.height(),
        });
        Ok(table)
    }
}
