use crate::types::{AcqDate, BandSet};

/// Incremental progress reported to the caller during corpus assembly.
/// Observability only: events never change what the builder computes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    LocationStarted { location: String },
    /// A processed table became available, either from cache or computed.
    TableReady { location: String, band_set: BandSet, cached: bool, rows: usize },
    DateProcessed { location: String, band_set: BandSet, date: AcqDate },
    LabelsAssigned { location: String, band_set: BandSet, labeled: usize, unlabeled: usize },
    /// A (location, band set) unit failed; skipped unless fail-fast.
    UnitFailed { location: String, band_set: BandSet, error: String },
    /// A location's band-set tables could not be merged; the whole
    /// location is skipped unless fail-fast.
    LocationFailed { location: String, error: String },
    CorpusAssembled { rows: usize, columns: usize },
}
