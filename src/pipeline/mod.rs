//! Batch corpus assembly: tiles and dates in, training table out.
mod builder;
mod config;
mod progress;

pub use builder::{CorpusBuilder, LocationSpec};
pub use config::PipelineConfig;
pub use progress::ProgressEvent;
