use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{ParquetReader, ParquetWriter}};

/// Writes a Polars DataFrame to a Parquet file at `path`.
pub(crate) fn write_to_parquet_file(path: &Path, df: &DataFrame) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create Parquet file: {}", path.display()))?;
    ParquetWriter::new(file).finish(&mut df.clone())?;
    Ok(())
}

/// Reads a Polars DataFrame from a Parquet file at `path`.
pub(crate) fn read_from_parquet_file(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to read Parquet file: {}", path.display()))?;
    Ok(ParquetReader::new(file).finish()?)
}
