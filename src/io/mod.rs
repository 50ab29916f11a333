pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod parquet;
