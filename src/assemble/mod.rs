//! Row-aligned assembly of point tables into training feature tables.

use anyhow::{bail, ensure, Result};
use polars::{frame::DataFrame, functions::concat_df_diagonal, prelude::Column};

use crate::types::{AcqDate, BandSet};

/// Columns shared by every point table, kept once per merged table.
pub const GEOMETRY_COLUMNS: [&str; 2] = ["latitude", "longitude"];
pub const LABELS_COLUMN: &str = "Labels";

/// Column-wise merge of per-band-set tables for one tile and date.
///
/// Every input must describe the identical pixel sequence: the tables are
/// produced row-major from rasters of the same bbox, so equal row counts
/// are the alignment guarantee. A mismatch is fatal for the tile: rows are
/// never truncated or padded, since a silent misalignment would corrupt
/// every label downstream. Geometry and `Labels` columns are taken from the
/// first table only.
pub fn merge_band_sets(tables: &[(BandSet, DataFrame)]) -> Result<DataFrame> {
    let Some(((first_set, base), rest)) = tables.split_first() else {
        bail!("merge_band_sets: no tables given");
    };

    let mut merged = base.clone();
    for (set, table) in rest {
        ensure!(
            table.height() == base.height(),
            "row count mismatch between band sets: {first_set} has {} rows, {set} has {} rows \
             (tables for one tile+date must describe the same pixels)",
            base.height(), table.height(),
        );
        for column in band_columns(table) {
            ensure!(
                merged.column(column.name().as_str()).is_err(),
                "duplicate band column {:?} when merging {set} (already present)",
                column.name().as_str(),
            );
            merged.with_column(column.clone())?;
        }
    }
    Ok(merged)
}

/// Column-wise merge of one tile's tables across acquisition dates.
///
/// Band columns are renamed `{band}_{date}`; the first date's geometry
/// (and `Labels`, when present) columns are kept as the canonical copy,
/// since tile geometry does not change between dates.
pub fn merge_dates(tables: &[(AcqDate, DataFrame)]) -> Result<DataFrame> {
    let Some(((first_date, base), rest)) = tables.split_first() else {
        bail!("merge_dates: no tables given");
    };
    for name in GEOMETRY_COLUMNS {
        ensure!(
            base.column(name).is_ok(),
            "point table for {first_date} is missing geometry column {:?}",
            name,
        );
    }

    let mut merged = base.clone();
    for name in band_column_names(base) {
        merged.rename(&name, format!("{name}_{first_date}").into())?;
    }

    for (date, table) in rest {
        ensure!(
            table.height() == base.height(),
            "row count mismatch across dates: {first_date} has {} rows, {date} has {} rows",
            base.height(), table.height(),
        );
        for column in band_columns(table) {
            let mut column = column.clone();
            column.rename(format!("{}_{date}", column.name()).into());
            merged.with_column(column)?;
        }
    }
    Ok(merged)
}

/// Row-wise concatenation of per-location feature tables into the corpus.
///
/// A `location` column disambiguates origin. Column sets are unioned:
/// band columns absent in a location (e.g. background tiles collected with
/// a different band set) are filled with nulls.
pub fn merge_locations(tables: &[(&str, DataFrame)]) -> Result<DataFrame> {
    if tables.is_empty() {
        bail!("merge_locations: no tables given");
    }
    let stamped = tables.iter()
        .map(|(location, table)| {
            let mut table = table.clone();
            table.with_column(Column::new(
                "location".into(),
                vec![*location; table.height()],
            ))?;
            Ok(table)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(concat_df_diagonal(&stamped)?)
}

/// Every column that is neither geometry nor `Labels`.
fn band_columns(df: &DataFrame) -> impl Iterator<Item = &Column> {
    df.get_columns().iter().filter(|c| {
        let name = c.name().as_str();
        name != LABELS_COLUMN && !GEOMETRY_COLUMNS.contains(&name)
    })
}

fn band_column_names(df: &DataFrame) -> Vec<String> {
    band_columns(df).map(|c| c.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::*;

    use crate::types::{AcqDate, BandSet};

    use super::{merge_band_sets, merge_dates, merge_locations};

    fn all_table(rows: usize) -> DataFrame {
        df!(
            "latitude" => vec![14.0; rows],
            "longitude" => vec![32.0; rows],
            "B02" => vec![0.1; rows],
            "B03" => vec![0.2; rows],
            "B04" => vec![0.3; rows],
        )
        .unwrap()
    }

    fn fcover_table(rows: usize) -> DataFrame {
        df!(
            "latitude" => vec![14.0; rows],
            "longitude" => vec![32.0; rows],
            "FCOVER" => vec![0.5; rows],
        )
        .unwrap()
    }

    #[test]
    fn band_set_merge_keeps_rows_and_unions_columns() {
        let merged = merge_band_sets(&[
            (BandSet::All, all_table(100)),
            (BandSet::Fcover, fcover_table(100)),
        ])
        .unwrap();
        assert_eq!(merged.height(), 100);
        // 2 geometry + 3 ALL bands + 1 FCOVER band
        assert_eq!(merged.width(), 6);
        assert!(merged.column("FCOVER").is_ok());
        // Single geometry copy.
        assert_eq!(
            merged.get_column_names().iter().filter(|n| n.as_str() == "latitude").count(),
            1
        );
    }

    #[test]
    fn band_set_row_mismatch_is_fatal() {
        let err = merge_band_sets(&[
            (BandSet::All, all_table(100)),
            (BandSet::Fcover, fcover_table(99)),
        ])
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row count mismatch"), "{msg}");
        assert!(msg.contains("FCOVER"), "{msg}");
    }

    #[test]
    fn date_merge_renames_and_keeps_first_geometry() {
        let june = AcqDate::new("2021-06-01").unwrap();
        let july = AcqDate::new("2021-07-16").unwrap();
        let merged = merge_dates(&[
            (june, fcover_table(10)),
            (july, fcover_table(10)),
        ])
        .unwrap();

        let names: Vec<&str> = merged.get_column_names().iter().map(|s| s.as_str()).collect();
        assert!(names.contains(&"FCOVER_2021-06-01"));
        assert!(names.contains(&"FCOVER_2021-07-16"));
        assert!(names.contains(&"latitude"));
        assert!(!names.contains(&"FCOVER"));
        assert_eq!(merged.width(), 4);
    }

    #[test]
    fn date_merge_requires_geometry() {
        let june = AcqDate::new("2021-06-01").unwrap();
        let err = merge_dates(&[(june, df!("FCOVER" => [0.5]).unwrap())]).unwrap_err();
        assert!(err.to_string().contains("missing geometry column"));
    }

    #[test]
    fn location_merge_fills_missing_bands_with_null() {
        let a = df!(
            "latitude" => [14.0],
            "longitude" => [32.0],
            "B02_2021-06-01" => [0.1],
            "Labels" => [1i32],
        )
        .unwrap();
        let b = df!(
            "latitude" => [14.5],
            "longitude" => [32.5],
            "FCOVER_2021-06-01" => [0.7],
            "Labels" => [2i32],
        )
        .unwrap();

        let corpus = merge_locations(&[("gaziera", a), ("gaziera_other_1", b)]).unwrap();
        assert_eq!(corpus.height(), 2);

        let locations: Vec<&str> = corpus.column("location").unwrap()
            .str().unwrap().into_no_null_iter().collect();
        assert_eq!(locations, ["gaziera", "gaziera_other_1"]);

        let b02 = corpus.column("B02_2021-06-01").unwrap();
        assert_eq!(b02.null_count(), 1);
        let fcover = corpus.column("FCOVER_2021-06-01").unwrap();
        assert_eq!(fcover.null_count(), 1);
    }
}
