//! Dataset loading
//!
//! Reads a CSV file with polars and converts each row into a [`Record`]
//! following a [`Schema`]. Numeric columns are cast to `Float64` (integer
//! months included); categorical columns are cast to strings.

use crate::error::{DataError, Result};
use crate::record::{AttributeValue, Record};
use crate::schema::{AttributeKind, Schema};
use log::{debug, info};
use polars::prelude::*;
use std::path::Path;

/// Read a CSV file with a header row into a DataFrame.
///
/// # Errors
/// `DatasetNotFound` when the file does not exist.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(DataError::DatasetNotFound(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    info!(
        "Loaded {} rows and {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

/// Load training records: every attribute column plus the target.
pub fn load_training_csv(path: &Path, schema: &Schema) -> Result<Vec<Record>> {
    let df = read_frame(path)?;
    records_from_frame(&df, schema, true)
}

/// Load inference records: every attribute column, target ignored.
pub fn load_inference_csv(path: &Path, schema: &Schema) -> Result<Vec<Record>> {
    let df = read_frame(path)?;
    records_from_frame(&df, schema, false)
}

/// Convert DataFrame rows into records.
///
/// The target column is checked first, then all attribute columns; every
/// absent attribute column is reported at once.
pub fn records_from_frame(
    df: &DataFrame,
    schema: &Schema,
    include_target: bool,
) -> Result<Vec<Record>> {
    if include_target && df.column(schema.target()).is_err() {
        return Err(DataError::MissingColumns {
            columns: vec![schema.target().to_string()],
        });
    }

    let missing: Vec<String> = schema
        .attributes()
        .iter()
        .filter(|a| df.column(&a.name).is_err())
        .map(|a| a.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns { columns: missing });
    }

    let mut records = vec![Record::new(); df.height()];

    for attr in schema.attributes() {
        match attr.kind {
            AttributeKind::Numeric => fill_numeric(df, &attr.name, &mut records)?,
            AttributeKind::Categorical => fill_categorical(df, &attr.name, &mut records)?,
        }
    }

    if include_target {
        fill_numeric(df, schema.target(), &mut records)?;
    }

    debug!("Converted {} rows into records", records.len());

    Ok(records)
}

fn fill_numeric(df: &DataFrame, name: &str, records: &mut [Record]) -> Result<()> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    for (row, value) in series.f64()?.into_iter().enumerate() {
        let value = value.ok_or_else(|| DataError::NullValue {
            column: name.to_string(),
            row,
        })?;
        records[row].insert(name, AttributeValue::Numeric(value));
    }

    Ok(())
}

fn fill_categorical(df: &DataFrame, name: &str, records: &mut [Record]) -> Result<()> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    for (row, value) in series.str()?.into_iter().enumerate() {
        let value = value.ok_or_else(|| DataError::NullValue {
            column: name.to_string(),
            row,
        })?;
        records[row].insert(name, AttributeValue::Category(value.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeSpec, PRICE};

    fn small_schema() -> Schema {
        Schema::new(
            vec![
                AttributeSpec::categorical("Roast_Level"),
                AttributeSpec::numeric("Month"),
            ],
            PRICE,
        )
    }

    fn small_frame() -> DataFrame {
        df!(
            "Roast_Level" => ["Light", "Dark"],
            "Month" => [3i64, 11],
            "price" => [310.0, 455.5],
        )
        .unwrap()
    }

    #[test]
    fn test_records_from_frame() {
        let records = records_from_frame(&small_frame(), &small_schema(), true).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category("Roast_Level").unwrap(), "Light");
        assert_eq!(records[1].numeric("Month").unwrap(), 11.0);
        assert_eq!(records[1].numeric(PRICE).unwrap(), 455.5);
    }

    #[test]
    fn test_inference_rows_skip_target() {
        let records = records_from_frame(&small_frame(), &small_schema(), false).unwrap();
        assert!(!records[0].contains(PRICE));
    }

    #[test]
    fn test_missing_target_column() {
        let df = small_frame().drop("price").unwrap();
        let err = records_from_frame(&df, &small_schema(), true).unwrap_err();

        assert!(err.is_schema_error());
        assert!(matches!(err, DataError::MissingColumns { columns } if columns == vec!["price"]));
    }

    #[test]
    fn test_missing_feature_columns_reported_together() {
        let df = df!("price" => [1.0, 2.0]).unwrap();
        let err = records_from_frame(&df, &small_schema(), true).unwrap_err();

        assert!(matches!(
            err,
            DataError::MissingColumns { columns } if columns == vec!["Roast_Level", "Month"]
        ));
    }
}
