// src/table/mod.rs

pub mod convert;
pub mod utils;

use anyhow::{bail, Context, Result};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// One delimited file read into memory as strings, before any typing.
#[derive(Debug)]
pub struct RawTable {
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Every data row, one Vec of fields per row. Rows may disagree with the
    /// header on field count; `convert` pads or truncates.
    pub rows: Vec<Vec<String>>,
}

/// A fully typed read of the sample file at one instant. Nothing from a
/// snapshot survives into the next cycle.
#[derive(Debug, Clone)]
pub struct SampleSnapshot {
    pub path: PathBuf,
    pub batch: RecordBatch,
    pub loaded_at: DateTime<Utc>,
}

/// Read the delimited file at `path` into headers + string rows.
///
/// The first row is the header. A file without one (empty, or a blank first
/// line) is an error; so is anything the csv reader cannot decode.
#[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_raw(path: impl AsRef<Path>, delimiter: u8) -> Result<RawTable> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening data file {}", path.display()))?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true) // keep rows with odd field counts; convert pads them
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", path.display()))?
        .iter()
        .map(|h| utils::clean_str(h).to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        bail!("{} has no header row", path.display());
    }

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            warn!(column = %header, "duplicate column name; the first occurrence wins");
        }
    }

    let mut rows = Vec::new();
    let mut ragged = 0usize;
    for (idx, record) in rdr.records().enumerate() {
        let record = record
            .with_context(|| format!("parse error in {} at row {}", path.display(), idx + 1))?;
        if record.len() != headers.len() {
            ragged += 1;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    if ragged > 0 {
        debug!(ragged, "rows with unexpected field counts");
    }

    Ok(RawTable { headers, rows })
}

/// Load and type the sample file in one go.
pub fn load_snapshot(path: impl AsRef<Path>, delimiter: u8) -> Result<SampleSnapshot> {
    let path = path.as_ref();
    let raw = load_raw(path, delimiter)?;
    let batch = convert::to_record_batch(&raw)
        .with_context(|| format!("typing columns of {}", path.display()))?;
    debug!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded snapshot"
    );
    Ok(SampleSnapshot {
        path: path.to_path_buf(),
        batch,
        loaded_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Float64Array, StringArray};
    use arrow::datatypes::DataType;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,tempwatch::table=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write sample");
        file.flush().expect("flush sample");
        file
    }

    #[test]
    fn loads_a_station_file() -> Result<()> {
        init_test_logging();
        let file = write_file("time,st1,st2\n06:00,18.5,17.9\n06:10,21.0,18.2\n06:20,19.6,18.0\n");

        let raw = load_raw(file.path(), b',')?;
        assert_eq!(raw.headers, vec!["time", "st1", "st2"]);
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.rows[1], vec!["06:10", "21.0", "18.2"]);
        Ok(())
    }

    #[test]
    fn snapshot_types_numeric_and_text_columns() -> Result<()> {
        init_test_logging();
        let file = write_file("time,st1\n06:00,18.5\n06:10,21.0\n");

        let snapshot = load_snapshot(file.path(), b',')?;
        let schema = snapshot.batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);

        let st1 = snapshot
            .batch
            .column_by_name("st1")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>().cloned())
            .expect("st1 should be a float column");
        assert_eq!(st1.value(0), 18.5);
        assert_eq!(st1.value(1), 21.0);

        let time = snapshot
            .batch
            .column_by_name("time")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>().cloned())
            .expect("time should be a text column");
        assert_eq!(time.value(0), "06:00");
        Ok(())
    }

    #[test]
    fn empty_and_nan_cells_become_nulls() -> Result<()> {
        let file = write_file("time,st1\n06:00,20.0\n06:10,\n06:20,NaN\n06:30,22.0\n");

        let snapshot = load_snapshot(file.path(), b',')?;
        let st1 = snapshot.batch.column_by_name("st1").expect("st1 column");
        assert_eq!(snapshot.batch.num_rows(), 4);
        assert_eq!(st1.null_count(), 2);
        Ok(())
    }

    #[test]
    fn nan_cells_are_missing_in_text_columns_too() -> Result<()> {
        let file = write_file("note,st1\nwarm,18.0\nNaN,20.0\n,22.0\n");

        let snapshot = load_snapshot(file.path(), b',')?;
        let note = snapshot.batch.column_by_name("note").expect("note column");
        assert_eq!(note.data_type(), &DataType::Utf8);
        assert_eq!(note.null_count(), 2);

        let st1 = snapshot.batch.column_by_name("st1").expect("st1 column");
        assert_eq!(st1.null_count(), 0);
        Ok(())
    }

    #[test]
    fn ragged_rows_are_padded_with_nulls() -> Result<()> {
        let file = write_file("st1,st2\n18.0,17.5\n19.0\n20.0,18.5,99.9\n");

        let snapshot = load_snapshot(file.path(), b',')?;
        assert_eq!(snapshot.batch.num_rows(), 3);
        assert_eq!(snapshot.batch.num_columns(), 2);

        let st2 = snapshot
            .batch
            .column_by_name("st2")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>().cloned())
            .expect("st2 column");
        assert!(st2.is_null(1));
        assert_eq!(st2.value(2), 18.5);
        Ok(())
    }

    #[test]
    fn quoted_and_padded_numbers_still_parse() -> Result<()> {
        let file = write_file("st1\n\"18.5\"\n 21.5 \n");

        let snapshot = load_snapshot(file.path(), b',')?;
        let schema = snapshot.batch.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Float64);
        assert_eq!(
            snapshot
                .batch
                .column_by_name("st1")
                .and_then(|c| c.as_any().downcast_ref::<Float64Array>().cloned())
                .expect("st1 column")
                .value(1),
            21.5
        );
        Ok(())
    }

    #[test]
    fn header_only_file_is_a_zero_row_snapshot() -> Result<()> {
        let file = write_file("time,st1,st2\n");

        let snapshot = load_snapshot(file.path(), b',')?;
        assert_eq!(snapshot.batch.num_rows(), 0);
        // with no values to contradict it, every column counts as numeric
        let schema = snapshot.batch.schema();
        for field in schema.fields() {
            assert_eq!(field.data_type(), &DataType::Float64);
        }
        Ok(())
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = write_file("");
        let err = load_raw(file.path(), b',').unwrap_err();
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_raw("files/nowhere.txt", b',').unwrap_err();
        assert!(err.to_string().contains("opening data file"));
    }

    #[test]
    fn semicolon_delimited_files_load() -> Result<()> {
        let file = write_file("st1;st2\n18.0;17.5\n19.0;18.5\n");

        let snapshot = load_snapshot(file.path(), b';')?;
        assert_eq!(snapshot.batch.num_columns(), 2);
        assert_eq!(snapshot.batch.num_rows(), 2);
        Ok(())
    }
}
