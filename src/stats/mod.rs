// src/stats/mod.rs

use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, Float64Array},
    compute,
    datatypes::DataType,
    record_batch::RecordBatch,
};

/// Arithmetic mean of the non-null values in `column`.
///
/// A column that is absent and a column that is present but non-numeric are
/// distinct errors, both naming the column. A numeric column with no values
/// at all has mean NaN.
pub fn mean_of(batch: &RecordBatch, column: &str) -> Result<f64> {
    let col = batch
        .column_by_name(column)
        .ok_or_else(|| anyhow!("column `{}` is not in the file", column))?;

    let values = col
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| {
            anyhow!(
                "column `{}` holds {} data, not numbers",
                column,
                col.data_type()
            )
        })?;

    Ok(mean_of_array(values))
}

fn mean_of_array(values: &Float64Array) -> f64 {
    let present = values.len() - values.null_count();
    if present == 0 {
        return f64::NAN;
    }
    match compute::sum(values) {
        Some(total) => total / present as f64,
        None => f64::NAN,
    }
}

/// Shape of one column as the watcher sees it.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    /// Cells carrying a value.
    pub values: usize,
    /// Null cells: empty or literal NaN in the file.
    pub missing: usize,
    /// Aggregates, for numeric columns only.
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-column counts and aggregates over a whole snapshot.
pub fn summarize(batch: &RecordBatch) -> Vec<ColumnSummary> {
    let schema = batch.schema();
    schema
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let col = batch.column(idx);
            let missing = col.null_count();
            let values = col.len() - missing;
            let (mean, min, max) = match col.as_any().downcast_ref::<Float64Array>() {
                Some(arr) => (Some(mean_of_array(arr)), compute::min(arr), compute::max(arr)),
                None => (None, None, None),
            };
            ColumnSummary {
                name: field.name().clone(),
                data_type: field.data_type().clone(),
                values,
                missing,
                mean,
                min,
                max,
            }
        })
        .collect()
}
