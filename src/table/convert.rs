// src/table/convert.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Builder, StringBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

use super::utils::{clean_str, is_missing_cell, is_numeric_cell, parse_numeric};
use super::RawTable;

/// Convert raw string columns into typed Arrow columns.
///
/// A column becomes Float64 when every non-empty cell parses as a float
/// (vacuously true for a column with no values at all); anything else stays
/// Utf8. Empty cells and literal NaN are nulls either way. Rows shorter than
/// the header are padded with nulls; fields beyond the header are dropped.
pub fn to_record_batch(raw: &RawTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(raw.headers.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(raw.headers.len());

    for (idx, name) in raw.headers.iter().enumerate() {
        let numeric = raw
            .rows
            .iter()
            .all(|row| row.get(idx).map_or(true, |cell| is_numeric_cell(cell)));

        if numeric {
            let mut builder = Float64Builder::with_capacity(raw.rows.len());
            for row in &raw.rows {
                builder.append_option(row.get(idx).and_then(|cell| parse_numeric(cell)));
            }
            fields.push(Field::new(name, DataType::Float64, true));
            columns.push(Arc::new(builder.finish()) as ArrayRef);
        } else {
            let mut builder = StringBuilder::new();
            for row in &raw.rows {
                match row.get(idx) {
                    Some(cell) if !is_missing_cell(cell) => builder.append_value(clean_str(cell)),
                    _ => builder.append_null(),
                }
            }
            fields.push(Field::new(name, DataType::Utf8, true));
            columns.push(Arc::new(builder.finish()) as ArrayRef);
        }
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, columns).context("assembling record batch from sample rows")
}
