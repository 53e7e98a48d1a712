//! Dataset accessor.
//!
//! Loads the Steam games CSV once at process start and exposes it read-only
//! to the aggregator and the surfaces. A load either fully succeeds or fails
//! with `DashError::DataLoad`; no partial state is ever observable. The
//! loaded frame is passed explicitly to call sites (no process-global cache),
//! so repeated `load()` calls on the same file yield value-equal datasets.

use crate::error::{DashError, Result};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Columns every games CSV must carry. Extra columns are kept and shown in
/// previews but play no role in the aggregates.
pub const REQUIRED_COLUMNS: &[&str] = &["price", "genres", "developer", "release_year"];

#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Read a games CSV from disk and validate its schema.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DashError::DataLoad(format!(
                "dataset file not found: {}",
                path.display()
            )));
        }

        let df = LazyCsvReader::new(path)
            .with_try_parse_dates(true)
            .with_infer_schema_length(Some(1000))
            .finish()
            .map_err(|e| DashError::DataLoad(format!("failed to read CSV: {}", e)))?
            .collect()
            .map_err(|e| DashError::DataLoad(format!("failed to parse CSV: {}", e)))?;

        debug!("Loaded {} rows from {}", df.height(), path.display());
        Self::from_frame(df)
    }

    /// Wrap an already-built frame, applying the same schema validation as
    /// `load`.
    pub fn from_frame(df: DataFrame) -> Result<Self> {
        let have: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !have.iter().any(|c| c == required))
            .collect();

        if !missing.is_empty() {
            return Err(DashError::DataLoad(format!(
                "dataset is missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn columns(&self) -> Vec<String> {
        self.df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    /// First `limit` rows as JSON objects, one map per row. Used by the
    /// dataset preview endpoint; the caller pairs this with `columns()` for
    /// a stable column order.
    pub fn rows_json(&self, limit: usize) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let preview = self.df.head(Some(limit));
        let columns = self.columns();

        let mut rows = Vec::with_capacity(preview.height());
        for row_idx in 0..preview.height() {
            let mut row = HashMap::new();
            for name in &columns {
                let series = preview.column(name)?;
                row.insert(name.clone(), series_value_to_json(series, row_idx)?);
            }
            rows.push(row);
        }

        Ok(rows)
    }

    /// First `limit` rows rendered as a plain-text table, one line per row.
    /// This is the bounded DATA SAMPLE block handed to the AI bridge; the
    /// bound is deliberate, the full dataset is never sent.
    pub fn sample_text(&self, limit: usize) -> Result<String> {
        let columns = self.columns();
        let rows = self.rows_json(limit)?;

        let mut out = columns.join(" | ");
        for row in &rows {
            let cells: Vec<String> = columns
                .iter()
                .map(|name| row.get(name).map(json_cell).unwrap_or_default())
                .collect();
            out.push('\n');
            out.push_str(&cells.join(" | "));
        }

        Ok(out)
    }
}

fn json_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Convert one cell of a Polars series to a JSON value.
fn series_value_to_json(series: &Series, row_idx: usize) -> Result<serde_json::Value> {
    let any_val = series
        .get(row_idx)
        .map_err(|e| DashError::Polars(format!("failed to read row {}: {}", row_idx, e)))?;

    if matches!(any_val, AnyValue::Null) {
        return Ok(serde_json::Value::Null);
    }

    match series.dtype() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            match any_val.try_extract::<i64>() {
                Ok(v) => Ok(serde_json::Value::Number(serde_json::Number::from(v))),
                Err(_) => Ok(serde_json::Value::Null),
            }
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            match any_val.try_extract::<u64>() {
                Ok(v) => Ok(serde_json::Value::Number(serde_json::Number::from(v))),
                Err(_) => Ok(serde_json::Value::Null),
            }
        }
        DataType::Float32 | DataType::Float64 => match any_val.try_extract::<f64>() {
            Ok(v) => Ok(serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null)),
            Err(_) => Ok(serde_json::Value::Null),
        },
        DataType::String => Ok(any_val
            .get_str()
            .map(|s| serde_json::Value::String(s.to_string()))
            .unwrap_or(serde_json::Value::Null)),
        DataType::Boolean => match any_val {
            AnyValue::Boolean(b) => Ok(serde_json::Value::Bool(b)),
            _ => Ok(serde_json::Value::Null),
        },
        // Dates and anything else exotic render as their display form.
        _ => Ok(serde_json::Value::String(format!("{}", any_val))),
    }
}
