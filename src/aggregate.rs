//! Metric aggregator.
//!
//! Pure, side-effect-free summary statistics over a loaded [`Dataset`].
//! Nothing here is memoized; the dataset is small enough that recomputing
//! per request is cheap. Aggregates that are undefined over zero rows fail
//! with `DashError::EmptyDataset` instead of silently producing NaN.

use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One bar of the releases-per-year histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i64,
    pub games: u64,
}

/// The four headline metrics bundled for uniform rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_games: usize,
    pub average_price: f64,
    pub top_genre: String,
    pub top_developer: String,
}

pub fn total_games(dataset: &Dataset) -> usize {
    dataset.height()
}

/// Arithmetic mean of the price column. The column is cast to Float64 first
/// so an all-integer CSV column still averages as a decimal.
pub fn average_price(dataset: &Dataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(DashError::EmptyDataset(
            "cannot average price over zero rows".to_string(),
        ));
    }

    let prices = dataset.frame().column("price")?.cast(&DataType::Float64)?;
    prices
        .f64()?
        .mean()
        .ok_or_else(|| DashError::EmptyDataset("price column has no values".to_string()))
}

/// Most frequent value in the genres column.
pub fn top_genre(dataset: &Dataset) -> Result<String> {
    modal_value(dataset, "genres")
}

/// Most frequent value in the developer column.
pub fn top_developer(dataset: &Dataset) -> Result<String> {
    modal_value(dataset, "developer")
}

/// Modal value of a string column. Nulls are skipped; ties resolve to the
/// value encountered first in dataset row order, which keeps the result
/// deterministic across runs.
fn modal_value(dataset: &Dataset, column: &str) -> Result<String> {
    let series = dataset.frame().column(column)?;
    let values = series.str().map_err(|e| {
        DashError::Polars(format!("column {} is not a string column: {}", column, e))
    })?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for idx in 0..values.len() {
        if let Some(value) = values.get(idx) {
            let entry = counts.entry(value).or_insert(0);
            if *entry == 0 {
                first_seen.push(value);
            }
            *entry += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for value in first_seen {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value.to_string())
        .ok_or_else(|| DashError::EmptyDataset(format!("no {} values to rank", column)))
}

/// Release counts grouped by year, ascending. Rows with a null year are
/// omitted.
pub fn games_per_year(dataset: &Dataset) -> Result<Vec<YearCount>> {
    let years = dataset
        .frame()
        .column("release_year")?
        .cast(&DataType::Int64)?;
    let years = years.i64()?;

    let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();
    for idx in 0..years.len() {
        if let Some(year) = years.get(idx) {
            *buckets.entry(year).or_insert(0) += 1;
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(year, games)| YearCount { year, games })
        .collect())
}

pub fn summary(dataset: &Dataset) -> Result<DatasetSummary> {
    Ok(DatasetSummary {
        total_games: total_games(dataset),
        average_price: average_price(dataset)?,
        top_genre: top_genre(dataset)?,
        top_developer: top_developer(dataset)?,
    })
}
