//! Column profiling.
//!
//! The column kind is declared by the polars dtype, never re-inferred per
//! check. Distinct values are collected once per column, in first-occurrence
//! order, so every downstream check sees the same view and findings come out
//! deterministically.

use std::collections::{BTreeMap, HashSet};

use polars::prelude::{AnyValue, Column, DataFrame};

use sdmx_common::{any_to_f64, any_to_string, is_missing_value, is_numeric_dtype};
use sdmx_model::RowRecord;

/// Declared kind of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Distinct non-missing values of one column plus its declared kind.
#[derive(Debug, Clone)]
pub struct ColumnProfile {
    pub kind: ColumnKind,
    /// Formatted distinct values in first-occurrence order; numeric cells are
    /// stringified with trailing zeros trimmed.
    pub distinct: Vec<String>,
    /// Numeric values parallel to `distinct` when the kind is `Numeric`.
    pub numeric: Vec<f64>,
    /// True when at least one cell is null or blank.
    pub has_missing: bool,
}

impl ColumnProfile {
    pub fn from_column(column: &Column, height: usize) -> Self {
        let kind = if is_numeric_dtype(column.dtype()) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };

        let mut seen = HashSet::new();
        let mut distinct = Vec::new();
        let mut numeric = Vec::new();
        let mut has_missing = false;

        for idx in 0..height {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            if is_missing_value(&value) {
                has_missing = true;
                continue;
            }
            let text = any_to_string(value.clone());
            if seen.insert(text.clone()) {
                if kind == ColumnKind::Numeric
                    && let Some(number) = any_to_f64(&value)
                {
                    numeric.push(number);
                }
                distinct.push(text);
            }
        }

        Self {
            kind,
            distinct,
            numeric,
            has_missing,
        }
    }

    /// True when the column holds no usable value at all.
    pub fn is_wholly_missing(&self) -> bool {
        self.distinct.is_empty()
    }
}

/// Profiles a column by name; `None` when the column is absent.
pub(crate) fn profile_column(df: &DataFrame, name: &str) -> Option<ColumnProfile> {
    df.column(name)
        .ok()
        .map(|column| ColumnProfile::from_column(column, df.height()))
}

/// Indices of rows whose cell in `name` is missing, in input row order.
pub(crate) fn missing_row_indices(df: &DataFrame, name: &str) -> Vec<usize> {
    let Ok(column) = df.column(name) else {
        return Vec::new();
    };
    (0..df.height())
        .filter(|&idx| is_missing_value(&column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Snapshots the given rows with every column of the table, preserving the
/// order of `indices`.
pub(crate) fn row_records(df: &DataFrame, indices: &[usize]) -> Vec<RowRecord> {
    let columns = df.get_columns();
    indices
        .iter()
        .map(|&idx| {
            let cells: BTreeMap<String, Option<String>> = columns
                .iter()
                .map(|column| {
                    let value = column.get(idx).unwrap_or(AnyValue::Null);
                    let cell = if is_missing_value(&value) {
                        None
                    } else {
                        Some(any_to_string(value))
                    };
                    (column.name().to_string(), cell)
                })
                .collect();
            RowRecord { index: idx, cells }
        })
        .collect()
}
