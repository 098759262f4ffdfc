//! Duplicate-datapoint detection.
//!
//! Rows are grouped by their dimension key values; every key shared by more
//! than one row yields exactly one WARNING carrying all member rows. Cluster
//! order follows the first occurrence of each key in the table.

use std::collections::HashMap;

use polars::prelude::{AnyValue, Column, DataFrame};

use sdmx_common::any_to_string;
use sdmx_model::{CheckCode, ComponentKind, ErrorLevel, Finding};

use crate::profile::row_records;

pub(crate) fn check_duplicates(df: &DataFrame, grouping_keys: &[String]) -> Vec<Finding> {
    if grouping_keys.is_empty() {
        return Vec::new();
    }
    let columns: Vec<&Column> = grouping_keys
        .iter()
        .filter_map(|key| df.column(key).ok())
        .collect();
    if columns.len() != grouping_keys.len() {
        return Vec::new();
    }

    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
    let mut clusters: Vec<(Vec<String>, Vec<usize>)> = Vec::new();

    for idx in 0..df.height() {
        let key: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        match positions.get(&key) {
            Some(&pos) => clusters[pos].1.push(idx),
            None => {
                positions.insert(key.clone(), clusters.len());
                clusters.push((key, vec![idx]));
            }
        }
    }

    clusters
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(key, rows)| Finding {
            code: CheckCode::DuplicateDatapoint,
            error_level: ErrorLevel::Warning,
            component: "Duplicated".to_string(),
            component_kind: ComponentKind::Datapoint,
            rows: Some(row_records(df, &rows)),
            message: format!("Duplicated datapoint {}", format_key(grouping_keys, &key)),
        })
        .collect()
}

fn format_key(grouping_keys: &[String], values: &[String]) -> String {
    grouping_keys
        .iter()
        .zip(values)
        .map(|(key, value)| format!("( {} : {} )", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}
