//! Series-constraint checks.
//!
//! With allowed series keys attached to the structure, every row's dimension
//! sub-tuple must match at least one key. A key omits the components it does
//! not constrain; those act as wildcards.

use polars::prelude::{AnyValue, Column, DataFrame};

use sdmx_common::any_to_string;
use sdmx_model::{CheckCode, ComponentKind, ErrorLevel, Finding, SeriesKey};

use crate::profile::row_records;

pub(crate) fn check_series_constraints(df: &DataFrame, keys: &[SeriesKey]) -> Vec<Finding> {
    if keys.is_empty() {
        return Vec::new();
    }

    // Every constrained component must be a table column, otherwise the
    // constraint cannot be evaluated against this table.
    let mut components: Vec<&str> = keys
        .iter()
        .flat_map(|key| key.keys().map(String::as_str))
        .collect();
    components.sort_unstable();
    components.dedup();

    let mut columns: Vec<(&str, &Column)> = Vec::with_capacity(components.len());
    for component in components {
        match df.column(component) {
            Ok(column) => columns.push((component, column)),
            Err(_) => return Vec::new(),
        }
    }

    let mut disallowed = Vec::new();
    for idx in 0..df.height() {
        let matched = keys.iter().any(|key| {
            key.iter().all(|(component, allowed)| {
                columns
                    .iter()
                    .find(|(name, _)| *name == component.as_str())
                    .map(|(_, column)| {
                        any_to_string(column.get(idx).unwrap_or(AnyValue::Null)) == *allowed
                    })
                    .unwrap_or(false)
            })
        });
        if !matched {
            disallowed.push(idx);
        }
    }

    if disallowed.is_empty() {
        return Vec::new();
    }
    vec![Finding {
        code: CheckCode::SeriesConstraint,
        error_level: ErrorLevel::Warning,
        component: "Series".to_string(),
        component_kind: ComponentKind::Constraint,
        rows: Some(row_records(df, &disallowed)),
        message: "Found disallowed rows".to_string(),
    }]
}
