//! Structural validation of a dataset table against its data structure
//! definition.
//!
//! The engine is a pure function over `(table, DSD)`. Data-quality problems
//! become findings; only configuration errors (a facet value the structure
//! itself got wrong) are returned as errors.
//!
//! ## Checks
//!
//! | Code | Description |
//! |------|-------------|
//! | SS01 | All dimensions of the DSD exist in the table |
//! | SS02 | The measure column exists and carries values |
//! | SS03 | All mandatory attributes exist in the table |
//! | SS04 | Codelist-bound values are members of their codelist |
//! | SS05 | Every record has a value for every dimension |
//! | SS06 | Every record has a value for every mandatory attribute |
//! | SS07 | No two datapoints share the same dimension key |
//! | SS08 | Values comply with the facets of their representation |
//! | SS09 | Values comply with their declared time-period format |
//! | SS10 | Cube-region-constrained values are allowed members |
//! | SS11 | Rows comply with the allowed series keys |
//!
//! Per-component checks are mutually independent and the engine holds no
//! shared state, so independent `(table, DSD)` pairs may be validated
//! concurrently.

mod constraints;
mod duplicates;
mod error;
mod facets;
mod profile;
mod timeperiod;

pub use error::{Result, ValidateError};
pub use profile::{ColumnKind, ColumnProfile};
pub use timeperiod::is_valid_time_period;

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use sdmx_common::any_to_string;
use sdmx_data::Dataset;
use sdmx_model::{
    CheckCode, ComponentKind, DataStructureDefinition, ErrorLevel, Facet, Finding, critical_count,
};

use crate::constraints::check_series_constraints;
use crate::duplicates::check_duplicates;
use crate::facets::check_facets;
use crate::profile::{missing_row_indices, profile_column, row_records};
use crate::timeperiod::check_time_format;

/// Attribute column whose `M` flag marks an intentionally missing
/// observation value.
const OBS_STATUS: &str = "OBS_STATUS";
const OBS_STATUS_MISSING: &str = "M";

/// Validates a table against a data structure definition.
///
/// Findings accumulate across all checks; none is discarded once produced.
/// Row payloads preserve the input row order.
pub fn validate(data: &DataFrame, dsd: &DataStructureDefinition) -> Result<Vec<Finding>> {
    debug!(
        structure = %dsd.unique_id(),
        rows = data.height(),
        "validating dataset"
    );

    // Resolve the derived indices once; the checks below only do flat
    // lookups from here on.
    let faceted = dsd.faceted_components();
    let codelists = dsd.codelist_components();
    let types = dsd.component_types();
    let cubes = dsd.cube_region_values();
    let series_keys = dsd.allowed_series_keys();
    let dimension_codes = dsd.dimension_codes();
    let dataset_codes: BTreeSet<String> = dsd.dataset_attribute_codes().into_iter().collect();
    let mandatory_attributes = dsd.mandatory_attribute_codes();

    let mut findings = Vec::new();

    check_measure(data, dsd, &faceted, &mut findings)?;

    let mut codes: Vec<String> = dimension_codes
        .iter()
        .cloned()
        .chain(dsd.attribute_codes())
        .collect();
    codes.retain(|code| !dataset_codes.contains(code));

    let mut grouping_keys: Vec<String> = Vec::new();

    for code in &codes {
        let is_dimension = dimension_codes.contains(code);
        let is_mandatory = is_dimension || mandatory_attributes.contains(code);
        let kind = if is_dimension {
            ComponentKind::Dimension
        } else {
            ComponentKind::Attribute
        };

        let profile = match profile_column(data, code) {
            Some(profile) if !profile.is_wholly_missing() => profile,
            _ => {
                if !is_dimension && mandatory_attributes.contains(code) {
                    findings.push(absent_component(
                        CheckCode::MissingMandatoryAttribute,
                        code,
                        ComponentKind::Attribute,
                    ));
                } else if is_dimension {
                    findings.push(absent_component(
                        CheckCode::MissingDimension,
                        code,
                        ComponentKind::Dimension,
                    ));
                }
                continue;
            }
        };

        if is_dimension {
            grouping_keys.push(code.clone());
        }

        if is_mandatory && profile.has_missing {
            let missing_code = if is_dimension {
                CheckCode::MissingDimensionValue
            } else {
                CheckCode::MissingAttributeValue
            };
            let indices = missing_row_indices(data, code);
            findings.push(Finding {
                code: missing_code,
                error_level: ErrorLevel::Critical,
                component: code.clone(),
                component_kind: kind,
                rows: Some(row_records(data, &indices)),
                message: format!(
                    "Missing value in {} {}",
                    kind.as_str().to_lowercase(),
                    code
                ),
            });
        }

        if let Some(value_type) = types.get(code) {
            findings.extend(check_time_format(&profile, *value_type, code, kind));
        }

        if let Some(facets) = faceted.get(code) {
            findings.extend(check_facets(facets, &profile, code, kind)?);
        }

        // A cube-region constraint supersedes the codelist for membership.
        if let Some(allowed) = cubes.get(code) {
            membership_findings(
                &profile,
                allowed,
                code,
                kind,
                CheckCode::CubeRegionConstraint,
                &mut findings,
            );
        } else if let Some(members) = codelists.get(code) {
            membership_findings(
                &profile,
                members,
                code,
                kind,
                CheckCode::CodelistMembership,
                &mut findings,
            );
        }
    }

    findings.extend(check_series_constraints(data, &series_keys));
    findings.extend(check_duplicates(data, &grouping_keys));

    debug!(
        findings = findings.len(),
        critical = critical_count(&findings),
        "validation finished"
    );
    Ok(findings)
}

/// True when any finding in the list is CRITICAL.
pub fn has_critical(findings: &[Finding]) -> bool {
    critical_count(findings) > 0
}

/// Validates a bound dataset's retained table against its governing
/// structure. Dataset-level attributes live in the attached map, not the
/// table, so they are never reported as missing columns here.
pub fn validate_dataset(dataset: &Dataset) -> Result<Vec<Finding>> {
    validate(dataset.data(), dataset.structure())
}

/// SS02: the measure column must exist and carry values. Rows whose
/// `OBS_STATUS` marks the observation as missing are exempt. The measure's
/// facets are checked regardless of missing values.
fn check_measure(
    data: &DataFrame,
    dsd: &DataStructureDefinition,
    faceted: &BTreeMap<String, Vec<Facet>>,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    let measure = dsd.measure_code();

    match profile_column(data, measure) {
        None => findings.push(absent_component(
            CheckCode::MissingMeasure,
            measure,
            ComponentKind::Measure,
        )),
        Some(profile) => {
            if profile.is_wholly_missing() {
                findings.push(absent_component(
                    CheckCode::MissingMeasure,
                    measure,
                    ComponentKind::Measure,
                ));
            } else if profile.has_missing {
                let indices = reportable_missing_measure_rows(data, measure);
                if !indices.is_empty() {
                    findings.push(Finding {
                        code: CheckCode::MissingMeasure,
                        error_level: ErrorLevel::Critical,
                        component: measure.to_string(),
                        component_kind: ComponentKind::Measure,
                        rows: Some(row_records(data, &indices)),
                        message: format!("Missing value in measure {}", measure),
                    });
                }
            }
            if let Some(facets) = faceted.get(measure) {
                findings.extend(check_facets(
                    facets,
                    &profile,
                    measure,
                    ComponentKind::Measure,
                )?);
            }
        }
    }
    Ok(())
}

/// Rows with a missing measure value, minus those whose observation status
/// declares the value as legitimately missing.
fn reportable_missing_measure_rows(data: &DataFrame, measure: &str) -> Vec<usize> {
    let missing = missing_row_indices(data, measure);
    let Ok(status) = data.column(OBS_STATUS) else {
        return missing;
    };
    missing
        .into_iter()
        .filter(|&idx| {
            let value = any_to_string(status.get(idx).unwrap_or(AnyValue::Null));
            value.trim() != OBS_STATUS_MISSING
        })
        .collect()
}

fn absent_component(code: CheckCode, component: &str, kind: ComponentKind) -> Finding {
    Finding {
        code,
        error_level: ErrorLevel::Critical,
        component: component.to_string(),
        component_kind: kind,
        rows: None,
        message: format!("Missing {}", component),
    }
}

/// One CRITICAL finding per distinct value absent from the allowed set.
fn membership_findings(
    profile: &ColumnProfile,
    allowed: &BTreeSet<String>,
    component: &str,
    kind: ComponentKind,
    code: CheckCode,
    findings: &mut Vec<Finding>,
) {
    for value in &profile.distinct {
        if !allowed.contains(value) {
            findings.push(Finding {
                code,
                error_level: ErrorLevel::Critical,
                component: component.to_string(),
                component_kind: kind,
                rows: None,
                message: format!(
                    "Wrong value {} for {} {}",
                    value,
                    kind.as_str().to_lowercase(),
                    component
                ),
            });
        }
    }
}
