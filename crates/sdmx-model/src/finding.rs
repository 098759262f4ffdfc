//! Validation findings.
//!
//! Check codes, severities and component kinds are enums internally; they
//! serialize to the loosely-typed wire shape (`"SS04"`, `"CRITICAL"`,
//! `"Dimension"`) that downstream JSON/CLI reporters consume unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The check a finding originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckCode {
    /// SS01 — a dimension column is absent from the table.
    #[serde(rename = "SS01")]
    MissingDimension,
    /// SS02 — the measure column is absent or has missing values.
    #[serde(rename = "SS02")]
    MissingMeasure,
    /// SS03 — a mandatory attribute column is absent from the table.
    #[serde(rename = "SS03")]
    MissingMandatoryAttribute,
    /// SS04 — a value is not a member of the bound codelist.
    #[serde(rename = "SS04")]
    CodelistMembership,
    /// SS05 — a dimension has missing values on some rows.
    #[serde(rename = "SS05")]
    MissingDimensionValue,
    /// SS06 — a mandatory attribute has missing values on some rows.
    #[serde(rename = "SS06")]
    MissingAttributeValue,
    /// SS07 — two or more datapoints share the same dimension key.
    #[serde(rename = "SS07")]
    DuplicateDatapoint,
    /// SS08 — a value violates a facet of its representation.
    #[serde(rename = "SS08")]
    FacetViolation,
    /// SS09 — a value does not match its declared time-period format.
    #[serde(rename = "SS09")]
    TimeFormat,
    /// SS10 — a value falls outside a cube-region constraint.
    #[serde(rename = "SS10")]
    CubeRegionConstraint,
    /// SS11 — a row's dimension key matches no allowed series key.
    #[serde(rename = "SS11")]
    SeriesConstraint,
    /// MS01 — no data structure definition was found in the metadata
    /// document. Emitted by the metadata-parsing collaborator, never by the
    /// validation engine.
    #[serde(rename = "MS01")]
    NoStructure,
}

impl CheckCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCode::MissingDimension => "SS01",
            CheckCode::MissingMeasure => "SS02",
            CheckCode::MissingMandatoryAttribute => "SS03",
            CheckCode::CodelistMembership => "SS04",
            CheckCode::MissingDimensionValue => "SS05",
            CheckCode::MissingAttributeValue => "SS06",
            CheckCode::DuplicateDatapoint => "SS07",
            CheckCode::FacetViolation => "SS08",
            CheckCode::TimeFormat => "SS09",
            CheckCode::CubeRegionConstraint => "SS10",
            CheckCode::SeriesConstraint => "SS11",
            CheckCode::NoStructure => "MS01",
        }
    }
}

impl fmt::Display for CheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorLevel {
    Critical,
    Warning,
}

impl ErrorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Critical => "CRITICAL",
            ErrorLevel::Warning => "WARNING",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of component a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Dimension,
    Attribute,
    Measure,
    Datapoint,
    Constraint,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Dimension => "Dimension",
            ComponentKind::Attribute => "Attribute",
            ComponentKind::Measure => "Measure",
            ComponentKind::Datapoint => "Datapoint",
            ComponentKind::Constraint => "Constraint",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A snapshot of one table row, in input order. Cell values are stringified;
/// missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRecord {
    pub index: usize,
    pub cells: BTreeMap<String, Option<String>>,
}

/// One structured validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Finding {
    pub code: CheckCode,
    pub error_level: ErrorLevel,
    pub component: String,
    #[serde(rename = "Type")]
    pub component_kind: ComponentKind,
    pub rows: Option<Vec<RowRecord>>,
    pub message: String,
}

impl Finding {
    pub fn is_critical(&self) -> bool {
        self.error_level == ErrorLevel::Critical
    }
}

/// Number of CRITICAL findings in a result list.
pub fn critical_count(findings: &[Finding]) -> usize {
    findings.iter().filter(|f| f.is_critical()).count()
}

/// Number of WARNING findings in a result list.
pub fn warning_count(findings: &[Finding]) -> usize {
    findings
        .iter()
        .filter(|f| f.error_level == ErrorLevel::Warning)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_to_wire_strings() {
        assert_eq!(
            serde_json::to_string(&CheckCode::CodelistMembership).unwrap(),
            "\"SS04\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorLevel::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }

    #[test]
    fn finding_wire_shape() {
        let finding = Finding {
            code: CheckCode::MissingMeasure,
            error_level: ErrorLevel::Critical,
            component: "OBS_VALUE".to_string(),
            component_kind: ComponentKind::Measure,
            rows: None,
            message: "Missing OBS_VALUE".to_string(),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["Code"], "SS02");
        assert_eq!(json["ErrorLevel"], "CRITICAL");
        assert_eq!(json["Type"], "Measure");
        assert!(json["Rows"].is_null());
    }

    #[test]
    fn counts() {
        let critical = Finding {
            code: CheckCode::MissingDimension,
            error_level: ErrorLevel::Critical,
            component: "FREQ".to_string(),
            component_kind: ComponentKind::Dimension,
            rows: None,
            message: "Missing FREQ".to_string(),
        };
        let warning = Finding {
            error_level: ErrorLevel::Warning,
            code: CheckCode::FacetViolation,
            component_kind: ComponentKind::Attribute,
            ..critical.clone()
        };
        let findings = vec![critical, warning];
        assert_eq!(critical_count(&findings), 1);
        assert_eq!(warning_count(&findings), 1);
    }
}
