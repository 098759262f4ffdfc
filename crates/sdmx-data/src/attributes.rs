//! Dataset-level attributes from the SDMX information model.
//!
//! The key set is fixed. Maps coming from message headers may carry anything;
//! unknown keys are dropped silently and absent keys take their defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The action a receiving system should apply to the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    Append,
    #[default]
    Replace,
    Delete,
    Information,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Append => "Append",
            Action::Replace => "Replace",
            Action::Delete => "Delete",
            Action::Information => "Information",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("append") {
            Ok(Action::Append)
        } else if trimmed.eq_ignore_ascii_case("replace") {
            Ok(Action::Replace)
        } else if trimmed.eq_ignore_ascii_case("delete") {
            Ok(Action::Delete)
        } else if trimmed.eq_ignore_ascii_case("information") {
            Ok(Action::Information)
        } else {
            Err(format!("Unknown action: {}", s))
        }
    }
}

/// The fixed dataset-level attribute set with its defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAttributes {
    pub reporting_begin: Option<String>,
    pub reporting_end: Option<String>,
    pub data_extraction_date: NaiveDate,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub publication_year: Option<String>,
    pub publication_period: Option<String>,
    pub action: Action,
    pub set_id: Option<String>,
    pub dimension_at_observation: String,
}

/// Observation key spanning every dimension.
pub const ALL_DIMENSIONS: &str = "AllDimensions";

const KNOWN_KEYS: [&str; 10] = [
    "reportingBegin",
    "reportingEnd",
    "dataExtractionDate",
    "validFrom",
    "validTo",
    "publicationYear",
    "publicationPeriod",
    "action",
    "setId",
    "dimensionAtObservation",
];

impl DatasetAttributes {
    /// Defaults for a dataset governed by the structure `set_id`.
    pub fn with_defaults(set_id: impl Into<String>) -> Self {
        Self {
            reporting_begin: None,
            reporting_end: None,
            data_extraction_date: Local::now().date_naive(),
            valid_from: None,
            valid_to: None,
            publication_year: None,
            publication_period: None,
            action: Action::Replace,
            set_id: Some(set_id.into()),
            dimension_at_observation: ALL_DIMENSIONS.to_string(),
        }
    }

    /// Builds attributes from a string map. Unknown keys are dropped
    /// silently; recognized keys override the defaults for `set_id`.
    pub fn from_map(values: &BTreeMap<String, String>, set_id: &str) -> Self {
        let mut attributes = Self::with_defaults(set_id);
        for (key, value) in values {
            match key.as_str() {
                "reportingBegin" => attributes.reporting_begin = Some(value.clone()),
                "reportingEnd" => attributes.reporting_end = Some(value.clone()),
                "dataExtractionDate" => {
                    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                        attributes.data_extraction_date = date;
                    } else {
                        debug!(%value, "unparseable dataExtractionDate, keeping default");
                    }
                }
                "validFrom" => attributes.valid_from = Some(value.clone()),
                "validTo" => attributes.valid_to = Some(value.clone()),
                "publicationYear" => attributes.publication_year = Some(value.clone()),
                "publicationPeriod" => attributes.publication_period = Some(value.clone()),
                "action" => {
                    if let Ok(action) = value.parse::<Action>() {
                        attributes.action = action;
                    } else {
                        debug!(%value, "unparseable action, keeping default");
                    }
                }
                "setId" => attributes.set_id = Some(value.clone()),
                "dimensionAtObservation" => {
                    attributes.dimension_at_observation = value.clone();
                }
                other => {
                    debug!(key = other, "dropping unknown dataset attribute");
                }
            }
        }
        attributes
    }

    /// The recognized wire keys, in information-model order.
    pub fn known_keys() -> &'static [&'static str] {
        &KNOWN_KEYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_information_model() {
        let attrs = DatasetAttributes::with_defaults("BIS_DER");
        assert_eq!(attrs.action, Action::Replace);
        assert_eq!(attrs.set_id.as_deref(), Some("BIS_DER"));
        assert_eq!(attrs.dimension_at_observation, ALL_DIMENSIONS);
        assert!(attrs.reporting_begin.is_none());
    }

    #[test]
    fn unknown_keys_are_dropped_silently() {
        let map: BTreeMap<String, String> = [
            ("action".to_string(), "Append".to_string()),
            ("publicationYear".to_string(), "2021".to_string()),
            ("nonsense".to_string(), "whatever".to_string()),
        ]
        .into_iter()
        .collect();

        let attrs = DatasetAttributes::from_map(&map, "BIS_DER");
        assert_eq!(attrs.action, Action::Append);
        assert_eq!(attrs.publication_year.as_deref(), Some("2021"));

        let json = serde_json::to_value(&attrs).unwrap();
        assert!(json.get("nonsense").is_none());
        assert_eq!(json["setId"], "BIS_DER");
    }

    #[test]
    fn extraction_date_parses_iso_dates() {
        let map: BTreeMap<String, String> = [(
            "dataExtractionDate".to_string(),
            "2021-03-04".to_string(),
        )]
        .into_iter()
        .collect();

        let attrs = DatasetAttributes::from_map(&map, "X");
        assert_eq!(
            attrs.data_extraction_date,
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()
        );
    }
}
