//! Facets: atomic value-domain constraints on a component's representation.
//!
//! A facet pairs a constraint kind with a raw string value as it appears in
//! the structure document. Values are parsed lazily: a malformed value (e.g.
//! a non-numeric `maxLength`) only surfaces when a consumer asks for the
//! typed value, never at construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Constraint kinds a representation may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetType {
    IsSequence,
    MinLength,
    MaxLength,
    MinValue,
    MaxValue,
    StartValue,
    EndValue,
    Interval,
    TimeInterval,
    Decimals,
    Pattern,
    StartTime,
    EndTime,
}

impl FacetType {
    /// Returns the facet name as it appears in SDMX structure documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetType::IsSequence => "isSequence",
            FacetType::MinLength => "minLength",
            FacetType::MaxLength => "maxLength",
            FacetType::MinValue => "minValue",
            FacetType::MaxValue => "maxValue",
            FacetType::StartValue => "startValue",
            FacetType::EndValue => "endValue",
            FacetType::Interval => "interval",
            FacetType::TimeInterval => "timeInterval",
            FacetType::Decimals => "decimals",
            FacetType::Pattern => "pattern",
            FacetType::StartTime => "startTime",
            FacetType::EndTime => "endTime",
        }
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FacetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "isSequence" => Ok(FacetType::IsSequence),
            "minLength" => Ok(FacetType::MinLength),
            "maxLength" => Ok(FacetType::MaxLength),
            "minValue" => Ok(FacetType::MinValue),
            "maxValue" => Ok(FacetType::MaxValue),
            "startValue" => Ok(FacetType::StartValue),
            "endValue" => Ok(FacetType::EndValue),
            "interval" => Ok(FacetType::Interval),
            "timeInterval" => Ok(FacetType::TimeInterval),
            "decimals" => Ok(FacetType::Decimals),
            "pattern" => Ok(FacetType::Pattern),
            "startTime" => Ok(FacetType::StartTime),
            "endTime" => Ok(FacetType::EndTime),
            other => Err(format!("Unknown facet type: {}", other)),
        }
    }
}

/// A single value-domain constraint. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub facet_type: FacetType,
    pub facet_value: String,
}

impl Facet {
    pub fn new(facet_type: FacetType, facet_value: impl Into<String>) -> Self {
        Self {
            facet_type,
            facet_value: facet_value.into(),
        }
    }

    /// The facet value as an integer. Length-style facets require this.
    pub fn int_value(&self) -> crate::error::Result<i64> {
        self.facet_value
            .trim()
            .parse::<i64>()
            .map_err(|_| self.invalid_value())
    }

    /// The facet value as a float. Bound-style facets require this.
    pub fn f64_value(&self) -> crate::error::Result<f64> {
        self.facet_value
            .trim()
            .parse::<f64>()
            .map_err(|_| self.invalid_value())
    }

    /// The facet value as a boolean flag ("true"/"false", case-insensitive).
    pub fn bool_value(&self) -> bool {
        self.facet_value.trim().eq_ignore_ascii_case("true")
    }

    fn invalid_value(&self) -> ModelError {
        ModelError::InvalidFacetValue {
            facet_type: self.facet_type.as_str(),
            value: self.facet_value.clone(),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} - {}>", self.facet_type, self.facet_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_values_parse_lazily() {
        let facet = Facet::new(FacetType::MaxLength, "oops");
        // Construction succeeds; the parse failure surfaces on access.
        assert!(facet.int_value().is_err());

        let facet = Facet::new(FacetType::MaxLength, "12");
        assert_eq!(facet.int_value().unwrap(), 12);
    }

    #[test]
    fn facet_type_round_trips() {
        for name in ["isSequence", "maxValue", "pattern", "interval"] {
            let parsed: FacetType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
        assert!("wibble".parse::<FacetType>().is_err());
    }

    #[test]
    fn bool_facet_is_case_insensitive() {
        assert!(Facet::new(FacetType::IsSequence, "TRUE").bool_value());
        assert!(Facet::new(FacetType::IsSequence, "true").bool_value());
        assert!(!Facet::new(FacetType::IsSequence, "no").bool_value());
    }
}
