//! Facet compliance checks.
//!
//! Every violation is a WARNING finding against the component. Facet values
//! are interpreted here, so a malformed facet (non-numeric bound, broken
//! pattern) surfaces as a configuration error at the first check that needs
//! it — the engine propagates it instead of swallowing it.

use regex::Regex;

use sdmx_common::{format_numeric, parse_f64};
use sdmx_model::{CheckCode, ComponentKind, ErrorLevel, Facet, FacetType, Finding};

use crate::error::{Result, ValidateError};
use crate::profile::{ColumnKind, ColumnProfile};

/// Runs the facet list against a column's distinct values.
pub(crate) fn check_facets(
    facets: &[Facet],
    profile: &ColumnProfile,
    component: &str,
    kind: ComponentKind,
) -> Result<Vec<Finding>> {
    match profile.kind {
        ColumnKind::Numeric => check_numeric_facets(facets, profile, component, kind),
        ColumnKind::Text => check_text_facets(facets, profile, component, kind),
    }
}

fn check_numeric_facets(
    facets: &[Facet],
    profile: &ColumnProfile,
    component: &str,
    kind: ComponentKind,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();
    let mut is_sequence = false;
    let mut start = None;
    let mut end = None;
    let mut interval = None;

    for facet in facets {
        match facet.facet_type {
            FacetType::MaxLength => {
                let limit = facet.int_value()?;
                for text in &profile.distinct {
                    if text.chars().count() as i64 > limit {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            FacetType::MinLength => {
                let limit = facet.int_value()?;
                for text in &profile.distinct {
                    if (text.chars().count() as i64) < limit {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            FacetType::MaxValue => {
                let bound = facet.f64_value()?;
                for (text, number) in profile.distinct.iter().zip(&profile.numeric) {
                    if *number > bound {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            FacetType::MinValue => {
                let bound = facet.f64_value()?;
                for (text, number) in profile.distinct.iter().zip(&profile.numeric) {
                    if *number < bound {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            FacetType::IsSequence => {
                if facet.bool_value() {
                    is_sequence = true;
                }
            }
            FacetType::StartValue => start = Some(facet.f64_value()?),
            FacetType::EndValue => end = Some(facet.f64_value()?),
            FacetType::Interval => interval = Some(facet.f64_value()?),
            _ => {}
        }
    }

    if is_sequence
        && let (Some(start), Some(interval)) = (start, interval)
    {
        check_sequence(profile, start, interval, end, component, kind, &mut findings);
    }

    Ok(findings)
}

/// Sequence check over sorted distinct values: out-of-range values are
/// flagged against the violated bound; only when both bounds hold does the
/// interval alignment get checked.
fn check_sequence(
    profile: &ColumnProfile,
    start: f64,
    interval: f64,
    end: Option<f64>,
    component: &str,
    kind: ComponentKind,
    findings: &mut Vec<Finding>,
) {
    let mut values: Vec<(f64, &str)> = profile
        .numeric
        .iter()
        .copied()
        .zip(profile.distinct.iter().map(String::as_str))
        .collect();
    values.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut in_range = true;
    for (number, text) in &values {
        if *number < start {
            in_range = false;
            findings.push(warning(
                component,
                kind,
                format!("Value {} not compliant with startValue : {}", text, format_numeric(start)),
            ));
        }
    }
    if let Some(end) = end {
        for (number, text) in &values {
            if *number > end {
                in_range = false;
                findings.push(warning(
                    component,
                    kind,
                    format!("Value {} not compliant with endValue : {}", text, format_numeric(end)),
                ));
            }
        }
    }

    if in_range {
        let span = match end {
            Some(end) => format!("[{},{}]", format_numeric(start), format_numeric(end)),
            None => format!("[{},∞)", format_numeric(start)),
        };
        for (number, text) in &values {
            if (number - start) % interval != 0.0 {
                findings.push(warning(
                    component,
                    kind,
                    format!(
                        "Value {} in {} not compliant with sequence {} (interval: {})",
                        text,
                        component,
                        span,
                        format_numeric(interval)
                    ),
                ));
            }
        }
    }
}

fn check_text_facets(
    facets: &[Facet],
    profile: &ColumnProfile,
    component: &str,
    kind: ComponentKind,
) -> Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for facet in facets {
        match facet.facet_type {
            FacetType::MaxLength => {
                let limit = facet.int_value()?;
                for text in &profile.distinct {
                    if text.chars().count() as i64 > limit {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            FacetType::MinLength => {
                let limit = facet.int_value()?;
                for text in &profile.distinct {
                    if (text.chars().count() as i64) < limit {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            // Bounds on a text column compare each distinct value as a
            // number; values that are not numbers violate the bound.
            FacetType::MaxValue => {
                let bound = facet.f64_value()?;
                for text in &profile.distinct {
                    match parse_f64(text) {
                        Some(number) if number <= bound => {}
                        _ => findings.push(violation(facet, text, component, kind)),
                    }
                }
            }
            FacetType::MinValue => {
                let bound = facet.f64_value()?;
                for text in &profile.distinct {
                    match parse_f64(text) {
                        Some(number) if number >= bound => {}
                        _ => findings.push(violation(facet, text, component, kind)),
                    }
                }
            }
            FacetType::Pattern => {
                let regex = compile_full_match(&facet.facet_value)?;
                for text in &profile.distinct {
                    if !regex.is_match(text) {
                        findings.push(violation(facet, text, component, kind));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(findings)
}

/// Compiles a facet pattern anchored to the full value.
fn compile_full_match(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|_| ValidateError::InvalidPattern {
        pattern: pattern.to_string(),
    })
}

fn violation(facet: &Facet, value: &str, component: &str, kind: ComponentKind) -> Finding {
    warning(
        component,
        kind,
        format!(
            "Value {} not compliant with {} : {}",
            value, facet.facet_type, facet.facet_value
        ),
    )
}

fn warning(component: &str, kind: ComponentKind, message: String) -> Finding {
    Finding {
        code: CheckCode::FacetViolation,
        error_level: ErrorLevel::Warning,
        component: component.to_string(),
        component_kind: kind,
        rows: None,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    use crate::profile::profile_column;

    fn numeric_profile(values: &[f64]) -> ColumnProfile {
        let df = df! { "V" => values }.unwrap();
        profile_column(&df, "V").unwrap()
    }

    fn text_profile(values: &[&str]) -> ColumnProfile {
        let df = df! { "V" => values }.unwrap();
        profile_column(&df, "V").unwrap()
    }

    #[test]
    fn aligned_sequence_is_clean() {
        let profile = numeric_profile(&[10.0, 12.0, 14.0]);
        let facets = vec![
            Facet::new(FacetType::IsSequence, "true"),
            Facet::new(FacetType::StartValue, "10"),
            Facet::new(FacetType::Interval, "2"),
        ];
        let findings =
            check_facets(&facets, &profile, "OBS_VALUE", ComponentKind::Measure).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn misaligned_sequence_names_the_value() {
        let profile = numeric_profile(&[10.0, 11.0, 14.0]);
        let facets = vec![
            Facet::new(FacetType::IsSequence, "true"),
            Facet::new(FacetType::StartValue, "10"),
            Facet::new(FacetType::Interval, "2"),
        ];
        let findings =
            check_facets(&facets, &profile, "OBS_VALUE", ComponentKind::Measure).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("Value 11"));
        assert!(findings[0].message.contains("[10,∞)"));
    }

    #[test]
    fn sequence_bounds_suppress_interval_check() {
        let profile = numeric_profile(&[8.0, 11.0]);
        let facets = vec![
            Facet::new(FacetType::IsSequence, "true"),
            Facet::new(FacetType::StartValue, "10"),
            Facet::new(FacetType::EndValue, "20"),
            Facet::new(FacetType::Interval, "2"),
        ];
        let findings =
            check_facets(&facets, &profile, "OBS_VALUE", ComponentKind::Measure).unwrap();
        // 8 violates the start bound; 11's misalignment is not reported
        // because a bound already failed.
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("startValue"));
    }

    #[test]
    fn length_facets_use_trimmed_numeric_strings() {
        // 1234.50 stringifies as "1234.5": five characters beats maxLength 4.
        let profile = numeric_profile(&[123.0, 1234.5]);
        let facets = vec![Facet::new(FacetType::MaxLength, "4")];
        let findings = check_facets(&facets, &profile, "VAL", ComponentKind::Attribute).unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("1234.5"));
    }

    #[test]
    fn pattern_requires_full_match() {
        let profile = text_profile(&["AB", "ABC", "ZZ"]);
        let facets = vec![Facet::new(FacetType::Pattern, "[A-B]{2}")];
        let findings = check_facets(&facets, &profile, "CODE", ComponentKind::Dimension).unwrap();
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn text_bounds_compare_per_element() {
        let profile = text_profile(&["5", "15", "abc"]);
        let facets = vec![Facet::new(FacetType::MaxValue, "10")];
        let findings = check_facets(&facets, &profile, "VAL", ComponentKind::Attribute).unwrap();
        // 15 exceeds the bound, abc is not a number: both flagged.
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn malformed_facet_value_is_a_config_error() {
        let profile = numeric_profile(&[1.0]);
        let facets = vec![Facet::new(FacetType::MaxLength, "four")];
        assert!(check_facets(&facets, &profile, "VAL", ComponentKind::Measure).is_err());
    }
}
