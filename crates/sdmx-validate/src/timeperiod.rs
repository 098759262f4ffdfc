//! Time-period format checks.
//!
//! Each distinct value of a time-typed component must belong to the lexical
//! space of the declared type: Gregorian calendar periods, reporting periods
//! (`2021-Q3` style), ISO datetimes, or a datetime/duration range. Values
//! that do not are CRITICAL findings.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

use sdmx_model::{CheckCode, ComponentKind, ErrorLevel, Finding, ValueType};

use crate::profile::ColumnProfile;

/// Year or year-month, years 1900-9999.
static MONTHLY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(19|[2-9][0-9])\d{2}(-(0[1-9]|1[012]))?$").expect("valid monthly regex")
});

/// Reporting-period shorthand: year plus semester, quarter, trimester,
/// month, week or day-of-year designator.
static SPECIAL_PERIOD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(19|[2-9][0-9])\d{2}-(A1|S[1-2]|Q[1-4]|T[1-3]|M(0[1-9]|1[012])|W(0?[1-9]|[1-4][0-9]|5[0-3])|D(00[1-9]|0[1-9][0-9]|[12][0-9][0-9]|3[0-5][0-9]|36[0-5]))$",
    )
    .expect("valid special period regex")
});

/// ISO 8601 duration (the regex crate has no lookahead, so the "at least one
/// designator" rule is enforced separately).
static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?P(\d+Y)?(\d+M)?(\d+W)?(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$")
        .expect("valid duration regex")
});

/// Emits one CRITICAL finding per distinct value outside the declared
/// time-period lexical space.
pub(crate) fn check_time_format(
    profile: &ColumnProfile,
    value_type: ValueType,
    component: &str,
    kind: ComponentKind,
) -> Vec<Finding> {
    if !value_type.is_time_period() {
        return Vec::new();
    }
    profile
        .distinct
        .iter()
        .filter(|value| !is_valid_time_period(value, value_type))
        .map(|value| Finding {
            code: CheckCode::TimeFormat,
            error_level: ErrorLevel::Critical,
            component: component.to_string(),
            component_kind: kind,
            rows: None,
            message: format!("Value {} not compliant with type : {}", value, value_type),
        })
        .collect()
}

/// Validates any time period against its declared type.
pub fn is_valid_time_period(value: &str, value_type: ValueType) -> bool {
    match value_type {
        ValueType::ObservationalTimePeriod
        | ValueType::StandardTimePeriod
        | ValueType::BasicTimePeriod
        | ValueType::GregorianTimePeriod => umbrella_valid(value, value_type),
        ValueType::GregorianYear => {
            MONTHLY_REGEX.is_match(value) && !value.contains('-')
        }
        ValueType::GregorianYearMonth => {
            MONTHLY_REGEX.is_match(value) && value.contains('-')
        }
        ValueType::GregorianDay => is_iso_date(value),
        ValueType::ReportingYear => reporting_valid(value, "A1"),
        ValueType::ReportingSemester => reporting_valid(value, "S[1-2]"),
        ValueType::ReportingTrimester => reporting_valid(value, "T[1-3]"),
        ValueType::ReportingQuarter => reporting_valid(value, "Q[1-4]"),
        ValueType::ReportingMonth => reporting_valid(value, "M(0[1-9]|1[012])"),
        ValueType::ReportingWeek => reporting_valid(value, "W(0?[1-9]|[1-4][0-9]|5[0-3])"),
        ValueType::ReportingDay => reporting_valid(
            value,
            "D(00[1-9]|0[1-9][0-9]|[12][0-9][0-9]|3[0-5][0-9]|36[0-5])",
        ),
        ValueType::DateTime => is_iso_date_or_datetime(value),
        ValueType::TimeRange => time_range_valid(value),
        // Non-time types have no lexical constraint here.
        _ => true,
    }
}

/// The umbrella types accept any concrete period form. Reporting shorthand
/// is detected by its designator letter; everything else must be a year,
/// year-month, date or datetime, optionally with a duration suffix for the
/// non-Gregorian umbrellas.
fn umbrella_valid(value: &str, value_type: ValueType) -> bool {
    let special_marker = value.contains(['A', 'Q', 'W', 'D'])
        || (value.contains('M') && !value.contains(':'));
    if special_marker {
        return SPECIAL_PERIOD_REGEX.is_match(value);
    }
    if MONTHLY_REGEX.is_match(value) {
        return true;
    }
    if value.contains('T') && value_type == ValueType::GregorianTimePeriod {
        return false;
    }

    let (head, duration) = match value.split_once('/') {
        Some((head, tail))
            if matches!(
                value_type,
                ValueType::ObservationalTimePeriod
                    | ValueType::StandardTimePeriod
                    | ValueType::BasicTimePeriod
            ) =>
        {
            (head, Some(tail))
        }
        Some(_) => return false,
        None => (value, None),
    };
    if let Some(duration) = duration
        && !is_valid_duration(duration)
    {
        return false;
    }
    is_iso_date_or_datetime(head)
}

fn reporting_valid(value: &str, period: &str) -> bool {
    let pattern = format!(r"^(19|[2-9][0-9])\d{{2}}-{period}$");
    Regex::new(&pattern)
        .map(|regex| regex.is_match(value))
        .unwrap_or(false)
}

fn is_valid_duration(value: &str) -> bool {
    DURATION_REGEX.is_match(value)
        && value.chars().any(|c| c.is_ascii_digit())
        && !value.ends_with('T')
}

fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| year_in_range(date.year()))
        .unwrap_or(false)
}

fn is_iso_date_or_datetime(value: &str) -> bool {
    if is_iso_date(value) {
        return true;
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return year_in_range(datetime.year());
        }
    }
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(value) {
        return year_in_range(datetime.year());
    }
    false
}

fn time_range_valid(value: &str) -> bool {
    let Some((start, duration)) = value.split_once('/') else {
        return false;
    };
    is_iso_date_or_datetime(start) && is_valid_duration(duration)
}

fn year_in_range(year: i32) -> bool {
    year > 1900 && year <= 9999
}
