//! Typed parsing of raw form fields and CSV cells.
//!
//! HTML forms submit every input as a string, and blank inputs arrive as
//! `""`. All helpers treat a blank value the same as an absent one.

use chrono::{DateTime, NaiveDateTime};

use crate::error::ValidationError;

const NAIVE_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Trimmed value, or `None` when absent or blank.
pub fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

pub fn required<'a>(field: &'static str, raw: Option<&'a str>) -> Result<&'a str, ValidationError> {
    present(raw).ok_or_else(|| ValidationError::missing(field))
}

pub fn parse_f64(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| ValidationError::new(field, format!("'{raw}' is not a number")))?;
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    Ok(value)
}

pub fn required_f64(field: &'static str, raw: Option<&str>) -> Result<f64, ValidationError> {
    parse_f64(field, required(field, raw)?)
}

pub fn optional_f64(field: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    present(raw).map(|v| parse_f64(field, v)).transpose()
}

pub fn f64_or(field: &'static str, raw: Option<&str>, default: f64) -> Result<f64, ValidationError> {
    Ok(optional_f64(field, raw)?.unwrap_or(default))
}

/// Integer cell. Accepts integral floats (`"12.0"`) as spreadsheet exports
/// commonly write them.
pub fn optional_i32(field: &'static str, raw: Option<&str>) -> Result<Option<i32>, ValidationError> {
    let Some(v) = present(raw) else {
        return Ok(None);
    };
    if let Ok(n) = v.parse::<i32>() {
        return Ok(Some(n));
    }
    let f = parse_f64(field, v)?;
    if f.fract() != 0.0 || f < f64::from(i32::MIN) || f > f64::from(i32::MAX) {
        return Err(ValidationError::new(field, format!("'{v}' is not an integer")));
    }
    #[allow(clippy::cast_possible_truncation, reason = "range and integrality checked above")]
    let n = f as i32;
    Ok(Some(n))
}

pub fn latitude(field: &'static str, raw: Option<&str>) -> Result<f64, ValidationError> {
    let value = required_f64(field, raw)?;
    if !(-90.0..=90.0).contains(&value) {
        return Err(ValidationError::new(field, "must be between -90 and 90"));
    }
    Ok(value)
}

pub fn longitude(field: &'static str, raw: Option<&str>) -> Result<f64, ValidationError> {
    let value = required_f64(field, raw)?;
    if !(-180.0..=180.0).contains(&value) {
        return Err(ValidationError::new(field, "must be between -180 and 180"));
    }
    Ok(value)
}

/// Parse a timestamp. Offset-carrying RFC 3339 values are normalized to UTC;
/// naive ISO values are taken as-is.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| ValidationError::new(field, format!("'{raw}' is not a valid timestamp")))
}

pub fn required_timestamp(
    field: &'static str,
    raw: Option<&str>,
) -> Result<NaiveDateTime, ValidationError> {
    parse_timestamp(field, required(field, raw)?)
}

/// `YYYY-MM-DDTHH:MM:SS`, with fractional seconds only when non-zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
