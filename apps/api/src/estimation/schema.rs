use serde_json::{Map, Value};
use thiserror::Error;

/// Declares one numeric field the model must return.
/// Each endpoint's field list drives both the prompt skeleton and the
/// validator, so the two cannot drift apart.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON field name, camelCase on the wire.
    pub name: &'static str,
    /// Korean description with unit, rendered in the prompt skeleton.
    pub description: &'static str,
    /// Plausible value for the prompt's example object.
    pub example: f64,
    /// Inclusive clamp range. Out-of-range values are pulled into range,
    /// never rejected.
    pub range: Option<(f64, f64)>,
    /// Digits kept after the decimal point.
    pub decimals: u32,
}

impl FieldSpec {
    /// Whole-number field: currency amounts and counts. No clamp range.
    pub const fn whole(name: &'static str, description: &'static str, example: f64) -> Self {
        Self {
            name,
            description,
            example,
            range: None,
            decimals: 0,
        }
    }

    /// Percentage-like rate: clamped to 0-100, two decimals kept.
    pub const fn rate(name: &'static str, description: &'static str, example: f64) -> Self {
        Self {
            name,
            description,
            example,
            range: Some((0.0, 100.0)),
            decimals: 2,
        }
    }

    /// Bounded integer score, e.g. competition on a 1-10 scale.
    pub const fn bounded(
        name: &'static str,
        description: &'static str,
        example: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            description,
            example,
            range: Some((min, max)),
            decimals: 0,
        }
    }
}

/// A declared field was missing or not numeric in the recovered record.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("field '{field}' is missing or not numeric")]
pub struct SchemaMismatch {
    pub field: &'static str,
}

/// Validates a recovered record against the field list and normalizes it:
/// every declared field must be present and numeric (one bad field fails the
/// whole record), declared ranges clamp, values round to the declared decimal
/// count. Extra fields from the model are dropped.
pub fn validate_record(
    record: &Map<String, Value>,
    fields: &[FieldSpec],
) -> Result<Map<String, Value>, SchemaMismatch> {
    let mut normalized = Map::new();

    for spec in fields {
        let value = record
            .get(spec.name)
            .and_then(Value::as_f64)
            .ok_or(SchemaMismatch { field: spec.name })?;

        let value = match spec.range {
            Some((min, max)) => value.clamp(min, max),
            None => value,
        };
        let value = round_to(value, spec.decimals);

        normalized.insert(spec.name.to_string(), json_number(value));
    }

    Ok(normalized)
}

/// Rounds half away from zero at `decimals` places.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Renders a normalized value as a JSON number; integer-valued results are
/// emitted without a decimal point.
pub(crate) fn json_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
