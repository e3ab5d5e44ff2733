//! Field-rule validation for request DTOs.
//!
//! Each DTO declares a static table of [`FieldRules`], constraints listed in
//! declaration order. Constraints are checked from the last declared to the
//! first, and the first violation of every field is reported. Messages are
//! joined into a single `Validation failed: ...` message.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    IsInt,
    IsString,
    Min(i64),
    Max(i64),
    /// Inclusive bounds on the number of characters.
    Length { min: usize, max: usize },
    IsPositive,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub optional: bool,
    pub constraints: &'static [Constraint],
}

impl FieldRules {
    pub const fn required(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { field, optional: false, constraints }
    }

    pub const fn optional(field: &'static str, constraints: &'static [Constraint]) -> Self {
        Self { field, optional: true, constraints }
    }

    fn is_integer_field(&self) -> bool {
        self.constraints.contains(&Constraint::IsInt)
    }
}

/// Implemented by every DTO that the request pipe is allowed to validate.
pub trait Validate {
    fn rules() -> &'static [FieldRules];
}

impl Constraint {
    /// `Some(message)` when `value` violates the constraint.
    fn violation(&self, field: &str, value: Option<&Value>) -> Option<String> {
        let number = value.and_then(Value::as_f64);
        match *self {
            Constraint::IsInt => (!value.is_some_and(is_integer))
                .then(|| format!("{field} must be an integer number")),
            Constraint::IsString => (!value.is_some_and(Value::is_string))
                .then(|| format!("{field} must be a string")),
            Constraint::Min(min) => (!number.is_some_and(|n| n >= min as f64))
                .then(|| format!("{field} must not be less than {min}")),
            Constraint::Max(max) => (!number.is_some_and(|n| n <= max as f64))
                .then(|| format!("{field} must not be greater than {max}")),
            Constraint::IsPositive => (!number.is_some_and(|n| n > 0.0))
                .then(|| format!("{field} must be a positive number")),
            Constraint::Length { min, max } => match value {
                Some(Value::String(s)) => {
                    let n = s.chars().count();
                    if n < min {
                        Some(format!("{field} must be longer than or equal to {min} characters"))
                    } else if n > max {
                        Some(format!("{field} must be shorter than or equal to {max} characters"))
                    } else {
                        None
                    }
                }
                Some(v) if !is_falsy(v) => Some(format!(
                    "{field} must be longer than or equal to {min} and shorter than or equal to {max} characters"
                )),
                _ => Some(format!("{field} must be longer than or equal to {min} characters")),
            },
        }
    }
}

/// `null`, `false`, `0` and `""`.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

/// Check `value` against `rules`. Non-object payloads are checked as `{}`.
pub fn validate_rules(value: &Value, rules: &[FieldRules]) -> Result<(), ModelError> {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    let messages: Vec<String> = rules
        .iter()
        .filter_map(|rule| {
            let field_value = object.get(rule.field);
            if rule.optional && field_value.map_or(true, Value::is_null) {
                return None;
            }
            rule.constraints
                .iter()
                .rev()
                .find_map(|c| c.violation(rule.field, field_value))
        })
        .collect();

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("Validation failed: {}", messages.join(", "))))
    }
}

/// Rewrite integral floats (`3.0`) of integer fields as integers so typed
/// deserialization accepts everything the rules accepted.
fn normalize_integers(object: &mut Map<String, Value>, rules: &[FieldRules]) {
    for rule in rules.iter().filter(|r| r.is_integer_field()) {
        if let Some(slot) = object.get_mut(rule.field) {
            if let Some(f) = slot.as_f64().filter(|_| !slot.is_i64() && !slot.is_u64()) {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    *slot = Value::Number(Number::from(f as i64));
                }
            }
        }
    }
}

/// Validate a raw JSON payload against `T`'s rules and deserialize it.
pub fn parse_validated<T>(value: Value) -> Result<T, ModelError>
where
    T: Validate + DeserializeOwned,
{
    let rules = T::rules();
    validate_rules(&value, rules)?;
    let mut object = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    normalize_integers(&mut object, rules);
    Ok(serde_json::from_value(Value::Object(object))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    const RULES: &[FieldRules] = &[
        FieldRules::required("count", &[Constraint::IsInt, Constraint::Min(0), Constraint::Max(10)]),
        FieldRules::required("label", &[Constraint::IsString, Constraint::Length { min: 2, max: 4 }]),
        FieldRules::optional("weight", &[Constraint::IsInt, Constraint::IsPositive]),
    ];

    #[derive(Debug, Deserialize)]
    struct Sample {
        count: i32,
        label: String,
        weight: Option<i32>,
    }

    impl Validate for Sample {
        fn rules() -> &'static [FieldRules] {
            RULES
        }
    }

    fn message(value: Value) -> String {
        match validate_rules(&value, RULES) {
            Err(ModelError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(validate_rules(&json!({"count": 3, "label": "abc"}), RULES).is_ok());
    }

    #[test]
    fn reports_first_violation_per_field_in_order() {
        assert_eq!(
            message(json!({"count": 11, "label": "a"})),
            "Validation failed: count must not be greater than 10, label must be longer than or equal to 2 characters"
        );
        assert_eq!(
            message(json!({"count": "3", "label": "abcde"})),
            "Validation failed: count must not be greater than 10, label must be shorter than or equal to 4 characters"
        );
        assert_eq!(
            message(json!({"count": 2.5, "label": 42})),
            "Validation failed: count must be an integer number, label must be longer than or equal to 2 and shorter than or equal to 4 characters"
        );
    }

    #[test]
    fn missing_required_fields_report_the_last_declared_constraint() {
        assert_eq!(
            message(json!({})),
            "Validation failed: count must not be greater than 10, label must be longer than or equal to 2 characters"
        );
    }

    #[test]
    fn optional_fields_skip_when_absent_or_null() {
        assert!(validate_rules(&json!({"count": 1, "label": "ab", "weight": null}), RULES).is_ok());
        assert_eq!(
            message(json!({"count": 1, "label": "ab", "weight": 0})),
            "Validation failed: weight must be a positive number"
        );
        assert_eq!(
            message(json!({"count": 1, "label": "ab", "weight": 1.5})),
            "Validation failed: weight must be an integer number"
        );
    }

    #[test]
    fn non_object_is_checked_as_empty() {
        assert_eq!(message(json!([1, 2])), message(json!({})));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(validate_rules(&json!({"count": 0, "label": "ñé"}), RULES).is_ok());
    }

    #[test]
    fn parse_validated_accepts_integral_floats() -> anyhow::Result<()> {
        let parsed: Sample = parse_validated(json!({"count": 4.0, "label": "abc", "weight": 2}))?;
        assert_eq!(parsed.count, 4);
        assert_eq!(parsed.label, "abc");
        assert_eq!(parsed.weight, Some(2));
        Ok(())
    }
}
