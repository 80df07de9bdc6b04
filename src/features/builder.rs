// src/features/builder.rs
use serde_json::{Map, Value as JsonValue};

use crate::features::scaler::StandardScaler;
use crate::prediction::error::PredictionError;

/// Raw named values as received from a caller. Extra keys are ignored.
pub type InputRecord = Map<String, JsonValue>;

/// Coerces a single JSON value to f64.
///
/// Accepts numbers, numeric strings (surrounding whitespace allowed) and
/// booleans. Everything else is a conversion error for `field`.
pub fn coerce_to_f64(field: &str, value: &JsonValue) -> Result<f64, PredictionError> {
    let converted = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    };

    converted.ok_or_else(|| PredictionError::TypeConversion {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Builds the feature vector for `record` in the given `order`, applying
/// `scaler` when the loaded artifact carries one.
pub fn build_feature_vector(
    record: &InputRecord,
    order: &[&str],
    scaler: Option<&StandardScaler>,
) -> Result<Vec<f64>, PredictionError> {
    let mut values = Vec::with_capacity(order.len());
    for field in order {
        let raw = record
            .get(*field)
            .ok_or_else(|| PredictionError::MissingField {
                field: field.to_string(),
            })?;
        values.push(coerce_to_f64(field, raw)?);
    }

    Ok(match scaler {
        Some(scaler) => scaler.transform(&values),
        None => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{default_record, DEFAULT_VALUES, FEATURE_COUNT, FEATURE_ORDER};
    use serde_json::json;

    #[test]
    fn test_vector_follows_feature_order() {
        let vector = build_feature_vector(&default_record(), &FEATURE_ORDER, None).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector, DEFAULT_VALUES.to_vec());
    }

    #[test]
    fn test_key_order_in_record_does_not_matter() {
        let mut reversed = InputRecord::new();
        for (name, value) in FEATURE_ORDER.iter().zip(DEFAULT_VALUES.iter()).rev() {
            reversed.insert(name.to_string(), json!(value));
        }
        let vector = build_feature_vector(&reversed, &FEATURE_ORDER, None).unwrap();
        assert_eq!(vector, DEFAULT_VALUES.to_vec());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let mut record = default_record();
        record.insert("quality_category".to_string(), json!("Bon"));
        record.insert("color".to_string(), json!(null));
        let vector = build_feature_vector(&record, &FEATURE_ORDER, None).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in FEATURE_ORDER {
            let mut record = default_record();
            record.remove(field);
            match build_feature_vector(&record, &FEATURE_ORDER, None) {
                Err(PredictionError::MissingField { field: missing }) => {
                    assert_eq!(missing, field)
                }
                other => panic!("Expected MissingField for {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_non_numeric_string_is_rejected() {
        for field in FEATURE_ORDER {
            let mut record = default_record();
            record.insert(field.to_string(), json!("beaucoup"));
            let err = build_feature_vector(&record, &FEATURE_ORDER, None).unwrap_err();
            assert!(
                matches!(err, PredictionError::TypeConversion { field: ref f, .. } if f == field),
                "Unexpected error for {}: {:?}",
                field,
                err
            );
        }
    }

    #[test]
    fn test_null_and_containers_are_rejected() {
        for bad in [json!(null), json!([1.0]), json!({"value": 1.0})] {
            let mut record = default_record();
            record.insert("density".to_string(), bad);
            assert!(matches!(
                build_feature_vector(&record, &FEATURE_ORDER, None),
                Err(PredictionError::TypeConversion { .. })
            ));
        }
    }

    #[test]
    fn test_numeric_strings_and_integers_are_coerced() {
        assert_eq!(coerce_to_f64("pH", &json!(" 3.51 ")).unwrap(), 3.51);
        assert_eq!(coerce_to_f64("free_sulfur_dioxide", &json!(11)).unwrap(), 11.0);
        assert_eq!(coerce_to_f64("alcohol", &json!(true)).unwrap(), 1.0);
    }

    #[test]
    fn test_scaler_is_applied_after_ordering() {
        let scaler = StandardScaler::new(DEFAULT_VALUES.to_vec(), vec![2.0; FEATURE_COUNT]);
        let vector = build_feature_vector(&default_record(), &FEATURE_ORDER, Some(&scaler)).unwrap();
        assert!(vector.iter().all(|v| *v == 0.0));
    }
}
