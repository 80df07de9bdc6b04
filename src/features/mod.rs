// src/features/mod.rs
pub mod builder;
pub mod scaler;

pub use builder::{build_feature_vector, coerce_to_f64, InputRecord};
pub use scaler::StandardScaler;

/// Number of features every caller must supply.
pub const FEATURE_COUNT: usize = 11;

/// Order the classifier was trained on. Never reordered at runtime.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "fixed_acidity",
    "volatile_acidity",
    "citric_acid",
    "residual_sugar",
    "chlorides",
    "free_sulfur_dioxide",
    "total_sulfur_dioxide",
    "density",
    "pH",
    "sulphates",
    "alcohol",
];

/// Human readable label (with unit) for each feature, in `FEATURE_ORDER`.
pub const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Acidité fixe (g/L)",
    "Acidité volatile (g/L)",
    "Acide citrique (g/L)",
    "Sucre résiduel (g/L)",
    "Chlorures (g/L)",
    "SO2 libre (mg/L)",
    "SO2 total (mg/L)",
    "Densité (g/cm³)",
    "pH",
    "Sulfates (g/L)",
    "Alcool (% vol)",
];

/// Reference sample used as the default input, in `FEATURE_ORDER`.
pub const DEFAULT_VALUES: [f64; FEATURE_COUNT] =
    [7.4, 0.7, 0.0, 1.9, 0.076, 11.0, 34.0, 0.9978, 3.51, 0.56, 9.4];

/// Builds an input record from values given in `FEATURE_ORDER`.
pub fn record_from_values(values: &[f64; FEATURE_COUNT]) -> InputRecord {
    FEATURE_ORDER
        .iter()
        .zip(values.iter())
        .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
        .collect()
}

/// The reference sample as an input record.
pub fn default_record() -> InputRecord {
    record_from_values(&DEFAULT_VALUES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_is_fixed() {
        assert_eq!(FEATURE_ORDER.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_ORDER[0], "fixed_acidity");
        assert_eq!(FEATURE_ORDER[8], "pH");
        assert_eq!(FEATURE_ORDER[10], "alcohol");
    }

    #[test]
    fn test_default_record_contains_every_feature() {
        let record = default_record();
        assert_eq!(record.len(), FEATURE_COUNT);
        for (name, expected) in FEATURE_ORDER.iter().zip(DEFAULT_VALUES.iter()) {
            assert_eq!(record[*name].as_f64(), Some(*expected));
        }
    }
}
