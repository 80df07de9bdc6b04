// src/prediction/error.rs

/// Every way a single prediction request can fail.
///
/// The `Display` text is sent back to the caller as the `error` field.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// A required feature is absent from the input record.
    MissingField { field: String },
    /// A feature is present but cannot be read as a number.
    TypeConversion { field: String, value: String },
    /// The request body is not a structured record.
    MalformedRequest(String),
    /// The classifier itself failed.
    ModelInvocation(String),
}

impl PredictionError {
    /// Short machine-friendly name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::MissingField { .. } => "missing_field",
            PredictionError::TypeConversion { .. } => "type_conversion",
            PredictionError::MalformedRequest(_) => "malformed_request",
            PredictionError::ModelInvocation(_) => "model_invocation",
        }
    }
}

impl std::fmt::Display for PredictionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictionError::MissingField { field } => write!(f, "Champ manquant : {}", field),
            PredictionError::TypeConversion { field, value } => {
                write!(f, "Valeur non numérique pour {} : {}", field, value)
            }
            PredictionError::MalformedRequest(reason) => {
                write!(f, "Requête invalide : {}", reason)
            }
            PredictionError::ModelInvocation(reason) => {
                write!(f, "Échec de la prédiction : {}", reason)
            }
        }
    }
}

impl std::error::Error for PredictionError {}
