use thiserror::Error;

#[derive(Debug, Error)]
pub enum JdgTaxError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Tax table constant out of range: {constant} — {reason}")]
    ConstantsViolation { constant: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for JdgTaxError {
    fn from(e: serde_json::Error) -> Self {
        JdgTaxError::SerializationError(e.to_string())
    }
}

impl From<chrono::ParseError> for JdgTaxError {
    fn from(e: chrono::ParseError) -> Self {
        JdgTaxError::DateError(e.to_string())
    }
}
