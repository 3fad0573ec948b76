use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxEqError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for TaxEqError {
    fn from(e: serde_json::Error) -> Self {
        TaxEqError::SerializationError(e.to_string())
    }
}
