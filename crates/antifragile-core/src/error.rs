use thiserror::Error;

#[derive(Debug, Error)]
pub enum AntifragileError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate statistic: {context} has zero variance")]
    DegenerateStatistic { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AntifragileError {
    fn from(e: serde_json::Error) -> Self {
        AntifragileError::SerializationError(e.to_string())
    }
}
