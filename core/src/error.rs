use thiserror::Error;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Customer '{customer_id}' not found")]
    CustomerNotFound { customer_id: String },

    #[error("Invalid {field} filter: '{value}'")]
    InvalidFilter { field: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type HealthResult<T> = Result<T, HealthError>;

/// Failures inside a single scoring pass.
///
/// Never escapes `HealthScorer::score`: every variant collapses into the
/// degraded assessment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("Malformed last order date: '{0}'")]
    MalformedDate(String),

    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(String),

    #[error("Non-finite value for {field}")]
    NonFiniteInput { field: &'static str },
}
