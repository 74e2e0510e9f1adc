use thiserror::Error;

/// Errors surfaced to callers of the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid role: {0} (expected \"creator\" or \"investor\")")]
    InvalidRole(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),
}

/// Reasons a raw record is rejected at the loader boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: String },
}

impl RecordError {
    pub fn invalid(field: &'static str, value: impl ToString) -> Self {
        RecordError::InvalidValue {
            field,
            value: value.to_string(),
        }
    }
}
