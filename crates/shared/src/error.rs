use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidSelection,
    InvalidRange,
    Validation,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Violations of the control-state contract, raised at the control boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("unknown launch site '{0}'")]
    InvalidSelection(String),
    #[error("invalid payload range [{low}, {high}]: low must not exceed high")]
    InvalidRange { low: f64, high: f64 },
    #[error("invalid outcome class {0}; expected 0 or 1")]
    InvalidOutcomeClass(i64),
}

impl DomainError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSelection(_) => ErrorCode::InvalidSelection,
            Self::InvalidRange { .. } => ErrorCode::InvalidRange,
            Self::InvalidOutcomeClass(_) => ErrorCode::Validation,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
