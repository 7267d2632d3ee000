use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("no attendance shift is marked as default")]
    MissingDefaultShift,

    #[error("employee {employee_id} has no salary structure")]
    MissingSalaryStructure { employee_id: String },

    #[error("invalid shift time: {value}")]
    InvalidTime { value: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn missing_default_shift() -> Self {
        warn!(target: "app::attendance", "no default attendance shift configured");
        AppError::MissingDefaultShift
    }

    pub fn missing_salary_structure(employee_id: impl Into<String>) -> Self {
        let employee_id = employee_id.into();
        warn!(target: "app::payroll", %employee_id, "employee has no salary structure");
        AppError::MissingSalaryStructure { employee_id }
    }

    pub fn invalid_time(value: impl Into<String>) -> Self {
        let value = value.into();
        warn!(target: "app::attendance", %value, "invalid shift time");
        AppError::InvalidTime { value }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }

    pub fn validation_details(&self) -> Option<&JsonValue> {
        match self {
            AppError::Validation { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// True for the conditions lenient callers replace with documented defaults.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            AppError::MissingDefaultShift | AppError::MissingSalaryStructure { .. }
        )
    }
}
