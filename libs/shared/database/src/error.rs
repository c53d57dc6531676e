use thiserror::Error;

use shared_models::error::AppError;

/// Typed outcome of a failed store call.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Record not found")]
    NotFound,

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Database request timed out")]
    Timeout,

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode database response: {0}")]
    Decode(String),

    #[error("Database client misconfigured: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for DbError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DbError::Timeout
        } else if err.is_decode() {
            DbError::Decode(err.to_string())
        } else {
            DbError::Connection(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Decode(err.to_string())
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound("Resource not found".to_string()),
            DbError::UniqueViolation(msg) => AppError::Conflict(msg),
            DbError::ForeignKeyViolation(msg) => AppError::NotFound(msg),
            DbError::CheckViolation(msg) => AppError::BadRequest(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}
