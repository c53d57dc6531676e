use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::DbError;
use shared_models::error::AppError;
use shared_models::time::birth_date;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub ktp_number: String,
    pub full_name: String,
    #[serde(with = "birth_date")]
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. `date_of_birth` stays a string until validation so a
/// malformed date is reported with the field's own message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[serde(alias = "ktp_number")]
    pub ktp_number: String,
    #[serde(alias = "full_name")]
    pub full_name: String,
    #[serde(alias = "date_of_birth")]
    pub date_of_birth: String,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("A patient with this KTP number is already registered")]
    DuplicateKtp,

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::DuplicateKtp => AppError::Conflict(err.to_string()),
            PatientError::DatabaseError(db) => AppError::from(db),
        }
    }
}
