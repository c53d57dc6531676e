use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::DbError;
use shared_models::error::AppError;
use shared_models::time::{DayOfWeek, TimeOfDay};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub nik: String,
    pub name: String,
    pub specialty: String,
}

/// One weekly working window. At most one exists per (doctor, day).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkingHoursRule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeOff {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub off_date: NaiveDate,
    pub reason: Option<String>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    pub nik: String,
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    #[serde(alias = "day_of_week")]
    pub day_of_week: DayOfWeek,
    #[serde(alias = "start_time")]
    pub start_time: TimeOfDay,
    #[serde(alias = "end_time")]
    pub end_time: TimeOfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeOffRequest {
    #[serde(alias = "off_date")]
    pub off_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("A doctor with this NIK is already registered")]
    DuplicateNik,

    #[error("A schedule for this day already exists")]
    DuplicateSchedule,

    #[error("This time-off date is already registered")]
    DuplicateTimeOff,

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::DuplicateNik
            | DoctorError::DuplicateSchedule
            | DoctorError::DuplicateTimeOff => AppError::Conflict(err.to_string()),
            DoctorError::DatabaseError(db) => AppError::from(db),
        }
    }
}
