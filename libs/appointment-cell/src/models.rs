use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::DbError;
use shared_models::error::AppError;
use shared_models::time::{TimeOfDay, Timestamp};

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Confirmed,
    Rescheduled,
    /// Reserved. No current flow produces it, but cancelled rows never block a slot.
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Rescheduled => "RESCHEDULED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_reschedule(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: Timestamp,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Row written by the booking flow; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: Timestamp,
    pub status: AppointmentStatus,
}

/// A patient's appointment with the doctor's name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub doctor_name: Option<String>,
    pub appointment_date: Timestamp,
    pub status: AppointmentStatus,
}

/// Inclusive time-of-day range a doctor accepts appointments on one weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingWindow {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl WorkingWindow {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self { start_time, end_time }
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    #[serde(alias = "patient_id")]
    pub patient_id: Uuid,
    #[serde(alias = "doctor_id")]
    pub doctor_id: Uuid,
    #[serde(alias = "appointment_date")]
    pub appointment_date: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleAppointmentRequest {
    #[serde(alias = "new_appointment_date")]
    pub new_appointment_date: Timestamp,
}

// ==============================================================================
// SLOT VALIDATION
// ==============================================================================

/// Why a requested slot was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    DoctorUnavailableTimeoff,
    OutsideWorkingHours,
    SlotAlreadyBooked,
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::DoctorUnavailableTimeoff => "DOCTOR_UNAVAILABLE_TIMEOFF",
            RejectionReason::OutsideWorkingHours => "OUTSIDE_WORKING_HOURS",
            RejectionReason::SlotAlreadyBooked => "SLOT_ALREADY_BOOKED",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::DoctorUnavailableTimeoff => "Doctor is on leave on the requested date",
            RejectionReason::OutsideWorkingHours => "Requested time is outside the doctor's working hours",
            RejectionReason::SlotAlreadyBooked => "The requested slot is already booked",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision {
    Accept,
    Reject(RejectionReason),
}

/// The validator checks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCheck {
    TimeOff,
    WorkingHours,
    Conflict,
}

impl ValidationCheck {
    /// The rejection this check produces when it fails.
    pub fn rejection(&self) -> RejectionReason {
        match self {
            ValidationCheck::TimeOff => RejectionReason::DoctorUnavailableTimeoff,
            ValidationCheck::WorkingHours => RejectionReason::OutsideWorkingHours,
            ValidationCheck::Conflict => RejectionReason::SlotAlreadyBooked,
        }
    }
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationCheck::TimeOff => "time-off",
            ValidationCheck::WorkingHours => "working-hours",
            ValidationCheck::Conflict => "conflict",
        };
        f.write_str(name)
    }
}

/// A store call failed while a validation check was running.
#[derive(Debug, Error)]
#[error("{check} check could not be evaluated: {source}")]
pub struct ValidationFailure {
    pub check: ValidationCheck,
    #[source]
    pub source: DbError,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient or doctor not found")]
    ReferenceNotFound,

    #[error("{}", .0.message())]
    Rejected(RejectionReason),

    #[error("Appointment in status {0} cannot be rescheduled")]
    InvalidStatus(AppointmentStatus),

    #[error(transparent)]
    ValidationUnavailable(#[from] ValidationFailure),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound | AppointmentError::ReferenceNotFound => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::Rejected(reason) => AppError::Rejected {
                code: reason.code().to_string(),
                message: reason.message().to_string(),
            },
            AppointmentError::InvalidStatus(_) => AppError::Conflict(err.to_string()),
            AppointmentError::ValidationUnavailable(failure) => AppError::Database(failure.to_string()),
            AppointmentError::DatabaseError(db) => AppError::from(db),
        }
    }
}
