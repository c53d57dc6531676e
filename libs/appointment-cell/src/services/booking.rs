use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_config::StoreFailurePolicy;
use shared_database::{AppState, DbError};
use shared_models::time::Timestamp;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest, NewAppointment,
    PatientAppointment, RejectionReason, RescheduleAppointmentRequest, SlotDecision,
};
use crate::services::store::{SchedulingStore, SupabaseSchedulingStore};
use crate::services::validator::SlotValidator;

/// The only writer of appointment state. Every write is preceded by slot validation.
pub struct BookingService<S: ?Sized> {
    store: Arc<S>,
    validator: SlotValidator<S>,
    policy: StoreFailurePolicy,
}

impl BookingService<SupabaseSchedulingStore> {
    /// Wires the service to the shared PostgREST client and the configured failure policy.
    pub fn from_state(state: &AppState) -> Self {
        let store = Arc::new(SupabaseSchedulingStore::new(Arc::clone(&state.supabase)));
        Self::new(store, state.config.store_failure_policy)
    }
}

impl<S: SchedulingStore + ?Sized> BookingService<S> {
    pub fn new(store: Arc<S>, policy: StoreFailurePolicy) -> Self {
        Self {
            validator: SlotValidator::new(Arc::clone(&store)),
            store,
            policy,
        }
    }

    pub fn policy(&self) -> StoreFailurePolicy {
        self.policy
    }

    /// Book a new appointment in CONFIRMED status
    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, AppointmentError> {
        info!("Booking appointment for patient {} with doctor {} at {}",
              request.patient_id, request.doctor_id, request.appointment_date);

        self.admit(request.doctor_id, request.appointment_date, None).await?;

        let appointment = self.store
            .insert_appointment(NewAppointment {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                appointment_date: request.appointment_date,
                status: AppointmentStatus::Confirmed,
            })
            .await
            .map_err(map_write_error)?;

        info!("Appointment {} confirmed for doctor {} at {}",
              appointment.id, appointment.doctor_id, appointment.appointment_date);
        Ok(appointment)
    }

    /// Move an appointment to a new timestamp. Its own current slot never counts as a conflict.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        request: RescheduleAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let new_date = request.new_appointment_date;
        info!("Rescheduling appointment {} to {}", appointment_id, new_date);

        let existing = self.store
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if !existing.status.can_reschedule() {
            warn!("Appointment {} is {} and cannot be rescheduled", appointment_id, existing.status);
            return Err(AppointmentError::InvalidStatus(existing.status));
        }

        self.admit(existing.doctor_id, new_date, Some(appointment_id)).await?;

        let updated = self.store
            .reschedule_appointment(appointment_id, new_date)
            .await
            .map_err(map_write_error)?
            .ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} rescheduled from {} to {}",
              appointment_id, existing.appointment_date, updated.appointment_date);
        Ok(updated)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        self.store
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn list_patient_appointments(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<PatientAppointment>, AppointmentError> {
        debug!("Listing appointments for patient: {}", patient_id);

        Ok(self.store.list_patient_appointments(patient_id).await?)
    }

    /// Runs the validator and applies the store-failure policy to its outcome.
    async fn admit(
        &self,
        doctor_id: Uuid,
        at: Timestamp,
        exclude: Option<Uuid>,
    ) -> Result<(), AppointmentError> {
        let decision = match self.validator.validate(doctor_id, at, exclude).await {
            Ok(decision) => decision,
            Err(failure) => match self.policy {
                StoreFailurePolicy::Surface => {
                    error!("Slot validation for doctor {} at {} failed: {}", doctor_id, at, failure);
                    return Err(AppointmentError::ValidationUnavailable(failure));
                }
                StoreFailurePolicy::FailClosed => {
                    warn!("Slot validation for doctor {} at {} failed, rejecting: {}", doctor_id, at, failure);
                    SlotDecision::Reject(failure.check.rejection())
                }
            },
        };

        match decision {
            SlotDecision::Accept => Ok(()),
            SlotDecision::Reject(reason) => {
                warn!("Slot {} for doctor {} rejected: {}", at, doctor_id, reason);
                Err(AppointmentError::Rejected(reason))
            }
        }
    }
}

/// The partial unique index on (doctor_id, appointment_date) catches bookings that raced
/// past the conflict pre-check.
fn map_write_error(err: DbError) -> AppointmentError {
    match err {
        DbError::UniqueViolation(_) => AppointmentError::Rejected(RejectionReason::SlotAlreadyBooked),
        DbError::ForeignKeyViolation(_) => AppointmentError::ReferenceNotFound,
        other => {
            error!("Appointment write failed: {}", other);
            AppointmentError::DatabaseError(other)
        }
    }
}
