use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use shared_models::time::Timestamp;

use crate::models::{RejectionReason, SlotDecision, ValidationCheck, ValidationFailure};
use crate::services::store::AvailabilityStore;

/// Decides whether a (doctor, timestamp) slot can be taken.
///
/// Checks run in a fixed order and the first failure wins:
/// time-off on the date, then the weekday's working window (bounds inclusive),
/// then an existing non-cancelled appointment at the same instant.
/// The validator never writes. A store error is returned tagged with the check
/// that was running, and the caller decides what that means.
pub struct SlotValidator<A: ?Sized> {
    store: Arc<A>,
}

impl<A: AvailabilityStore + ?Sized> SlotValidator<A> {
    pub fn new(store: Arc<A>) -> Self {
        Self { store }
    }

    pub async fn validate(
        &self,
        doctor_id: Uuid,
        at: Timestamp,
        exclude_appointment_id: Option<Uuid>,
    ) -> Result<SlotDecision, ValidationFailure> {
        debug!("Validating slot {} for doctor {}", at, doctor_id);

        let on_leave = self.store
            .is_time_off(doctor_id, at.date())
            .await
            .map_err(|source| ValidationFailure { check: ValidationCheck::TimeOff, source })?;
        if on_leave {
            return Ok(SlotDecision::Reject(RejectionReason::DoctorUnavailableTimeoff));
        }

        let window = self.store
            .working_window(doctor_id, at.day_of_week())
            .await
            .map_err(|source| ValidationFailure { check: ValidationCheck::WorkingHours, source })?;
        match window {
            Some(window) if window.contains(at.time_of_day()) => {}
            _ => return Ok(SlotDecision::Reject(RejectionReason::OutsideWorkingHours)),
        }

        let taken = self.store
            .has_conflict(doctor_id, at, exclude_appointment_id)
            .await
            .map_err(|source| ValidationFailure { check: ValidationCheck::Conflict, source })?;
        if taken {
            return Ok(SlotDecision::Reject(RejectionReason::SlotAlreadyBooked));
        }

        Ok(SlotDecision::Accept)
    }
}
