use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::{BookingService, SchedulingStore};

/// Booking, lookup and rescheduling, mounted under `/appointments`.
pub fn appointment_routes<S: SchedulingStore + 'static>(service: Arc<BookingService<S>>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment::<S>))
        .route(
            "/{id}",
            get(handlers::get_appointment::<S>).patch(handlers::reschedule_appointment::<S>),
        )
        .with_state(service)
}

/// A patient's appointment history, mounted alongside the patient routes under `/patients`.
pub fn patient_appointment_routes<S: SchedulingStore + 'static>(service: Arc<BookingService<S>>) -> Router {
    Router::new()
        .route("/{id}/appointments", get(handlers::list_patient_appointments::<S>))
        .with_state(service)
}
