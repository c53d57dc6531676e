use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::{appointment_routes, patient_appointment_routes};
use appointment_cell::services::BookingService;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_database::AppState;

pub fn create_router(state: AppState) -> Router {
    let booking = Arc::new(BookingService::from_state(&state));

    Router::new()
        .route("/", get(|| async { "Clinic scheduling API is running!" }))
        .nest(
            "/patients",
            patient_routes(state.clone()).merge(patient_appointment_routes(booking.clone())),
        )
        .nest("/doctors", doctor_routes(state))
        .nest("/appointments", appointment_routes(booking))
}
