use axum::{
    Router,
    routing::{get, post},
};

use shared_database::AppState;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(handlers::create_doctor).get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route(
            "/{doctor_id}/schedules",
            post(handlers::add_working_hours).get(handlers::list_working_hours),
        )
        .route(
            "/{doctor_id}/timeoff",
            post(handlers::add_time_off).get(handlers::list_time_off),
        )
        .with_state(state)
}
