use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, RescheduleAppointmentRequest};
use crate::services::{BookingService, SchedulingStore};

pub async fn book_appointment<S: SchedulingStore + 'static>(
    State(service): State<Arc<BookingService<S>>>,
    WithRejection(Json(request), _): WithRejection<Json<BookAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = service.book(request).await?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

pub async fn get_appointment<S: SchedulingStore + 'static>(
    State(service): State<Arc<BookingService<S>>>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.get_appointment(appointment_id).await?;

    Ok(Json(json!(appointment)))
}

pub async fn reschedule_appointment<S: SchedulingStore + 'static>(
    State(service): State<Arc<BookingService<S>>>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<RescheduleAppointmentRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.reschedule(appointment_id, request).await?;

    Ok(Json(json!(appointment)))
}

pub async fn list_patient_appointments<S: SchedulingStore + 'static>(
    State(service): State<Arc<BookingService<S>>>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.list_patient_appointments(patient_id).await?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}
