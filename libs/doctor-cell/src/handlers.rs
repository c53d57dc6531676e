use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, CreateScheduleRequest, CreateTimeOffRequest};
use crate::services::{AvailabilityService, DoctorService};

// ==============================================================================
// DOCTOR REGISTRY
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateDoctorRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(state.supabase.clone());

    let doctor = doctor_service.create_doctor(request).await?;

    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(state.supabase.clone());

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(state.supabase.clone());

    let doctor = doctor_service.get_doctor(doctor_id).await?;

    Ok(Json(json!(doctor)))
}

// ==============================================================================
// WORKING HOURS AND TIME-OFF
// ==============================================================================

#[axum::debug_handler]
pub async fn add_working_hours(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<CreateScheduleRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let availability_service = AvailabilityService::new(state.supabase.clone());

    let rule = availability_service.add_working_hours(doctor_id, request).await?;

    Ok((StatusCode::CREATED, Json(json!(rule))))
}

#[axum::debug_handler]
pub async fn list_working_hours(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(state.supabase.clone());

    let schedules = availability_service.list_working_hours(doctor_id).await?;

    Ok(Json(json!({
        "schedules": schedules,
        "total": schedules.len()
    })))
}

#[axum::debug_handler]
pub async fn add_time_off(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<CreateTimeOffRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let availability_service = AvailabilityService::new(state.supabase.clone());

    let time_off = availability_service.add_time_off(doctor_id, request).await?;

    Ok((StatusCode::CREATED, Json(json!(time_off))))
}

#[axum::debug_handler]
pub async fn list_time_off(
    State(state): State<AppState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(state.supabase.clone());

    let time_off = availability_service.list_time_off(doctor_id).await?;

    Ok(Json(json!({
        "time_off": time_off,
        "total": time_off.len()
    })))
}
