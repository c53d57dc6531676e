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

use crate::models::CreatePatientRequest;
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreatePatientRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(state.supabase.clone());

    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    WithRejection(Path(patient_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(state.supabase.clone());

    let patient = service.get_patient(patient_id).await?;

    Ok(Json(json!(patient)))
}
