use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};
use shared_models::validation::{has_min_chars, is_numeric_id};

use crate::models::{CreateDoctorRequest, Doctor, DoctorError};

pub const NIK_DIGITS: usize = 10;
pub const MIN_NAME_CHARS: usize = 3;

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
}

impl DoctorService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Register a new doctor
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Registering doctor with NIK {}", request.nik);

        validate_create_request(&request)?;

        let doctor_data = json!({
            "nik": request.nik,
            "name": request.name.trim(),
            "specialty": request.specialty.trim(),
        });

        let doctor: Doctor = self.supabase.insert("doctors", doctor_data).await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => DoctorError::DuplicateNik,
                other => DoctorError::DatabaseError(other),
            })?;

        info!("Doctor {} registered", doctor.id);
        Ok(doctor)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors");

        let doctors = self.supabase
            .select("/rest/v1/doctors?select=id,nik,name,specialty&order=name.asc")
            .await?;

        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}&select=id,nik,name,specialty", doctor_id);
        let doctors: Vec<Doctor> = self.supabase.select(&path).await?;

        doctors.into_iter().next().ok_or_else(|| {
            warn!("Doctor {} not found", doctor_id);
            DoctorError::NotFound
        })
    }
}

fn validate_create_request(request: &CreateDoctorRequest) -> Result<(), DoctorError> {
    if !is_numeric_id(&request.nik, NIK_DIGITS) {
        return Err(DoctorError::ValidationError(format!(
            "NIK must be exactly {} digits",
            NIK_DIGITS
        )));
    }

    if !has_min_chars(&request.name, MIN_NAME_CHARS) {
        return Err(DoctorError::ValidationError(format!(
            "Doctor name must be at least {} characters",
            MIN_NAME_CHARS
        )));
    }

    if request.specialty.trim().is_empty() {
        return Err(DoctorError::ValidationError("Specialty must not be empty".to_string()));
    }

    Ok(())
}
