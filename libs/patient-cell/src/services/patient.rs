use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};
use shared_models::time::{format_date, parse_birth_date};
use shared_models::validation::{has_min_chars, is_numeric_id};

use crate::models::{CreatePatientRequest, Patient, PatientError};

pub const KTP_DIGITS: usize = 16;
pub const MIN_NAME_CHARS: usize = 3;

pub struct PatientService {
    supabase: Arc<SupabaseClient>,
}

impl PatientService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Register a new patient. The KTP number is unique across patients.
    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Registering patient");

        let date_of_birth = validate_create_request(&request, Utc::now().date_naive())?;

        let patient_data = json!({
            "ktp_number": request.ktp_number,
            "full_name": request.full_name.trim(),
            "date_of_birth": format_date(date_of_birth),
        });

        let patient: Patient = self.supabase.insert("patients", patient_data).await
            .map_err(|e| match e {
                DbError::UniqueViolation(_) => PatientError::DuplicateKtp,
                DbError::CheckViolation(msg) => PatientError::ValidationError(msg),
                other => PatientError::DatabaseError(other),
            })?;

        info!("Patient {} registered", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient: {}", patient_id);

        let path = format!(
            "/rest/v1/patients?id=eq.{}&select=id,ktp_number,full_name,date_of_birth,created_at",
            patient_id
        );
        let patients: Vec<Patient> = self.supabase.select(&path).await?;

        patients.into_iter().next().ok_or_else(|| {
            warn!("Patient {} not found", patient_id);
            PatientError::NotFound
        })
    }
}

/// Returns the parsed date of birth when the request is acceptable.
fn validate_create_request(
    request: &CreatePatientRequest,
    today: NaiveDate,
) -> Result<NaiveDate, PatientError> {
    if !is_numeric_id(&request.ktp_number, KTP_DIGITS) {
        return Err(PatientError::ValidationError(format!(
            "KTP number must be exactly {} digits",
            KTP_DIGITS
        )));
    }

    if !has_min_chars(&request.full_name, MIN_NAME_CHARS) {
        return Err(PatientError::ValidationError(format!(
            "Full name must be at least {} characters",
            MIN_NAME_CHARS
        )));
    }

    let date_of_birth = parse_birth_date(&request.date_of_birth).map_err(|_| {
        PatientError::ValidationError("Date of birth must use the DD-MM-YYYY format".to_string())
    })?;

    if date_of_birth > today {
        return Err(PatientError::ValidationError(
            "Date of birth cannot be in the future".to_string(),
        ));
    }

    Ok(date_of_birth)
}
