use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::AppState;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub database_timeout: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            database_timeout: Duration::from_secs(2),
        }
    }
}

impl TestConfig {
    /// Points the config at a mock PostgREST server.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            database_timeout: self.database_timeout,
            ..AppConfig::default()
        }
    }

    pub fn to_state(&self) -> AppState {
        AppState::new(self.to_app_config()).expect("test config builds a client")
    }
}

/// Rows shaped the way PostgREST returns them.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_response(doctor_id: &str, nik: &str, name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "nik": nik,
            "name": name,
            "specialty": specialty,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn patient_response(patient_id: &str, ktp_number: &str, full_name: &str) -> serde_json::Value {
        json!({
            "id": patient_id,
            "ktp_number": ktp_number,
            "full_name": full_name,
            "date_of_birth": "1990-01-31",
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn schedule_response(doctor_id: &str, day_of_week: u8, start_time: &str, end_time: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time
        })
    }

    pub fn time_off_response(doctor_id: &str, off_date: &str, reason: Option<&str>) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "off_date": off_date,
            "reason": reason
        })
    }

    pub fn appointment_response(
        appointment_id: &str,
        patient_id: &str,
        doctor_id: &str,
        appointment_date: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "appointment_date": appointment_date,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(code: &str, message: &str) -> serde_json::Value {
        json!({
            "code": code,
            "details": null,
            "hint": null,
            "message": message
        })
    }
}
