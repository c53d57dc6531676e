use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};
use shared_models::time::format_date;

use crate::models::{
    CreateScheduleRequest, CreateTimeOffRequest, DoctorError, TimeOff, WorkingHoursRule,
};

/// Registration and listing of the facts slot validation reads: weekly windows and time-off.
pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
}

impl AvailabilityService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Add a weekly working window for a doctor
    pub async fn add_working_hours(
        &self,
        doctor_id: Uuid,
        request: CreateScheduleRequest,
    ) -> Result<WorkingHoursRule, DoctorError> {
        debug!("Adding working hours for doctor {} on day {}", doctor_id, request.day_of_week);

        if request.start_time >= request.end_time {
            return Err(DoctorError::ValidationError(
                "startTime must be before endTime".to_string(),
            ));
        }

        let schedule_data = json!({
            "doctor_id": doctor_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time,
            "end_time": request.end_time,
        });

        let rule: WorkingHoursRule = self.supabase.insert("doctor_schedules", schedule_data).await
            .map_err(|e| map_registration_error(e, DoctorError::DuplicateSchedule))?;

        info!("Working hours {}-{} added for doctor {} on day {}",
              rule.start_time, rule.end_time, doctor_id, rule.day_of_week);
        Ok(rule)
    }

    pub async fn list_working_hours(&self, doctor_id: Uuid) -> Result<Vec<WorkingHoursRule>, DoctorError> {
        debug!("Fetching working hours for doctor: {}", doctor_id);

        let path = format!(
            "/rest/v1/doctor_schedules?doctor_id=eq.{}&order=day_of_week.asc",
            doctor_id
        );
        Ok(self.supabase.select(&path).await?)
    }

    /// Mark a full calendar date as unavailable for a doctor
    pub async fn add_time_off(
        &self,
        doctor_id: Uuid,
        request: CreateTimeOffRequest,
    ) -> Result<TimeOff, DoctorError> {
        debug!("Adding time-off for doctor {} on {}", doctor_id, request.off_date);

        let reason = request.reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let time_off_data = json!({
            "doctor_id": doctor_id,
            "off_date": format_date(request.off_date),
            "reason": reason,
        });

        let time_off: TimeOff = self.supabase.insert("doctor_time_off", time_off_data).await
            .map_err(|e| map_registration_error(e, DoctorError::DuplicateTimeOff))?;

        info!("Time-off on {} added for doctor {}", time_off.off_date, doctor_id);
        Ok(time_off)
    }

    pub async fn list_time_off(&self, doctor_id: Uuid) -> Result<Vec<TimeOff>, DoctorError> {
        debug!("Fetching time-off for doctor: {}", doctor_id);

        let path = format!(
            "/rest/v1/doctor_time_off?doctor_id=eq.{}&order=off_date.asc",
            doctor_id
        );
        Ok(self.supabase.select(&path).await?)
    }
}

/// Constraint violations on registration mean a duplicate, an unknown doctor, or bad input.
fn map_registration_error(err: DbError, duplicate: DoctorError) -> DoctorError {
    match err {
        DbError::UniqueViolation(_) => duplicate,
        DbError::ForeignKeyViolation(_) => DoctorError::NotFound,
        DbError::CheckViolation(msg) => DoctorError::ValidationError(msg),
        other => DoctorError::DatabaseError(other),
    }
}
