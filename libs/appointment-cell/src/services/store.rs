use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbError, SupabaseClient};
use shared_models::time::{format_date, DayOfWeek, Timestamp};

use crate::models::{
    Appointment, AppointmentStatus, NewAppointment, PatientAppointment, WorkingWindow,
};

/// Read-only availability facts consulted by slot validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn is_time_off(&self, doctor_id: Uuid, date: NaiveDate) -> Result<bool, DbError>;

    /// `None` means the doctor does not work that day.
    async fn working_window(
        &self,
        doctor_id: Uuid,
        day_of_week: DayOfWeek,
    ) -> Result<Option<WorkingWindow>, DbError>;

    /// True when a non-cancelled appointment other than `exclude` holds exactly `at`.
    async fn has_conflict(
        &self,
        doctor_id: Uuid,
        at: Timestamp,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbError>;
}

/// Appointment persistence. Implementations must reject a second non-cancelled
/// appointment for the same (doctor, timestamp) with `DbError::UniqueViolation`.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, DbError>;

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DbError>;

    /// Moves the appointment to `at` with status RESCHEDULED. `None` if no row matched.
    async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        at: Timestamp,
    ) -> Result<Option<Appointment>, DbError>;

    /// Newest appointment first.
    async fn list_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<PatientAppointment>, DbError>;
}

/// Everything the booking flow needs from storage.
pub trait SchedulingStore: AvailabilityStore + AppointmentStore {}

impl<T: AvailabilityStore + AppointmentStore> SchedulingStore for T {}

// ==============================================================================
// SUPABASE IMPLEMENTATION
// ==============================================================================

const APPOINTMENT_COLUMNS: &str = "id,patient_id,doctor_id,appointment_date,status,created_at";

#[derive(Debug, Deserialize)]
struct DoctorNameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PatientAppointmentRow {
    id: Uuid,
    doctor_id: Uuid,
    appointment_date: Timestamp,
    status: AppointmentStatus,
    doctors: Option<DoctorNameRow>,
}

impl From<PatientAppointmentRow> for PatientAppointment {
    fn from(row: PatientAppointmentRow) -> Self {
        Self {
            id: row.id,
            doctor_id: row.doctor_id,
            doctor_name: row.doctors.map(|d| d.name),
            appointment_date: row.appointment_date,
            status: row.status,
        }
    }
}

/// PostgREST-backed store over `doctor_time_off`, `doctor_schedules` and `appointments`.
pub struct SupabaseSchedulingStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseSchedulingStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AvailabilityStore for SupabaseSchedulingStore {
    async fn is_time_off(&self, doctor_id: Uuid, date: NaiveDate) -> Result<bool, DbError> {
        debug!("Checking time-off for doctor {} on {}", doctor_id, date);

        let path = format!(
            "/rest/v1/doctor_time_off?doctor_id=eq.{}&off_date=eq.{}&select=id&limit=1",
            doctor_id,
            format_date(date)
        );
        let rows: Vec<IgnoredAny> = self.supabase.select(&path).await?;

        Ok(!rows.is_empty())
    }

    async fn working_window(
        &self,
        doctor_id: Uuid,
        day_of_week: DayOfWeek,
    ) -> Result<Option<WorkingWindow>, DbError> {
        debug!("Fetching working window for doctor {} on day {}", doctor_id, day_of_week);

        let path = format!(
            "/rest/v1/doctor_schedules?doctor_id=eq.{}&day_of_week=eq.{}&select=start_time,end_time",
            doctor_id, day_of_week
        );
        let windows: Vec<WorkingWindow> = self.supabase.select(&path).await?;

        Ok(windows.into_iter().next())
    }

    async fn has_conflict(
        &self,
        doctor_id: Uuid,
        at: Timestamp,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbError> {
        debug!("Checking conflicts for doctor {} at {}", doctor_id, at);

        let mut path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&appointment_date=eq.{}&status=neq.{}&select=id&limit=1",
            doctor_id,
            at,
            AppointmentStatus::Cancelled
        );
        if let Some(exclude_id) = exclude {
            path.push_str(&format!("&id=neq.{}", exclude_id));
        }

        let rows: Vec<IgnoredAny> = self.supabase.select(&path).await?;

        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl AppointmentStore for SupabaseSchedulingStore {
    async fn insert_appointment(&self, appointment: NewAppointment) -> Result<Appointment, DbError> {
        let row = json!({
            "patient_id": appointment.patient_id,
            "doctor_id": appointment.doctor_id,
            "appointment_date": appointment.appointment_date,
            "status": appointment.status,
        });

        self.supabase.insert("appointments", row).await
    }

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DbError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, APPOINTMENT_COLUMNS
        );
        let appointments: Vec<Appointment> = self.supabase.select(&path).await?;

        Ok(appointments.into_iter().next())
    }

    async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        at: Timestamp,
    ) -> Result<Option<Appointment>, DbError> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, APPOINTMENT_COLUMNS
        );
        let changes = json!({
            "appointment_date": at,
            "status": AppointmentStatus::Rescheduled,
        });

        self.supabase.update(&path, changes).await
    }

    async fn list_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<PatientAppointment>, DbError> {
        debug!("Listing appointments for patient: {}", patient_id);

        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&select=id,doctor_id,appointment_date,status,doctors(name)&order=appointment_date.desc",
            patient_id
        );
        let rows: Vec<PatientAppointmentRow> = self.supabase.select(&path).await?;

        Ok(rows.into_iter().map(PatientAppointment::from).collect())
    }
}
