#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use appointment_cell::models::{
    Appointment, AppointmentStatus, NewAppointment, PatientAppointment, WorkingWindow,
};
use appointment_cell::services::{AppointmentStore, AvailabilityStore, BookingService};
use shared_config::StoreFailurePolicy;
use shared_database::DbError;
use shared_models::time::{DayOfWeek, TimeOfDay, Timestamp};

/// Store query that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingQuery {
    TimeOff,
    WorkingWindow,
    Conflict,
}

#[derive(Default)]
struct State {
    doctors: HashMap<Uuid, String>,
    patients: HashSet<Uuid>,
    windows: HashMap<(Uuid, DayOfWeek), WorkingWindow>,
    time_off: HashSet<(Uuid, NaiveDate)>,
    appointments: HashMap<Uuid, Appointment>,
    failing: Option<FailingQuery>,
    blind_conflict_check: bool,
}

impl State {
    /// Mirrors the partial unique index on (doctor_id, appointment_date) for non-cancelled rows.
    fn slot_taken(&self, doctor_id: Uuid, at: Timestamp, exclude: Option<Uuid>) -> bool {
        self.appointments.values().any(|a| {
            a.doctor_id == doctor_id
                && a.appointment_date == at
                && a.status != AppointmentStatus::Cancelled
                && Some(a.id) != exclude
        })
    }

    fn fail_if(&self, query: FailingQuery) -> Result<(), DbError> {
        if self.failing == Some(query) {
            Err(DbError::Connection("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// In-memory scheduling store with the same integrity rules as the database schema.
#[derive(Default)]
pub struct InMemorySchedulingStore {
    state: RwLock<State>,
}

impl InMemorySchedulingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn add_doctor(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.write().await.doctors.insert(id, name.to_string());
        id
    }

    pub async fn add_patient(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.state.write().await.patients.insert(id);
        id
    }

    pub async fn set_window(&self, doctor_id: Uuid, day: DayOfWeek, start: &str, end: &str) {
        let window = WorkingWindow::new(
            start.parse::<TimeOfDay>().unwrap(),
            end.parse::<TimeOfDay>().unwrap(),
        );
        self.state.write().await.windows.insert((doctor_id, day), window);
    }

    pub async fn add_time_off(&self, doctor_id: Uuid, date: &str) {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        self.state.write().await.time_off.insert((doctor_id, date));
    }

    pub async fn fail_on(&self, query: FailingQuery) {
        self.state.write().await.failing = Some(query);
    }

    /// Makes the conflict pre-check always answer "free", so only the write-time guard
    /// protects the slot.
    pub async fn blind_conflict_check(&self) {
        self.state.write().await.blind_conflict_check = true;
    }

    pub async fn set_status(&self, appointment_id: Uuid, status: AppointmentStatus) {
        if let Some(a) = self.state.write().await.appointments.get_mut(&appointment_id) {
            a.status = status;
        }
    }

    pub async fn appointment_count(&self) -> usize {
        self.state.read().await.appointments.len()
    }
}

#[async_trait]
impl AvailabilityStore for InMemorySchedulingStore {
    async fn is_time_off(&self, doctor_id: Uuid, date: NaiveDate) -> Result<bool, DbError> {
        let state = self.state.read().await;
        state.fail_if(FailingQuery::TimeOff)?;
        Ok(state.time_off.contains(&(doctor_id, date)))
    }

    async fn working_window(
        &self,
        doctor_id: Uuid,
        day_of_week: DayOfWeek,
    ) -> Result<Option<WorkingWindow>, DbError> {
        let state = self.state.read().await;
        state.fail_if(FailingQuery::WorkingWindow)?;
        Ok(state.windows.get(&(doctor_id, day_of_week)).copied())
    }

    async fn has_conflict(
        &self,
        doctor_id: Uuid,
        at: Timestamp,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbError> {
        let state = self.state.read().await;
        state.fail_if(FailingQuery::Conflict)?;
        if state.blind_conflict_check {
            return Ok(false);
        }
        Ok(state.slot_taken(doctor_id, at, exclude))
    }
}

#[async_trait]
impl AppointmentStore for InMemorySchedulingStore {
    async fn insert_appointment(&self, new: NewAppointment) -> Result<Appointment, DbError> {
        let mut state = self.state.write().await;

        if !state.patients.contains(&new.patient_id) || !state.doctors.contains_key(&new.doctor_id) {
            return Err(DbError::ForeignKeyViolation("appointments references a missing row".to_string()));
        }
        if state.slot_taken(new.doctor_id, new.appointment_date, None) {
            return Err(DbError::UniqueViolation("appointments_doctor_slot_key".to_string()));
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            appointment_date: new.appointment_date,
            status: new.status,
            created_at: Utc::now(),
        };
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, DbError> {
        Ok(self.state.read().await.appointments.get(&appointment_id).cloned())
    }

    async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        at: Timestamp,
    ) -> Result<Option<Appointment>, DbError> {
        let mut state = self.state.write().await;

        let doctor_id = match state.appointments.get(&appointment_id) {
            Some(a) => a.doctor_id,
            None => return Ok(None),
        };
        if state.slot_taken(doctor_id, at, Some(appointment_id)) {
            return Err(DbError::UniqueViolation("appointments_doctor_slot_key".to_string()));
        }

        Ok(state.appointments.get_mut(&appointment_id).map(|a| {
            a.appointment_date = at;
            a.status = AppointmentStatus::Rescheduled;
            a.clone()
        }))
    }

    async fn list_patient_appointments(&self, patient_id: Uuid) -> Result<Vec<PatientAppointment>, DbError> {
        let state = self.state.read().await;

        let mut appointments: Vec<PatientAppointment> = state
            .appointments
            .values()
            .filter(|a| a.patient_id == patient_id)
            .map(|a| PatientAppointment {
                id: a.id,
                doctor_id: a.doctor_id,
                doctor_name: state.doctors.get(&a.doctor_id).cloned(),
                appointment_date: a.appointment_date,
                status: a.status,
            })
            .collect();
        appointments.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));

        Ok(appointments)
    }
}

pub fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

pub fn service(store: &Arc<InMemorySchedulingStore>) -> BookingService<InMemorySchedulingStore> {
    BookingService::new(Arc::clone(store), StoreFailurePolicy::Surface)
}

pub fn fail_closed_service(store: &Arc<InMemorySchedulingStore>) -> BookingService<InMemorySchedulingStore> {
    BookingService::new(Arc::clone(store), StoreFailurePolicy::FailClosed)
}
