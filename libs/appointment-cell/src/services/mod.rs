pub mod booking;
pub mod store;
pub mod validator;

pub use booking::BookingService;
pub use store::{AppointmentStore, AvailabilityStore, SchedulingStore, SupabaseSchedulingStore};
pub use validator::SlotValidator;
