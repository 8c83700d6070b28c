//! Booking service models

pub mod appointment;
pub mod session;
pub mod user;

// Re-export for convenience
pub use appointment::{Appointment, AppointmentStatus, DOCTORS, NewAppointment, TIME_SLOTS};
pub use session::Session;
pub use user::{NewUser, Role, User};
