//! Booking service repositories

pub mod appointment;
pub mod session;
pub mod user;

// Re-export for convenience
pub use appointment::AppointmentRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
