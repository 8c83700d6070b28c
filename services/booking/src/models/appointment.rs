//! Appointment model and related functionality

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Doctors that can be booked
pub const DOCTORS: &[&str] = &["Dra. Salazar", "Dr. Gómez"];

/// Bookable time-of-day slots
pub const TIME_SLOTS: &[&str] = &["09:00", "10:00", "11:00"];

/// Appointment status
///
/// `Reserved` is the only state a booking can reach here; there is no
/// cancellation or completion flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Reserved,
}

/// Appointment entity
///
/// One appointment occupies one slot: the (doctor, date, time) triple. The
/// slot is unique across all appointments, enforced at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// New appointment booking payload
///
/// The requester is not part of the payload; it is derived from the verified
/// session of the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
}
