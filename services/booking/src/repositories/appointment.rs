//! Appointment repository for database operations
//!
//! This is the booking ledger: it owns the slot-conflict rule that keeps two
//! appointments from occupying the same (doctor, date, time) triple.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Appointment, AppointmentStatus, NewAppointment};
use crate::validation;

/// Appointment repository
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    /// Create a new appointment repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Book an appointment for a user
    ///
    /// Input checks run first (doctor roster, date not in the past, time
    /// slot), then the slot-conflict check. The pre-check gives the clean
    /// error message; the `UNIQUE (doctor, date, time)` constraint settles
    /// the race when two callers pass the pre-check for the same slot, with
    /// the losing insert mapped to the same conflict.
    pub async fn book(&self, user_id: Uuid, new: &NewAppointment) -> AppResult<Appointment> {
        validation::validate_booking(&new.doctor, &new.date, &new.time)
            .map_err(AppError::Validation)?;

        let taken = sqlx::query(
            "SELECT id FROM appointments WHERE doctor = ?1 AND date = ?2 AND time = ?3",
        )
        .bind(&new.doctor)
        .bind(new.date)
        .bind(&new.time)
        .fetch_optional(&self.pool)
        .await?;

        if taken.is_some() {
            return Err(AppError::Conflict("Slot already booked".to_string()));
        }

        info!(
            "Booking appointment with {} on {} at {} for user {}",
            new.doctor, new.date, new.time, user_id
        );

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id,
            doctor: new.doctor.clone(),
            date: new.date,
            time: new.time.clone(),
            status: AppointmentStatus::Reserved,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO appointments (id, user_id, doctor, date, time, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.user_id)
        .bind(&appointment.doctor)
        .bind(appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status)
        .bind(appointment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Slot already booked"))?;

        Ok(appointment)
    }

    /// List all appointments in insertion order
    pub async fn list(&self) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, doctor, date, time, status, created_at
            FROM appointments
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let appointments = rows
            .into_iter()
            .map(|row| Appointment {
                id: row.get("id"),
                user_id: row.get("user_id"),
                doctor: row.get("doctor"),
                date: row.get("date"),
                time: row.get("time"),
                status: row.get("status"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(appointments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repositories::UserRepository;
    use chrono::{Duration, NaiveDate};
    use common::database::{DatabaseConfig, init_pool, run_migrations};

    async fn test_repositories() -> (UserRepository, AppointmentRepository) {
        let pool = init_pool(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool).await.expect("Failed to apply schema");
        (
            UserRepository::new(pool.clone()),
            AppointmentRepository::new(pool),
        )
    }

    async fn registered_user(users: &UserRepository, username: &str) -> Uuid {
        users
            .register(&NewUser {
                username: username.to_string(),
                password: "Abc#123".to_string(),
                role: "patient".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn slot(doctor: &str, date: NaiveDate, time: &str) -> NewAppointment {
        NewAppointment {
            doctor: doctor.to_string(),
            date,
            time: time.to_string(),
        }
    }

    #[tokio::test]
    async fn booking_the_same_slot_twice_conflicts() {
        let (users, appointments) = test_repositories().await;
        let user_id = registered_user(&users, "alice").await;
        let date = Utc::now().date_naive() + Duration::days(1);

        appointments
            .book(user_id, &slot("Dr. Gómez", date, "09:00"))
            .await
            .unwrap();

        let err = appointments
            .book(user_id, &slot("Dr. Gómez", date, "09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Slot already booked");
    }

    #[tokio::test]
    async fn different_time_or_doctor_does_not_conflict() {
        let (users, appointments) = test_repositories().await;
        let user_id = registered_user(&users, "alice").await;
        let date = Utc::now().date_naive() + Duration::days(1);

        appointments
            .book(user_id, &slot("Dr. Gómez", date, "09:00"))
            .await
            .unwrap();
        appointments
            .book(user_id, &slot("Dr. Gómez", date, "10:00"))
            .await
            .unwrap();
        appointments
            .book(user_id, &slot("Dra. Salazar", date, "09:00"))
            .await
            .unwrap();

        assert_eq!(appointments.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_inputs_are_rejected_before_storage() {
        let (users, appointments) = test_repositories().await;
        let user_id = registered_user(&users, "alice").await;
        let date = Utc::now().date_naive() + Duration::days(1);

        let err = appointments
            .book(user_id, &slot("Dr. House", date, "09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let past = Utc::now().date_naive() - Duration::days(1);
        let err = appointments
            .book(user_id, &slot("Dr. Gómez", past, "09:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = appointments
            .book(user_id, &slot("Dr. Gómez", date, "12:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(appointments.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_preserves_creation_order_and_status() {
        let (users, appointments) = test_repositories().await;
        let user_id = registered_user(&users, "alice").await;
        let date = Utc::now().date_naive() + Duration::days(2);

        for time in ["11:00", "09:00", "10:00"] {
            appointments
                .book(user_id, &slot("Dra. Salazar", date, time))
                .await
                .unwrap();
        }

        let listed = appointments.list().await.unwrap();
        assert_eq!(listed.len(), 3);
        let times: Vec<&str> = listed.iter().map(|a| a.time.as_str()).collect();
        assert_eq!(times, vec!["11:00", "09:00", "10:00"]);
        assert!(
            listed
                .iter()
                .all(|a| a.status == AppointmentStatus::Reserved)
        );
    }
}
