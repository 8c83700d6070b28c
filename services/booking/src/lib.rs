//! FastMed booking service
//!
//! Account directory (registration, authentication) and booking ledger
//! (slot reservation, listing) over a shared SQLite store, exposed through a
//! small JSON API.

pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod validation;

use sqlx::SqlitePool;

use crate::repositories::{AppointmentRepository, SessionRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub appointment_repository: AppointmentRepository,
    pub session_repository: SessionRepository,
}

impl AppState {
    /// Build the application state around an initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repository: UserRepository::new(pool.clone()),
            appointment_repository: AppointmentRepository::new(pool.clone()),
            session_repository: SessionRepository::new(pool.clone()),
            db_pool: pool,
        }
    }
}
