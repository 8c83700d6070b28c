//! Booking service routes
//!
//! The HTTP surface is the caller of the core: it carries form input to the
//! repositories and renders their failure kinds. All booking endpoints sit
//! behind the auth middleware.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    middleware::{AuthSession, auth_middleware},
    models::{Appointment, NewAppointment, NewUser, Role},
};

/// Request for user registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// Public view of a user; the stored password never leaves the service
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: UserResponse,
}

/// Request for booking an appointment
#[derive(Deserialize)]
pub struct BookRequest {
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
}

/// Create the router for the booking service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/appointments", post(book).get(list))
        .route("/auth/logout", post(logout))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    Json(serde_json::json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "booking-service",
        "database": database,
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = NewUser {
        username: payload.username,
        password: payload.password,
        role: payload.role,
    };

    let user = state.user_repository.register(&new_user).await?;

    let response = UserResponse {
        id: user.id,
        username: user.username,
        role: user.role,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
///
/// A wrong password and an unknown username produce the same response.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repository
        .authenticate(&payload.username, &payload.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let session = state.session_repository.create(user.id).await?;

    info!("User logged in: {}", user.username);

    let response = LoginResponse {
        token: session.token,
        user: UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<impl IntoResponse, AppError> {
    state.session_repository.delete(session.token).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

/// Appointment booking endpoint
///
/// The requester is the verified session user, regardless of anything in the
/// payload.
pub async fn book(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<BookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_appointment = NewAppointment {
        doctor: payload.doctor,
        date: payload.date,
        time: payload.time,
    };

    let appointment = state
        .appointment_repository
        .book(session.user_id, &new_appointment)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Appointment listing endpoint
pub async fn list(
    State(state): State<AppState>,
    Extension(_session): Extension<AuthSession>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.appointment_repository.list().await?;
    Ok(Json(appointments))
}
