//! Input validation utilities
//!
//! Registration checks run in a fixed order (empty fields, then username
//! format, then password strength, then role) so that a request violating
//! several rules always reports the same one.

use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::models::{DOCTORS, NewUser, Role, TIME_SLOTS};

/// Validate a registration payload and parse its role
pub fn validate_registration(new_user: &NewUser) -> Result<Role, String> {
    if new_user.username.is_empty() {
        return Err("Username is required".to_string());
    }

    if new_user.password.is_empty() {
        return Err("Password is required".to_string());
    }

    if new_user.role.is_empty() {
        return Err("Role is required".to_string());
    }

    validate_username(&new_user.username)?;
    validate_password(&new_user.password)?;

    Role::from_str(&new_user.role)
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), String> {
    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    let mut has_upper = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if !c.is_ascii_alphanumeric() {
            has_special = true;
        }
    }

    if !has_upper {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !has_special {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}

/// Validate a booking request: doctor, then date, then time
pub fn validate_booking(doctor: &str, date: &NaiveDate, time: &str) -> Result<(), String> {
    if !DOCTORS.contains(&doctor) {
        return Err(format!("Unknown doctor '{}'", doctor));
    }

    if *date < Utc::now().date_naive() {
        return Err("Date cannot be in the past".to_string());
    }

    if !TIME_SLOTS.contains(&time) {
        return Err(format!("Invalid time slot '{}'", time));
    }

    Ok(())
}
