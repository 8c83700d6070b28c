//! Integration tests for the infrastructure components
//!
//! These tests verify that the SQLite store can be opened, migrated, and
//! queried, and that the schema-level uniqueness constraints hold.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

/// Test that the database can be opened and answers a basic query
#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::in_memory();
    let pool = init_pool(&config).await?;

    run_migrations(&pool).await?;
    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "SQLite simple query test failed");

    Ok(())
}

/// Re-applying the schema must be a no-op, not an error
#[tokio::test]
async fn test_migrations_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::in_memory();
    let pool = init_pool(&config).await?;

    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    Ok(())
}

/// The schema must reject a second user with the same username and a second
/// appointment occupying the same (doctor, date, time) slot
#[tokio::test]
async fn test_uniqueness_constraints() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::in_memory();
    let pool = init_pool(&config).await?;
    run_migrations(&pool).await?;

    sqlx::query(
        "INSERT INTO users (id, username, password, role, created_at) \
         VALUES (?1, 'alice', 'Secret#1', 'patient', '2025-01-01T00:00:00Z')",
    )
    .bind(&b"user-1"[..])
    .execute(&pool)
    .await?;

    let duplicate = sqlx::query(
        "INSERT INTO users (id, username, password, role, created_at) \
         VALUES (?1, 'alice', 'Other#2', 'doctor', '2025-01-01T00:00:00Z')",
    )
    .bind(&b"user-2"[..])
    .execute(&pool)
    .await;

    match duplicate {
        Err(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
        other => panic!("expected unique violation, got {:?}", other),
    }

    sqlx::query(
        "INSERT INTO appointments (id, user_id, doctor, date, time, status, created_at) \
         VALUES (?1, ?2, 'Dr. Gómez', '2030-06-01', '09:00', 'reserved', '2025-01-01T00:00:00Z')",
    )
    .bind(&b"appt-1"[..])
    .bind(&b"user-1"[..])
    .execute(&pool)
    .await?;

    let double_booking = sqlx::query(
        "INSERT INTO appointments (id, user_id, doctor, date, time, status, created_at) \
         VALUES (?1, ?2, 'Dr. Gómez', '2030-06-01', '09:00', 'reserved', '2025-01-01T00:00:00Z')",
    )
    .bind(&b"appt-2"[..])
    .bind(&b"user-1"[..])
    .execute(&pool)
    .await;

    match double_booking {
        Err(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
        other => panic!("expected unique violation, got {:?}", other),
    }

    Ok(())
}
