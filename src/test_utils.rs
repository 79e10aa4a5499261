//! Shared test utilities for the car rental system.
//!
//! This module provides common helper functions for setting up test databases
//! and creating catalog records with sensible defaults.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::{
    core::catalog::{self, NewCar},
    entities::{Transmission, car, category, company},
    errors::Result,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database with a pool of `max_connections`, so
/// transactions really run side by side. Keep the returned directory alive for as
/// long as the connection is used.
pub async fn setup_file_db(max_connections: u32) -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir().expect("temp dir for test database");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("rental.sqlite").display());
    let mut options = ConnectOptions::new(url);
    options.max_connections(max_connections);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Parses `"YYYY-MM-DD HH:MM"` as a UTC timestamp.
pub fn at(value: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .expect("test timestamps use YYYY-MM-DD HH:MM")
        .and_utc()
}

/// Car arguments with sensible defaults.
///
/// # Defaults
/// * `model_year`: 2022
/// * `transmission`: automatic
/// * `seats`: 5
/// * rates: 10.0 / hour, 50.0 / day, 900.0 / month
/// * `is_available`: true
pub fn sample_new_car(category_id: i64, company_id: i64, name: &str) -> NewCar {
    NewCar {
        category_id,
        company_id,
        name: name.to_string(),
        model_year: 2022,
        transmission: Transmission::Automatic,
        seats: 5,
        hourly_rate: 10.0,
        daily_rate: 50.0,
        monthly_rate: 900.0,
        description: "Test car".to_string(),
        is_available: true,
    }
}

/// An unsaved car model with the same defaults as [`sample_new_car`], for pure tests.
pub fn sample_car() -> car::Model {
    car::Model {
        id: 1,
        category_id: 1,
        company_id: 1,
        name: "Corolla".to_string(),
        model_year: 2022,
        transmission: Transmission::Automatic,
        seats: 5,
        hourly_rate: 10.0,
        daily_rate: 50.0,
        monthly_rate: 900.0,
        description: "Test car".to_string(),
        is_available: true,
        average_rating: 0.0,
        total_ratings: 0,
    }
}

/// Creates the "Compact" category and the "Toyota" company.
pub async fn create_test_catalog(
    db: &DatabaseConnection,
) -> Result<(category::Model, company::Model)> {
    let category = catalog::create_category(db, "Compact", "Small city cars").await?;
    let company = catalog::create_company(db, "Toyota", "").await?;
    Ok((category, company))
}

/// Creates a test car with default rates.
pub async fn create_test_car(
    db: &DatabaseConnection,
    category_id: i64,
    company_id: i64,
    name: &str,
) -> Result<car::Model> {
    catalog::create_car(db, sample_new_car(category_id, company_id, name)).await
}

/// Sets up a complete test environment with one car.
/// Returns (db, car) for common test scenarios.
pub async fn setup_with_car() -> Result<(DatabaseConnection, car::Model)> {
    let db = setup_test_db().await?;
    let (category, company) = create_test_catalog(&db).await?;
    let car = create_test_car(&db, category.id, company.id, "Corolla").await?;
    Ok((db, car))
}
