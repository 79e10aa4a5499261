//! Fleet configuration loading from config.toml
//!
//! This module loads the initial catalog (categories, companies and cars) from a TOML
//! file and seeds it into the database. Seeding is idempotent: records whose name is
//! already present are left alone, so it is safe to run on every start-up.

use crate::{
    core::catalog::{self, NewCar},
    entities::{Car, Category, Company, Transmission, car},
    errors::{Error, Result},
};
use sea_orm::{TransactionTrait, prelude::*};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info, instrument};

const DEFAULT_FLEET_CONFIG: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct FleetConfig {
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Companies to seed
    #[serde(default)]
    pub companies: Vec<CompanyConfig>,
    /// Cars to seed; they reference categories and companies by name
    #[serde(default)]
    pub cars: Vec<CarConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: String,
}

/// Configuration for a single company
#[derive(Debug, Deserialize, Clone)]
pub struct CompanyConfig {
    /// Company name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: String,
}

/// Configuration for a single car
#[derive(Debug, Deserialize, Clone)]
pub struct CarConfig {
    /// Model name
    pub name: String,
    /// Name of an existing or seeded category
    pub category: String,
    /// Name of an existing or seeded company
    pub company: String,
    /// Model year
    pub model_year: i32,
    /// `"AUTO"` or `"MANUAL"`
    pub transmission: Transmission,
    /// Seat count
    pub seats: i32,
    /// Price per hour
    pub hourly_rate: f64,
    /// Price per day
    pub daily_rate: f64,
    /// Price per 30-day month
    pub monthly_rate: f64,
    /// Optional description
    #[serde(default)]
    pub description: String,
    /// Whether the car is listed, defaults to true
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

/// What [`seed_fleet`] inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Newly created categories
    pub categories: usize,
    /// Newly created companies
    pub companies: usize,
    /// Newly created cars
    pub cars: usize,
}

/// Loads fleet configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FleetConfig> {
    let path_ref = path.as_ref();
    debug!("Loading fleet configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads fleet configuration from `FLEET_CONFIG`, or `./config.toml` if unset.
pub fn load_default_config() -> Result<FleetConfig> {
    let path = std::env::var("FLEET_CONFIG").unwrap_or_else(|_| DEFAULT_FLEET_CONFIG.to_string());
    load_config(path)
}

/// Inserts every configured category, company and car that does not exist yet.
///
/// Runs in a single transaction: either the whole seed is applied or none of it.
///
/// # Errors
/// Returns a `Config` error if a car names a category or company that is neither
/// configured nor already stored, and propagates validation and database errors.
#[instrument(skip_all)]
pub async fn seed_fleet(db: &DatabaseConnection, config: &FleetConfig) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    let mut categories: HashMap<String, i64> = Category::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();
    for entry in &config.categories {
        if !categories.contains_key(entry.name.trim()) {
            let created = catalog::create_category(&txn, &entry.name, &entry.description).await?;
            categories.insert(created.name, created.id);
            summary.categories += 1;
        }
    }

    let mut companies: HashMap<String, i64> = Company::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();
    for entry in &config.companies {
        if !companies.contains_key(entry.name.trim()) {
            let created = catalog::create_company(&txn, &entry.name, &entry.description).await?;
            companies.insert(created.name, created.id);
            summary.companies += 1;
        }
    }

    for entry in &config.cars {
        let category_id = *categories.get(entry.category.trim()).ok_or_else(|| Error::Config {
            message: format!(
                "Car '{}' references unknown category '{}'",
                entry.name, entry.category
            ),
        })?;
        let company_id = *companies.get(entry.company.trim()).ok_or_else(|| Error::Config {
            message: format!(
                "Car '{}' references unknown company '{}'",
                entry.name, entry.company
            ),
        })?;

        let exists = Car::find()
            .filter(car::Column::Name.eq(entry.name.trim()))
            .filter(car::Column::CompanyId.eq(company_id))
            .filter(car::Column::ModelYear.eq(entry.model_year))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            continue;
        }

        catalog::create_car(
            &txn,
            NewCar {
                category_id,
                company_id,
                name: entry.name.clone(),
                model_year: entry.model_year,
                transmission: entry.transmission,
                seats: entry.seats,
                hourly_rate: entry.hourly_rate,
                daily_rate: entry.daily_rate,
                monthly_rate: entry.monthly_rate,
                description: entry.description.clone(),
                is_available: entry.is_available,
            },
        )
        .await?;
        summary.cars += 1;
    }

    txn.commit().await?;
    info!(
        categories = summary.categories,
        companies = summary.companies,
        cars = summary.cars,
        "Fleet seeded"
    );
    Ok(summary)
}
