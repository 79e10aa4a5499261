/// Database configuration and connection management
pub mod database;

/// Fleet (categories, companies, cars) seeding from config.toml
pub mod fleet;
