//! Database configuration module for the car rental system.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The one constraint entities cannot
//! express, the composite (`car_id`, `user_id`) uniqueness of ratings, is added as an
//! explicit index.

use crate::entities::{Booking, Car, CarRating, Category, Company, car_rating};
use crate::errors::Result;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/car_rental.sqlite?mode=rwc";

/// Name of the unique index enforcing one rating per user per car.
pub const RATING_UNIQUE_INDEX: &str = "idx_car_ratings_car_user";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a local `SQLite` file (created if missing) if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
#[instrument]
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Safe to call on every start-up.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve
    let mut tables: Vec<TableCreateStatement> = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Company),
        schema.create_table_from_entity(Car),
        schema.create_table_from_entity(CarRating),
        schema.create_table_from_entity(Booking),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    let rating_unique = Index::create()
        .name(RATING_UNIQUE_INDEX)
        .table(CarRating)
        .col(car_rating::Column::CarId)
        .col(car_rating::Column::UserId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&rating_unique)).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        booking::Model as BookingModel, car::Model as CarModel,
        car_rating::Model as CarRatingModel, category::Model as CategoryModel,
        company::Model as CompanyModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<CompanyModel> = Company::find().limit(1).all(&db).await?;
        let _: Vec<CarModel> = Car::find().limit(1).all(&db).await?;
        let _: Vec<CarRatingModel> = CarRating::find().limit(1).all(&db).await?;
        let _: Vec<BookingModel> = Booking::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
