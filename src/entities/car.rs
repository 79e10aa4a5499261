//! Car entity - A rentable vehicle with its three billing rates.
//!
//! `average_rating` and `total_ratings` are derived from the `car_ratings` table and
//! are only ever written by `core::rating::recompute_car_rating`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gearbox type
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Transmission {
    /// Automatic gearbox
    #[sea_orm(string_value = "AUTO")]
    #[serde(rename = "AUTO")]
    Automatic,
    /// Manual gearbox
    #[sea_orm(string_value = "MANUAL")]
    #[serde(rename = "MANUAL")]
    Manual,
}

/// Car database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    /// Unique identifier for the car
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Category this car is listed under
    pub category_id: i64,
    /// Company that makes or supplies this car
    pub company_id: i64,
    /// Model name (e.g., "Corolla")
    pub name: String,
    /// Model year
    pub model_year: i32,
    /// Gearbox type
    pub transmission: Transmission,
    /// Number of seats
    pub seats: i32,
    /// Price per hour
    pub hourly_rate: f64,
    /// Price per day
    pub daily_rate: f64,
    /// Price per 30-day month
    pub monthly_rate: f64,
    /// Free-form description
    pub description: String,
    /// Whether the car is listed for rental
    pub is_available: bool,
    /// Mean of all rating values, 0.0 when unrated
    pub average_rating: f64,
    /// Number of ratings
    pub total_ratings: i32,
}

/// Defines relationships between Car and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each car belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// Each car belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
    /// One car has many ratings
    #[sea_orm(has_many = "super::car_rating::Entity")]
    Ratings,
    /// One car has many bookings
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::car_rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
