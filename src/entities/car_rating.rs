//! Car rating entity - One user's 1-5 star score for one car.
//!
//! The (`car_id`, `user_id`) pair is unique; the index is created alongside the table
//! in `config::database::create_tables`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Car rating database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car_ratings")]
pub struct Model {
    /// Unique identifier for the rating
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Rated car
    pub car_id: i64,
    /// Discord user ID of the rater
    pub user_id: String,
    /// Score between 1 and 5
    pub rating: i32,
    /// Optional free text, empty when not given
    pub comment: String,
    /// When the rating was first submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `CarRating` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each rating belongs to one car
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id"
    )]
    Car,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
