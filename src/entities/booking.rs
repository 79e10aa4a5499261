//! Booking entity - A reservation of one car by one user over a time window.
//!
//! `total_amount` is computed once when the booking is created and never recomputed,
//! so later rate changes on the car do not affect existing bookings.

use sea_orm::ActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Billing granularity of a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "UPPERCASE")]
pub enum RentalType {
    /// Billed per (fractional) hour
    #[sea_orm(string_value = "HOURLY")]
    Hourly,
    /// Billed per started day
    #[sea_orm(string_value = "DAILY")]
    Daily,
    /// Billed per started 30-day month
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
}

/// Lifecycle of a booking: `Pending -> Confirmed -> Completed`, and
/// `Pending | Confirmed -> Cancelled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// Created, awaiting confirmation
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Accepted by the rental office
    #[sea_orm(string_value = "CONFIRMED")]
    Confirmed,
    /// Withdrawn; no longer occupies the car
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    /// Rental finished
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

impl BookingStatus {
    /// Statuses that occupy the car and therefore take part in conflict checks.
    pub const ACTIVE: [Self; 2] = [Self::Pending, Self::Confirmed];

    /// Whether the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }
}

impl fmt::Display for RentalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Booking database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    /// Unique identifier for the booking
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Booked car
    pub car_id: i64,
    /// Discord user ID of the renter
    pub user_id: String,
    /// Billing granularity
    pub rental_type: RentalType,
    /// Start of the occupied window (inclusive)
    pub start_time: DateTimeUtc,
    /// End of the occupied window (exclusive)
    pub end_time: DateTimeUtc,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Price fixed at creation
    pub total_amount: f64,
    /// When the booking was made
    pub booking_date: DateTimeUtc,
}

/// Defines relationships between Booking and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each booking belongs to one car
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
