//! Unified error type for the car rental system.
//!
//! Validation and conflict failures are distinct variants so the Discord layer can
//! turn them into friendly replies, while database failures stay opaque.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::BookingStatus;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or out-of-range input, rejected before any write
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// Rating value outside 1..=5
    #[error("Invalid rating {value}: must be between 1 and 5")]
    InvalidRating {
        /// The rejected value
        value: i32,
    },

    /// Requested window overlaps an active booking on the same car
    #[error("Car {car_id} is already booked between {start} and {end}")]
    BookingConflict {
        /// Car that was requested
        car_id: i64,
        /// Requested start
        start: DateTime<Utc>,
        /// Requested end
        end: DateTime<Utc>,
    },

    /// Car does not exist
    #[error("Car not found: {car_id}")]
    CarNotFound {
        /// Requested car id
        car_id: i64,
    },

    /// Category does not exist
    #[error("Category not found: {name}")]
    CategoryNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// Company does not exist
    #[error("Company not found: {name}")]
    CompanyNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// Booking does not exist or belongs to someone else
    #[error("Booking not found: {booking_id}")]
    BookingNotFound {
        /// Requested booking id
        booking_id: i64,
    },

    /// Status change not permitted by the booking lifecycle
    #[error("Cannot move booking from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status
        from: BookingStatus,
        /// Requested status
        to: BookingStatus,
    },

    /// Configuration loading or seeding failure
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Any persistence failure; the surrounding transaction has been rolled back
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Missing or unreadable environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Failure while formatting a reply
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// True for input errors the user can fix by re-entering values.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidRating { .. })
    }

    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(Error::validation("bad").is_validation());
        assert!(Error::InvalidRating { value: 9 }.is_validation());
        assert!(!Error::CarNotFound { car_id: 1 }.is_validation());
        assert!(
            !Error::BookingConflict {
                car_id: 1,
                start: Utc::now(),
                end: Utc::now(),
            }
            .is_validation()
        );
    }

    #[test]
    fn test_status_transition_message() {
        let err = Error::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move booking from CANCELLED to CONFIRMED"
        );
    }
}
