//! Core business logic, independent of the Discord layer.

/// Booking windows, conflict detection and booking lifecycle
pub mod booking;
/// Categories, companies and cars
pub mod catalog;
/// Price calculation per rental type
pub mod pricing;
/// Rating submission and aggregate recomputation
pub mod rating;
