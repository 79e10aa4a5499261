//! Booking business logic - windows, conflict detection and the booking lifecycle.
//!
//! A booking occupies its car over the half-open window `[start, end)`. Only
//! `PENDING` and `CONFIRMED` bookings occupy a car, so touching windows never
//! conflict and cancelled or completed bookings free the slot.
//!
//! Creating a booking is check-then-insert. [`request_booking`] runs both steps in one
//! transaction that first writes to the car's row, so a concurrent request for the
//! same car blocks until this one commits and then sees its booking.

use crate::{
    core::{catalog, pricing},
    entities::{Booking, BookingStatus, RentalType, booking},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Date and time layout accepted by [`window_from_form`].
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const DAYS_PER_MONTH: i64 = 30;

/// A validated rental window; `end` is always strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// Builds a window, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(Error::validation(format!(
                "End time {end} must be after start time {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive start
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the window, always positive
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Half-open overlap test; windows that only touch do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Builds a window from the booking form fields: a start date (`YYYY-MM-DD`), a start
/// time (`HH:MM`, UTC) and a positive number of hours, days or 30-day months.
///
/// # Errors
/// Returns a validation error when any field cannot be parsed, the duration is not
/// positive, or the end time would overflow.
pub fn window_from_form(
    rental_type: RentalType,
    start_date: &str,
    start_time: &str,
    duration: &str,
) -> Result<BookingWindow> {
    let raw_start = format!("{} {}", start_date.trim(), start_time.trim());
    let start = NaiveDateTime::parse_from_str(&raw_start, FORM_DATETIME_FORMAT)
        .map_err(|e| Error::validation(format!("Invalid date or time '{raw_start}': {e}")))?
        .and_utc();

    let units: i64 = duration
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("Invalid duration '{}'", duration.trim())))?;
    if units <= 0 {
        return Err(Error::validation(format!(
            "Duration must be positive, got {units}"
        )));
    }

    let length = match rental_type {
        RentalType::Hourly => TimeDelta::try_hours(units),
        RentalType::Daily => TimeDelta::try_days(units),
        RentalType::Monthly => units
            .checked_mul(DAYS_PER_MONTH)
            .and_then(TimeDelta::try_days),
    }
    .ok_or_else(|| Error::validation(format!("Duration {units} is too long")))?;

    let end = start
        .checked_add_signed(length)
        .ok_or_else(|| Error::validation(format!("Duration {units} is too long")))?;

    BookingWindow::new(start, end)
}

/// Finds an active booking on `car_id` that overlaps `window`, if any.
pub async fn find_conflict<C>(
    db: &C,
    car_id: i64,
    window: &BookingWindow,
) -> Result<Option<booking::Model>>
where
    C: ConnectionTrait,
{
    Booking::find()
        .filter(booking::Column::CarId.eq(car_id))
        .filter(booking::Column::Status.is_in(BookingStatus::ACTIVE))
        .filter(booking::Column::StartTime.lt(window.end()))
        .filter(booking::Column::EndTime.gt(window.start()))
        .order_by_asc(booking::Column::StartTime)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Builds the row for a new `PENDING` booking with an already computed total.
fn new_booking(
    car_id: i64,
    user_id: &str,
    rental_type: RentalType,
    window: &BookingWindow,
    total_amount: f64,
) -> booking::ActiveModel {
    booking::ActiveModel {
        car_id: Set(car_id),
        user_id: Set(user_id.to_string()),
        rental_type: Set(rental_type),
        start_time: Set(window.start()),
        end_time: Set(window.end()),
        status: Set(BookingStatus::Pending),
        total_amount: Set(total_amount),
        booking_date: Set(Utc::now()),
        ..Default::default()
    }
}

/// Books `car_id` for `user_id` over `[start, end)`.
///
/// The new booking is `PENDING` and its total is computed from the car's current
/// rates, then stored as a fixed amount.
///
/// # Errors
/// - `Validation` if `end` is not after `start` (no query is issued)
/// - `CarNotFound` if the car does not exist
/// - `BookingConflict` if an active booking on the car overlaps the window
/// - `Database` on persistence failure; nothing is written
#[instrument(skip(db))]
pub async fn request_booking(
    db: &DatabaseConnection,
    car_id: i64,
    user_id: &str,
    rental_type: RentalType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<booking::Model> {
    let window = BookingWindow::new(start, end)?;

    let txn = db.begin().await?;
    let car = catalog::lock_car(&txn, car_id).await?;

    if let Some(existing) = find_conflict(&txn, car_id, &window).await? {
        warn!(
            existing_booking = existing.id,
            "Requested window overlaps an active booking"
        );
        return Err(Error::BookingConflict {
            car_id,
            start: window.start(),
            end: window.end(),
        });
    }

    let total_amount = pricing::calculate_total(&car, rental_type, &window);
    debug!(total_amount, "Computed booking total");

    let created = new_booking(car_id, user_id, rental_type, &window, total_amount)
        .insert(&txn)
        .await?;
    txn.commit().await?;

    info!(booking_id = created.id, total_amount, "Booking created");
    Ok(created)
}

/// Parses the booking form fields and books the car, see [`window_from_form`] and
/// [`request_booking`].
pub async fn request_booking_from_form(
    db: &DatabaseConnection,
    car_id: i64,
    user_id: &str,
    rental_type: RentalType,
    start_date: &str,
    start_time: &str,
    duration: &str,
) -> Result<booking::Model> {
    let window = window_from_form(rental_type, start_date, start_time, duration)?;
    request_booking(
        db,
        car_id,
        user_id,
        rental_type,
        window.start(),
        window.end(),
    )
    .await
}

/// All bookings made by `user_id`, most recent first.
pub async fn user_bookings(db: &DatabaseConnection, user_id: &str) -> Result<Vec<booking::Model>> {
    Booking::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::BookingDate)
        .order_by_desc(booking::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A booking as seen by its owner. Bookings of other users are reported as not found.
pub async fn booking_detail(
    db: &DatabaseConnection,
    booking_id: i64,
    user_id: &str,
) -> Result<booking::Model> {
    Booking::find_by_id(booking_id)
        .filter(booking::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::BookingNotFound { booking_id })
}

/// Administrative status change, restricted to the booking lifecycle.
///
/// # Errors
/// Returns `BookingNotFound` for an unknown booking and `InvalidStatusTransition`
/// when the lifecycle does not allow the move.
#[instrument(skip(db))]
pub async fn set_booking_status(
    db: &DatabaseConnection,
    booking_id: i64,
    to: BookingStatus,
) -> Result<booking::Model> {
    let txn = db.begin().await?;

    let current = Booking::find_by_id(booking_id)
        .one(&txn)
        .await?
        .ok_or(Error::BookingNotFound { booking_id })?;

    if !current.status.can_transition_to(to) {
        return Err(Error::InvalidStatusTransition {
            from: current.status,
            to,
        });
    }

    let from = current.status;
    let mut active: booking::ActiveModel = current.into();
    active.status = Set(to);
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    info!(%from, %to, "Booking status changed");
    Ok(updated)
}
