//! Price calculation for bookings.
//!
//! The three rental types round differently and the difference is intentional:
//! - hourly bills the exact fractional number of hours,
//! - daily bills every started day,
//! - monthly bills every started 30-day month, counting whole days only.

use crate::{
    core::booking::BookingWindow,
    entities::{RentalType, car},
};

const SECONDS_PER_DAY: i64 = 86_400;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const DAYS_PER_MONTH: i64 = 30;

/// The car's rate for the given rental type.
#[must_use]
pub fn rate_for(car: &car::Model, rental_type: RentalType) -> f64 {
    match rental_type {
        RentalType::Hourly => car.hourly_rate,
        RentalType::Daily => car.daily_rate,
        RentalType::Monthly => car.monthly_rate,
    }
}

/// Number of billable units (hours, days or months) covered by `window`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Unit counts are far below 2^52
pub fn billable_units(rental_type: RentalType, window: &BookingWindow) -> f64 {
    let duration = window.duration();
    let whole_days = duration.num_seconds().div_euclid(SECONDS_PER_DAY);
    let leftover_seconds = duration.num_seconds().rem_euclid(SECONDS_PER_DAY);

    match rental_type {
        RentalType::Hourly => duration.num_milliseconds() as f64 / MILLIS_PER_HOUR,
        RentalType::Daily => (whole_days + i64::from(leftover_seconds > 0)) as f64,
        RentalType::Monthly => {
            let months = whole_days / DAYS_PER_MONTH + i64::from(whole_days % DAYS_PER_MONTH > 0);
            months as f64
        }
    }
}

/// Total price of renting `car` over `window` at `rental_type` rates.
#[must_use]
pub fn calculate_total(car: &car::Model, rental_type: RentalType, window: &BookingWindow) -> f64 {
    rate_for(car, rental_type) * billable_units(rental_type, window)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{at, sample_car};
    use chrono::TimeDelta;

    fn window(minutes: i64) -> BookingWindow {
        let start = at("2025-03-01 10:00");
        BookingWindow::new(start, start + TimeDelta::minutes(minutes)).unwrap()
    }

    #[test]
    fn test_hourly_bills_fractional_hours() {
        let car = sample_car();
        assert_eq!(
            calculate_total(&car, RentalType::Hourly, &window(90)),
            car.hourly_rate * 1.5
        );
        assert_eq!(
            calculate_total(&car, RentalType::Hourly, &window(15)),
            car.hourly_rate * 0.25
        );
    }

    #[test]
    fn test_daily_rounds_started_days_up() {
        let car = sample_car();
        assert_eq!(
            calculate_total(&car, RentalType::Daily, &window(25 * 60)),
            car.daily_rate * 2.0
        );
        assert_eq!(
            calculate_total(&car, RentalType::Daily, &window(24 * 60)),
            car.daily_rate
        );
        assert_eq!(
            calculate_total(&car, RentalType::Daily, &window(1)),
            car.daily_rate
        );
    }

    #[test]
    fn test_monthly_rounds_started_months_up() {
        let car = sample_car();
        let day = 24 * 60;
        assert_eq!(
            calculate_total(&car, RentalType::Monthly, &window(31 * day)),
            car.monthly_rate * 2.0
        );
        assert_eq!(
            calculate_total(&car, RentalType::Monthly, &window(30 * day)),
            car.monthly_rate
        );
        assert_eq!(
            calculate_total(&car, RentalType::Monthly, &window(60 * day)),
            car.monthly_rate * 2.0
        );
    }

    #[test]
    fn test_monthly_ignores_partial_days() {
        // Only whole days count towards the month remainder
        assert_eq!(
            billable_units(RentalType::Monthly, &window(30 * 24 * 60 + 300)),
            1.0
        );
        assert_eq!(billable_units(RentalType::Monthly, &window(300)), 0.0);
    }

    #[test]
    fn test_rate_for_each_type() {
        let car = sample_car();
        assert_eq!(rate_for(&car, RentalType::Hourly), car.hourly_rate);
        assert_eq!(rate_for(&car, RentalType::Daily), car.daily_rate);
        assert_eq!(rate_for(&car, RentalType::Monthly), car.monthly_rate);
    }
}
