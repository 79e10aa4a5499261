//! Rental Discord commands - `rate`, `book`, `mybookings` and `booking`.
//!
//! These commands call the rating and booking core with the Discord user ID as the
//! user identity. Validation and conflict errors are answered in the channel so the
//! user can retry with different input.

use crate::{
    entities::{BookingStatus, RentalType, booking, car},
    errors::Result,
};
use tracing::warn;

/// Rental type as offered in the slash command picker
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum RentalChoice {
    /// Billed per hour
    #[name = "Hourly"]
    Hourly,
    /// Billed per started day
    #[name = "Daily"]
    Daily,
    /// Billed per started 30-day month
    #[name = "Monthly"]
    Monthly,
}

impl From<RentalChoice> for RentalType {
    fn from(choice: RentalChoice) -> Self {
        match choice {
            RentalChoice::Hourly => Self::Hourly,
            RentalChoice::Daily => Self::Daily,
            RentalChoice::Monthly => Self::Monthly,
        }
    }
}

const fn status_emoji(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "🕓",
        BookingStatus::Confirmed => "✅",
        BookingStatus::Cancelled => "❌",
        BookingStatus::Completed => "🏁",
    }
}

/// One line summary of a booking.
pub(crate) fn format_booking_line(booking: &booking::Model) -> String {
    format!(
        "{} `#{}` car `#{}` · {} · {} → {} · ${:.2} · {}",
        status_emoji(booking.status),
        booking.id,
        booking.car_id,
        booking.rental_type,
        booking.start_time.format("%Y-%m-%d %H:%M"),
        booking.end_time.format("%Y-%m-%d %H:%M"),
        booking.total_amount,
        booking.status
    )
}

/// Names the booked car in a confirmation. The booking is already saved, so a failed
/// lookup falls back to the car's id.
pub(crate) fn booked_car_label(car_id: i64, lookup: Result<Option<car::Model>>) -> String {
    match lookup {
        Ok(Some(car)) => format!("{} ({})", car.name, car.model_year),
        Ok(None) => format!("car #{car_id}"),
        Err(e) => {
            warn!("Failed to load car {} for booking reply: {}", car_id, e);
            format!("car #{car_id}")
        }
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{RentalChoice, booked_car_label, format_booking_line, status_emoji};
    use crate::{
        bot::{BotData, commands::fit_message, is_user_facing},
        core::{booking, catalog, rating},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Most bookings listed in one reply.
    const BOOKING_LIST_LIMIT: usize = 20;

    /// Rates a car from 1 to 5 stars. Rating again replaces your previous rating.
    #[poise::command(slash_command, prefix_command)]
    pub async fn rate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Car ID (shown in car lists)"] car_id: i64,
        #[description = "Stars from 1 to 5"]
        #[min = 1]
        #[max = 5]
        stars: i32,
        #[description = "Optional comment"] comment: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let reply = match rating::submit_rating(
            db,
            car_id,
            &user_id,
            stars,
            comment.as_deref().unwrap_or_default(),
        )
        .await
        {
            Ok((_, car)) => format!(
                "✅ Thank you for your rating! Car `#{}` now averages ⭐ {:.2} from {} rating{}.",
                car.id,
                car.average_rating,
                car.total_ratings,
                if car.total_ratings == 1 { "" } else { "s" }
            ),
            Err(e) if is_user_facing(&e) => format!("❌ {e}"),
            Err(e) => return Err(e),
        };

        ctx.say(reply).await?;
        Ok(())
    }

    /// Books a car. Times are in UTC; duration counts hours, days or 30-day months.
    #[poise::command(slash_command, prefix_command)]
    pub async fn book(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Car ID (shown in car lists)"] car_id: i64,
        #[description = "How the rental is billed"] rental_type: RentalChoice,
        #[description = "Start date, YYYY-MM-DD"] start_date: String,
        #[description = "Start time, HH:MM (UTC)"] start_time: String,
        #[description = "Number of hours, days or months"] duration: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let result = booking::request_booking_from_form(
            db,
            car_id,
            &user_id,
            rental_type.into(),
            &start_date,
            &start_time,
            &duration,
        )
        .await;

        let reply = match result {
            Ok(created) => {
                let label = booked_car_label(
                    created.car_id,
                    catalog::get_car_by_id(db, created.car_id).await,
                );
                format!(
                    "✅ Booking request submitted successfully!\n{label}\n{}",
                    format_booking_line(&created)
                )
            }
            Err(e @ Error::BookingConflict { .. }) => {
                format!("❌ Car is not available for the selected time period. {e}")
            }
            Err(e) if is_user_facing(&e) => format!("❌ {e}"),
            Err(e) => return Err(e),
        };

        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists your bookings, most recent first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn mybookings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let bookings = booking::user_bookings(db, &user_id).await?;
        if bookings.is_empty() {
            ctx.say("📋 You have no bookings yet. Use `/book` to make one.")
                .await?;
            return Ok(());
        }

        let mut out = String::from("📋 **Your bookings**\n");
        for entry in bookings.iter().take(BOOKING_LIST_LIMIT) {
            writeln!(out, "{}", format_booking_line(entry))?;
        }
        if bookings.len() > BOOKING_LIST_LIMIT {
            writeln!(out, "…and {} older", bookings.len() - BOOKING_LIST_LIMIT)?;
        }
        ctx.say(fit_message(out)).await?;
        Ok(())
    }

    /// Shows one of your bookings.
    #[poise::command(slash_command, prefix_command)]
    pub async fn booking(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Booking ID"] booking_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let found = match booking::booking_detail(db, booking_id, &user_id).await {
            Ok(found) => found,
            Err(e) if is_user_facing(&e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let car_name = catalog::get_car_by_id(db, found.car_id)
            .await?
            .map_or_else(|| format!("car #{}", found.car_id), |car| car.name);

        let mut out = String::new();
        writeln!(out, "{} **Booking #{}**", status_emoji(found.status), found.id)?;
        writeln!(out, "Car: {car_name} (`#{}`)", found.car_id)?;
        writeln!(out, "Rental type: {}", found.rental_type)?;
        writeln!(
            out,
            "From: {}",
            found.start_time.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(out, "Until: {}", found.end_time.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(out, "Status: {}", found.status)?;
        writeln!(out, "Total: ${:.2}", found.total_amount)?;
        write!(
            out,
            "Booked on: {}",
            found.booking_date.format("%Y-%m-%d %H:%M UTC")
        )?;

        ctx.say(out).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{at, sample_car};

    #[test]
    fn test_booked_car_label_falls_back_to_id() {
        assert_eq!(
            booked_car_label(1, Ok(Some(sample_car()))),
            "Corolla (2022)"
        );
        assert_eq!(booked_car_label(9, Ok(None)), "car #9");
        let failed = Err(Error::Database(sea_orm::DbErr::Custom(
            "connection reset".to_string(),
        )));
        assert_eq!(booked_car_label(9, failed), "car #9");
    }

    #[test]
    fn test_rental_choice_maps_to_rental_type() {
        assert_eq!(RentalType::from(RentalChoice::Hourly), RentalType::Hourly);
        assert_eq!(RentalType::from(RentalChoice::Daily), RentalType::Daily);
        assert_eq!(RentalType::from(RentalChoice::Monthly), RentalType::Monthly);
    }

    #[test]
    fn test_format_booking_line() {
        let entry = booking::Model {
            id: 7,
            car_id: 3,
            user_id: "u".to_string(),
            rental_type: RentalType::Daily,
            start_time: at("2025-03-01 10:00"),
            end_time: at("2025-03-03 10:00"),
            status: BookingStatus::Pending,
            total_amount: 100.0,
            booking_date: at("2025-02-20 09:00"),
        };
        assert_eq!(
            format_booking_line(&entry),
            "🕓 `#7` car `#3` · DAILY · 2025-03-01 10:00 → 2025-03-03 10:00 · $100.00 · PENDING"
        );
    }
}
