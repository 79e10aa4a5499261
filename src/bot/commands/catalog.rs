//! Catalog Discord commands - browsing categories, companies and cars.
//!
//! These commands are read-only views over `core::catalog`.

use crate::core::catalog::CarListing;
use crate::entities::{Transmission, car_rating, category};
use std::fmt::Write;

/// Most entries listed in one reply.
const LIST_LIMIT: usize = 25;

/// One line summary of a car for lists.
pub(crate) fn format_car_line(listing: &CarListing) -> String {
    let rating = if listing.car.total_ratings == 0 {
        "unrated".to_string()
    } else {
        format!(
            "⭐ {:.2} ({})",
            listing.car.average_rating, listing.car.total_ratings
        )
    };
    format!(
        "`#{}` **{}** · {} · ${:.2}/h · ${:.2}/day · ${:.2}/month · {}",
        listing.car.id,
        listing.label(),
        listing.category_name,
        listing.car.hourly_rate,
        listing.car.daily_rate,
        listing.car.monthly_rate,
        rating
    )
}

/// Renders a titled list of cars, or `empty` when there are none.
pub(crate) fn format_car_list(
    title: &str,
    listings: &[CarListing],
    empty: &str,
) -> Result<String, std::fmt::Error> {
    if listings.is_empty() {
        return Ok(empty.to_string());
    }
    let mut out = String::new();
    writeln!(out, "🚗 **{title}**")?;
    for listing in listings.iter().take(LIST_LIMIT) {
        writeln!(out, "{}", format_car_line(listing))?;
    }
    if listings.len() > LIST_LIMIT {
        writeln!(out, "…and {} more", listings.len() - LIST_LIMIT)?;
    }
    Ok(out)
}

/// Category names followed by the featured cars.
pub(crate) fn format_home(
    categories: &[category::Model],
    featured: &[CarListing],
) -> Result<String, std::fmt::Error> {
    let mut out = String::from("🏠 **Car Rental**\n");
    if categories.is_empty() {
        writeln!(out, "📂 No categories yet.")?;
    } else {
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "📂 {}", names.join(" · "))?;
    }
    out.push('\n');
    out.push_str(&format_car_list(
        "Featured cars",
        featured,
        "No cars available right now.",
    )?);
    Ok(out)
}

/// One line per review, newest first.
pub(crate) fn format_review(rating: &car_rating::Model) -> String {
    let stars = "★".repeat(usize::try_from(rating.rating).unwrap_or(0));
    if rating.comment.is_empty() {
        format!("{stars} ({})", rating.created_at.format("%Y-%m-%d"))
    } else {
        format!(
            "{stars} ({}) {}",
            rating.created_at.format("%Y-%m-%d"),
            rating.comment
        )
    }
}

const fn transmission_label(transmission: Transmission) -> &'static str {
    match transmission {
        Transmission::Automatic => "Automatic",
        Transmission::Manual => "Manual",
    }
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{LIST_LIMIT, format_car_list, format_home, format_review, transmission_label};
    use crate::{
        bot::{BotData, commands::fit_message, handlers::autocomplete, is_user_facing},
        core::catalog,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Shows the categories and a few featured cars.
    #[poise::command(slash_command, prefix_command)]
    pub async fn home(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let view = catalog::home(db).await?;
        let featured = catalog::describe_cars(db, view.featured_cars).await?;
        let reply = format_home(&view.categories, &featured)?;
        ctx.say(fit_message(reply)).await?;
        Ok(())
    }

    /// Lists all car categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let categories = catalog::list_categories(db).await?;

        if categories.is_empty() {
            ctx.say("📂 No categories yet.").await?;
            return Ok(());
        }

        let mut out = String::from("📂 **Categories**\n");
        for category in &categories {
            if category.description.is_empty() {
                writeln!(out, "• **{}**", category.name)?;
            } else {
                writeln!(out, "• **{}** - {}", category.name, category.description)?;
            }
        }
        ctx.say(fit_message(out)).await?;
        Ok(())
    }

    /// Shows the available cars in a category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        #[rest]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(category) = catalog::get_category_by_name(db, name.trim()).await? else {
            ctx.say(format!(
                "❌ Category '{}' not found. Use `/categories` to see all categories.",
                name.trim()
            ))
            .await?;
            return Ok(());
        };

        let cars = catalog::cars_in_category(db, category.id).await?;
        let listings = catalog::describe_cars(db, cars).await?;
        let reply = format_car_list(
            &category.name,
            &listings,
            &format!("No available cars in {} right now.", category.name),
        )?;
        ctx.say(fit_message(reply)).await?;
        Ok(())
    }

    /// Lists all companies.
    #[poise::command(slash_command, prefix_command)]
    pub async fn companies(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let companies = catalog::list_companies(db).await?;

        if companies.is_empty() {
            ctx.say("🏢 No companies yet.").await?;
            return Ok(());
        }

        let mut out = String::from("🏢 **Companies**\n");
        for company in &companies {
            writeln!(out, "• **{}**", company.name)?;
        }
        ctx.say(fit_message(out)).await?;
        Ok(())
    }

    /// Shows the available cars from a company.
    #[poise::command(slash_command, prefix_command)]
    pub async fn company(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Company name"]
        #[autocomplete = "autocomplete::autocomplete_company_name"]
        #[rest]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(company) = catalog::get_company_by_name(db, name.trim()).await? else {
            ctx.say(format!(
                "❌ Company '{}' not found. Use `/companies` to see all companies.",
                name.trim()
            ))
            .await?;
            return Ok(());
        };

        let cars = catalog::cars_by_company(db, company.id).await?;
        let listings = catalog::describe_cars(db, cars).await?;
        let mut reply = String::new();
        if !company.description.is_empty() {
            writeln!(reply, "_{}_", company.description)?;
        }
        reply.push_str(&format_car_list(
            &company.name,
            &listings,
            &format!("No available cars from {} right now.", company.name),
        )?);
        ctx.say(fit_message(reply)).await?;
        Ok(())
    }

    /// Lists all available cars, best rated first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cars(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let cars = catalog::list_available_cars(db).await?;
        let listings = catalog::describe_cars(db, cars).await?;
        let reply = format_car_list("Available cars", &listings, "No cars available right now.")?;
        ctx.say(fit_message(reply)).await?;
        Ok(())
    }

    /// Finds available cars by name, company or category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to look for"]
        #[rest]
        query: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let listings = catalog::search_cars(db, &query).await?;
        let reply = format_car_list(
            &format!("Results for '{}'", query.trim()),
            &listings,
            &format!("🔍 No cars match '{}'.", query.trim()),
        )?;
        ctx.say(fit_message(reply)).await?;
        Ok(())
    }

    /// Shows a car's details, rates and reviews.
    #[poise::command(slash_command, prefix_command)]
    pub async fn car(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Car ID (shown in car lists)"] car_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user_id = ctx.author().id.to_string();

        let detail = match catalog::car_detail(db, car_id, Some(&user_id)).await {
            Ok(detail) => detail,
            Err(e) if is_user_facing(&e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let car = &detail.listing.car;
        let rating_line = if car.total_ratings == 0 {
            "Not rated yet".to_string()
        } else {
            format!(
                "⭐ {:.2} / 5 from {} rating{}",
                car.average_rating,
                car.total_ratings,
                if car.total_ratings == 1 { "" } else { "s" }
            )
        };

        let mut reviews = String::new();
        for rating in detail.ratings.iter().take(LIST_LIMIT / 5) {
            writeln!(reviews, "{}", format_review(rating))?;
        }
        if reviews.is_empty() {
            reviews.push_str("No reviews yet.");
        }

        let your_rating = detail.user_rating.as_ref().map_or_else(
            || format!("You haven't rated this car. Use `/rate {} <1-5>`.", car.id),
            |r| format!("You rated this car {}/5.", r.rating),
        );

        let embed = serenity::CreateEmbed::default()
            .title(format!("🚗 {}", detail.listing.label()))
            .description(car.description.clone())
            .color(0x0034_98DB)
            .field("Category", detail.listing.category_name.clone(), true)
            .field("Transmission", transmission_label(car.transmission), true)
            .field("Seats", car.seats.to_string(), true)
            .field(
                "Rates",
                format!(
                    "${:.2} / hour\n${:.2} / day\n${:.2} / month",
                    car.hourly_rate, car.daily_rate, car.monthly_rate
                ),
                true,
            )
            .field("Rating", rating_line, true)
            .field(
                "Available",
                if car.is_available { "Yes" } else { "No" },
                true,
            )
            .field("Recent reviews", reviews, false)
            .footer(serenity::CreateEmbedFooter::new(your_rating));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, sample_car};

    fn listing() -> CarListing {
        CarListing {
            car: sample_car(),
            company_name: "Toyota".to_string(),
            category_name: "Compact".to_string(),
        }
    }

    #[test]
    fn test_format_car_line() {
        let mut rated = listing();
        assert!(format_car_line(&rated).contains("unrated"));

        rated.car.average_rating = 4.5;
        rated.car.total_ratings = 2;
        let line = format_car_line(&rated);
        assert!(line.starts_with("`#1` **Toyota Corolla (2022)**"));
        assert!(line.contains("$10.00/h"));
        assert!(line.contains("⭐ 4.50 (2)"));
    }

    #[test]
    fn test_format_car_list_caps_entries() {
        let many: Vec<CarListing> = (0..30).map(|_| listing()).collect();
        let out = format_car_list("All", &many, "none").unwrap_or_default();
        assert!(out.contains("…and 5 more"));
        assert_eq!(format_car_list("All", &[], "none").unwrap_or_default(), "none");
    }

    #[test]
    fn test_format_home() {
        let categories = vec![
            category::Model {
                id: 1,
                name: "Compact".to_string(),
                description: String::new(),
            },
            category::Model {
                id: 2,
                name: "SUV".to_string(),
                description: String::new(),
            },
        ];
        let out = format_home(&categories, &[listing()]).unwrap_or_default();
        assert!(out.contains("📂 Compact · SUV"));
        assert!(out.contains("**Featured cars**"));
        assert!(out.contains("Toyota Corolla (2022)"));

        let empty = format_home(&[], &[]).unwrap_or_default();
        assert!(empty.contains("No categories yet."));
        assert!(empty.contains("No cars available right now."));
    }

    #[test]
    fn test_format_review() {
        let review = car_rating::Model {
            id: 1,
            car_id: 1,
            user_id: "u".to_string(),
            rating: 3,
            comment: "Fine".to_string(),
            created_at: at("2025-03-01 10:00"),
        };
        assert_eq!(format_review(&review), "★★★ (2025-03-01) Fine");
    }
}
