//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests category and company names as the user types, so the name passed to
//! `/category` and `/company` matches a stored record exactly.

use crate::{bot::BotData, core::catalog, errors::Error};

/// Discord shows at most this many suggestions.
const AUTOCOMPLETE_LIMIT: usize = 25;

/// Names containing `partial` (case-insensitive), sorted and capped for Discord.
fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.truncate(AUTOCOMPLETE_LIMIT);
    matching
}

/// Provides autocomplete suggestions for category names.
pub async fn autocomplete_category_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(categories) = catalog::list_categories(db).await else {
        return Vec::new();
    };
    matching_names(categories.into_iter().map(|c| c.name), partial)
}

/// Provides autocomplete suggestions for company names.
pub async fn autocomplete_company_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let Ok(companies) = catalog::list_companies(db).await else {
        return Vec::new();
    };
    matching_names(companies.into_iter().map(|c| c.name), partial)
}
