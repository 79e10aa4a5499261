//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Car Rental Help**\n\
        Browse the fleet, rate cars and book them.\n\n\
        **Browsing**\n\
        • `/home` - Shows the categories and a few featured cars.\n\
        • `/categories` - Lists all car categories.\n\
        • `/category <name>` - Shows the available cars in a category.\n\
        • `/companies` - Lists all companies.\n\
        • `/company <name>` - Shows the available cars from a company.\n\
        • `/cars` - Lists all available cars, best rated first.\n\
        • `/search <text>` - Finds cars by name, company or category.\n\
        • `/car <id>` - Shows a car's rates and reviews.\n\n\
        **Renting**\n\
        • `/rate <car id> <1-5> [comment]` - Rates a car (re-rating replaces your old rating).\n\
        • `/book <car id> <type> <YYYY-MM-DD> <HH:MM> <duration>` - Books a car. \
        Duration is in hours, days or 30-day months depending on the rental type.\n\
        • `/mybookings` - Lists your bookings.\n\
        • `/booking <id>` - Shows one of your bookings.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
