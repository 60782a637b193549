//! Plugins shipped with the bot

mod about;
mod announce;
mod choice;
mod triggers;

pub use about::{About, Ping};
pub use announce::Announcement;
pub use choice::Choice;
pub use triggers::{EightBall, Hi};

use super::registry::PluginRegistryBuilder;
use super::trait_def::require_bot_admin;
use crate::application::errors::RegistryError;
use crate::infrastructure::config::Config;

/// Registration order is resolution order
pub fn register_all(builder: &mut PluginRegistryBuilder, config: &Config) -> Result<(), RegistryError> {
    builder.register_command(About::new(config.bot.name.clone()))?;
    builder.register_command(Ping)?;
    builder.register_command(Choice)?;
    builder.register_command(require_bot_admin(Announcement::new(
        config.announcements.channels.clone(),
    )))?;

    builder.register_trigger(Hi)?;
    builder.register_trigger(EightBall)?;
    Ok(())
}
