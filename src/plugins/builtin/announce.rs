use async_trait::async_trait;

use crate::application::errors::PluginError;
use crate::application::messaging::InvocationContext;
use crate::domain::entities::Embed;
use crate::plugins::CommandPlugin;

const ANNOUNCE_COLOR: u32 = 0x0FADED;

/// Posts an announcement embed to every configured channel.
/// Registered behind a bot-admin gate.
pub struct Announcement {
    channels: Vec<String>,
}

impl Announcement {
    pub fn new(channels: Vec<String>) -> Self {
        Self { channels }
    }
}

/// Title for a subcommand, or None when the subcommand is unknown
pub fn title_for(kind: &str) -> Option<&'static str> {
    match kind {
        "update" => Some(":loudspeaker: **UPDATE**"),
        "downtime" => Some(":warning: **DOWNTIME**"),
        "maintenance" => Some(":clock5: **MAINTENANCE**"),
        _ => None,
    }
}

#[async_trait]
impl CommandPlugin for Announcement {
    fn name(&self) -> &str {
        "announce"
    }

    fn commands(&self) -> &[&str] {
        &["announce"]
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        let (kind, text) = match ctx.content.split_once(char::is_whitespace) {
            Some((kind, text)) => (kind, text.trim()),
            None => (ctx.content.as_str(), ""),
        };

        let Some(title) = title_for(kind) else {
            ctx.reply(&ctx.text("bot.arguments.invalid")).await?;
            return Ok(());
        };
        if text.is_empty() {
            ctx.reply(&ctx.text("bot.arguments.too-few")).await?;
            return Ok(());
        }

        let embed = Embed::new()
            .with_title(title)
            .with_description(text)
            .with_color(ANNOUNCE_COLOR);

        let mut delivered = 0;
        for channel_id in &self.channels {
            match ctx.session.messenger.send_embed(channel_id, &embed).await {
                Ok(_) => delivered += 1,
                Err(e) => tracing::warn!("[{}] announcement not delivered: {}", channel_id, e),
            }
        }

        let count = delivered.to_string();
        ctx.reply(&ctx.session.texts.get_f("plugins.announce.sent", &[count.as_str()]))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert!(title_for("update").unwrap().contains("UPDATE"));
        assert!(title_for("maintenance").is_some());
        assert!(title_for("party").is_none());
    }
}
