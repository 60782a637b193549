//! Console adapter for development/testing

use async_trait::async_trait;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::application::errors::GatewayError;
use crate::application::messaging::{Dispatcher, EventParser};
use crate::domain::entities::{
    permissions, Channel, Embed, Guild, Member, Message, MessageSend, Role, SentMessage, User, EVERYONE_ROLE,
};
use crate::domain::traits::Gateway;
use crate::infrastructure::config::ConsoleConfig;
use crate::infrastructure::state::StaticUpstream;

/// Console gateway: everything the bot sends is printed to stdout
pub struct ConsoleAdapter {
    config: ConsoleConfig,
    next_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Wrap a stdin line as a message from the console user
    pub fn message(&self, line: &str) -> Message {
        let author = User::new(self.config.user_id.clone()).with_username(self.config.username.clone());
        Message::new(self.config.channel_id.clone(), author, line).with_id(self.next_message_id())
    }

    /// One guild owned by the console user, one text channel, one membership
    pub fn upstream(&self) -> StaticUpstream {
        let c = &self.config;
        let guild = Guild::new(c.guild_id.clone(), "console", c.user_id.clone())
            .with_role(Role::new(
                c.guild_id.clone(),
                EVERYONE_ROLE,
                permissions::SEND_MESSAGES | permissions::EMBED_LINKS | permissions::ADD_REACTIONS,
            ))
            .with_channel(Channel::new(c.channel_id.clone(), "console", Some(c.guild_id.clone())));

        StaticUpstream::new()
            .with_guild(guild)
            .with_member(Member::new(c.guild_id.clone(), c.user_id.clone(), Vec::new()))
    }

    /// Feed input lines through the parser and dispatcher until EOF, a read
    /// error or `shutdown` resolves. Returns the number of invocations scheduled.
    pub async fn pump<R, S>(&self, input: R, parser: &EventParser, dispatcher: &Dispatcher, shutdown: S) -> usize
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = input.lines();
        let mut scheduled = 0;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            tracing::info!("Console closed");
                            break;
                        }
                        Err(e) => {
                            tracing::error!("Failed to read console input: {}", e);
                            break;
                        }
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let message = self.message(line);
                    match parser.parse(&message) {
                        Some(event) => scheduled += dispatcher.dispatch(event, message),
                        None => tracing::debug!("Ignoring non-command input"),
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("Interrupted");
                    break;
                }
            }
        }
        scheduled
    }

    fn next_message_id(&self) -> String {
        format!("console-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn sent(&self, channel_id: &str, content: &str, has_embed: bool) -> SentMessage {
        SentMessage {
            id: self.next_message_id(),
            channel_id: channel_id.to_string(),
            content: content.to_string(),
            has_embed,
        }
    }
}

fn print_embed(embed: &Embed) {
    if let Some(title) = &embed.title {
        println!("  [Embed] {}", title);
    }
    if let Some(description) = &embed.description {
        for line in description.lines() {
            println!("  | {}", line);
        }
    }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<SentMessage, GatewayError> {
        println!("[BOT] {}", text);
        Ok(self.sent(channel_id, text, false))
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<SentMessage, GatewayError> {
        print_embed(embed);
        Ok(self.sent(channel_id, "", true))
    }

    async fn send_complex(&self, channel_id: &str, data: &MessageSend) -> Result<SentMessage, GatewayError> {
        if !data.content.is_empty() {
            println!("[BOT] {}", data.content);
        }
        if let Some(embed) = &data.embed {
            print_embed(embed);
        }
        Ok(self.sent(channel_id, &data.content, data.embed.is_some()))
    }

    async fn edit_text(&self, channel_id: &str, message_id: &str, text: &str) -> Result<SentMessage, GatewayError> {
        println!("[BOT] (edited {}) {}", message_id, text);
        Ok(SentMessage {
            id: message_id.to_string(),
            channel_id: channel_id.to_string(),
            content: text.to_string(),
            has_embed: false,
        })
    }

    async fn add_reaction(&self, _channel_id: &str, message_id: &str, emoji: &str) -> Result<(), GatewayError> {
        println!("[BOT] reacted {} to {}", emoji, message_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::UpstreamState;

    #[tokio::test]
    async fn test_console_user_owns_console_guild() {
        let adapter = ConsoleAdapter::new(ConsoleConfig::default());
        let upstream = adapter.upstream();

        let guild = upstream.fetch_guild("10").await.unwrap();
        assert_eq!(guild.owner_id, "100");
        let channel = upstream.fetch_channel("20").await.unwrap();
        assert_eq!(channel.guild_id.as_deref(), Some("10"));
        assert!(upstream.fetch_guild_member("10", "100").await.is_ok());
    }

    #[tokio::test]
    async fn test_message_ids_are_unique() {
        let adapter = ConsoleAdapter::new(ConsoleConfig::default());
        let a = adapter.message("_ping");
        let b = adapter.message("_ping");
        assert_ne!(a.id, b.id);
        assert_eq!(a.author.id, "100");

        let sent = adapter.send_text("20", "hello").await.unwrap();
        assert_ne!(sent.id, a.id);
    }
}
