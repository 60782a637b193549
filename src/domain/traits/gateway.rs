use async_trait::async_trait;

use crate::application::errors::GatewayError;
use crate::domain::entities::{Embed, MessageSend, SentMessage};

/// Gateway trait - single-message primitives of the chat platform.
///
/// Implementations send exactly what they are given; splitting oversized
/// text is done by [`crate::application::messaging::Messenger`].
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<SentMessage, GatewayError>;

    /// Send an embed without text
    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<SentMessage, GatewayError>;

    /// Send text and an optional embed in one message
    async fn send_complex(&self, channel_id: &str, data: &MessageSend) -> Result<SentMessage, GatewayError>;

    /// Replace the text of a message the bot sent
    async fn edit_text(&self, channel_id: &str, message_id: &str, text: &str) -> Result<SentMessage, GatewayError>;

    /// React to a message with an emoji
    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), GatewayError>;
}
