//! Outbound messages: pagination on top of the gateway primitives, plus the
//! "relax" helpers that turn expected upstream rejections into handled errors.

use rand::seq::IndexedRandom;
use std::sync::Arc;

use super::pagify::auto_pagify;
use crate::application::errors::{PluginError, SendError};
use crate::domain::entities::{Embed, MessageSend, SentMessage};
use crate::domain::traits::Gateway;
use crate::infrastructure::i18n::Texts;

/// Reactions used when the bot may not speak in a channel
const NO_SEND_REACTIONS: [&str; 4] = ["🙊", "🤐", "😶", "🚫"];

fn no_send_reaction() -> &'static str {
    NO_SEND_REACTIONS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(NO_SEND_REACTIONS[0])
}

#[derive(Clone)]
pub struct Messenger {
    gateway: Arc<dyn Gateway>,
    texts: Arc<Texts>,
}

impl Messenger {
    pub fn new(gateway: Arc<dyn Gateway>, texts: Arc<Texts>) -> Self {
        Self { gateway, texts }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Send `text` as one message per page, in order. Stops at the first failure.
    pub async fn send_message(&self, channel_id: &str, text: &str) -> Result<Vec<SentMessage>, SendError> {
        let mut sent = Vec::new();
        for page in auto_pagify(text)? {
            sent.push(self.gateway.send_text(channel_id, &page).await?);
        }
        Ok(sent)
    }

    pub async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<Vec<SentMessage>, SendError> {
        Ok(vec![self.gateway.send_embed(channel_id, embed).await?])
    }

    /// Leading pages go out as plain text, the last page carries the embed
    pub async fn send_complex(&self, channel_id: &str, data: &MessageSend) -> Result<Vec<SentMessage>, SendError> {
        let pages = auto_pagify(&data.content)?;
        let Some((last, leading)) = pages.split_last() else {
            return Ok(vec![self.gateway.send_complex(channel_id, data).await?]);
        };

        let mut sent = Vec::with_capacity(pages.len());
        for page in leading {
            sent.push(self.gateway.send_text(channel_id, page).await?);
        }

        let last = MessageSend {
            content: last.clone(),
            embed: data.embed.clone(),
        };
        sent.push(self.gateway.send_complex(channel_id, &last).await?);
        Ok(sent)
    }

    pub async fn edit_message(&self, channel_id: &str, message_id: &str, text: &str) -> Result<SentMessage, SendError> {
        Ok(self.gateway.edit_text(channel_id, message_id, text).await?)
    }

    pub async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<(), SendError> {
        Ok(self.gateway.add_reaction(channel_id, message_id, emoji).await?)
    }

    /// Missing send permission: react to the command message instead and
    /// return [`PluginError::Handled`]. Other failures pass through.
    pub async fn relax_message<T>(
        &self,
        result: Result<T, SendError>,
        channel_id: &str,
        command_message_id: Option<&str>,
    ) -> Result<T, PluginError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_missing_permissions() => {
                if let Some(message_id) = command_message_id {
                    if let Err(e) = self
                        .gateway
                        .add_reaction(channel_id, message_id, no_send_reaction())
                        .await
                    {
                        tracing::debug!("[{}] could not react either: {}", channel_id, e);
                    }
                }
                Err(PluginError::Handled)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Missing embed permission: tell the user embeds are blocked here and
    /// return [`PluginError::Handled`]. Other failures pass through.
    pub async fn relax_embed<T>(
        &self,
        result: Result<T, SendError>,
        channel_id: &str,
        command_message_id: Option<&str>,
    ) -> Result<T, PluginError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_missing_permissions() => {
                let notice = self.send_message(channel_id, &self.texts.get("bot.errors.no-embed")).await;
                self.relax_message(notice, channel_id, command_message_id).await?;
                Err(PluginError::Handled)
            }
            Err(err) => Err(err.into()),
        }
    }
}
