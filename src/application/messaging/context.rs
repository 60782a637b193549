//! Shared handles and the per-invocation context handed to plugins

use std::sync::Arc;

use super::messenger::Messenger;
use crate::application::errors::PluginError;
use crate::application::services::{PermissionEvaluator, PermissionLevel};
use crate::domain::entities::{Embed, Message, SentMessage};
use crate::domain::traits::StateSource;
use crate::infrastructure::i18n::Texts;

/// Process-wide collaborators, cheap to clone
#[derive(Clone)]
pub struct Session {
    pub messenger: Messenger,
    pub state: Arc<dyn StateSource>,
    pub permissions: PermissionEvaluator,
    pub texts: Arc<Texts>,
}

impl Session {
    pub fn new(
        messenger: Messenger,
        state: Arc<dyn StateSource>,
        permissions: PermissionEvaluator,
        texts: Arc<Texts>,
    ) -> Self {
        Self {
            messenger,
            state,
            permissions,
            texts,
        }
    }

    /// Whether the message author passes a gate at `level`.
    /// Lookup failures deny.
    pub async fn allows(&self, level: PermissionLevel, message: &Message) -> bool {
        if level == PermissionLevel::None {
            return true;
        }

        let guild_id = if level.is_global() {
            None
        } else {
            match self.permissions.guild_of_channel(&message.channel_id).await {
                Ok(guild_id) => Some(guild_id),
                Err(e) => {
                    tracing::debug!("[{}] no guild for gate: {}", message.channel_id, e);
                    None
                }
            }
        };

        match self
            .permissions
            .check(level, guild_id.as_deref(), &message.author.id)
            .await
        {
            Ok(allowed) => allowed,
            Err(e) => {
                tracing::warn!(
                    "[{}] permission lookup for {} failed, denying: {}",
                    message.channel_id,
                    message.author.id,
                    e
                );
                false
            }
        }
    }

    /// Gate: on denial, send the level's "no permission" text and return false
    pub async fn require(&self, level: PermissionLevel, message: &Message) -> Result<bool, PluginError> {
        if self.allows(level, message).await {
            return Ok(true);
        }

        tracing::debug!(
            "[{}] {} denied, {} required",
            message.channel_id,
            message.author.id,
            level
        );
        if let Some(key) = level.denial_key() {
            let sent = self
                .messenger
                .send_message(&message.channel_id, &self.texts.get(key))
                .await;
            match self
                .messenger
                .relax_message(sent, &message.channel_id, Some(&message.id))
                .await
            {
                Ok(_) | Err(PluginError::Handled) => {}
                Err(e) => tracing::warn!("[{}] could not deliver denial: {}", message.channel_id, e),
            }
        }
        Ok(false)
    }
}

/// Where an invocation came from, for error attribution
#[derive(Debug, Clone)]
pub struct Origin {
    pub invocation_id: String,
    pub handler: String,
    pub message: Message,
}

impl Origin {
    pub fn new(handler: impl Into<String>, message: Message) -> Self {
        Self {
            invocation_id: uuid::Uuid::new_v4().to_string(),
            handler: handler.into(),
            message,
        }
    }
}

/// Everything a command plugin gets for one invocation
#[derive(Clone)]
pub struct InvocationContext {
    pub invocation_id: String,
    pub command: String,
    /// Text after the command, whitespace-trimmed
    pub content: String,
    pub message: Message,
    pub session: Session,
}

impl InvocationContext {
    pub fn new(origin: &Origin, command: impl Into<String>, content: &str, session: Session) -> Self {
        Self {
            invocation_id: origin.invocation_id.clone(),
            command: command.into(),
            content: content.trim().to_string(),
            message: origin.message.clone(),
            session,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.message.channel_id
    }

    /// Whitespace-separated arguments
    pub fn args(&self) -> Vec<&str> {
        self.content.split_whitespace().collect()
    }

    pub fn text(&self, key: &str) -> String {
        self.session.texts.get(key)
    }

    /// Send text to the originating channel
    pub async fn reply(&self, text: &str) -> Result<Vec<SentMessage>, PluginError> {
        let sent = self.session.messenger.send_message(self.channel_id(), text).await;
        self.session
            .messenger
            .relax_message(sent, self.channel_id(), Some(&self.message.id))
            .await
    }

    /// Send an embed to the originating channel
    pub async fn reply_embed(&self, embed: &Embed) -> Result<Vec<SentMessage>, PluginError> {
        let sent = self.session.messenger.send_embed(self.channel_id(), embed).await;
        self.session
            .messenger
            .relax_embed(sent, self.channel_id(), Some(&self.message.id))
            .await
    }

    /// Subcommand gate inside a handler
    pub async fn require(&self, level: PermissionLevel) -> Result<bool, PluginError> {
        self.session.require(level, &self.message).await
    }

    pub async fn guild_id(&self) -> Result<String, PluginError> {
        Ok(self.session.permissions.guild_of_channel(self.channel_id()).await?)
    }
}
