//! Plugin trait definitions

use async_trait::async_trait;

use crate::application::errors::PluginError;
use crate::application::messaging::{InvocationContext, Session};
use crate::application::services::PermissionLevel;

/// A plugin reached through explicit commands (`_ping`, `_gallery add ...`)
#[async_trait]
pub trait CommandPlugin: Send + Sync {
    /// Unique identifier, also the key of the enable/disable set
    fn name(&self) -> &str;

    /// Command names and aliases
    fn commands(&self) -> &[&str];

    /// Gate checked before `action` runs. May depend on the subcommand.
    fn required_level(&self, _command: &str, _content: &str) -> PermissionLevel {
        PermissionLevel::None
    }

    /// Called once at startup
    async fn init(&self, _session: &Session) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called once at shutdown
    async fn uninit(&self, _session: &Session) {}

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError>;
}

/// A plugin that answers a keyword in ordinary chat
pub trait TriggerPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn triggers(&self) -> &[&str];

    fn response(&self, trigger: &str, content: &str) -> String;
}

/// Wraps a command plugin behind a fixed permission gate
pub struct Gated<P> {
    inner: P,
    level: PermissionLevel,
}

impl<P: CommandPlugin> Gated<P> {
    pub fn new(inner: P, level: PermissionLevel) -> Self {
        Self { inner, level }
    }
}

pub fn require_mod<P: CommandPlugin>(plugin: P) -> Gated<P> {
    Gated::new(plugin, PermissionLevel::Moderator)
}

pub fn require_admin<P: CommandPlugin>(plugin: P) -> Gated<P> {
    Gated::new(plugin, PermissionLevel::Administrator)
}

pub fn require_robyul_mod<P: CommandPlugin>(plugin: P) -> Gated<P> {
    Gated::new(plugin, PermissionLevel::RobyulMod)
}

pub fn require_bot_admin<P: CommandPlugin>(plugin: P) -> Gated<P> {
    Gated::new(plugin, PermissionLevel::BotAdmin)
}

#[async_trait]
impl<P: CommandPlugin> CommandPlugin for Gated<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn commands(&self) -> &[&str] {
        self.inner.commands()
    }

    fn required_level(&self, command: &str, content: &str) -> PermissionLevel {
        self.level.max(self.inner.required_level(command, content))
    }

    async fn init(&self, session: &Session) -> Result<(), PluginError> {
        self.inner.init(session).await
    }

    async fn uninit(&self, session: &Session) {
        self.inner.uninit(session).await
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        self.inner.action(ctx).await
    }
}
