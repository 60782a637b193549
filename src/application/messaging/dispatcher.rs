//! Message dispatcher - Routes parsed events to plugins

use std::sync::Arc;

use super::context::{InvocationContext, Origin, Session};
use super::invoker::Invoker;
use super::parser::InboundEvent;
use crate::domain::entities::Message;
use crate::plugins::PluginRegistry;

/// Resolves events against the registry and hands each match to the invoker.
///
/// Dispatch itself never awaits: gate computation, permission lookups and
/// handler bodies all run inside the spawned invocation. Handlers have no
/// timeout; a hung one keeps its task alive until shutdown.
pub struct Dispatcher {
    registry: Arc<PluginRegistry>,
    session: Session,
    invoker: Invoker,
}

impl Dispatcher {
    pub fn new(registry: Arc<PluginRegistry>, session: Session, invoker: Invoker) -> Self {
        Self {
            registry,
            session,
            invoker,
        }
    }

    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    /// Number of invocations scheduled for the event
    pub fn dispatch(&self, event: InboundEvent, message: Message) -> usize {
        match event {
            InboundEvent::Command { command, content } => {
                usize::from(self.dispatch_command(&command, &content, message))
            }
            InboundEvent::Trigger { trigger, content } => self.dispatch_trigger(&trigger, &content, message),
        }
    }

    /// Unknown commands are ignored without a reply
    pub fn dispatch_command(&self, command: &str, content: &str, message: Message) -> bool {
        let Some(plugin) = self.registry.resolve_command(command) else {
            tracing::debug!("[{}] unknown command: {}", message.channel_id, command);
            return false;
        };

        let origin = Origin::new(plugin.name(), message);
        let ctx = InvocationContext::new(&origin, command, content, self.session.clone());

        tracing::debug!(
            invocation = %origin.invocation_id,
            "[{}] {} -> {}",
            origin.message.channel_id,
            command,
            plugin.name()
        );

        self.invoker.spawn(origin, async move {
            let required = plugin.required_level(&ctx.command, &ctx.content);
            if !ctx.session.require(required, &ctx.message).await? {
                return Ok(());
            }
            plugin.action(ctx).await
        });
        true
    }

    /// Every trigger plugin declaring `trigger` runs, each in its own task
    pub fn dispatch_trigger(&self, trigger: &str, content: &str, message: Message) -> usize {
        let plugins = self.registry.resolve_triggers(trigger);
        if plugins.is_empty() {
            return 0;
        }

        for plugin in &plugins {
            let plugin = Arc::clone(plugin);
            let origin = Origin::new(plugin.name(), message.clone());
            let messenger = self.session.messenger.clone();
            let trigger = trigger.to_string();
            let content = content.trim().to_string();
            let channel_id = message.channel_id.clone();
            let message_id = message.id.clone();

            self.invoker.spawn(origin, async move {
                let response = plugin.response(&trigger, &content);
                let sent = messenger.send_message(&channel_id, &response).await;
                messenger.relax_message(sent, &channel_id, Some(&message_id)).await?;
                Ok(())
            });
        }

        tracing::debug!("[{}] trigger {} -> {} plugin(s)", message.channel_id, trigger, plugins.len());
        plugins.len()
    }
}
