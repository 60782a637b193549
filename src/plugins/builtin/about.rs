use async_trait::async_trait;

use crate::application::errors::PluginError;
use crate::application::messaging::InvocationContext;
use crate::plugins::CommandPlugin;

pub struct Ping;

#[async_trait]
impl CommandPlugin for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn commands(&self) -> &[&str] {
        &["ping"]
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        ctx.reply(":ping_pong: Pong!").await?;
        Ok(())
    }
}

pub struct About {
    bot_name: String,
}

impl About {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
        }
    }
}

#[async_trait]
impl CommandPlugin for About {
    fn name(&self) -> &str {
        "about"
    }

    fn commands(&self) -> &[&str] {
        &["about", "info"]
    }

    async fn action(&self, ctx: InvocationContext) -> Result<(), PluginError> {
        let text = format!("**{}** v{}", self.bot_name, env!("CARGO_PKG_VERSION"));
        ctx.reply(&text).await?;
        Ok(())
    }
}
