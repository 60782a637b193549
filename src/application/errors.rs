//! Application layer errors

use thiserror::Error;

use crate::application::messaging::pagify::PagifyError;

/// REST code the gateway returns when the bot lacks a channel permission
pub const MISSING_PERMISSIONS: u32 = 50013;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Plugin '{plugin}' failed to initialize: {reason}")]
    PluginInit { plugin: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Guild/channel/member data could not be resolved locally or upstream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Guild not found: {0}")]
    GuildNotFound(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Member {user_id} not found in guild {guild_id}")]
    MemberNotFound { guild_id: String, user_id: String },

    #[error("Channel {0} does not belong to a guild")]
    NotInGuild(String),

    #[error("Upstream lookup failed: {0}")]
    Upstream(String),
}

/// Errors reported by the chat gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("HTTP {status}, {code}: {message}")]
    Rest { status: u16, code: u32, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl GatewayError {
    pub fn rest(status: u16, code: u32, message: impl Into<String>) -> Self {
        GatewayError::Rest {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn missing_permissions() -> Self {
        Self::rest(403, MISSING_PERMISSIONS, "Missing Permissions")
    }

    /// The bot lacks send/embed/react permission in the target channel
    pub fn is_missing_permissions(&self) -> bool {
        matches!(self, GatewayError::Rest { code, .. } if *code == MISSING_PERMISSIONS)
    }

    /// Message body of a structured REST rejection
    pub fn rest_message(&self) -> Option<&str> {
        match self {
            GatewayError::Rest { message, .. } => Some(message),
            GatewayError::Network(_) => None,
        }
    }
}

/// Failure to deliver a (possibly multi-page) message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Pagify(#[from] PagifyError),
}

impl SendError {
    pub fn is_missing_permissions(&self) -> bool {
        matches!(self, SendError::Gateway(e) if e.is_missing_permissions())
    }
}

/// Errors raised while building the plugin registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command '{command}' of plugin '{plugin}' is already registered by '{existing}'")]
    DuplicateCommand {
        command: String,
        plugin: String,
        existing: String,
    },

    #[error("Plugin '{0}' already registered")]
    DuplicatePlugin(String),
}

/// Outcome of a failed handler execution
#[derive(Error, Debug)]
pub enum PluginError {
    /// A lower layer already told the user; the invoker stays silent
    #[error("handled upstream error")]
    Handled,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Pagify(#[from] PagifyError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("{0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl From<SendError> for PluginError {
    fn from(err: SendError) -> Self {
        match err {
            SendError::Gateway(e) => PluginError::Gateway(e),
            SendError::Pagify(e) => PluginError::Pagify(e),
        }
    }
}

impl PluginError {
    pub fn failed(msg: impl Into<String>) -> Self {
        PluginError::Failed(msg.into())
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, PluginError::Handled)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
