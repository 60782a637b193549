//! Shared fixtures: a recording gateway, a recording telemetry sink and a
//! fully wired dispatcher over a small in-memory guild.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use robyul_bot::application::errors::GatewayError;
use robyul_bot::application::messaging::{Dispatcher, Invoker, Messenger, Session};
use robyul_bot::application::services::{PermissionConfig, PermissionEvaluator};
use robyul_bot::domain::entities::{
    permissions, Channel, Embed, Guild, Member, Message, MessageSend, Role, SentMessage, User, EVERYONE_ROLE,
};
use robyul_bot::domain::traits::{ErrorReport, Gateway, TelemetrySink};
use robyul_bot::infrastructure::config::PluginsConfig;
use robyul_bot::infrastructure::i18n::Texts;
use robyul_bot::infrastructure::state::{CachedState, StaticUpstream};
use robyul_bot::plugins::{PluginRegistry, PluginRegistryBuilder};

pub const GUILD: &str = "g1";
pub const CHANNEL: &str = "c1";
pub const DM_CHANNEL: &str = "dm1";
pub const OWNER: &str = "u-owner";
pub const ADMIN: &str = "u-admin";
pub const MODERATOR: &str = "u-mod";
pub const USER: &str = "u-user";
pub const BOT_ADMIN: &str = "u-botadmin";

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub channel_id: String,
    pub content: String,
    pub has_embed: bool,
}

/// Gateway that records every call; sends and embeds can be switched to
/// fail with "missing permissions"
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<Delivered>>,
    reactions: Mutex<Vec<(String, String)>>,
    deny_text: AtomicBool,
    deny_embed: AtomicBool,
    offline: AtomicBool,
    ids: AtomicUsize,
}

impl RecordingGateway {
    pub fn deny_text(&self) {
        self.deny_text.store(true, Ordering::SeqCst);
    }

    pub fn deny_embed(&self) {
        self.deny_embed.store(true, Ordering::SeqCst);
    }

    /// Every send fails with a network error
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Delivered> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|d| d.content).collect()
    }

    pub fn reactions(&self) -> Vec<(String, String)> {
        self.reactions.lock().unwrap().clone()
    }

    fn record(&self, channel_id: &str, content: &str, has_embed: bool) -> SentMessage {
        self.sent.lock().unwrap().push(Delivered {
            channel_id: channel_id.to_string(),
            content: content.to_string(),
            has_embed,
        });
        SentMessage {
            id: format!("sent-{}", self.ids.fetch_add(1, Ordering::SeqCst)),
            channel_id: channel_id.to_string(),
            content: content.to_string(),
            has_embed,
        }
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send_text(&self, channel_id: &str, text: &str) -> Result<SentMessage, GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Network("connection reset".to_string()));
        }
        if self.deny_text.load(Ordering::SeqCst) {
            return Err(GatewayError::missing_permissions());
        }
        Ok(self.record(channel_id, text, false))
    }

    async fn send_embed(&self, channel_id: &str, embed: &Embed) -> Result<SentMessage, GatewayError> {
        if self.deny_embed.load(Ordering::SeqCst) {
            return Err(GatewayError::missing_permissions());
        }
        let content = embed.description.clone().unwrap_or_default();
        Ok(self.record(channel_id, &content, true))
    }

    async fn send_complex(&self, channel_id: &str, data: &MessageSend) -> Result<SentMessage, GatewayError> {
        if data.embed.is_some() && self.deny_embed.load(Ordering::SeqCst) {
            return Err(GatewayError::missing_permissions());
        }
        Ok(self.record(channel_id, &data.content, data.embed.is_some()))
    }

    async fn edit_text(&self, channel_id: &str, message_id: &str, text: &str) -> Result<SentMessage, GatewayError> {
        Ok(SentMessage {
            id: message_id.to_string(),
            channel_id: channel_id.to_string(),
            content: text.to_string(),
            has_embed: false,
        })
    }

    async fn add_reaction(&self, _channel_id: &str, message_id: &str, emoji: &str) -> Result<(), GatewayError> {
        self.reactions
            .lock()
            .unwrap()
            .push((message_id.to_string(), emoji.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingTelemetry {
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn capture(&self, report: ErrorReport) {
        self.reports.lock().unwrap().push(report);
    }
}

pub fn upstream() -> StaticUpstream {
    let guild = Guild::new(GUILD, "Test Guild", OWNER)
        .with_role(Role::new("r-everyone", EVERYONE_ROLE, permissions::SEND_MESSAGES))
        .with_role(Role::new("r-admin", "Admin", 0))
        .with_role(Role::new("r-mod", "Moderator", permissions::KICK_MEMBERS))
        .with_channel(Channel::new(CHANNEL, "general", Some(GUILD.to_string())));
    let dm = Guild::new("g-none", "unused", "nobody").with_channel(Channel::new(DM_CHANNEL, "dm", None));

    StaticUpstream::new()
        .with_guild(guild)
        .with_guild(dm)
        .with_member(Member::new(GUILD, OWNER, vec![]))
        .with_member(Member::new(GUILD, ADMIN, vec!["r-admin".to_string()]))
        .with_member(Member::new(GUILD, MODERATOR, vec!["r-mod".to_string()]))
        .with_member(Member::new(GUILD, USER, vec![]))
}

pub fn permission_config() -> PermissionConfig {
    PermissionConfig::new(
        vec![BOT_ADMIN.to_string()],
        Vec::new(),
        vec!["Admin".to_string()],
        vec!["Moderator".to_string()],
    )
}

pub struct Harness {
    pub gateway: Arc<RecordingGateway>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(register: impl FnOnce(&mut PluginRegistryBuilder)) -> Self {
        Self::with_debug(false, register)
    }

    pub fn with_debug(debug: bool, register: impl FnOnce(&mut PluginRegistryBuilder)) -> Self {
        ensure_init();

        let gateway = Arc::new(RecordingGateway::default());
        let telemetry = Arc::new(RecordingTelemetry::default());
        let texts = Arc::new(Texts::default());
        let state = Arc::new(CachedState::new(upstream()));

        let messenger = Messenger::new(gateway.clone(), texts.clone());
        let permissions = PermissionEvaluator::new(permission_config(), state.clone());
        let session = Session::new(messenger.clone(), state, permissions, texts.clone());
        let invoker = Invoker::new(messenger, telemetry.clone(), texts, debug);

        let mut builder = PluginRegistry::builder(PluginsConfig::default());
        register(&mut builder);
        let registry = Arc::new(builder.build());

        Self {
            gateway,
            telemetry,
            dispatcher: Dispatcher::new(registry, session, invoker),
        }
    }

    pub fn message(&self, author: &str, content: &str) -> Message {
        Message::new(CHANNEL, User::new(author).with_username(author), content)
    }

    /// Wait for every invocation started so far
    pub async fn drain(&self) {
        self.dispatcher.invoker().shutdown().await;
    }
}
