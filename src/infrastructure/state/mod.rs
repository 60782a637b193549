//! Guild/channel/member lookups: local cache first, upstream on miss

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::LookupError;
use crate::domain::entities::{Channel, Guild, Member};
use crate::domain::traits::{StateSource, UpstreamState};

/// Read-through cache in front of an [`UpstreamState`]
pub struct CachedState<U> {
    upstream: U,
    guilds: Arc<RwLock<HashMap<String, Guild>>>,
    channels: Arc<RwLock<HashMap<String, Channel>>>,
    members: Arc<RwLock<HashMap<(String, String), Member>>>,
}

impl<U: UpstreamState> CachedState<U> {
    pub fn new(upstream: U) -> Self {
        Self {
            upstream,
            guilds: Arc::new(RwLock::new(HashMap::new())),
            channels: Arc::new(RwLock::new(HashMap::new())),
            members: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Seed the cache, e.g. from a gateway "guild create" event
    pub async fn insert_guild(&self, guild: Guild) {
        let mut channels = self.channels.write().await;
        for channel in &guild.channels {
            channels.insert(channel.id.clone(), channel.clone());
        }
        self.guilds.write().await.insert(guild.id.clone(), guild);
    }

    pub async fn insert_member(&self, member: Member) {
        let key = (member.guild_id.clone(), member.user_id.clone());
        self.members.write().await.insert(key, member);
    }

    /// Drop a guild and everything cached under it
    pub async fn evict_guild(&self, guild_id: &str) {
        self.guilds.write().await.remove(guild_id);
        self.channels
            .write()
            .await
            .retain(|_, c| c.guild_id.as_deref() != Some(guild_id));
        self.members.write().await.retain(|(g, _), _| g != guild_id);
    }
}

#[async_trait]
impl<U: UpstreamState> StateSource for CachedState<U> {
    async fn get_guild(&self, guild_id: &str) -> Result<Guild, LookupError> {
        if let Some(guild) = self.guilds.read().await.get(guild_id) {
            return Ok(guild.clone());
        }

        tracing::debug!(method = "get_guild", "upstream request: guild {}", guild_id);
        let guild = self.upstream.fetch_guild(guild_id).await?;
        self.guilds.write().await.insert(guild_id.to_string(), guild.clone());
        Ok(guild)
    }

    async fn get_channel(&self, channel_id: &str) -> Result<Channel, LookupError> {
        if let Some(channel) = self.channels.read().await.get(channel_id) {
            return Ok(channel.clone());
        }

        tracing::debug!(method = "get_channel", "upstream request: channel {}", channel_id);
        let channel = self.upstream.fetch_channel(channel_id).await?;
        self.channels.write().await.insert(channel_id.to_string(), channel.clone());
        Ok(channel)
    }

    async fn get_guild_member(&self, guild_id: &str, user_id: &str) -> Result<Member, LookupError> {
        let key = (guild_id.to_string(), user_id.to_string());
        if let Some(member) = self.members.read().await.get(&key) {
            return Ok(member.clone());
        }

        tracing::debug!(
            method = "get_guild_member",
            "upstream request: member {} in guild {}",
            user_id,
            guild_id
        );
        let member = self.upstream.fetch_guild_member(guild_id, user_id).await?;
        self.members.write().await.insert(key, member.clone());
        Ok(member)
    }
}

/// In-memory upstream, the data source of the console adapter and of tests
#[derive(Default)]
pub struct StaticUpstream {
    guilds: std::sync::RwLock<HashMap<String, Guild>>,
    members: std::sync::RwLock<HashMap<(String, String), Member>>,
    fetches: std::sync::atomic::AtomicUsize,
}

impl StaticUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(self, guild: Guild) -> Self {
        if let Ok(mut guilds) = self.guilds.write() {
            guilds.insert(guild.id.clone(), guild);
        }
        self
    }

    pub fn with_member(self, member: Member) -> Self {
        if let Ok(mut members) = self.members.write() {
            members.insert((member.guild_id.clone(), member.user_id.clone()), member);
        }
        self
    }

    /// Number of upstream fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn record_fetch(&self) {
        self.fetches.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn poisoned() -> LookupError {
        LookupError::Upstream("Lock poisoned".to_string())
    }
}

#[async_trait]
impl UpstreamState for StaticUpstream {
    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, LookupError> {
        self.record_fetch();
        self.guilds
            .read()
            .map_err(|_| Self::poisoned())?
            .get(guild_id)
            .cloned()
            .ok_or_else(|| LookupError::GuildNotFound(guild_id.to_string()))
    }

    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, LookupError> {
        self.record_fetch();
        self.guilds
            .read()
            .map_err(|_| Self::poisoned())?
            .values()
            .flat_map(|g| g.channels.iter())
            .find(|c| c.id == channel_id)
            .cloned()
            .ok_or_else(|| LookupError::ChannelNotFound(channel_id.to_string()))
    }

    async fn fetch_guild_member(&self, guild_id: &str, user_id: &str) -> Result<Member, LookupError> {
        self.record_fetch();
        self.members
            .read()
            .map_err(|_| Self::poisoned())?
            .get(&(guild_id.to_string(), user_id.to_string()))
            .cloned()
            .ok_or_else(|| LookupError::MemberNotFound {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    fn upstream() -> StaticUpstream {
        StaticUpstream::new()
            .with_guild(
                Guild::new("g1", "Guild", "owner")
                    .with_role(Role::new("r1", "Mod", 0))
                    .with_channel(Channel::new("c1", "general", Some("g1".into()))),
            )
            .with_member(Member::new("g1", "u1", vec!["r1".into()]))
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let state = CachedState::new(upstream());

        let first = state.get_guild("g1").await.unwrap();
        let second = state.get_guild("g1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(state.upstream().fetch_count(), 1);

        state.get_guild_member("g1", "u1").await.unwrap();
        state.get_guild_member("g1", "u1").await.unwrap();
        assert_eq!(state.upstream().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_seeded_guild_serves_channels() {
        let state = CachedState::new(StaticUpstream::new());
        state
            .insert_guild(Guild::new("g2", "Seeded", "o").with_channel(Channel::new("c9", "x", Some("g2".into()))))
            .await;

        let channel = state.get_channel("c9").await.unwrap();
        assert_eq!(channel.guild_id.as_deref(), Some("g2"));
        assert_eq!(state.upstream().fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_propagates_lookup_error() {
        let state = CachedState::new(upstream());

        let err = state.get_guild_member("g1", "nobody").await.unwrap_err();
        assert!(matches!(err, LookupError::MemberNotFound { .. }));

        let err = state.get_channel("nope").await.unwrap_err();
        assert_eq!(err, LookupError::ChannelNotFound("nope".into()));
    }

    #[tokio::test]
    async fn test_evict_guild_forces_refetch() {
        let state = CachedState::new(upstream());
        state.get_guild("g1").await.unwrap();
        state.evict_guild("g1").await;
        state.get_guild("g1").await.unwrap();
        assert_eq!(state.upstream().fetch_count(), 2);
    }
}
