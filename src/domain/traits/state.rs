use async_trait::async_trait;

use crate::application::errors::LookupError;
use crate::domain::entities::{Channel, Guild, Member};

/// Read access to guild/channel/member data
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn get_guild(&self, guild_id: &str) -> Result<Guild, LookupError>;
    async fn get_channel(&self, channel_id: &str) -> Result<Channel, LookupError>;
    async fn get_guild_member(&self, guild_id: &str, user_id: &str) -> Result<Member, LookupError>;
}

/// Network side of the state layer, consulted on cache misses
#[async_trait]
pub trait UpstreamState: Send + Sync {
    async fn fetch_guild(&self, guild_id: &str) -> Result<Guild, LookupError>;
    async fn fetch_channel(&self, channel_id: &str) -> Result<Channel, LookupError>;
    async fn fetch_guild_member(&self, guild_id: &str, user_id: &str) -> Result<Member, LookupError>;
}
