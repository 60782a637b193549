//! Permission evaluation: bot-admin / super-moderator allow-lists and
//! guild-scoped admin / moderator checks.
//!
//! Guild checks read role data through a [`StateSource`]. Any lookup failure
//! surfaces as a [`LookupError`]; gate callers must treat it as a denial.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::errors::LookupError;
use crate::domain::entities::{permissions, Guild, Member};
use crate::domain::traits::StateSource;

/// Privilege tiers, lowest first. A higher tier passes every lower gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PermissionLevel {
    None,
    Moderator,
    Administrator,
    RobyulMod,
    BotAdmin,
}

impl PermissionLevel {
    /// Text key of the denial message for a gate at this level
    pub fn denial_key(&self) -> Option<&'static str> {
        match self {
            PermissionLevel::None => None,
            PermissionLevel::Moderator => Some("mod.no_permission"),
            PermissionLevel::Administrator => Some("admin.no_permission"),
            PermissionLevel::RobyulMod => Some("robyulmod.no_permission"),
            PermissionLevel::BotAdmin => Some("botadmin.no_permission"),
        }
    }

    /// Tiers that never need guild data
    pub fn is_global(&self) -> bool {
        matches!(self, PermissionLevel::RobyulMod | PermissionLevel::BotAdmin)
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PermissionLevel::None => "none",
            PermissionLevel::Moderator => "moderator",
            PermissionLevel::Administrator => "administrator",
            PermissionLevel::RobyulMod => "robyul-mod",
            PermissionLevel::BotAdmin => "bot-admin",
        };
        f.write_str(name)
    }
}

/// Immutable allow-lists and role-name lists, built once at startup
#[derive(Debug, Clone, Default)]
pub struct PermissionConfig {
    bot_admins: HashSet<String>,
    robyul_mods: HashSet<String>,
    admin_role_names: Vec<String>,
    mod_role_names: Vec<String>,
}

impl PermissionConfig {
    pub fn new(
        bot_admins: impl IntoIterator<Item = String>,
        robyul_mods: impl IntoIterator<Item = String>,
        admin_role_names: impl IntoIterator<Item = String>,
        mod_role_names: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            bot_admins: bot_admins.into_iter().collect(),
            robyul_mods: robyul_mods.into_iter().collect(),
            admin_role_names: admin_role_names.into_iter().collect(),
            mod_role_names: mod_role_names.into_iter().collect(),
        }
    }
}

/// Answers "may this actor do X here?"
#[derive(Clone)]
pub struct PermissionEvaluator {
    config: Arc<PermissionConfig>,
    state: Arc<dyn StateSource>,
}

impl PermissionEvaluator {
    pub fn new(config: PermissionConfig, state: Arc<dyn StateSource>) -> Self {
        Self {
            config: Arc::new(config),
            state,
        }
    }

    pub fn is_bot_admin(&self, actor_id: &str) -> bool {
        self.config.bot_admins.contains(actor_id)
    }

    pub fn is_robyul_mod(&self, actor_id: &str) -> bool {
        self.is_bot_admin(actor_id) || self.config.robyul_mods.contains(actor_id)
    }

    /// Owner, bot-admin, a role with the administrator bit, or a role named
    /// like an admin role (checked after the bit, case-sensitive).
    pub async fn is_admin(&self, guild_id: &str, actor_id: &str) -> Result<bool, LookupError> {
        let guild = self.state.get_guild(guild_id).await?;

        if actor_id == guild.owner_id || self.is_bot_admin(actor_id) {
            return Ok(true);
        }

        let member = self.state.get_guild_member(&guild.id, actor_id).await?;
        Ok(self.holds_admin_role(&guild, &member))
    }

    /// Admin, or a role named like a moderator role
    pub async fn is_mod(&self, guild_id: &str, actor_id: &str) -> Result<bool, LookupError> {
        if self.is_admin(guild_id, actor_id).await? {
            return Ok(true);
        }

        let guild = self.state.get_guild(guild_id).await?;
        let member = self.state.get_guild_member(&guild.id, actor_id).await?;
        let is_mod = guild
            .member_roles(&member)
            .any(|role| self.config.mod_role_names.contains(&role.name));
        Ok(is_mod)
    }

    /// Owner, or any held role carrying every bit of `permission`.
    /// Bot-admins get no special treatment here.
    pub async fn has_permission(&self, guild_id: &str, actor_id: &str, permission: u64) -> Result<bool, LookupError> {
        let guild = self.state.get_guild(guild_id).await?;

        if actor_id == guild.owner_id {
            return Ok(true);
        }

        let member = self.state.get_guild_member(&guild.id, actor_id).await?;
        let granted = guild.member_roles(&member).any(|role| role.grants(permission));
        Ok(granted)
    }

    /// Highest tier the actor holds. Global tiers resolve without a guild;
    /// guild tiers need one and fail when it can't be resolved.
    pub async fn level_of(&self, guild_id: Option<&str>, actor_id: &str) -> Result<PermissionLevel, LookupError> {
        if self.is_bot_admin(actor_id) {
            return Ok(PermissionLevel::BotAdmin);
        }
        if self.is_robyul_mod(actor_id) {
            return Ok(PermissionLevel::RobyulMod);
        }

        let Some(guild_id) = guild_id else {
            return Ok(PermissionLevel::None);
        };

        if self.is_admin(guild_id, actor_id).await? {
            Ok(PermissionLevel::Administrator)
        } else if self.is_mod(guild_id, actor_id).await? {
            Ok(PermissionLevel::Moderator)
        } else {
            Ok(PermissionLevel::None)
        }
    }

    /// True iff the actor's tier is at least `required`
    pub async fn check(&self, required: PermissionLevel, guild_id: Option<&str>, actor_id: &str) -> Result<bool, LookupError> {
        match required {
            PermissionLevel::None => Ok(true),
            PermissionLevel::BotAdmin => Ok(self.is_bot_admin(actor_id)),
            PermissionLevel::RobyulMod => Ok(self.is_robyul_mod(actor_id)),
            PermissionLevel::Administrator | PermissionLevel::Moderator => {
                // bot-admins are robyul-mods too
                if self.is_robyul_mod(actor_id) {
                    return Ok(true);
                }
                let guild_id = guild_id.ok_or_else(|| LookupError::NotInGuild(actor_id.to_string()))?;
                Ok(self.level_of(Some(guild_id), actor_id).await? >= required)
            }
        }
    }

    /// Resolve the guild a channel belongs to
    pub async fn guild_of_channel(&self, channel_id: &str) -> Result<String, LookupError> {
        let channel = self.state.get_channel(channel_id).await?;
        channel
            .guild_id
            .ok_or_else(|| LookupError::NotInGuild(channel_id.to_string()))
    }

    fn holds_admin_role(&self, guild: &Guild, member: &Member) -> bool {
        guild.member_roles(member).any(|role| {
            role.grants(permissions::ADMINISTRATOR) || self.config.admin_role_names.contains(&role.name)
        })
    }
}
