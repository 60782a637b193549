use serde::{Deserialize, Serialize};

/// Permission bits, matching the chat platform's bit layout
pub mod permissions {
    pub const KICK_MEMBERS: u64 = 1 << 1;
    pub const BAN_MEMBERS: u64 = 1 << 2;
    pub const ADMINISTRATOR: u64 = 1 << 3;
    pub const MANAGE_CHANNELS: u64 = 1 << 4;
    pub const MANAGE_GUILD: u64 = 1 << 5;
    pub const ADD_REACTIONS: u64 = 1 << 6;
    pub const SEND_MESSAGES: u64 = 1 << 11;
    pub const MANAGE_MESSAGES: u64 = 1 << 13;
    pub const EMBED_LINKS: u64 = 1 << 14;
    pub const MANAGE_ROLES: u64 = 1 << 28;
}

/// Name of the implicit role every member holds
pub const EVERYONE_ROLE: &str = "@everyone";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: u64,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, permissions: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions,
        }
    }

    /// True when every bit of `permission` is set on this role
    pub fn grants(&self, permission: u64) -> bool {
        self.permissions & permission == permission
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// None for direct-message channels
    pub guild_id: Option<String>,
}

impl Channel {
    pub fn new(id: impl Into<String>, name: impl Into<String>, guild_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            guild_id,
        }
    }
}

/// An actor's membership in one guild: role ids only, roles are owned by the guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: String,
    pub user_id: String,
    pub roles: Vec<String>,
}

impl Member {
    pub fn new(guild_id: impl Into<String>, user_id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            user_id: user_id.into(),
            roles,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub roles: Vec<Role>,
    pub channels: Vec<Channel>,
}

impl Guild {
    pub fn new(id: impl Into<String>, name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: owner_id.into(),
            roles: Vec::new(),
            channels: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Guild roles the member holds, in guild role order.
    /// Role ids on the member that the guild doesn't know are skipped.
    pub fn member_roles<'a>(&'a self, member: &'a Member) -> impl Iterator<Item = &'a Role> + 'a {
        self.roles
            .iter()
            .filter(move |role| member.roles.iter().any(|id| *id == role.id))
    }
}

/// Union of the `@everyone` bits and the bits of every role the member holds
pub fn all_permissions(guild: &Guild, member: &Member) -> u64 {
    let everyone = guild
        .roles
        .iter()
        .filter(|role| role.name == EVERYONE_ROLE)
        .fold(0, |acc, role| acc | role.permissions);

    guild
        .member_roles(member)
        .fold(everyone, |acc, role| acc | role.permissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild() -> Guild {
        Guild::new("g1", "Test", "owner")
            .with_role(Role::new("r0", EVERYONE_ROLE, permissions::SEND_MESSAGES))
            .with_role(Role::new("r1", "Helpers", permissions::MANAGE_MESSAGES))
            .with_role(Role::new("r2", "Staff", permissions::KICK_MEMBERS | permissions::BAN_MEMBERS))
    }

    #[test]
    fn test_member_roles_skips_unknown_ids() {
        let guild = guild();
        let member = Member::new("g1", "u1", vec!["r2".into(), "gone".into()]);
        let names: Vec<_> = guild.member_roles(&member).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Staff"]);
    }

    #[test]
    fn test_all_permissions_includes_everyone() {
        let guild = guild();
        let member = Member::new("g1", "u1", vec!["r1".into()]);
        let perms = all_permissions(&guild, &member);
        assert_eq!(perms, permissions::SEND_MESSAGES | permissions::MANAGE_MESSAGES);
    }

    #[test]
    fn test_role_grants_requires_all_bits() {
        let role = Role::new("r", "Staff", permissions::KICK_MEMBERS);
        assert!(role.grants(permissions::KICK_MEMBERS));
        assert!(!role.grants(permissions::KICK_MEMBERS | permissions::BAN_MEMBERS));
    }
}
