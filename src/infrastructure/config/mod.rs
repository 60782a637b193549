//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::application::services::PermissionConfig;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub permissions: PermissionsConfig,
    pub plugins: PluginsConfig,
    pub texts: HashMap<String, String>,
    pub console: ConsoleConfig,
    pub announcements: AnnouncementsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
    /// Process-wide: error replies carry a stack trace
    pub debug: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "robyul-bot".to_string(),
            prefix: "_".to_string(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PermissionsConfig {
    pub bot_admins: Vec<String>,
    pub robyul_mods: Vec<String>,
    pub admin_role_names: Vec<String>,
    pub mod_role_names: Vec<String>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            bot_admins: Vec::new(),
            robyul_mods: Vec::new(),
            admin_role_names: names(&["Admin", "Admins", "ADMIN", "School Board", "admin", "admins"]),
            mod_role_names: names(&[
                "Mod",
                "Mods",
                "Mod Trainee",
                "Moderator",
                "Moderators",
                "MOD",
                "Minimod",
                "Guard",
                "Janitor",
                "mod",
                "mods",
            ]),
        }
    }
}

impl PermissionsConfig {
    pub fn to_permission_config(&self) -> PermissionConfig {
        PermissionConfig::new(
            self.bot_admins.iter().cloned(),
            self.robyul_mods.iter().cloned(),
            self.admin_role_names.iter().cloned(),
            self.mod_role_names.iter().cloned(),
        )
    }
}

/// Enable/disable set applied when plugins are registered
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginsConfig {
    /// When set, only these plugins are registered
    pub enabled: Option<Vec<String>>,
    pub disabled: Vec<String>,
}

impl PluginsConfig {
    pub fn is_enabled(&self, name: &str) -> bool {
        if self.disabled.iter().any(|d| d == name) {
            return false;
        }
        match &self.enabled {
            Some(enabled) => enabled.iter().any(|e| e == name),
            None => true,
        }
    }
}

/// Synthetic ids used by the console adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ConsoleConfig {
    pub bot_id: String,
    pub user_id: String,
    pub username: String,
    pub guild_id: String,
    pub channel_id: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bot_id: "1".to_string(),
            user_id: "100".to_string(),
            username: "console".to_string(),
            guild_id: "10".to_string(),
            channel_id: "20".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnnouncementsConfig {
    pub channels: Vec<String>,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables override file values
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Ok(debug) = std::env::var("BOT_DEBUG") {
            self.bot.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml(
            r#"
bot:
  prefix: "!"
permissions:
  bot-admins: ["116620585638821891"]
"#,
        )
        .unwrap();

        assert_eq!(config.bot.prefix, "!");
        assert!(!config.bot.debug);
        assert_eq!(config.permissions.bot_admins, vec!["116620585638821891"]);
        assert!(config.permissions.admin_role_names.contains(&"School Board".to_string()));
        assert!(config.permissions.mod_role_names.contains(&"Janitor".to_string()));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = Config::from_yaml("bot:\n  prefix: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_plugin_enable_disable_set() {
        let mut plugins = PluginsConfig::default();
        assert!(plugins.is_enabled("ping"));

        plugins.disabled.push("ping".into());
        assert!(!plugins.is_enabled("ping"));

        plugins.enabled = Some(vec!["about".into(), "ping".into()]);
        assert!(plugins.is_enabled("about"));
        assert!(!plugins.is_enabled("choice"));
        // disabled wins over enabled
        assert!(!plugins.is_enabled("ping"));
    }

    #[test]
    fn test_default_config_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.bot.prefix, "_");
        assert_eq!(parsed.console.channel_id, "20");
    }
}
