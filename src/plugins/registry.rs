//! Plugin registry - the ordered, immutable set of command and trigger plugins

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;

use super::trait_def::{CommandPlugin, TriggerPlugin};
use crate::application::errors::{BotError, RegistryError};
use crate::application::messaging::Session;
use crate::infrastructure::config::PluginsConfig;

/// Read-only after [`PluginRegistryBuilder::build`]; safe to share across tasks
pub struct PluginRegistry {
    commands: Vec<Arc<dyn CommandPlugin>>,
    triggers: Vec<Arc<dyn TriggerPlugin>>,
}

impl PluginRegistry {
    pub fn builder(config: PluginsConfig) -> PluginRegistryBuilder {
        PluginRegistryBuilder::new(config)
    }

    /// Exact, case-sensitive match; first registered plugin wins
    pub fn resolve_command(&self, name: &str) -> Option<Arc<dyn CommandPlugin>> {
        self.commands
            .iter()
            .find(|plugin| plugin.commands().iter().any(|cmd| *cmd == name))
            .cloned()
    }

    /// Every trigger plugin declaring `keyword`, in registration order
    pub fn resolve_triggers(&self, keyword: &str) -> Vec<Arc<dyn TriggerPlugin>> {
        self.triggers
            .iter()
            .filter(|plugin| plugin.triggers().iter().any(|t| *t == keyword))
            .cloned()
            .collect()
    }

    /// Case-insensitive check across command names and trigger keywords
    pub fn command_exists(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.commands
            .iter()
            .flat_map(|p| p.commands().iter())
            .chain(self.triggers.iter().flat_map(|p| p.triggers().iter()))
            .any(|cmd| cmd.to_lowercase() == name)
    }

    /// All command names, in registration order
    pub fn command_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .flat_map(|p| p.commands().iter().map(|c| c.to_string()))
            .collect()
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|p| p.name().to_string())
            .chain(self.triggers.iter().map(|p| p.name().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every command plugin's `init`, in order. The first failure aborts startup.
    pub async fn init_all(&self, session: &Session) -> Result<(), BotError> {
        for plugin in &self.commands {
            plugin.init(session).await.map_err(|e| BotError::PluginInit {
                plugin: plugin.name().to_string(),
                reason: e.to_string(),
            })?;
        }
        info!("Initialized {} command plugin(s)", self.commands.len());
        Ok(())
    }

    pub async fn uninit_all(&self, session: &Session) {
        for plugin in &self.commands {
            plugin.uninit(session).await;
        }
    }
}

/// Collects plugins at startup, honouring the enable/disable set and
/// rejecting duplicate command names
pub struct PluginRegistryBuilder {
    config: PluginsConfig,
    commands: Vec<Arc<dyn CommandPlugin>>,
    triggers: Vec<Arc<dyn TriggerPlugin>>,
    owners: HashMap<String, String>,
    names: HashSet<String>,
}

impl PluginRegistryBuilder {
    pub fn new(config: PluginsConfig) -> Self {
        Self {
            config,
            commands: Vec::new(),
            triggers: Vec::new(),
            owners: HashMap::new(),
            names: HashSet::new(),
        }
    }

    /// Register a command plugin. Returns false when the config disables it.
    pub fn register_command<P: CommandPlugin + 'static>(&mut self, plugin: P) -> Result<bool, RegistryError> {
        let name = plugin.name().to_string();
        if !self.config.is_enabled(&name) {
            info!("Plugin disabled by config: {}", name);
            return Ok(false);
        }
        if self.names.contains(&name) {
            return Err(RegistryError::DuplicatePlugin(name));
        }
        for command in plugin.commands() {
            if let Some(existing) = self.owners.get(*command) {
                return Err(RegistryError::DuplicateCommand {
                    command: command.to_string(),
                    plugin: name,
                    existing: existing.clone(),
                });
            }
        }

        for command in plugin.commands() {
            self.owners.insert(command.to_string(), name.clone());
        }
        info!("Registering plugin: {}", name);
        self.names.insert(name);
        self.commands.push(Arc::new(plugin));
        Ok(true)
    }

    /// Register a trigger plugin. Trigger keywords may be shared.
    pub fn register_trigger<P: TriggerPlugin + 'static>(&mut self, plugin: P) -> Result<bool, RegistryError> {
        let name = plugin.name().to_string();
        if !self.config.is_enabled(&name) {
            info!("Plugin disabled by config: {}", name);
            return Ok(false);
        }
        if !self.names.insert(name.clone()) {
            return Err(RegistryError::DuplicatePlugin(name));
        }

        info!("Registering trigger plugin: {}", name);
        self.triggers.push(Arc::new(plugin));
        Ok(true)
    }

    pub fn build(self) -> PluginRegistry {
        PluginRegistry {
            commands: self.commands,
            triggers: self.triggers,
        }
    }
}
