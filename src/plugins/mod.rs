//! Plugin system: contracts, registry and the built-in plugins

pub mod builtin;
pub mod registry;
pub mod trait_def;

pub use registry::{PluginRegistry, PluginRegistryBuilder};
pub use trait_def::{
    require_admin, require_bot_admin, require_mod, require_robyul_mod, CommandPlugin, Gated, TriggerPlugin,
};
