//! robyul-bot - chat-bot dispatch core
//!
//! Layout:
//! - domain: chat entities and the traits infrastructure implements
//! - application: permissions, pagination, dispatch and isolated invocation
//! - infrastructure: config, texts, state cache, telemetry, console adapter
//! - plugins: plugin contracts, registry and built-in plugins

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
