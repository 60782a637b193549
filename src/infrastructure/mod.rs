//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - I18n: User-facing texts
//! - State: Guild/channel/member cache
//! - Telemetry: Error report sink
//! - Adapters: Platform integrations (console)

pub mod adapters;
pub mod config;
pub mod i18n;
pub mod state;
pub mod telemetry;
