//! Domain layer - Core chat objects with no external dependencies
//!
//! This layer contains:
//! - Entities: Users, messages, guilds, roles, channels, members
//! - Traits: Abstractions for infrastructure (Gateway, StateSource, TelemetrySink)

pub mod entities;
pub mod traits;
