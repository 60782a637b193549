//! Domain traits - Abstractions for infrastructure implementations

pub mod gateway;
pub mod state;
pub mod telemetry;

pub use gateway::Gateway;
pub use state::{StateSource, UpstreamState};
pub use telemetry::{ErrorReport, TelemetrySink};
