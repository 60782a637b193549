//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Permission evaluation
//! - Errors: Domain-specific errors
//! - Messaging: Pagination, parsing, dispatching, isolated invocation

pub mod errors;
pub mod messaging;
pub mod services;
