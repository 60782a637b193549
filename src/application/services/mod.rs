//! Application services - Business logic orchestration

pub mod permissions;

pub use permissions::{PermissionConfig, PermissionEvaluator, PermissionLevel};
