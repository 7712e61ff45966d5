//! # idstack_core
//!
//! Validation and composition engine for an identity stack: a user
//! directory, its application clients, a hosted sign-in domain, a
//! federation exchanging directory tokens for cloud credentials, and the
//! roles those credentials assume.
//!
//! A [`StackConfig`] goes through [`pipeline`]:
//! `Draft → Validated → Composed → Exported`.

pub mod changes;
pub mod config;
pub mod definitions;
pub mod error;
pub mod graph;
pub mod ids;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod topology;
pub mod warning;

pub use changes::{ChangeAction, ChangeError, ChangeSet, RemovalMode, ResourceChange};
pub use error::{ConfigurationError, InternalInvariantViolation, PipelineError};
pub use graph::DescriptorGraph;
pub use models::StackConfig;
pub use outputs::StackOutputs;
pub use pipeline::{Composed, Draft, Exported, PipelineState, Validated, run};
pub use warning::{ConfigurationWarning, DisruptiveChangeWarning, Warning, Warnings};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
