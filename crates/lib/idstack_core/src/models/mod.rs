//! Configuration records for the identity stack.
//!
//! These are the inputs to the pipeline: plain data, deserializable from
//! YAML/JSON or assembled in code through the generated builders. Nothing in
//! here is validated; see [`crate::definitions`] for that.

pub mod client;
pub mod directory;
pub mod domain;
pub mod federation;
pub mod role;
pub mod stack;

use serde::{Deserialize, Serialize};

pub use client::{AuthFlow, ClientConfig, ClientConfigBuilder, OAuthFlow, OAuthSettings};
pub use directory::{
    AccountRecovery, AttributeConfig, Channel, DirectoryConfig, DirectoryConfigBuilder,
    PasswordPolicy, RemovalBehavior, SignInAlias,
};
pub use domain::{DomainConfig, DomainConfigBuilder};
pub use federation::{FederationConfig, FederationConfigBuilder, ProviderRef};
pub use role::{AuthenticationState, Effect, PolicyStatement, RoleConfig, RoleConfigBuilder};
pub use stack::{OutputSelection, StackConfig, StackConfigBuilder};

/// Kind of resource a logical id names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Directory,
    Client,
    Domain,
    Federation,
    Role,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Directory => "directory",
            ResourceKind::Client => "client",
            ResourceKind::Domain => "domain",
            ResourceKind::Federation => "federation",
            ResourceKind::Role => "role",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn default_true() -> bool {
    true
}
