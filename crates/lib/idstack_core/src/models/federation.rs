//! Federated identity pool configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// A (client, directory) pair trusted by a federation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderRef {
    pub client: String,
    pub directory: String,
}

impl ProviderRef {
    pub fn new(client: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            directory: directory.into(),
        }
    }
}

/// Identity pool configuration.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(into))]
#[serde(deny_unknown_fields)]
pub struct FederationConfig {
    pub id: String,

    pub name: String,

    /// Whether guests get credentials without signing in.
    #[builder(default)]
    #[serde(default)]
    pub allow_unauthenticated: bool,

    /// Ordered list of trusted providers.
    #[builder(default)]
    #[serde(default)]
    pub providers: Vec<ProviderRef>,
}
