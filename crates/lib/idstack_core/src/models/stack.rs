//! Whole-stack configuration record.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::{
    ClientConfig, DirectoryConfig, DomainConfig, FederationConfig, ResourceKind, RoleConfig,
};

/// Which resources feed the stack outputs. Unset entries fall back to the
/// single resource of that kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSelection {
    pub directory: Option<String>,
    pub client: Option<String>,
    pub federation: Option<String>,
}

/// The complete configuration record handed to the pipeline.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(strip_option, into))]
#[serde(deny_unknown_fields)]
pub struct StackConfig {
    /// Stack name, part of every generated id.
    pub stack: String,

    pub region: String,

    #[builder(default)]
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,

    #[builder(default)]
    #[serde(default)]
    pub clients: Vec<ClientConfig>,

    #[builder(default)]
    #[serde(default)]
    pub domains: Vec<DomainConfig>,

    #[builder(default)]
    #[serde(default)]
    pub federations: Vec<FederationConfig>,

    #[builder(default)]
    #[serde(default)]
    pub roles: Vec<RoleConfig>,

    #[builder(default)]
    #[serde(default)]
    pub outputs: Option<OutputSelection>,
}

impl StackConfig {
    /// Same record deployed to another region.
    pub fn with_region(self, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..self
        }
    }

    /// Every declared resource as `(logical id, kind)`, in declaration order.
    pub fn declarations(&self) -> Vec<(&str, ResourceKind)> {
        let directories = self
            .directories
            .iter()
            .map(|d| (d.id.as_str(), ResourceKind::Directory));
        let clients = self
            .clients
            .iter()
            .map(|c| (c.id.as_str(), ResourceKind::Client));
        let domains = self
            .domains
            .iter()
            .map(|d| (d.id.as_str(), ResourceKind::Domain));
        let federations = self
            .federations
            .iter()
            .map(|f| (f.id.as_str(), ResourceKind::Federation));
        let roles = self
            .roles
            .iter()
            .map(|r| (r.id.as_str(), ResourceKind::Role));

        directories
            .chain(clients)
            .chain(domains)
            .chain(federations)
            .chain(roles)
            .collect()
    }
}
