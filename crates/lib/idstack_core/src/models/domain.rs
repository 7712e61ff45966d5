//! Hosted sign-in domain configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Hosted UI domain bound to a directory.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(into))]
#[serde(deny_unknown_fields)]
pub struct DomainConfig {
    pub id: String,

    /// Logical id of the directory served by the domain.
    pub directory: String,

    /// Provider-namespace domain prefix.
    pub prefix: String,
}
