//! Application client configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Direct (non-OAuth) authentication flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFlow {
    UserPassword,
    UserSrp,
    Custom,
    AdminUserPassword,
}

/// OAuth 2.0 grant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthFlow {
    AuthorizationCodeGrant,
    ImplicitCodeGrant,
    ClientCredentials,
}

impl OAuthFlow {
    /// Flows that authenticate the client itself and need a secret.
    pub fn is_confidential(&self) -> bool {
        matches!(self, OAuthFlow::ClientCredentials)
    }
}

/// OAuth redirect contract of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OAuthSettings {
    pub flows: Vec<OAuthFlow>,
    pub scopes: Vec<String>,
    pub callback_urls: Vec<String>,
    pub logout_urls: Vec<String>,
}

impl OAuthSettings {
    pub fn is_enabled(&self) -> bool {
        !self.flows.is_empty()
    }

    pub fn has_flow(&self, flow: OAuthFlow) -> bool {
        self.flows.contains(&flow)
    }
}

/// Application client (user pool client) configuration.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(strip_option, into))]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logical id used by references.
    pub id: String,

    /// Display name; defaults to the logical id.
    #[builder(default)]
    #[serde(default)]
    pub name: Option<String>,

    /// Logical id of the owning directory.
    pub directory: String,

    #[builder(default)]
    #[serde(default)]
    pub auth_flows: Vec<AuthFlow>,

    #[builder(default)]
    #[serde(default)]
    pub oauth: OAuthSettings,

    #[builder(default)]
    #[serde(default)]
    pub generate_secret: bool,

    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub prevent_user_existence_errors: bool,
}
