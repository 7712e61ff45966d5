//! Role binding configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Value of the `amr` claim a role trusts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationState {
    #[default]
    Authenticated,
    Unauthenticated,
}

impl AuthenticationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationState::Authenticated => "authenticated",
            AuthenticationState::Unauthenticated => "unauthenticated",
        }
    }
}

impl std::fmt::Display for AuthenticationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl Effect {
    /// IAM policy-document spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Allow => "Allow",
            Effect::Deny => "Deny",
        }
    }
}

/// One permission statement attached to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyStatement {
    #[serde(default)]
    pub effect: Effect,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn allow<A, R>(actions: A, resources: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            effect: Effect::Allow,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}

/// Role granted to identities issued by a federation.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(strip_option, into))]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub id: String,

    /// Logical id of the federation the role is attached to.
    pub federation: String,

    #[builder(default)]
    #[serde(default)]
    pub state: AuthenticationState,

    /// Expected trust audience. When set it must equal the federation id.
    #[builder(default)]
    #[serde(default)]
    pub audience: Option<String>,

    #[builder(default)]
    #[serde(default)]
    pub statements: Vec<PolicyStatement>,
}
