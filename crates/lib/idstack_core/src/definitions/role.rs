//! Role binding: trust policy and permission grant for federated
//! identities.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use super::{DescriptorSet, FederationDescriptor};
use crate::error::ConfigurationError;
use crate::ids::IdSeed;
use crate::models::{AuthenticationState, Effect, PolicyStatement, RoleConfig};

/// Principal that exchanges federation tokens for role credentials.
pub const FEDERATED_PRINCIPAL: &str = "cognito-identity.amazonaws.com";

const ASSUME_ROLE_ACTION: &str = "sts:AssumeRoleWithWebIdentity";

const POLICY_VERSION: &str = "2012-10-17";

/// Services whose actions only touch the caller's own identity data, so a
/// wildcard grant on `*` stays scoped to the signed-in user.
const USER_SCOPED_SERVICES: &[&str] = &["cognito-sync", "mobileanalytics"];

/// Action verb prefixes that write or administer resources.
const PRIVILEGED_VERB_PREFIXES: &[&str] = &[
    "add",
    "admin",
    "associate",
    "attach",
    "create",
    "delete",
    "deregister",
    "detach",
    "disable",
    "disassociate",
    "enable",
    "grant",
    "import",
    "modify",
    "pass",
    "put",
    "register",
    "remove",
    "replace",
    "reset",
    "restore",
    "revoke",
    "set",
    "tag",
    "untag",
    "update",
    "upload",
    "write",
];

/// Conditions under which the federated principal may assume the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustCondition {
    /// Federation id the token must be issued for.
    pub audience: String,
    pub authentication_state: AuthenticationState,
}

impl TrustCondition {
    pub fn for_federation(federation: &FederationDescriptor, state: AuthenticationState) -> Self {
        Self {
            audience: federation.id.clone(),
            authentication_state: state,
        }
    }

    /// IAM trust policy document.
    pub fn policy_document(&self) -> Value {
        let audience_claim = format!("{FEDERATED_PRINCIPAL}:aud");
        let method_claim = format!("{FEDERATED_PRINCIPAL}:amr");
        json!({
            "Version": POLICY_VERSION,
            "Statement": [{
                "Effect": "Allow",
                "Principal": { "Federated": FEDERATED_PRINCIPAL },
                "Action": ASSUME_ROLE_ACTION,
                "Condition": {
                    "StringEquals": {
                        audience_claim: self.audience,
                    },
                    "ForAnyValue:StringLike": {
                        method_claim: self.authentication_state.as_str(),
                    },
                },
            }],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct RoleDescriptor {
    pub logical_id: String,
    pub name: String,
    pub federation: String,
    pub trust: TrustCondition,
    pub statements: Vec<PolicyStatement>,
}

impl RoleDescriptor {
    pub fn state(&self) -> AuthenticationState {
        self.trust.authentication_state
    }

    /// IAM permissions policy document.
    pub fn permissions_document(&self) -> Value {
        let statements: Vec<Value> = self
            .statements
            .iter()
            .map(|s| {
                json!({
                    "Effect": s.effect.as_str(),
                    "Action": s.actions,
                    "Resource": s.resources,
                })
            })
            .collect();
        json!({ "Version": POLICY_VERSION, "Statement": statements })
    }
}

/// Roles attached to one federation, by authentication state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAttachment {
    pub federation_id: String,
    pub authenticated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unauthenticated: Option<String>,
}

pub fn validate(
    config: &RoleConfig,
    resolved: &DescriptorSet,
    seed: &IdSeed,
) -> Result<RoleDescriptor, ConfigurationError> {
    let role = config.id.as_str();
    let federation = resolved.federation(role, &config.federation)?;
    let trust = TrustCondition::for_federation(federation, config.state);

    if let Some(audience) = &config.audience
        && *audience != trust.audience
    {
        return Err(ConfigurationError::AudienceMismatch {
            role: role.to_string(),
            audience: audience.clone(),
            federation_id: trust.audience,
        });
    }

    for (index, statement) in config.statements.iter().enumerate() {
        check_statement(role, index, statement)?;
    }

    let name = seed.role_name(role);
    if let Some(existing) = resolved.roles().find(|r| r.name == name) {
        return Err(ConfigurationError::DuplicateRoleName {
            role: role.to_string(),
            existing: existing.logical_id.clone(),
            name,
        });
    }

    Ok(RoleDescriptor {
        logical_id: role.to_string(),
        name,
        federation: federation.logical_id.clone(),
        trust,
        statements: config.statements.clone(),
    })
}

fn check_statement(
    role: &str,
    index: usize,
    statement: &PolicyStatement,
) -> Result<(), ConfigurationError> {
    if statement.actions.is_empty() || statement.resources.is_empty() {
        return Err(ConfigurationError::EmptyPolicyStatement {
            role: role.to_string(),
            index,
        });
    }

    for action in &statement.actions {
        if !is_well_formed_action(action) {
            return Err(ConfigurationError::InvalidAction {
                role: role.to_string(),
                action: action.clone(),
            });
        }
    }

    let all_resources = statement.resources.iter().any(|r| r == "*");
    if statement.effect == Effect::Allow
        && all_resources
        && let Some(action) = statement.actions.iter().find(|a| is_privileged(a))
    {
        return Err(ConfigurationError::OverBroadGrant {
            role: role.to_string(),
            action: action.clone(),
        });
    }
    Ok(())
}

/// `*` or `service:Verb`.
fn is_well_formed_action(action: &str) -> bool {
    if action == "*" {
        return true;
    }
    match action.split_once(':') {
        Some((service, verb)) => {
            !service.is_empty()
                && !verb.is_empty()
                && service
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && verb
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '*' || c == '?')
        }
        None => false,
    }
}

/// Whether granting `action` on every resource reaches beyond the caller's
/// own data.
fn is_privileged(action: &str) -> bool {
    let Some((service, verb)) = action.split_once(':') else {
        return true;
    };
    if USER_SCOPED_SERVICES.contains(&service) {
        return false;
    }
    let verb = verb.to_ascii_lowercase();
    match verb.find(['*', '?']) {
        // A pattern is privileged if it can expand to any privileged verb.
        Some(at) => {
            let literal = &verb[..at];
            PRIVILEGED_VERB_PREFIXES
                .iter()
                .any(|p| p.starts_with(literal) || literal.starts_with(p))
        }
        None => PRIVILEGED_VERB_PREFIXES.iter().any(|p| verb.starts_with(p)),
    }
}

/// Collect the role attachment of every federation.
///
/// Each federation gets exactly one authenticated role, and a guest role
/// if and only if it allows unauthenticated access.
pub fn attachments(
    resolved: &DescriptorSet,
) -> Result<BTreeMap<String, RoleAttachment>, ConfigurationError> {
    let mut out = BTreeMap::new();

    for federation in resolved.federations() {
        let attached: Vec<&RoleDescriptor> = resolved
            .roles()
            .filter(|r| r.federation == federation.logical_id)
            .collect();
        let pick = |state: AuthenticationState| -> Result<Option<String>, ConfigurationError> {
            let mut roles = attached.iter().filter(|r| r.state() == state);
            let first = roles.next().map(|r| r.logical_id.clone());
            if roles.next().is_some() {
                return Err(ConfigurationError::DuplicateRoleAttachment {
                    federation: federation.logical_id.clone(),
                    state,
                });
            }
            Ok(first)
        };

        let authenticated = pick(AuthenticationState::Authenticated)?.ok_or_else(|| {
            ConfigurationError::MissingRoleAttachment {
                federation: federation.logical_id.clone(),
                state: AuthenticationState::Authenticated,
            }
        })?;
        let unauthenticated = pick(AuthenticationState::Unauthenticated)?;

        match (&unauthenticated, federation.allow_unauthenticated) {
            (Some(role), false) => {
                return Err(ConfigurationError::GuestRoleWithoutGuestAccess {
                    federation: federation.logical_id.clone(),
                    role: role.clone(),
                });
            }
            (None, true) => {
                return Err(ConfigurationError::MissingGuestRole {
                    federation: federation.logical_id.clone(),
                });
            }
            _ => {}
        }

        out.insert(
            federation.logical_id.clone(),
            RoleAttachment {
                federation_id: federation.id.clone(),
                authenticated,
                unauthenticated,
            },
        );
    }

    Ok(out)
}
