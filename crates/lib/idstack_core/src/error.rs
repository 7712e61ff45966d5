//! Error taxonomy of the pipeline.

use thiserror::Error;

use crate::models::{AuthenticationState, Channel, ResourceKind};

/// Fatal configuration errors. Any of these blocks `Draft → Validated`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing field: {resource}.{field}")]
    MissingField {
        resource: String,
        field: &'static str,
    },

    #[error("Invalid region: '{0}'")]
    InvalidRegion(String),

    #[error("Invalid name for {resource}: '{name}'")]
    InvalidName { resource: String, name: String },

    #[error("Duplicate logical id: {0}")]
    DuplicateId(String),

    #[error("Unresolved reference: {resource} references unknown {expected} '{target}'")]
    UnresolvedReference {
        resource: String,
        target: String,
        expected: ResourceKind,
    },

    #[error("Reference kind mismatch: {resource} expects {expected} '{target}' but found a {found}")]
    ReferenceKindMismatch {
        resource: String,
        target: String,
        expected: ResourceKind,
        found: ResourceKind,
    },

    #[error("Cycle detected: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("Directory {directory} has no sign-in alias")]
    MissingSignInAlias { directory: String },

    #[error("Weak password policy on {directory}: minimum length {min_length} is below 8")]
    WeakPasswordPolicy { directory: String, min_length: u32 },

    #[error("Invalid password policy on {directory}: {reason}")]
    InvalidPasswordPolicy { directory: String, reason: String },

    #[error("Directory {directory} recovers accounts through {channel} which is not auto-verified")]
    UnverifiedRecoveryChannel { directory: String, channel: Channel },

    #[error("Directory {directory} declares unknown standard attribute '{attribute}'")]
    UnknownAttribute { directory: String, attribute: String },

    #[error(
        "Directory {directory} requires '{attribute}' but it is neither a sign-in alias, a recovery channel nor auto-verified"
    )]
    UnreachableRequiredAttribute { directory: String, attribute: String },

    #[error("Client {client} enables OAuth flows without callback URLs")]
    MissingCallbackUrls { client: String },

    #[error("Client {client} enables OAuth flows without logout URLs")]
    MissingLogoutUrls { client: String },

    #[error("Client {client} has invalid URL '{url}': {reason}")]
    InvalidUrl {
        client: String,
        url: String,
        reason: String,
    },

    #[error("Client {client} enables OAuth flows without scopes")]
    MissingScopes { client: String },

    #[error("Client {client} has invalid scope '{scope}'")]
    InvalidScope { client: String, scope: String },

    #[error("Client {client} requests a confidential flow but does not generate a secret")]
    PublicClientConfidentialFlow { client: String },

    #[error("Domain {domain} has invalid prefix '{prefix}': {reason}")]
    InvalidDomainPrefix {
        domain: String,
        prefix: String,
        reason: &'static str,
    },

    #[error("Domain {domain} conflicts with {existing}: {reason}")]
    DuplicateDomain {
        domain: String,
        existing: String,
        reason: &'static str,
    },

    #[error("Federation {federation} has no identity providers")]
    EmptyProviders { federation: String },

    #[error("Federation {federation} pairs client {client} with directory {directory} it does not belong to")]
    ProviderDirectoryMismatch {
        federation: String,
        client: String,
        directory: String,
    },

    #[error("Federation {federation} lists client {client} more than once")]
    DuplicateProvider { federation: String, client: String },

    #[error("Role {role} trusts audience '{audience}' but its federation id is '{federation_id}'")]
    AudienceMismatch {
        role: String,
        audience: String,
        federation_id: String,
    },

    #[error("Role {role} statement #{index} has no actions or no resources")]
    EmptyPolicyStatement { role: String, index: usize },

    #[error("Role {role} would be named '{name}', already taken by {existing}")]
    DuplicateRoleName {
        role: String,
        existing: String,
        name: String,
    },

    #[error("Role {role} has invalid action '{action}'")]
    InvalidAction { role: String, action: String },

    #[error("Role {role} grants '{action}' on all resources")]
    OverBroadGrant { role: String, action: String },

    #[error("Federation {federation} has no {state} role attached")]
    MissingRoleAttachment {
        federation: String,
        state: AuthenticationState,
    },

    #[error("Federation {federation} has more than one {state} role attached")]
    DuplicateRoleAttachment {
        federation: String,
        state: AuthenticationState,
    },

    #[error("Role {role} is a guest role but federation {federation} disallows unauthenticated access")]
    GuestRoleWithoutGuestAccess { federation: String, role: String },

    #[error("Federation {federation} allows unauthenticated access without a guest role")]
    MissingGuestRole { federation: String },

    #[error("Exported {kind} {selected} does not belong to exported {target}")]
    UnrelatedOutputs {
        kind: ResourceKind,
        selected: String,
        target: String,
    },

    #[error("Cannot choose the {kind} to export: stack declares {count}")]
    AmbiguousOutputs { kind: ResourceKind, count: usize },
}

/// A defect in the pipeline itself rather than in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Internal invariant violation: {0}")]
pub struct InternalInvariantViolation(pub String);

impl InternalInvariantViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Any fatal pipeline error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Internal(#[from] InternalInvariantViolation),
}
