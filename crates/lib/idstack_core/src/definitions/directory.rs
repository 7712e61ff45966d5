//! Directory definition: sign-in, password and recovery rules.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::validation;
use crate::error::ConfigurationError;
use crate::ids::IdSeed;
use crate::models::{
    AccountRecovery, AttributeConfig, Channel, DirectoryConfig, PasswordPolicy, RemovalBehavior,
    SignInAlias,
};

/// Provider floor for password length.
pub const MIN_PASSWORD_LENGTH: u32 = 8;
/// Provider ceiling for password length.
pub const MAX_PASSWORD_LENGTH: u32 = 99;

const MAX_TEMP_PASSWORD_VALIDITY_DAYS: u32 = 365;

/// Standard OpenID Connect attributes a directory may declare.
pub const STANDARD_ATTRIBUTES: &[&str] = &[
    "address",
    "birthdate",
    "email",
    "family_name",
    "gender",
    "given_name",
    "locale",
    "middle_name",
    "name",
    "nickname",
    "phone_number",
    "picture",
    "preferred_username",
    "profile",
    "updated_at",
    "website",
    "zoneinfo",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct DirectoryDescriptor {
    pub logical_id: String,
    pub id: String,
    pub name: String,
    /// Issuer name used when a federation trusts this directory.
    pub provider_name: String,
    pub self_sign_up: bool,
    pub sign_in_aliases: BTreeSet<SignInAlias>,
    pub auto_verify: BTreeSet<Channel>,
    pub standard_attributes: BTreeMap<String, AttributeConfig>,
    pub password_policy: PasswordPolicy,
    pub recovery: AccountRecovery,
    pub removal: RemovalBehavior,
}

pub fn validate(
    config: &DirectoryConfig,
    seed: &IdSeed,
) -> Result<DirectoryDescriptor, ConfigurationError> {
    let directory = config.id.as_str();

    if config.name.is_empty() {
        return Err(ConfigurationError::MissingField {
            resource: directory.to_string(),
            field: "name",
        });
    }
    if !validation::is_valid_directory_name(&config.name) {
        return Err(ConfigurationError::InvalidName {
            resource: directory.to_string(),
            name: config.name.clone(),
        });
    }

    let sign_in_aliases: BTreeSet<SignInAlias> = config.sign_in_aliases.iter().copied().collect();
    if sign_in_aliases.is_empty() {
        return Err(ConfigurationError::MissingSignInAlias {
            directory: directory.to_string(),
        });
    }

    check_password_policy(directory, &config.password_policy)?;

    let auto_verify: BTreeSet<Channel> = config.auto_verify.iter().copied().collect();
    for channel in config.recovery.channels() {
        if !auto_verify.contains(channel) {
            return Err(ConfigurationError::UnverifiedRecoveryChannel {
                directory: directory.to_string(),
                channel: *channel,
            });
        }
    }

    for (attribute, settings) in &config.standard_attributes {
        if !STANDARD_ATTRIBUTES.contains(&attribute.as_str()) {
            return Err(ConfigurationError::UnknownAttribute {
                directory: directory.to_string(),
                attribute: attribute.clone(),
            });
        }
        if settings.required
            && let Some(channel) = Channel::for_attribute(attribute)
        {
            let reachable = sign_in_aliases.contains(&channel.sign_in_alias())
                || config.recovery.channels().contains(&channel)
                || auto_verify.contains(&channel);
            if !reachable {
                return Err(ConfigurationError::UnreachableRequiredAttribute {
                    directory: directory.to_string(),
                    attribute: attribute.clone(),
                });
            }
        }
    }

    let id = seed.directory_id(directory);
    Ok(DirectoryDescriptor {
        logical_id: directory.to_string(),
        provider_name: seed.provider_name(&id),
        id,
        name: config.name.clone(),
        self_sign_up: config.self_sign_up,
        sign_in_aliases,
        auto_verify,
        standard_attributes: config.standard_attributes.clone(),
        password_policy: config.password_policy,
        recovery: config.recovery,
        removal: config.removal,
    })
}

fn check_password_policy(directory: &str, policy: &PasswordPolicy) -> Result<(), ConfigurationError> {
    if policy.min_length < MIN_PASSWORD_LENGTH {
        return Err(ConfigurationError::WeakPasswordPolicy {
            directory: directory.to_string(),
            min_length: policy.min_length,
        });
    }
    if policy.min_length > MAX_PASSWORD_LENGTH {
        return Err(ConfigurationError::InvalidPasswordPolicy {
            directory: directory.to_string(),
            reason: format!(
                "minimum length {} exceeds {MAX_PASSWORD_LENGTH}",
                policy.min_length
            ),
        });
    }
    if !(1..=MAX_TEMP_PASSWORD_VALIDITY_DAYS).contains(&policy.temp_password_validity_days) {
        return Err(ConfigurationError::InvalidPasswordPolicy {
            directory: directory.to_string(),
            reason: format!(
                "temporary password validity of {} days is outside 1..={MAX_TEMP_PASSWORD_VALIDITY_DAYS}",
                policy.temp_password_validity_days
            ),
        });
    }
    Ok(())
}
