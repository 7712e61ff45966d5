//! User directory configuration.

use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Attribute a user may sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInAlias {
    Username,
    Email,
    Phone,
    PreferredUsername,
}

/// Verifiable contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Phone,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Phone => "phone",
        }
    }

    /// Standard attribute holding this channel's address.
    pub fn attribute(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Phone => "phone_number",
        }
    }

    /// Channel backed by a standard attribute, if any.
    pub fn for_attribute(attribute: &str) -> Option<Channel> {
        match attribute {
            "email" => Some(Channel::Email),
            "phone_number" => Some(Channel::Phone),
            _ => None,
        }
    }

    /// Sign-in alias that exercises this channel.
    pub fn sign_in_alias(&self) -> SignInAlias {
        match self {
            Channel::Email => SignInAlias::Email,
            Channel::Phone => SignInAlias::Phone,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a user recovers a forgotten password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRecovery {
    #[default]
    EmailOnly,
    PhoneOnlyWithoutMfa,
    EmailAndPhoneWithoutMfa,
    PhoneWithoutMfaAndEmail,
}

impl AccountRecovery {
    /// Channels the method sends recovery codes through, in priority order.
    pub fn channels(&self) -> &'static [Channel] {
        match self {
            AccountRecovery::EmailOnly => &[Channel::Email],
            AccountRecovery::PhoneOnlyWithoutMfa => &[Channel::Phone],
            AccountRecovery::EmailAndPhoneWithoutMfa => &[Channel::Email, Channel::Phone],
            AccountRecovery::PhoneWithoutMfaAndEmail => &[Channel::Phone, Channel::Email],
        }
    }
}

/// What happens to the directory on stack teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalBehavior {
    #[default]
    Retain,
    Destroy,
}

/// Settings for one standard attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub mutable: bool,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            required: false,
            mutable: true,
        }
    }
}

impl AttributeConfig {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }
}

/// Password rules enforced at sign-up and password change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordPolicy {
    pub min_length: u32,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digits: bool,
    pub require_symbols: bool,
    /// Days an admin-issued temporary password stays valid.
    pub temp_password_validity_days: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_lowercase: true,
            require_uppercase: true,
            require_digits: true,
            require_symbols: true,
            temp_password_validity_days: 7,
        }
    }
}

/// User directory (user pool) configuration.
#[derive(Builder, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[builder(setter(into))]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Logical id used by references.
    pub id: String,

    /// Directory name.
    pub name: String,

    /// Whether users may register themselves.
    #[builder(default)]
    #[serde(default)]
    pub self_sign_up: bool,

    #[builder(default)]
    #[serde(default)]
    pub sign_in_aliases: Vec<SignInAlias>,

    /// Channels verified automatically on sign-up.
    #[builder(default)]
    #[serde(default)]
    pub auto_verify: Vec<Channel>,

    /// Standard attributes keyed by attribute name (`email`, `phone_number`, ...).
    #[builder(default)]
    #[serde(default)]
    pub standard_attributes: BTreeMap<String, AttributeConfig>,

    #[builder(default)]
    #[serde(default)]
    pub password_policy: PasswordPolicy,

    #[builder(default)]
    #[serde(default)]
    pub recovery: AccountRecovery,

    #[builder(default)]
    #[serde(default)]
    pub removal: RemovalBehavior,
}
