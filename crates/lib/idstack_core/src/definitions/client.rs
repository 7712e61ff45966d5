//! Client definition: authentication flows and the OAuth redirect contract.

use serde::Serialize;

use super::DescriptorSet;
use crate::config::validation::{self, RedirectUrl};
use crate::error::ConfigurationError;
use crate::ids::IdSeed;
use crate::models::{AuthFlow, ClientConfig, OAuthFlow, OAuthSettings};
use crate::warning::{ConfigurationWarning, Warnings};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct ClientDescriptor {
    pub logical_id: String,
    pub id: String,
    pub name: String,
    /// Logical id of the owning directory.
    pub directory: String,
    pub directory_id: String,
    pub auth_flows: Vec<AuthFlow>,
    pub oauth: OAuthSettings,
    pub generate_secret: bool,
    pub prevent_user_existence_errors: bool,
}

impl ClientDescriptor {
    /// Public clients run in a browser or on a device and hold no secret.
    pub fn is_public(&self) -> bool {
        !self.generate_secret
    }
}

pub fn validate(
    config: &ClientConfig,
    resolved: &DescriptorSet,
    seed: &IdSeed,
    warnings: &mut Warnings,
) -> Result<ClientDescriptor, ConfigurationError> {
    let client = config.id.as_str();
    let directory = resolved.directory(client, &config.directory)?;
    let oauth = &config.oauth;

    if oauth.is_enabled() {
        if oauth.callback_urls.is_empty() {
            return Err(ConfigurationError::MissingCallbackUrls {
                client: client.to_string(),
            });
        }
        if oauth.logout_urls.is_empty() {
            return Err(ConfigurationError::MissingLogoutUrls {
                client: client.to_string(),
            });
        }
        if oauth.scopes.is_empty() {
            return Err(ConfigurationError::MissingScopes {
                client: client.to_string(),
            });
        }
    }

    if let Some(scope) = oauth.scopes.iter().find(|s| !validation::is_valid_scope(s)) {
        return Err(ConfigurationError::InvalidScope {
            client: client.to_string(),
            scope: scope.clone(),
        });
    }

    let mut loopback = Vec::new();
    for url in oauth.callback_urls.iter().chain(&oauth.logout_urls) {
        match validation::check_redirect_url(url) {
            Ok(RedirectUrl::Secure) => {}
            Ok(RedirectUrl::Loopback) => loopback.push(url),
            Err(reason) => {
                return Err(ConfigurationError::InvalidUrl {
                    client: client.to_string(),
                    url: url.clone(),
                    reason,
                });
            }
        }
    }

    if !config.generate_secret && oauth.flows.iter().any(OAuthFlow::is_confidential) {
        return Err(ConfigurationError::PublicClientConfidentialFlow {
            client: client.to_string(),
        });
    }

    // Only warn once the client is known to be valid.
    if oauth.has_flow(OAuthFlow::AuthorizationCodeGrant)
        && oauth.has_flow(OAuthFlow::ImplicitCodeGrant)
    {
        warnings.push(ConfigurationWarning::InsecureGrantCombination {
            client: client.to_string(),
        });
    }
    for url in loopback {
        warnings.push(ConfigurationWarning::LoopbackRedirect {
            client: client.to_string(),
            url: url.clone(),
        });
    }

    Ok(ClientDescriptor {
        logical_id: client.to_string(),
        id: seed.client_id(client),
        name: config.name.clone().unwrap_or_else(|| client.to_string()),
        directory: directory.logical_id.clone(),
        directory_id: directory.id.clone(),
        auth_flows: config.auth_flows.clone(),
        oauth: oauth.clone(),
        generate_secret: config.generate_secret,
        prevent_user_existence_errors: config.prevent_user_existence_errors,
    })
}
