//! Federation definition: identity pool trusting directory clients.

use std::collections::BTreeSet;

use serde::Serialize;

use super::DescriptorSet;
use crate::config::validation;
use crate::error::ConfigurationError;
use crate::ids::IdSeed;
use crate::models::FederationConfig;

/// A trusted (client, directory) pair, resolved to physical ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct FederatedProvider {
    pub client: String,
    pub client_id: String,
    pub directory: String,
    pub provider_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct FederationDescriptor {
    pub logical_id: String,
    pub id: String,
    pub name: String,
    pub allow_unauthenticated: bool,
    pub providers: Vec<FederatedProvider>,
}

pub fn validate(
    config: &FederationConfig,
    resolved: &DescriptorSet,
    seed: &IdSeed,
) -> Result<FederationDescriptor, ConfigurationError> {
    let federation = config.id.as_str();

    if !validation::is_valid_federation_name(&config.name) {
        return Err(ConfigurationError::InvalidName {
            resource: federation.to_string(),
            name: config.name.clone(),
        });
    }
    if config.providers.is_empty() {
        return Err(ConfigurationError::EmptyProviders {
            federation: federation.to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut providers = Vec::with_capacity(config.providers.len());
    for pair in &config.providers {
        let client = resolved.client(federation, &pair.client)?;
        let directory = resolved.directory(federation, &pair.directory)?;

        if client.directory != directory.logical_id {
            return Err(ConfigurationError::ProviderDirectoryMismatch {
                federation: federation.to_string(),
                client: client.logical_id.clone(),
                directory: directory.logical_id.clone(),
            });
        }
        if !seen.insert(client.logical_id.as_str()) {
            return Err(ConfigurationError::DuplicateProvider {
                federation: federation.to_string(),
                client: client.logical_id.clone(),
            });
        }

        providers.push(FederatedProvider {
            client: client.logical_id.clone(),
            client_id: client.id.clone(),
            directory: directory.logical_id.clone(),
            provider_name: directory.provider_name.clone(),
        });
    }

    Ok(FederationDescriptor {
        logical_id: federation.to_string(),
        id: seed.federation_id(federation),
        name: config.name.clone(),
        allow_unauthenticated: config.allow_unauthenticated,
        providers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::fixtures::{self, SEED};
    use crate::definitions::{Descriptor, client, directory};
    use crate::models::{ProviderRef, ResourceKind};
    use crate::warning::Warnings;

    fn resolved() -> DescriptorSet {
        let mut set = DescriptorSet::new();
        let mut warnings = Warnings::new();
        let d = directory::validate(&fixtures::directory(), &SEED).expect("directory");
        set.insert(Descriptor::Directory(d)).expect("insert");

        let mut second = fixtures::directory();
        second.id = "PartnerPool".into();
        let d = directory::validate(&second, &SEED).expect("directory");
        set.insert(Descriptor::Directory(d)).expect("insert");

        let c = client::validate(&fixtures::client(), &set, &SEED, &mut warnings).expect("client");
        set.insert(Descriptor::Client(c)).expect("insert");
        set
    }

    #[test]
    fn baseline_federation_is_valid() {
        let set = resolved();
        let f = validate(&fixtures::federation(), &set, &SEED).expect("valid");
        assert!(f.id.starts_with("us-east-1:"));
        assert!(!f.allow_unauthenticated);

        let directory = set.get("UserPool").and_then(Descriptor::as_directory).unwrap();
        let client = set.get("WebClient").and_then(Descriptor::as_client).unwrap();
        assert_eq!(f.providers.len(), 1);
        assert_eq!(f.providers[0].client_id, client.id);
        assert_eq!(f.providers[0].provider_name, directory.provider_name);
    }

    #[test]
    fn empty_providers_is_rejected() {
        let mut config = fixtures::federation();
        config.providers.clear();
        assert_eq!(
            validate(&config, &resolved(), &SEED).unwrap_err(),
            ConfigurationError::EmptyProviders {
                federation: "IdentityPool".into()
            }
        );
    }

    #[test]
    fn client_must_belong_to_paired_directory() {
        let mut config = fixtures::federation();
        config.providers = vec![ProviderRef::new("WebClient", "PartnerPool")];
        assert_eq!(
            validate(&config, &resolved(), &SEED).unwrap_err(),
            ConfigurationError::ProviderDirectoryMismatch {
                federation: "IdentityPool".into(),
                client: "WebClient".into(),
                directory: "PartnerPool".into(),
            }
        );
    }

    #[test]
    fn duplicate_provider_is_rejected() {
        let mut config = fixtures::federation();
        config.providers.push(ProviderRef::new("WebClient", "UserPool"));
        assert!(matches!(
            validate(&config, &resolved(), &SEED),
            Err(ConfigurationError::DuplicateProvider { .. })
        ));
    }

    #[test]
    fn provider_must_be_a_client() {
        let mut config = fixtures::federation();
        config.providers = vec![ProviderRef::new("UserPool", "UserPool")];
        assert!(matches!(
            validate(&config, &resolved(), &SEED),
            Err(ConfigurationError::ReferenceKindMismatch {
                expected: ResourceKind::Client,
                found: ResourceKind::Directory,
                ..
            })
        ));
    }

    #[test]
    fn invalid_name_is_rejected() {
        let mut config = fixtures::federation();
        config.name = "my-pool".into();
        assert!(matches!(
            validate(&config, &resolved(), &SEED),
            Err(ConfigurationError::InvalidName { .. })
        ));
    }
}
