//! Hosted sign-in domain binding.
//!
//! The prefix is immutable once created; a rename is planned as
//! destroy-then-recreate by [`crate::changes`].

use serde::Serialize;

use super::DescriptorSet;
use crate::config::validation;
use crate::error::ConfigurationError;
use crate::ids::IdSeed;
use crate::models::DomainConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct DomainDescriptor {
    pub logical_id: String,
    pub directory: String,
    pub directory_id: String,
    pub prefix: String,
    pub base_url: String,
}

pub fn validate(
    config: &DomainConfig,
    resolved: &DescriptorSet,
    seed: &IdSeed,
) -> Result<DomainDescriptor, ConfigurationError> {
    let domain = config.id.as_str();

    if let Some(reason) = validation::domain_prefix_violation(&config.prefix) {
        return Err(ConfigurationError::InvalidDomainPrefix {
            domain: domain.to_string(),
            prefix: config.prefix.clone(),
            reason,
        });
    }

    let directory = resolved.directory(domain, &config.directory)?;

    for existing in resolved.domains() {
        if existing.prefix == config.prefix {
            return Err(ConfigurationError::DuplicateDomain {
                domain: domain.to_string(),
                existing: existing.logical_id.clone(),
                reason: "prefix already taken",
            });
        }
        if existing.directory == directory.logical_id {
            return Err(ConfigurationError::DuplicateDomain {
                domain: domain.to_string(),
                existing: existing.logical_id.clone(),
                reason: "directory already has a domain",
            });
        }
    }

    Ok(DomainDescriptor {
        logical_id: domain.to_string(),
        directory: directory.logical_id.clone(),
        directory_id: directory.id.clone(),
        prefix: config.prefix.clone(),
        base_url: seed.hosted_ui_url(&config.prefix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::fixtures::{self, SEED};
    use crate::definitions::{Descriptor, directory};

    fn resolved() -> DescriptorSet {
        let mut set = DescriptorSet::new();
        let d = directory::validate(&fixtures::directory(), &SEED).expect("directory");
        set.insert(Descriptor::Directory(d)).expect("insert");
        set
    }

    #[test]
    fn baseline_domain_is_valid() {
        let d = validate(&fixtures::domain(), &resolved(), &SEED).expect("valid");
        assert_eq!(d.prefix, "unifiedlogin");
        assert_eq!(
            d.base_url,
            "https://unifiedlogin.auth.us-east-1.amazoncognito.com"
        );
    }

    #[test]
    fn bad_prefix_is_rejected() {
        for prefix in ["", "Unified", "login_page", "aws-login", "-x"] {
            let mut config = fixtures::domain();
            config.prefix = prefix.into();
            assert!(
                matches!(
                    validate(&config, &resolved(), &SEED),
                    Err(ConfigurationError::InvalidDomainPrefix { .. })
                ),
                "{prefix:?} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let mut set = resolved();
        let first = validate(&fixtures::domain(), &set, &SEED).expect("first");
        set.insert(Descriptor::Domain(first)).expect("insert");

        let mut second = fixtures::domain();
        second.id = "Domain2".into();
        assert!(matches!(
            validate(&second, &set, &SEED),
            Err(ConfigurationError::DuplicateDomain { reason: "prefix already taken", .. })
        ));

        second.prefix = "otherlogin".into();
        assert!(matches!(
            validate(&second, &set, &SEED),
            Err(ConfigurationError::DuplicateDomain {
                reason: "directory already has a domain",
                ..
            })
        ));
    }
}
