//! Resource definitions: per-component validation producing immutable
//! descriptors.
//!
//! Each submodule exposes a `validate` function that takes one
//! configuration record plus the descriptors validated before it, and
//! either returns a descriptor or the first [`ConfigurationError`] found.

pub mod client;
pub mod directory;
pub mod domain;
pub mod federation;
pub mod role;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::models::ResourceKind;

pub use client::ClientDescriptor;
pub use directory::DirectoryDescriptor;
pub use domain::DomainDescriptor;
pub use federation::{FederatedProvider, FederationDescriptor};
pub use role::{RoleAttachment, RoleDescriptor, TrustCondition};

/// A validated resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Descriptor {
    Directory(DirectoryDescriptor),
    Client(ClientDescriptor),
    Domain(DomainDescriptor),
    Federation(FederationDescriptor),
    Role(RoleDescriptor),
}

impl Descriptor {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Descriptor::Directory(_) => ResourceKind::Directory,
            Descriptor::Client(_) => ResourceKind::Client,
            Descriptor::Domain(_) => ResourceKind::Domain,
            Descriptor::Federation(_) => ResourceKind::Federation,
            Descriptor::Role(_) => ResourceKind::Role,
        }
    }

    pub fn logical_id(&self) -> &str {
        match self {
            Descriptor::Directory(d) => &d.logical_id,
            Descriptor::Client(c) => &c.logical_id,
            Descriptor::Domain(d) => &d.logical_id,
            Descriptor::Federation(f) => &f.logical_id,
            Descriptor::Role(r) => &r.logical_id,
        }
    }

    /// Logical ids this resource references, deduplicated.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = match self {
            Descriptor::Directory(_) => Vec::new(),
            Descriptor::Client(c) => vec![c.directory.as_str()],
            Descriptor::Domain(d) => vec![d.directory.as_str()],
            Descriptor::Federation(f) => f
                .providers
                .iter()
                .flat_map(|p| [p.client.as_str(), p.directory.as_str()])
                .collect(),
            Descriptor::Role(r) => vec![r.federation.as_str()],
        };
        let mut seen = std::collections::BTreeSet::new();
        deps.retain(|d| seen.insert(*d));
        deps
    }

    pub fn as_directory(&self) -> Option<&DirectoryDescriptor> {
        match self {
            Descriptor::Directory(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_client(&self) -> Option<&ClientDescriptor> {
        match self {
            Descriptor::Client(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainDescriptor> {
        match self {
            Descriptor::Domain(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_federation(&self) -> Option<&FederationDescriptor> {
        match self {
            Descriptor::Federation(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&RoleDescriptor> {
        match self {
            Descriptor::Role(r) => Some(r),
            _ => None,
        }
    }
}

/// Append-only set of validated descriptors, in insertion (dependency)
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorSet {
    order: Vec<String>,
    descriptors: BTreeMap<String, Descriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, descriptor: Descriptor) -> Result<(), ConfigurationError> {
        let id = descriptor.logical_id().to_string();
        if self.descriptors.contains_key(&id) {
            return Err(ConfigurationError::DuplicateId(id));
        }
        log::debug!("Validated {} {}", descriptor.kind(), id);
        self.order.push(id.clone());
        self.descriptors.insert(id, descriptor);
        Ok(())
    }

    pub fn get(&self, logical_id: &str) -> Option<&Descriptor> {
        self.descriptors.get(logical_id)
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.descriptors.contains_key(logical_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Descriptors in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Descriptor> + '_ {
        self.order.iter().filter_map(|id| self.descriptors.get(id))
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryDescriptor> + '_ {
        self.iter().filter_map(Descriptor::as_directory)
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientDescriptor> + '_ {
        self.iter().filter_map(Descriptor::as_client)
    }

    pub fn domains(&self) -> impl Iterator<Item = &DomainDescriptor> + '_ {
        self.iter().filter_map(Descriptor::as_domain)
    }

    pub fn federations(&self) -> impl Iterator<Item = &FederationDescriptor> + '_ {
        self.iter().filter_map(Descriptor::as_federation)
    }

    pub fn roles(&self) -> impl Iterator<Item = &RoleDescriptor> + '_ {
        self.iter().filter_map(Descriptor::as_role)
    }

    /// Resolve `target` as a directory on behalf of `referrer`.
    pub fn directory(
        &self,
        referrer: &str,
        target: &str,
    ) -> Result<&DirectoryDescriptor, ConfigurationError> {
        self.resolve(referrer, target, ResourceKind::Directory, Descriptor::as_directory)
    }

    pub fn client(
        &self,
        referrer: &str,
        target: &str,
    ) -> Result<&ClientDescriptor, ConfigurationError> {
        self.resolve(referrer, target, ResourceKind::Client, Descriptor::as_client)
    }

    pub fn federation(
        &self,
        referrer: &str,
        target: &str,
    ) -> Result<&FederationDescriptor, ConfigurationError> {
        self.resolve(referrer, target, ResourceKind::Federation, Descriptor::as_federation)
    }

    fn resolve<'a, T>(
        &'a self,
        referrer: &str,
        target: &str,
        expected: ResourceKind,
        pick: fn(&'a Descriptor) -> Option<&'a T>,
    ) -> Result<&'a T, ConfigurationError> {
        let descriptor =
            self.descriptors
                .get(target)
                .ok_or_else(|| ConfigurationError::UnresolvedReference {
                    resource: referrer.to_string(),
                    target: target.to_string(),
                    expected,
                })?;
        pick(descriptor).ok_or_else(|| ConfigurationError::ReferenceKindMismatch {
            resource: referrer.to_string(),
            target: target.to_string(),
            expected,
            found: descriptor.kind(),
        })
    }
}

impl Serialize for DescriptorSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::Warnings;

    fn directory_only() -> DescriptorSet {
        let mut set = DescriptorSet::new();
        let d = directory::validate(&fixtures::directory(), &fixtures::SEED).expect("directory");
        set.insert(Descriptor::Directory(d)).expect("insert");
        set
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut set = directory_only();
        let again = directory::validate(&fixtures::directory(), &fixtures::SEED).expect("directory");
        assert_eq!(
            set.insert(Descriptor::Directory(again)),
            Err(ConfigurationError::DuplicateId("UserPool".into()))
        );
    }

    #[test]
    fn resolve_unknown_is_unresolved() {
        let set = directory_only();
        assert_eq!(
            set.client("IdentityPool", "WebClient").unwrap_err(),
            ConfigurationError::UnresolvedReference {
                resource: "IdentityPool".into(),
                target: "WebClient".into(),
                expected: ResourceKind::Client,
            }
        );
    }

    #[test]
    fn resolve_wrong_kind_is_mismatch() {
        let set = directory_only();
        assert_eq!(
            set.client("IdentityPool", "UserPool").unwrap_err(),
            ConfigurationError::ReferenceKindMismatch {
                resource: "IdentityPool".into(),
                target: "UserPool".into(),
                expected: ResourceKind::Client,
                found: ResourceKind::Directory,
            }
        );
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut set = directory_only();
        let mut warnings = Warnings::new();
        let c = client::validate(&fixtures::client(), &set, &fixtures::SEED, &mut warnings)
            .expect("client");
        set.insert(Descriptor::Client(c)).expect("insert");

        let ids: Vec<&str> = set.iter().map(Descriptor::logical_id).collect();
        assert_eq!(ids, vec!["UserPool", "WebClient"]);
        assert_eq!(set.clients().count(), 1);
        assert_eq!(set.get("WebClient").map(Descriptor::dependencies), Some(vec!["UserPool"]));
    }
}
