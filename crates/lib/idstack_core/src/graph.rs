//! The composed descriptor graph handed to a provisioning engine.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::definitions::{Descriptor, DescriptorSet, RoleAttachment};

/// Every validated resource of one stack, cross-referenced, plus the role
/// attachment of each federation.
///
/// Resources iterate in dependency order; reversing that order gives a safe
/// teardown sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct DescriptorGraph {
    pub stack: String,
    pub region: String,
    pub resources: DescriptorSet,
    /// Keyed by federation logical id.
    pub attachments: BTreeMap<String, RoleAttachment>,
}

impl DescriptorGraph {
    pub(crate) fn new(
        stack: String,
        region: String,
        resources: DescriptorSet,
        attachments: BTreeMap<String, RoleAttachment>,
    ) -> Self {
        Self {
            stack,
            region,
            resources,
            attachments,
        }
    }

    pub fn get(&self, logical_id: &str) -> Option<&Descriptor> {
        self.resources.get(logical_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in dependency order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Descriptor> + '_ {
        self.resources.iter()
    }

    /// Resources that reference `logical_id` directly.
    pub fn dependents(&self, logical_id: &str) -> Vec<&str> {
        self.iter()
            .filter(|d| d.dependencies().contains(&logical_id))
            .map(Descriptor::logical_id)
            .collect()
    }

    /// Everything that would break if `logical_id` went away, dependents
    /// first.
    pub fn transitive_dependents(&self, logical_id: &str) -> Vec<&str> {
        let mut affected: BTreeSet<&str> = BTreeSet::from([logical_id]);
        // Dependency order guarantees a single forward pass sees every
        // referrer after its target.
        for descriptor in self.iter() {
            if descriptor
                .dependencies()
                .iter()
                .any(|dep| affected.contains(dep))
            {
                affected.insert(descriptor.logical_id());
            }
        }
        self.iter()
            .rev()
            .map(Descriptor::logical_id)
            .filter(|id| *id != logical_id && affected.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::definitions::fixtures;
    use crate::models::StackConfigBuilder;
    use crate::pipeline::Draft;

    fn graph() -> super::DescriptorGraph {
        let config = StackConfigBuilder::default()
            .stack("UnifiedLoginStack")
            .region("us-east-1")
            .directories(vec![fixtures::directory()])
            .clients(vec![fixtures::client()])
            .domains(vec![fixtures::domain()])
            .federations(vec![fixtures::federation()])
            .roles(vec![fixtures::role()])
            .build()
            .unwrap();
        Draft::new(config)
            .validate()
            .expect("validated")
            .compose()
            .expect("composed")
            .into_graph()
    }

    #[test]
    fn direct_dependents() {
        let graph = graph();
        assert_eq!(graph.dependents("UserPool"), vec!["WebClient", "Domain", "IdentityPool"]);
        assert_eq!(graph.dependents("AuthenticatedRole"), Vec::<&str>::new());
    }

    #[test]
    fn transitive_dependents_come_dependents_first() {
        let graph = graph();
        assert_eq!(
            graph.transitive_dependents("UserPool"),
            vec!["AuthenticatedRole", "IdentityPool", "Domain", "WebClient"]
        );
        assert_eq!(
            graph.transitive_dependents("IdentityPool"),
            vec!["AuthenticatedRole"]
        );
    }

    #[test]
    fn serializes_resources_with_kind_tags() {
        let value = serde_json::to_value(graph()).expect("json");
        assert_eq!(value["stack"], "UnifiedLoginStack");
        assert_eq!(value["resources"][0]["kind"], "directory");
        assert_eq!(value["resources"][0]["logical_id"], "UserPool");
        assert_eq!(
            value["attachments"]["IdentityPool"]["authenticated"],
            "AuthenticatedRole"
        );
    }
}
