//! Change planning between two composed graphs, single-resource removal and
//! full teardown.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::definitions::Descriptor;
use crate::graph::DescriptorGraph;
use crate::models::{RemovalBehavior, ResourceKind};
use crate::warning::{DisruptiveChangeWarning, Warning, Warnings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("Disruptive changes need acknowledgment: {} would be replaced", .resources.join(", "))]
    UnacknowledgedDisruptiveChange { resources: Vec<String> },

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Cannot remove {resource}: referenced by {}", .dependents.join(", "))]
    DependentsExist {
        resource: String,
        dependents: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Create,
    Update,
    /// Destroy then recreate.
    Replace,
    Delete,
    /// Dropped from the stack but left in place.
    Retain,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "create",
            ChangeAction::Update => "update",
            ChangeAction::Replace => "replace",
            ChangeAction::Delete => "delete",
            ChangeAction::Retain => "retain",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceChange {
    pub resource: String,
    pub kind: ResourceKind,
    pub action: ChangeAction,
    /// Changed top-level attributes, for updates and replacements.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl ResourceChange {
    fn new(descriptor: &Descriptor, action: ChangeAction) -> Self {
        Self {
            resource: descriptor.logical_id().to_string(),
            kind: descriptor.kind(),
            action,
            attributes: Vec::new(),
        }
    }

    /// Deletion honoring the resource's removal behavior.
    fn removal(descriptor: &Descriptor) -> Self {
        let retained = descriptor
            .as_directory()
            .is_some_and(|d| d.removal == RemovalBehavior::Retain);
        let action = if retained {
            ChangeAction::Retain
        } else {
            ChangeAction::Delete
        };
        Self::new(descriptor, action)
    }
}

/// Attributes whose change forces a resource to be replaced.
fn replacement_attributes(kind: ResourceKind) -> &'static [&'static str] {
    match kind {
        ResourceKind::Directory => &["id"],
        ResourceKind::Client => &["id", "directory"],
        ResourceKind::Domain => &["prefix", "directory"],
        ResourceKind::Federation => &["id"],
        ResourceKind::Role => &["name"],
    }
}

/// Ordered actions turning one composed graph into another.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    pub changes: Vec<ResourceChange>,
    pub warnings: Warnings,
}

impl ChangeSet {
    /// Plan the move from `previous` to `next`.
    ///
    /// Creations, updates and replacements follow the dependency order of
    /// `next`; deletions come last, dependents first. Unchanged resources
    /// are left out.
    pub fn between(previous: &DescriptorGraph, next: &DescriptorGraph) -> Self {
        let mut plan = ChangeSet::default();

        for descriptor in next.iter() {
            let Some(before) = previous.get(descriptor.logical_id()) else {
                plan.changes
                    .push(ResourceChange::new(descriptor, ChangeAction::Create));
                continue;
            };

            if before.kind() != descriptor.kind() {
                plan.replace(
                    descriptor,
                    vec!["kind".to_string()],
                    "kind",
                    before.kind().to_string(),
                    descriptor.kind().to_string(),
                );
                continue;
            }

            let (old, new) = (attributes(before), attributes(descriptor));
            let keys: BTreeSet<&String> = old.iter().chain(new.iter()).map(|(k, _)| k).collect();
            let changed: Vec<String> = keys
                .into_iter()
                .filter(|k| lookup(&old, k) != lookup(&new, k))
                .cloned()
                .collect();
            if changed.is_empty() {
                continue;
            }

            let trigger = replacement_attributes(descriptor.kind())
                .iter()
                .find(|a| changed.iter().any(|c| c == *a));
            match trigger {
                Some(attribute) => plan.replace(
                    descriptor,
                    changed,
                    attribute,
                    render(lookup(&old, attribute)),
                    render(lookup(&new, attribute)),
                ),
                None => {
                    let mut change = ResourceChange::new(descriptor, ChangeAction::Update);
                    change.attributes = changed;
                    plan.changes.push(change);
                }
            }
        }

        for descriptor in previous.iter().rev() {
            if next.get(descriptor.logical_id()).is_none() {
                plan.changes.push(ResourceChange::removal(descriptor));
            }
        }

        log::info!(
            "Planned {} changes, {} disruptive",
            plan.changes.len(),
            plan.disruptive().count()
        );
        plan
    }

    fn replace(
        &mut self,
        descriptor: &Descriptor,
        attributes: Vec<String>,
        trigger: &str,
        previous: String,
        next: String,
    ) {
        let mut change = ResourceChange::new(descriptor, ChangeAction::Replace);
        change.attributes = attributes;
        self.changes.push(change);
        self.warnings.push(DisruptiveChangeWarning {
            resource: descriptor.logical_id().to_string(),
            kind: descriptor.kind(),
            attribute: trigger.to_string(),
            previous,
            next,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn disruptive(&self) -> impl Iterator<Item = &DisruptiveChangeWarning> + '_ {
        self.warnings.iter().filter_map(|w| match w {
            Warning::DisruptiveChange(d) => Some(d),
            _ => None,
        })
    }

    pub fn is_disruptive(&self) -> bool {
        self.disruptive().next().is_some()
    }

    /// Release the plan for application. Replacements are refused unless
    /// `acknowledged`.
    pub fn approve(self, acknowledged: bool) -> Result<ChangeSet, ChangeError> {
        if !acknowledged && self.is_disruptive() {
            let resources = self.disruptive().map(|d| d.resource.clone()).collect();
            return Err(ChangeError::UnacknowledgedDisruptiveChange { resources });
        }
        Ok(self)
    }
}

fn attributes(descriptor: &Descriptor) -> Vec<(String, Value)> {
    match serde_json::to_value(descriptor) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => Vec::new(),
    }
}

fn lookup<'a>(attributes: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn render(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "(none)".to_string(),
    }
}

/// What to do with resources that reference the one being removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalMode {
    /// Refuse while anything references it.
    #[default]
    Reject,
    /// Remove every dependent as well.
    Cascade,
}

/// Plan the removal of one resource from a composed graph.
pub fn removal_plan(
    graph: &DescriptorGraph,
    logical_id: &str,
    mode: RemovalMode,
) -> Result<Vec<ResourceChange>, ChangeError> {
    let target = graph
        .get(logical_id)
        .ok_or_else(|| ChangeError::UnknownResource(logical_id.to_string()))?;

    let dependents = graph.transitive_dependents(logical_id);
    if mode == RemovalMode::Reject && !dependents.is_empty() {
        return Err(ChangeError::DependentsExist {
            resource: logical_id.to_string(),
            dependents: graph
                .dependents(logical_id)
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    }

    let mut plan: Vec<ResourceChange> = dependents
        .into_iter()
        .filter_map(|id| graph.get(id))
        .map(ResourceChange::removal)
        .collect();
    plan.push(ResourceChange::removal(target));
    Ok(plan)
}

/// Tear the whole stack down, dependents first.
pub fn teardown_plan(graph: &DescriptorGraph) -> Vec<ResourceChange> {
    graph.iter().rev().map(ResourceChange::removal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::fixtures;
    use crate::models::{StackConfig, StackConfigBuilder};
    use crate::pipeline::Draft;

    fn config() -> StackConfig {
        StackConfigBuilder::default()
            .stack("UnifiedLoginStack")
            .region("us-east-1")
            .directories(vec![fixtures::directory()])
            .clients(vec![fixtures::client()])
            .domains(vec![fixtures::domain()])
            .federations(vec![fixtures::federation()])
            .roles(vec![fixtures::role()])
            .build()
            .unwrap()
    }

    fn compose(config: StackConfig) -> DescriptorGraph {
        Draft::new(config)
            .validate()
            .expect("validated")
            .compose()
            .expect("composed")
            .into_graph()
    }

    #[test]
    fn unchanged_graph_plans_nothing() {
        let plan = ChangeSet::between(&compose(config()), &compose(config()));
        assert!(plan.is_empty());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn domain_rename_is_a_disruptive_replace() {
        let mut next = config();
        next.domains[0].prefix = "newlogin".into();
        let plan = ChangeSet::between(&compose(config()), &compose(next));

        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].resource, "Domain");
        assert_eq!(plan.changes[0].action, ChangeAction::Replace);

        let disruptive: Vec<_> = plan.disruptive().collect();
        assert_eq!(disruptive.len(), 1);
        assert_eq!(disruptive[0].attribute, "prefix");
        assert_eq!(disruptive[0].previous, "unifiedlogin");
        assert_eq!(disruptive[0].next, "newlogin");

        assert_eq!(
            plan.clone().approve(false).unwrap_err(),
            ChangeError::UnacknowledgedDisruptiveChange {
                resources: vec!["Domain".into()]
            }
        );
        assert!(plan.approve(true).is_ok());
    }

    #[test]
    fn in_place_update_needs_no_acknowledgment() {
        let mut next = config();
        next.clients[0].oauth.scopes.push("openid".into());
        let plan = ChangeSet::between(&compose(config()), &compose(next));

        assert_eq!(plan.changes.len(), 1);
        assert_eq!(plan.changes[0].action, ChangeAction::Update);
        assert_eq!(plan.changes[0].attributes, vec!["oauth".to_string()]);
        assert!(!plan.is_disruptive());
        assert!(plan.approve(false).is_ok());
    }

    #[test]
    fn added_and_removed_resources() {
        let mut next = config();
        next.domains.clear();
        let mut second = fixtures::role();
        second.id = "ReadOnlyRole".into();
        next.roles = vec![second];

        let plan = ChangeSet::between(&compose(config()), &compose(next));
        let summary: Vec<(&str, ChangeAction)> = plan
            .changes
            .iter()
            .map(|c| (c.resource.as_str(), c.action))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("ReadOnlyRole", ChangeAction::Create),
                ("AuthenticatedRole", ChangeAction::Delete),
                ("Domain", ChangeAction::Delete),
            ]
        );
    }

    #[test]
    fn removal_with_dependents_is_rejected() {
        let graph = compose(config());
        assert_eq!(
            removal_plan(&graph, "IdentityPool", RemovalMode::Reject).unwrap_err(),
            ChangeError::DependentsExist {
                resource: "IdentityPool".into(),
                dependents: vec!["AuthenticatedRole".into()],
            }
        );
        assert!(matches!(
            removal_plan(&graph, "Nope", RemovalMode::Cascade),
            Err(ChangeError::UnknownResource(_))
        ));
    }

    #[test]
    fn cascading_removal_goes_dependents_first() {
        let graph = compose(config());
        let plan = removal_plan(&graph, "WebClient", RemovalMode::Cascade).expect("plan");
        let ids: Vec<&str> = plan.iter().map(|c| c.resource.as_str()).collect();
        assert_eq!(ids, vec!["AuthenticatedRole", "IdentityPool", "WebClient"]);

        let leaf = removal_plan(&graph, "AuthenticatedRole", RemovalMode::Reject).expect("leaf");
        assert_eq!(leaf.len(), 1);
    }

    #[test]
    fn teardown_retains_directory_by_default() {
        let plan = teardown_plan(&compose(config()));
        let summary: Vec<(&str, ChangeAction)> = plan
            .iter()
            .map(|c| (c.resource.as_str(), c.action))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("AuthenticatedRole", ChangeAction::Delete),
                ("IdentityPool", ChangeAction::Delete),
                ("Domain", ChangeAction::Delete),
                ("WebClient", ChangeAction::Delete),
                ("UserPool", ChangeAction::Retain),
            ]
        );
    }

    #[test]
    fn teardown_deletes_destroyable_directory() {
        let mut config = config();
        config.directories[0].removal = RemovalBehavior::Destroy;
        let plan = teardown_plan(&compose(config));
        assert_eq!(plan.last().map(|c| c.action), Some(ChangeAction::Delete));
    }
}
