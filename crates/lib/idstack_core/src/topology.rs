//! Reference graph over logical ids.
//!
//! Built straight from the configuration record, before any resource is
//! validated, so that cycles and dangling references are caught
//! independently of declaration order.

use std::collections::{BTreeSet, HashMap};

use crate::error::ConfigurationError;
use crate::models::{ResourceKind, StackConfig};

struct Node<'a> {
    id: &'a str,
    kind: ResourceKind,
    /// Indices of the nodes this one references.
    dependencies: Vec<usize>,
}

pub struct ReferenceGraph<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> ReferenceGraph<'a> {
    /// Index every declared resource and its references.
    pub fn from_config(config: &'a StackConfig) -> Result<Self, ConfigurationError> {
        let declarations = config.declarations();

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(declarations.len());
        for (i, &(id, kind)) in declarations.iter().enumerate() {
            if id.is_empty() {
                return Err(ConfigurationError::MissingField {
                    resource: kind.to_string(),
                    field: "id",
                });
            }
            if index.insert(id, i).is_some() {
                return Err(ConfigurationError::DuplicateId(id.to_string()));
            }
        }

        let mut nodes: Vec<Node<'a>> = declarations
            .iter()
            .map(|&(id, kind)| Node {
                id,
                kind,
                dependencies: Vec::new(),
            })
            .collect();

        let references = config
            .clients
            .iter()
            .map(|c| (c.id.as_str(), c.directory.as_str(), ResourceKind::Directory))
            .chain(
                config
                    .domains
                    .iter()
                    .map(|d| (d.id.as_str(), d.directory.as_str(), ResourceKind::Directory)),
            )
            .chain(config.federations.iter().flat_map(|f| {
                f.providers.iter().flat_map(move |p| {
                    [
                        (f.id.as_str(), p.client.as_str(), ResourceKind::Client),
                        (f.id.as_str(), p.directory.as_str(), ResourceKind::Directory),
                    ]
                })
            }))
            .chain(
                config
                    .roles
                    .iter()
                    .map(|r| (r.id.as_str(), r.federation.as_str(), ResourceKind::Federation)),
            );

        for (from, to, expected) in references {
            let target = *index
                .get(to)
                .ok_or_else(|| ConfigurationError::UnresolvedReference {
                    resource: from.to_string(),
                    target: to.to_string(),
                    expected,
                })?;
            let node = &mut nodes[index[from]];
            if !node.dependencies.contains(&target) {
                node.dependencies.push(target);
            }
        }

        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind_of(&self, id: &str) -> Option<ResourceKind> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.kind)
    }

    /// Dependency order: every resource after everything it references.
    /// Ties go to the earlier declaration.
    pub fn topological_order(&self) -> Result<Vec<&'a str>, ConfigurationError> {
        let n = self.nodes.len();
        let mut pending: Vec<usize> = self.nodes.iter().map(|n| n.dependencies.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, node) in self.nodes.iter().enumerate() {
            for &dep in &node.dependencies {
                dependents[dep].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_first() {
            order.push(self.nodes[i].id);
            for &d in &dependents[i] {
                pending[d] -= 1;
                if pending[d] == 0 {
                    ready.insert(d);
                }
            }
        }

        if order.len() < n {
            return Err(ConfigurationError::CycleDetected(self.find_cycle(&pending)));
        }
        Ok(order)
    }

    /// Walk unresolved dependencies from the first stuck node until a node
    /// repeats. Every stuck node has a stuck dependency, so the walk always
    /// closes a cycle.
    fn find_cycle(&self, pending: &[usize]) -> Vec<String> {
        let stuck = |i: usize| pending[i] > 0;
        let Some(start) = (0..self.nodes.len()).find(|&i| stuck(i)) else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let Some(&next) = self.nodes[current]
                .dependencies
                .iter()
                .find(|&&d| stuck(d))
            else {
                return Vec::new();
            };
            if let Some(pos) = path.iter().position(|&p| p == next) {
                let mut cycle: Vec<String> =
                    path[pos..].iter().map(|&i| self.nodes[i].id.to_string()).collect();
                cycle.push(self.nodes[next].id.to_string());
                return cycle;
            }
            path.push(next);
            current = next;
        }
    }
}
